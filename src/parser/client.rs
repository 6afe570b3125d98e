//! Assemble the members of one client script file from its comment blocks.

use crate::model::{MemberDoc, MemberKind, Origin};
use crate::parser::scan::{CommentBlock, Scanner};
use crate::parser::tags::{self, TagResult};
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

/// The `@class` declaration of a script file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClassDoc {
    pub name: String,
    pub summary: String,
}

/// Everything documented in one client script file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClientMembers {
    pub class: Option<ClassDoc>,
    /// Members in file order; names are unique.
    pub members: Vec<MemberDoc>,
}

impl ClientMembers {
    pub fn is_empty(&self) -> bool {
        self.class.is_none() && self.members.is_empty()
    }
}

/// Collects tag results block by block.
#[derive(Debug, Default)]
pub struct ClientMemberBuilder {
    class: Option<ClassDoc>,
    members: Vec<MemberDoc>,
    index: HashMap<String, usize>,
}

impl ClientMemberBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_block(&mut self, block: &CommentBlock) {
        for result in tags::parse_block(block) {
            self.add_result(result);
        }
    }

    pub fn add_result(&mut self, result: TagResult) {
        let member = match result {
            TagResult::Class(tag) => {
                if let Some(existing) = &self.class {
                    debug!(kept = %existing.name, ignored = %tag.name, "ignoring extra @class");
                } else {
                    self.class = Some(ClassDoc {
                        name: tag.name,
                        summary: tag.summary,
                    });
                }
                return;
            }
            TagResult::Property(tag) => MemberDoc {
                name: tag.name,
                summary: tag.summary,
                type_name: tag.type_name,
                origin: Origin::Client,
                kind: MemberKind::Property {
                    default_value: tag.default_value,
                },
            },
            TagResult::Event(tag) => MemberDoc {
                name: tag.name,
                summary: tag.summary,
                type_name: tag.type_name,
                origin: Origin::Client,
                kind: MemberKind::Event { params: tag.params },
            },
            TagResult::Method(tag) => MemberDoc {
                name: tag.name,
                summary: tag.summary,
                type_name: tag.return_type,
                origin: Origin::Client,
                kind: MemberKind::Method {
                    params: tag.params,
                    returns: tag.returns,
                },
            },
            TagResult::Summary(_) | TagResult::Unrecognized(_) => return,
        };
        self.insert(member);
    }

    /// Later annotations of the same name replace earlier ones in place.
    fn insert(&mut self, member: MemberDoc) {
        match self.index.get(&member.name) {
            Some(&idx) => {
                debug!(member = %member.name, "duplicate client member, keeping the later one");
                self.members[idx] = member;
            }
            None => {
                self.index.insert(member.name.clone(), self.members.len());
                self.members.push(member);
            }
        }
    }

    pub fn build(self) -> ClientMembers {
        ClientMembers {
            class: self.class,
            members: self.members,
        }
    }
}

/// Scan, tag-parse and assemble a whole script file.
pub fn parse_file<S: AsRef<str>>(lines: &[S]) -> ClientMembers {
    let mut builder = ClientMemberBuilder::new();
    for block in Scanner::new(lines).blocks() {
        builder.add_block(&block);
    }
    builder.build()
}

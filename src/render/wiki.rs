//! CodePlex-style wiki markup.
//!
//! `!` headings, `*bold*`, `_italic_`, `{"code"}` literals and `*` bullets.

use crate::error::Result;
use crate::model::*;
use crate::render::{short_type, signature, Renderer};

pub struct WikiRenderer;

impl Renderer for WikiRenderer {
    fn render_type(&self, ty: &TypeDoc) -> Result<String> {
        let mut out = String::new();
        out.push_str(&format!("! {}\n", ty.name));
        if !ty.summary.is_empty() {
            out.push_str(&paragraphs(&ty.summary));
        }

        section(&mut out, "Properties", ty.properties(), |m| {
            let mut line = format!("* *{}*", m.name);
            if !m.type_name.is_empty() {
                line.push_str(&format!(" {{\"{}\"}}", short_type(&m.type_name)));
            }
            if !m.summary.is_empty() {
                line.push_str(&format!(" - {}", one_line(&m.summary)));
            }
            if let Some(default) = m.default_value() {
                line.push_str(&format!(" _Default: {}_", default));
            }
            line
        });
        section(&mut out, "Events", ty.events(), member_line);
        section(&mut out, "Methods", ty.methods(), member_line);

        Ok(out)
    }

    fn render_index(&self, types: &[&TypeDoc]) -> Result<String> {
        let mut out = String::from("!! Controls\n");
        for ty in types {
            out.push_str(&format!("* [#{}]\n", ty.name));
        }
        Ok(out)
    }

    fn file_extension(&self) -> &str {
        "wiki"
    }
}

fn section<'a>(
    out: &mut String,
    title: &str,
    members: impl Iterator<Item = &'a MemberDoc>,
    line: impl Fn(&MemberDoc) -> String,
) {
    let mut members = members.peekable();
    if members.peek().is_none() {
        return;
    }
    out.push_str(&format!("!! {}\n", title));
    for member in members {
        out.push_str(&line(member));
        out.push('\n');
    }
}

fn member_line(m: &MemberDoc) -> String {
    let mut line = format!("* {{\"{}\"}}", signature(m));
    if !m.summary.is_empty() {
        line.push_str(&format!(" - {}", one_line(&m.summary)));
    }
    for p in m.params() {
        if !p.description.is_empty() {
            line.push_str(&format!("\n** _{}_ - {}", p.name, one_line(&p.description)));
        }
    }
    if let Some(returns) = m.returns() {
        line.push_str(&format!("\n** _returns_ - {}", one_line(returns)));
    }
    line
}

fn paragraphs(text: &str) -> String {
    let mut out = String::new();
    for para in text.split("\n\n") {
        out.push_str(&one_line(para));
        out.push_str("\n\n");
    }
    out
}

/// Wiki bullets cannot span lines.
fn one_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

//! GitHub-flavored markdown renderer.

use crate::error::Result;
use crate::model::*;
use crate::render::{short_type, signature, Renderer};
use crate::toc;

pub struct MarkdownRenderer;

impl Renderer for MarkdownRenderer {
    fn render_type(&self, ty: &TypeDoc) -> Result<String> {
        let mut lines: Vec<String> = Vec::new();

        lines.push(format!("# {}\n", ty.name));
        if !ty.namespace.is_empty() {
            lines.push(format!("_Namespace: {}_\n", ty.namespace));
        }
        if !ty.summary.is_empty() {
            lines.push(ty.summary.clone());
            lines.push(String::new());
        }

        if !ty.members.is_empty() {
            lines.push("## Index\n".to_string());
            for member in &ty.members {
                lines.push(toc::render_toc_item(&member.name));
            }
            lines.push(String::new());
        }

        render_section(&mut lines, "Properties", ty.properties());
        render_section(&mut lines, "Events", ty.events());
        render_section(&mut lines, "Methods", ty.methods());

        Ok(lines.join("\n"))
    }

    fn render_index(&self, types: &[&TypeDoc]) -> Result<String> {
        Ok(index(types, |ty| format!("{}.{}", ty.name, self.file_extension())))
    }

    fn render_all(&self, types: &[&TypeDoc]) -> Result<String> {
        let mut out = index(types, |ty| format!("#{}", toc::github_slug(&ty.name)));
        for ty in types {
            out.push('\n');
            out.push_str(&self.render_type(ty)?);
        }
        Ok(out)
    }

    fn file_extension(&self) -> &str {
        "md"
    }
}

fn index(types: &[&TypeDoc], link: impl Fn(&TypeDoc) -> String) -> String {
    let mut out = String::from("# Reference\n\n");
    for ty in types {
        out.push_str(&format!("* [{}]({})", ty.name, link(ty)));
        if let Some(first) = ty.summary.lines().next() {
            out.push_str(&format!(": {}", first));
        }
        out.push('\n');
    }
    out
}

fn render_section<'a>(lines: &mut Vec<String>, title: &str, members: impl Iterator<Item = &'a MemberDoc>) {
    let mut members = members.peekable();
    if members.peek().is_none() {
        return;
    }
    lines.push(format!("## {}\n", title));
    for member in members {
        render_member(lines, member);
    }
}

/// Render one member block.
fn render_member(lines: &mut Vec<String>, member: &MemberDoc) {
    lines.push(format!("### {}\n", member.name));

    if matches!(member.kind, MemberKind::Method { .. } | MemberKind::Event { .. })
        && !member.params().is_empty()
    {
        lines.push(format!("`{}`\n", signature(member)));
    }

    let badges = render_badges(member);
    if !badges.is_empty() {
        lines.push(badges);
        lines.push(String::new());
    }

    if !member.summary.is_empty() {
        lines.push(member.summary.clone());
        lines.push(String::new());
    }

    if !member.params().is_empty() {
        lines.push("#### Parameters\n".to_string());
        for param in member.params() {
            lines.push(render_param(param));
        }
        lines.push(String::new());
    }

    if let Some(returns) = member.returns() {
        lines.push("#### Returns\n".to_string());
        lines.push(returns.to_string());
        lines.push(String::new());
    }
}

/// `**name** (Type): description`
fn render_param(param: &ParameterDoc) -> String {
    let mut out = format!("* **{}**", param.name);
    if !param.type_name.is_empty() {
        out.push_str(&format!(" ({})", short_type(&param.type_name)));
    }
    if !param.description.is_empty() {
        out.push_str(&format!(": {}", param.description));
    }
    out
}

/// Type, default value and origin badges.
///
/// Output: `` > `String` default `250px` *`client`* ``
fn render_badges(member: &MemberDoc) -> String {
    let mut badges: Vec<String> = Vec::new();

    if !member.type_name.is_empty() && member.params().is_empty() {
        badges.push(format!("`{}`", short_type(&member.type_name)));
    }

    if let Some(default) = member.default_value() {
        badges.push(format!("default `{}`", default));
    }

    // Only members with no XML record are marked
    if member.origin == Origin::Client {
        badges.push("*`client`*".to_string());
    }

    if badges.is_empty() {
        return String::new();
    }

    format!("> {}", badges.join(" "))
}

//! Renderer module — trait-based format dispatch.

pub mod json;
pub mod markdown;
pub mod wiki;

use crate::error::{Error, Result};
use crate::model::TypeDoc;

/// Turns merged type documentation into an output format.
///
/// Renderers are stateless and built once per process; see
/// [`create_renderer`].
pub trait Renderer: Send + Sync {
    /// Reference page for a single type.
    fn render_type(&self, ty: &TypeDoc) -> Result<String>;

    /// List of the given types.
    fn render_index(&self, types: &[&TypeDoc]) -> Result<String>;

    /// One document covering every given type.
    fn render_all(&self, types: &[&TypeDoc]) -> Result<String> {
        let mut out = self.render_index(types)?;
        for ty in types {
            out.push('\n');
            out.push_str(&self.render_type(ty)?);
        }
        Ok(out)
    }

    fn file_extension(&self) -> &str;
}

/// Create a renderer for the given format name.
pub fn create_renderer(format: &str) -> Result<Box<dyn Renderer>> {
    match format {
        "markdown" | "md" => Ok(Box::new(markdown::MarkdownRenderer)),
        "wiki" => Ok(Box::new(wiki::WikiRenderer)),
        "json" => Ok(Box::new(json::JsonRenderer)),
        _ => Err(Error::UnknownFormat(format.to_string())),
    }
}

/// `Boolean validate(String value, Number max)`
pub(crate) fn signature(member: &crate::model::MemberDoc) -> String {
    let params: Vec<String> = member
        .params()
        .iter()
        .map(|p| {
            if p.type_name.is_empty() {
                p.name.clone()
            } else {
                format!("{} {}", short_type(&p.type_name), p.name)
            }
        })
        .collect();
    let returns = if member.type_name.is_empty() {
        String::new()
    } else {
        format!("{} ", short_type(&member.type_name))
    };
    format!("{}{}({})", returns, member.name, params.join(", "))
}

/// `System.Collections.Generic.List{System.Int32}` → `List{Int32}`
pub(crate) fn short_type(type_name: &str) -> String {
    let mut out = String::with_capacity(type_name.len());
    let mut segment = String::new();
    for c in type_name.chars() {
        match c {
            '.' => segment.clear(),
            '{' | '}' | ',' | '[' | ']' => {
                out.push_str(&segment);
                segment.clear();
                out.push(c);
            }
            _ => segment.push(c),
        }
    }
    out.push_str(&segment);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MemberDoc, Origin, ParameterDoc};

    #[test]
    fn unknown_format_fails() {
        assert!(matches!(create_renderer("xml"), Err(Error::UnknownFormat(_))));
        assert_eq!(create_renderer("md").unwrap().file_extension(), "md");
    }

    #[test]
    fn short_type_strips_namespaces() {
        assert_eq!(short_type("System.String"), "String");
        assert_eq!(
            short_type("System.Collections.Generic.Dictionary{System.String,System.Int32}"),
            "Dictionary{String,Int32}"
        );
        assert_eq!(short_type("Number"), "Number");
    }

    #[test]
    fn method_signature() {
        let mut m = MemberDoc::method("clamp", Origin::Client);
        m.type_name = "Number".to_string();
        m.params_mut().unwrap().push(ParameterDoc {
            name: "value".to_string(),
            type_name: "System.Int32".to_string(),
            description: String::new(),
        });
        m.params_mut().unwrap().push(ParameterDoc {
            name: "max".to_string(),
            ..Default::default()
        });
        assert_eq!(signature(&m), "Number clamp(Int32 value, max)");
    }
}

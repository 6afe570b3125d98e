//! Reader for compiler-emitted XML documentation files.
//!
//! Only the shape the compiler produces is understood:
//!
//! ```xml
//! <doc>
//!   <members>
//!     <member name="P:Ns.Type.Width">
//!       <summary>Width of the <see cref="T:Ns.Type"/>.</summary>
//!     </member>
//!   </members>
//! </doc>
//! ```

use crate::error::{Error, Result};
use crate::model::{DocFragment, RawDoc};
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

static RE_MEMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<member\s+name\s*=\s*"([^"]*)"\s*(?:/>|>(.*?)</member\s*>)"#).unwrap()
});

static RE_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<([A-Za-z][\w.-]*)([^>]*?)(/?)>").unwrap());

static RE_NAME_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\bname\s*=\s*"([^"]*)""#).unwrap());

static RE_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<(?:see|seealso)\s+(?:cref|langword|href)\s*=\s*"(?:[A-Z]:)?([^"]*)"\s*/>"#).unwrap()
});

static RE_PARAMREF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<(?:paramref|typeparamref)\s+name\s*=\s*"([^"]*)"\s*/>"#).unwrap()
});

static RE_PARA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</?para\s*/?>").unwrap());

static RE_ANY_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</?[A-Za-z][^>]*>").unwrap());

static RE_CHAR_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&#([xX][0-9A-Fa-f]+|[0-9]+);").unwrap());

static RE_SPACES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[[:blank:]]*\n[[:blank:]\n]*|[[:blank:]]+").unwrap());

/// Read and parse an XML documentation file.
pub fn load(path: &Path) -> Result<Vec<RawDoc>> {
    let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    Ok(parse(&content))
}

/// Parse every `<member>` record, sorted by target name.
pub fn parse(content: &str) -> Vec<RawDoc> {
    let mut records: Vec<RawDoc> = RE_MEMBER
        .captures_iter(content)
        .map(|caps| {
            let mut raw = RawDoc::new(&decode_entities(&caps[1]));
            if let Some(body) = caps.get(2) {
                raw.fragments = fragments(body.as_str());
            }
            raw
        })
        .collect();
    records.sort_by(|a, b| a.target_full_name.cmp(&b.target_full_name));
    records
}

/// Split a member body into its top-level child elements.
fn fragments(body: &str) -> Vec<DocFragment> {
    let mut out = Vec::new();
    let mut pos = 0;

    while let Some(caps) = RE_OPEN.captures_at(body, pos) {
        let whole = caps.get(0).map_or(0..0, |m| m.range());
        let element = caps[1].to_string();
        let name = RE_NAME_ATTR
            .captures(&caps[2])
            .map(|c| decode_entities(&c[1]));

        if &caps[3] == "/" {
            out.push(DocFragment {
                element,
                name,
                text: String::new(),
            });
            pos = whole.end;
            continue;
        }

        let close = format!("</{}>", element);
        let Some(end) = find_close(body, whole.end, &element) else {
            // Unterminated element; keep what we have.
            break;
        };
        out.push(DocFragment {
            text: inner_text(&body[whole.end..end]),
            element,
            name,
        });
        pos = end + close.len();
    }

    out
}

/// Find the matching close tag, skipping nested elements of the same name.
fn find_close(body: &str, from: usize, element: &str) -> Option<usize> {
    let open = format!("<{}", element);
    let close = format!("</{}>", element);
    let mut depth = 1usize;
    let mut pos = from;

    loop {
        let next_close = body[pos..].find(&close).map(|i| i + pos)?;
        let next_open = body[pos..next_close]
            .match_indices(&open)
            .map(|(i, _)| i + pos)
            .find(|&i| {
                body[i + open.len()..]
                    .chars()
                    .next()
                    .is_some_and(|c| c == '>' || c.is_whitespace())
            });
        match next_open {
            Some(i) => {
                depth += 1;
                pos = i + open.len();
            }
            None => {
                depth -= 1;
                if depth == 0 {
                    return Some(next_close);
                }
                pos = next_close + close.len();
            }
        }
    }
}

/// Flatten inline markup to plain text.
fn inner_text(xml: &str) -> String {
    let text = RE_REF.replace_all(xml, |caps: &regex::Captures| short_ref(&caps[1]));
    let text = RE_PARAMREF.replace_all(&text, "$1");
    let text = RE_PARA.replace_all(&text, "\n\n");
    let text = RE_ANY_TAG.replace_all(&text, "");
    let text = decode_entities(&text);

    // Collapse whitespace but keep paragraph breaks.
    let paragraphs: Vec<String> = text
        .split("\n\n")
        .map(|p| RE_SPACES.replace_all(p.trim(), " ").to_string())
        .filter(|p| !p.is_empty())
        .collect();
    paragraphs.join("\n\n")
}

/// `Ns.Type.Member(System.String)` → `Member`.
fn short_ref(cref: &str) -> String {
    let base = cref.split('(').next().unwrap_or(cref);
    base.rsplit('.').next().unwrap_or(base).to_string()
}

/// Decode numeric references, then the predefined entities; `&amp;` last so
/// `&amp;lt;` stays `&lt;`.
fn decode_entities(text: &str) -> String {
    let text = RE_CHAR_REF.replace_all(text, |caps: &regex::Captures| {
        let code = match caps[1].strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => caps[1].parse().ok(),
        };
        code.and_then(char::from_u32)
            .map_or_else(|| caps[0].to_string(), String::from)
    });
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RawKind;

    const SAMPLE: &str = r#"<?xml version="1.0"?>
<doc>
    <assembly>
        <name>AjaxControlToolkit</name>
    </assembly>
    <members>
        <member name="P:AjaxControlToolkit.SliderExtender.Minimum">
            <summary>
            Minimum value of the <see cref="T:AjaxControlToolkit.SliderExtender"/>.
            </summary>
        </member>
        <member name="T:AjaxControlToolkit.SliderExtender">
            <summary>
            Upgrades a TextBox to a slider.
            <para>Supports &lt;input&gt; elements.</para>
            </summary>
        </member>
        <member name="M:AjaxControlToolkit.SliderExtender.SetValue(System.Int32,System.Boolean)">
            <summary>Sets <paramref name="value"/>.</summary>
            <param name="value">New value</param>
            <param name="raise">Raise events</param>
            <returns>Nothing useful</returns>
        </member>
        <member name="F:AjaxControlToolkit.SliderExtender.Empty" />
    </members>
</doc>
"#;

    #[test]
    fn reads_members_sorted() {
        let records = parse(SAMPLE);
        let names: Vec<_> = records.iter().map(|r| r.target_full_name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "AjaxControlToolkit.SliderExtender",
                "AjaxControlToolkit.SliderExtender.Empty",
                "AjaxControlToolkit.SliderExtender.Minimum",
                "AjaxControlToolkit.SliderExtender.SetValue",
            ]
        );
        assert_eq!(records[0].kind, RawKind::Type);
        assert!(records[1].fragments.is_empty());
    }

    #[test]
    fn flattens_inline_markup() {
        let records = parse(SAMPLE);
        let minimum = &records[2];
        assert_eq!(minimum.fragments[0].element, "summary");
        assert_eq!(minimum.fragments[0].text, "Minimum value of the SliderExtender.");

        let ty = &records[0];
        assert_eq!(
            ty.fragments[0].text,
            "Upgrades a TextBox to a slider.\n\nSupports <input> elements."
        );
    }

    #[test]
    fn reads_params_in_order() {
        let records = parse(SAMPLE);
        let set_value = &records[3];
        assert_eq!(set_value.signature, vec!["System.Int32", "System.Boolean"]);
        let params: Vec<_> = set_value
            .fragments
            .iter()
            .filter(|f| f.element == "param")
            .map(|f| (f.name.as_deref(), f.text.as_str()))
            .collect();
        assert_eq!(
            params,
            vec![(Some("value"), "New value"), (Some("raise"), "Raise events")]
        );
        assert_eq!(set_value.fragments[0].text, "Sets value.");
    }

    #[test]
    fn nested_same_name_elements() {
        let body = "<summary>outer <summary>inner</summary> tail</summary><returns>x</returns>";
        let frags = fragments(body);
        assert_eq!(frags.len(), 2);
        assert_eq!(frags[0].text, "outer inner tail");
        assert_eq!(frags[1].element, "returns");
    }

    #[test]
    fn decodes_character_references() {
        assert_eq!(decode_entities("a&#160;b"), "a\u{a0}b");
        assert_eq!(decode_entities("x &#x2014; y"), "x \u{2014} y");
        assert_eq!(decode_entities("&amp;#160; &amp;lt;"), "&#160; &lt;");
        assert_eq!(decode_entities("bad &#xD800;"), "bad &#xD800;");
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load(Path::new("/nonexistent/refdoc.xml")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}

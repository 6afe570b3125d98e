//! `@tag` interpreter for client script comment blocks.
//!
//! Each block becomes a list of [`TagResult`] values. Nothing in here fails:
//! unknown tags come back as [`TagResult::Unrecognized`] and member tags
//! without a name are dropped.

use crate::model::ParameterDoc;
use crate::parser::scan::CommentBlock;
use regex::Regex;
use std::sync::LazyLock;
use tracing::trace;

// -- Regex patterns -----------------------------------------------------------

static RE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^@([A-Za-z][\w-]*)\b[[:blank:]]*(.*)$").unwrap());

static RE_TYPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\{([^}]*)\}[[:blank:]]*(.*)$").unwrap());

static RE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\[?[A-Za-z_$][\w$.]*\]?)(?:[[:blank:]]+(.*))?$").unwrap());

static RE_DEFAULT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^default(?:[[:blank:]]+value)?[[:blank:]]*:[[:blank:]]*(.*)$").unwrap());

static RE_DESC_DASH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-[[:blank:]]*").unwrap());

// -- Results ------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassTag {
    pub name: String,
    pub summary: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyTag {
    pub name: String,
    pub type_name: String,
    pub default_value: Option<String>,
    pub summary: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventTag {
    pub name: String,
    pub type_name: String,
    pub params: Vec<ParameterDoc>,
    pub summary: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MethodTag {
    pub name: String,
    pub return_type: String,
    pub returns: Option<String>,
    pub params: Vec<ParameterDoc>,
    pub summary: String,
}

/// One interpreted piece of a comment block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagResult {
    /// Free text preceding the first member tag.
    Summary(String),
    Class(ClassTag),
    Property(PropertyTag),
    Event(EventTag),
    Method(MethodTag),
    /// A tag name this parser does not know.
    Unrecognized(String),
}

// -- Line classification ------------------------------------------------------

/// A single comment line after lexing.
enum Line {
    Blank,
    Text(String),
    Default(String),
    Tag { name: String, rest: String },
}

fn lex(text: &str) -> Line {
    let text = text.trim();
    if text.is_empty() {
        return Line::Blank;
    }
    if let Some(caps) = RE_DEFAULT.captures(text) {
        return Line::Default(unquote(&caps[1]));
    }
    if let Some(caps) = RE_TAG.captures(text) {
        return Line::Tag {
            name: caps[1].to_ascii_lowercase(),
            rest: caps[2].trim().to_string(),
        };
    }
    Line::Text(text.to_string())
}

/// `{Type} name description` with every part optional.
struct Declared {
    type_name: String,
    name: Option<String>,
    description: String,
}

fn split_declared(rest: &str) -> Declared {
    let (type_name, rest) = match RE_TYPE.captures(rest) {
        Some(caps) => (caps[1].trim().to_string(), caps.get(2).map_or("", |m| m.as_str())),
        None => (String::new(), rest),
    };
    match RE_NAME.captures(rest) {
        Some(caps) => Declared {
            type_name,
            name: Some(caps[1].trim_matches(|c| c == '[' || c == ']').to_string()),
            description: caps
                .get(2)
                .map(|m| RE_DESC_DASH.replace(m.as_str().trim(), "").to_string())
                .unwrap_or_default(),
        },
        None => Declared {
            type_name,
            name: None,
            description: rest.trim().to_string(),
        },
    }
}

/// Strip one pair of matching surrounding quotes.
fn unquote(value: &str) -> String {
    let value = value.trim().trim_end_matches(';').trim_end();
    for q in ['\'', '"'] {
        if let Some(inner) = value.strip_prefix(q).and_then(|v| v.strip_suffix(q)) {
            return inner.to_string();
        }
    }
    value.to_string()
}

// -- Block assembly -----------------------------------------------------------

/// Accumulates paragraphs of free text.
#[derive(Default)]
struct Paragraphs {
    text: String,
    pending_break: bool,
}

impl Paragraphs {
    fn push(&mut self, line: &str) {
        if !self.text.is_empty() {
            self.text.push_str(if self.pending_break { "\n\n" } else { "\n" });
        }
        self.text.push_str(line);
        self.pending_break = false;
    }

    fn paragraph_break(&mut self) {
        self.pending_break = !self.text.is_empty();
    }

    fn take(&mut self) -> String {
        self.pending_break = false;
        std::mem::take(&mut self.text)
    }
}

#[derive(Default)]
struct BlockState {
    results: Vec<TagResult>,
    /// Index into `results` of the member tag receiving text and sub-tags.
    current: Option<usize>,
    leading: Paragraphs,
    member_text: Paragraphs,
    /// `Default:` seen before any property tag in this block.
    pending_default: Option<String>,
    /// Set after a member tag without a name; its text and sub-tags are
    /// dropped until the next member tag.
    discarding: bool,
}

impl BlockState {
    fn open(&mut self, result: TagResult) {
        self.close_member();
        self.results.push(result);
        self.current = Some(self.results.len() - 1);
        self.discarding = false;
    }

    /// A member tag without a name: detach from the open member so nothing
    /// meant for the malformed tag lands on it.
    fn discard(&mut self, tag: &str) {
        trace!("skipping @{} without a name", tag);
        self.close_member();
        self.current = None;
        self.discarding = true;
    }

    /// Flush continuation text into the open member.
    fn close_member(&mut self) {
        let text = self.member_text.take();
        let Some(idx) = self.current else {
            return;
        };
        if text.is_empty() {
            return;
        }
        let summary = match &mut self.results[idx] {
            TagResult::Class(t) => &mut t.summary,
            TagResult::Property(t) => &mut t.summary,
            TagResult::Event(t) => &mut t.summary,
            TagResult::Method(t) => &mut t.summary,
            TagResult::Summary(_) | TagResult::Unrecognized(_) => return,
        };
        if summary.is_empty() {
            *summary = text;
        } else {
            summary.push('\n');
            summary.push_str(&text);
        }
    }

    fn current_mut(&mut self) -> Option<&mut TagResult> {
        self.current.and_then(|idx| self.results.get_mut(idx))
    }

    fn text(&mut self, line: &str) {
        if self.discarding {
            return;
        }
        if self.current.is_some() {
            self.member_text.push(line);
        } else {
            self.leading.push(line);
        }
    }

    fn blank(&mut self) {
        if self.discarding {
            return;
        }
        if self.current.is_some() {
            self.member_text.paragraph_break();
        } else {
            self.leading.paragraph_break();
        }
    }

    fn default_value(&mut self, value: String) {
        if self.discarding {
            return;
        }
        match self.current_mut() {
            Some(TagResult::Property(p)) => p.default_value = Some(value),
            _ => self.pending_default = Some(value),
        }
    }

    fn param(&mut self, declared: Declared) {
        let Some(name) = declared.name else {
            trace!("skipping @param without a name");
            return;
        };
        let param = ParameterDoc {
            name,
            type_name: declared.type_name,
            description: declared.description,
        };
        match self.current_mut() {
            Some(TagResult::Method(m)) => m.params.push(param),
            Some(TagResult::Event(e)) => e.params.push(param),
            _ => trace!(param = %param.name, "@param outside a method or event"),
        }
    }

    fn returns(&mut self, declared: Declared) {
        let Some(TagResult::Method(m)) = self.current_mut() else {
            trace!("@returns outside a method");
            return;
        };
        if m.return_type.is_empty() {
            m.return_type = declared.type_name;
        }
        // No name is required here: the whole remainder is the description.
        let description = match declared.name {
            Some(first) if !declared.description.is_empty() => {
                format!("{} {}", first, declared.description)
            }
            Some(first) => first,
            None => declared.description,
        };
        if !description.is_empty() {
            m.returns = Some(description);
        }
    }

    fn tag(&mut self, tag: &str, rest: &str) {
        match tag {
            "class" => {
                let d = split_declared(rest);
                match d.name {
                    Some(name) => self.open(TagResult::Class(ClassTag {
                        name,
                        summary: d.description,
                    })),
                    None => self.discard(tag),
                }
            }
            "property" | "prop" => {
                let d = split_declared(rest);
                match d.name {
                    Some(name) => {
                        let default_value = self.pending_default.take();
                        self.open(TagResult::Property(PropertyTag {
                            name,
                            type_name: d.type_name,
                            default_value,
                            summary: d.description,
                        }));
                    }
                    None => self.discard(tag),
                }
            }
            "event" => {
                let d = split_declared(rest);
                match d.name {
                    Some(name) => self.open(TagResult::Event(EventTag {
                        name,
                        type_name: d.type_name,
                        params: Vec::new(),
                        summary: d.description,
                    })),
                    None => self.discard(tag),
                }
            }
            "method" | "function" => {
                let d = split_declared(rest);
                match d.name {
                    Some(name) => self.open(TagResult::Method(MethodTag {
                        name,
                        return_type: d.type_name,
                        returns: None,
                        params: Vec::new(),
                        summary: d.description,
                    })),
                    None => self.discard(tag),
                }
            }
            "param" | "arg" | "argument" => self.param(split_declared(rest)),
            "returns" | "return" => self.returns(split_declared(rest)),
            "default" => self.default_value(unquote(rest)),
            "type" => {
                let d = split_declared(rest);
                // `@type {String}` or bare `@type String`
                let type_name = match d.name {
                    Some(name) if d.type_name.is_empty() => name,
                    _ => d.type_name,
                };
                if let Some(TagResult::Property(p)) = self.current_mut() {
                    if p.type_name.is_empty() {
                        p.type_name = type_name;
                    }
                }
            }
            // Unknown tags leave the open member in place.
            other => {
                trace!(tag = other, "unrecognized tag");
                self.results.push(TagResult::Unrecognized(other.to_string()));
            }
        }
    }

    fn finish(mut self) -> Vec<TagResult> {
        self.close_member();
        let leading = self.leading.take();

        // Members with no text of their own inherit the leading summary.
        if !leading.is_empty() {
            for result in &mut self.results {
                let summary = match result {
                    TagResult::Class(t) => &mut t.summary,
                    TagResult::Property(t) => &mut t.summary,
                    TagResult::Event(t) => &mut t.summary,
                    TagResult::Method(t) => &mut t.summary,
                    TagResult::Summary(_) | TagResult::Unrecognized(_) => continue,
                };
                if summary.is_empty() {
                    summary.clone_from(&leading);
                }
            }
            self.results.insert(0, TagResult::Summary(leading));
        }
        self.results
    }
}

/// Interpret the lines of one comment block.
pub fn parse_block(block: &CommentBlock) -> Vec<TagResult> {
    parse_lines(&block.lines)
}

/// Interpret raw comment text lines (markers already stripped).
pub fn parse_lines<S: AsRef<str>>(lines: &[S]) -> Vec<TagResult> {
    let mut state = BlockState::default();
    for line in lines {
        match lex(line.as_ref()) {
            Line::Blank => state.blank(),
            Line::Text(text) => state.text(&text),
            Line::Default(value) => state.default_value(value),
            Line::Tag { name, rest } => state.tag(&name, &rest),
        }
    }
    state.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Vec<TagResult> {
        parse_lines(&text.lines().collect::<Vec<_>>())
    }

    #[test]
    fn property_with_default() {
        let results = parse("@property {String} Width\nDefault: '250px'");
        assert_eq!(
            results,
            vec![TagResult::Property(PropertyTag {
                name: "Width".to_string(),
                type_name: "String".to_string(),
                default_value: Some("250px".to_string()),
                summary: String::new(),
            })]
        );
    }

    #[test]
    fn property_summary_from_continuation() {
        let results = parse("@property {Number} Delay\nMilliseconds to wait\nbefore showing.\nDefault: 300");
        let TagResult::Property(p) = &results[0] else {
            panic!("expected property, got {:?}", results);
        };
        assert_eq!(p.summary, "Milliseconds to wait\nbefore showing.");
        assert_eq!(p.default_value.as_deref(), Some("300"));
    }

    #[test]
    fn leading_summary_is_shared() {
        let results = parse("Fires when the panel opens.\n\nSecond paragraph.\n@event shown");
        assert_eq!(
            results[0],
            TagResult::Summary("Fires when the panel opens.\n\nSecond paragraph.".to_string())
        );
        let TagResult::Event(e) = &results[1] else {
            panic!("expected event");
        };
        assert_eq!(e.name, "shown");
        assert_eq!(e.summary, "Fires when the panel opens.\n\nSecond paragraph.");
    }

    #[test]
    fn method_with_params_and_returns() {
        let results = parse(
            "@method {Boolean} validate Checks the value\n@param {String} value - Text to check\n@param {Number} [max] Upper bound\n@returns {Boolean} true when valid",
        );
        let TagResult::Method(m) = &results[0] else {
            panic!("expected method");
        };
        assert_eq!(m.name, "validate");
        assert_eq!(m.return_type, "Boolean");
        assert_eq!(m.summary, "Checks the value");
        assert_eq!(m.returns.as_deref(), Some("true when valid"));
        assert_eq!(
            m.params,
            vec![
                ParameterDoc {
                    name: "value".to_string(),
                    type_name: "String".to_string(),
                    description: "Text to check".to_string(),
                },
                ParameterDoc {
                    name: "max".to_string(),
                    type_name: "Number".to_string(),
                    description: "Upper bound".to_string(),
                },
            ]
        );
    }

    #[test]
    fn function_alias_and_return_type_from_returns() {
        let results = parse("@function show\n@return {Object} The popup");
        let TagResult::Method(m) = &results[0] else {
            panic!("expected method");
        };
        assert_eq!(m.name, "show");
        assert_eq!(m.return_type, "Object");
        assert_eq!(m.returns.as_deref(), Some("The popup"));
    }

    #[test]
    fn unknown_tag_is_unrecognized() {
        assert_eq!(
            parse("@deprecated"),
            vec![TagResult::Unrecognized("deprecated".to_string())]
        );
    }

    #[test]
    fn missing_name_is_skipped() {
        assert!(parse("@property {String}").is_empty());
        assert!(parse("@method").is_empty());
    }

    #[test]
    fn nameless_tag_does_not_touch_previous_member() {
        let results = parse("@property {String} Width\n@property {Number}\nHeight of the box.\nDefault: 5");
        assert_eq!(
            results,
            vec![TagResult::Property(PropertyTag {
                name: "Width".to_string(),
                type_name: "String".to_string(),
                default_value: None,
                summary: String::new(),
            })]
        );
    }

    #[test]
    fn member_after_nameless_tag_is_parsed() {
        let results = parse("@event\nLost text.\n@event shown\nRaised once visible.");
        assert_eq!(results.len(), 1);
        let TagResult::Event(e) = &results[0] else {
            panic!("expected event");
        };
        assert_eq!(e.name, "shown");
        assert_eq!(e.summary, "Raised once visible.");
    }

    #[test]
    fn unknown_tag_inside_method_is_ignored() {
        let results = parse(
            "@method {Number} clamp\nForces a value into range.\n@private\n@param {Number} value Raw value\n@returns {Number} clamped",
        );
        let TagResult::Method(m) = &results[0] else {
            panic!("expected method");
        };
        assert_eq!(m.summary, "Forces a value into range.");
        assert_eq!(m.params.len(), 1);
        assert_eq!(m.params[0].name, "value");
        assert_eq!(m.returns.as_deref(), Some("clamped"));
        assert_eq!(results[1], TagResult::Unrecognized("private".to_string()));
    }

    #[test]
    fn type_tag_with_and_without_braces() {
        for text in ["@property Delay\n@type {Number}", "@property Delay\n@type Number"] {
            let results = parse(text);
            let TagResult::Property(p) = &results[0] else {
                panic!("expected property");
            };
            assert_eq!(p.type_name, "Number", "{}", text);
        }
    }

    #[test]
    fn default_before_property_is_carried() {
        let results = parse("Default: \"left\"\n@property Align");
        let TagResult::Property(p) = &results[0] else {
            panic!("expected property");
        };
        assert_eq!(p.default_value.as_deref(), Some("left"));
    }

    #[test]
    fn class_tag() {
        let results = parse("@class Sys.Extended.UI.SliderBehavior\nSlider client behavior.");
        assert_eq!(
            results,
            vec![TagResult::Class(ClassTag {
                name: "Sys.Extended.UI.SliderBehavior".to_string(),
                summary: "Slider client behavior.".to_string(),
            })]
        );
    }

    #[test]
    fn event_params() {
        let results = parse("@event {Sys.EventArgs} changed\n@param {Object} sender Source");
        let TagResult::Event(e) = &results[0] else {
            panic!("expected event");
        };
        assert_eq!(e.type_name, "Sys.EventArgs");
        assert_eq!(e.params.len(), 1);
        assert_eq!(e.params[0].name, "sender");
    }

    #[test]
    fn multiple_members_in_one_block() {
        let results = parse("@property {String} Text\n@property {Boolean} Enabled\nDefault: true");
        assert_eq!(results.len(), 2);
        let TagResult::Property(enabled) = &results[1] else {
            panic!("expected property");
        };
        assert_eq!(enabled.default_value.as_deref(), Some("true"));
        let TagResult::Property(text) = &results[0] else {
            panic!("expected property");
        };
        assert_eq!(text.default_value, None);
    }
}

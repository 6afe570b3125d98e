//! Documentation model shared by the XML loader, the client-script parser
//! and the renderers.

use serde::Serialize;
use std::collections::BTreeMap;
use tracing::trace;

/// Where a member's documentation came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    Xml,
    Client,
}

/// A positional parameter of a method or event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParameterDoc {
    pub name: String,
    pub type_name: String,
    pub description: String,
}

/// Variant-specific member data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MemberKind {
    Property {
        default_value: Option<String>,
    },
    Event {
        params: Vec<ParameterDoc>,
    },
    Method {
        params: Vec<ParameterDoc>,
        returns: Option<String>,
    },
}

impl MemberKind {
    pub fn label(&self) -> &'static str {
        match self {
            MemberKind::Property { .. } => "property",
            MemberKind::Event { .. } => "event",
            MemberKind::Method { .. } => "method",
        }
    }

    fn same_variant(&self, other: &MemberKind) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

/// A single documented member of a type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberDoc {
    pub name: String,
    pub summary: String,
    /// Property type, event argument type, or method return type.
    pub type_name: String,
    pub origin: Origin,
    #[serde(flatten)]
    pub kind: MemberKind,
}

impl MemberDoc {
    pub fn property(name: impl Into<String>, origin: Origin) -> Self {
        Self::new(name, origin, MemberKind::Property { default_value: None })
    }

    pub fn event(name: impl Into<String>, origin: Origin) -> Self {
        Self::new(name, origin, MemberKind::Event { params: Vec::new() })
    }

    pub fn method(name: impl Into<String>, origin: Origin) -> Self {
        Self::new(
            name,
            origin,
            MemberKind::Method {
                params: Vec::new(),
                returns: None,
            },
        )
    }

    fn new(name: impl Into<String>, origin: Origin, kind: MemberKind) -> Self {
        MemberDoc {
            name: name.into(),
            summary: String::new(),
            type_name: String::new(),
            origin,
            kind,
        }
    }

    pub fn default_value(&self) -> Option<&str> {
        match &self.kind {
            MemberKind::Property { default_value } => default_value.as_deref(),
            _ => None,
        }
    }

    pub fn params(&self) -> &[ParameterDoc] {
        match &self.kind {
            MemberKind::Event { params } | MemberKind::Method { params, .. } => params,
            MemberKind::Property { .. } => &[],
        }
    }

    pub fn params_mut(&mut self) -> Option<&mut Vec<ParameterDoc>> {
        match &mut self.kind {
            MemberKind::Event { params } | MemberKind::Method { params, .. } => Some(params),
            MemberKind::Property { .. } => None,
        }
    }

    pub fn returns(&self) -> Option<&str> {
        match &self.kind {
            MemberKind::Method { returns, .. } => returns.as_deref(),
            _ => None,
        }
    }

    /// Fill every field this member left empty from `other`.
    ///
    /// Fields already populated are never overwritten. Variant-specific data
    /// is only taken when both members are the same variant. Returns whether
    /// anything changed.
    pub fn absorb(&mut self, other: MemberDoc) -> bool {
        let mut changed = fill(&mut self.summary, other.summary);
        changed |= fill(&mut self.type_name, other.type_name);

        if !self.kind.same_variant(&other.kind) {
            return changed;
        }

        match (&mut self.kind, other.kind) {
            (
                MemberKind::Property { default_value },
                MemberKind::Property {
                    default_value: incoming,
                },
            ) => {
                if default_value.is_none() && incoming.is_some() {
                    *default_value = incoming;
                    changed = true;
                }
            }
            (MemberKind::Event { params }, MemberKind::Event { params: incoming }) => {
                changed |= fill_params(params, incoming);
            }
            (
                MemberKind::Method { params, returns },
                MemberKind::Method {
                    params: incoming,
                    returns: incoming_returns,
                },
            ) => {
                changed |= fill_params(params, incoming);
                if returns.is_none() && incoming_returns.is_some() {
                    *returns = incoming_returns;
                    changed = true;
                }
            }
            _ => {}
        }

        changed
    }
}

fn fill(slot: &mut String, value: String) -> bool {
    if slot.is_empty() && !value.is_empty() {
        *slot = value;
        return true;
    }
    false
}

/// Fill empty parameter fields by name; take the incoming list wholesale
/// when nothing is documented yet.
fn fill_params(params: &mut Vec<ParameterDoc>, incoming: Vec<ParameterDoc>) -> bool {
    if params.is_empty() {
        let changed = !incoming.is_empty();
        *params = incoming;
        return changed;
    }

    let mut changed = false;
    for param in params.iter_mut() {
        if let Some(other) = incoming.iter().find(|p| p.name == param.name) {
            changed |= fill(&mut param.type_name, other.type_name.clone());
            changed |= fill(&mut param.description, other.description.clone());
        }
    }
    changed
}

/// Documentation for one type, keyed by its fully-qualified name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeDoc {
    pub full_name: String,
    pub name: String,
    pub namespace: String,
    pub summary: String,
    pub members: Vec<MemberDoc>,
}

impl TypeDoc {
    pub fn new(full_name: &str) -> Self {
        let (namespace, name) = match full_name.rsplit_once('.') {
            Some((ns, name)) => (ns.to_string(), name.to_string()),
            None => (String::new(), full_name.to_string()),
        };
        TypeDoc {
            full_name: full_name.to_string(),
            name,
            namespace,
            summary: String::new(),
            members: Vec::new(),
        }
    }

    pub fn member(&self, name: &str) -> Option<&MemberDoc> {
        self.members.iter().find(|m| m.name == name)
    }

    pub fn member_mut(&mut self, name: &str) -> Option<&mut MemberDoc> {
        self.members.iter_mut().find(|m| m.name == name)
    }

    pub fn properties(&self) -> impl Iterator<Item = &MemberDoc> {
        self.members
            .iter()
            .filter(|m| matches!(m.kind, MemberKind::Property { .. }))
    }

    pub fn events(&self) -> impl Iterator<Item = &MemberDoc> {
        self.members
            .iter()
            .filter(|m| matches!(m.kind, MemberKind::Event { .. }))
    }

    pub fn methods(&self) -> impl Iterator<Item = &MemberDoc> {
        self.members
            .iter()
            .filter(|m| matches!(m.kind, MemberKind::Method { .. }))
    }
}

// -- Raw XML records ----------------------------------------------------------

/// Member kind prefix of an XML documentation record (`T:`, `P:`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawKind {
    Namespace,
    Type,
    Property,
    Field,
    Event,
    Method,
    /// No recognised prefix.
    Unknown,
}

/// One child element of an XML `<member>` record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocFragment {
    /// Element name, e.g. `summary`, `param`, `returns`.
    pub element: String,
    /// Value of the `name` attribute, if present.
    pub name: Option<String>,
    pub text: String,
}

/// An unresolved XML documentation record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDoc {
    pub kind: RawKind,
    /// Dot-delimited target, `Namespace.Type` or `Namespace.Type.Member`.
    pub target_full_name: String,
    /// Parameter types from a method signature, in order.
    pub signature: Vec<String>,
    pub fragments: Vec<DocFragment>,
}

impl RawDoc {
    /// Build a record from a compiler member id such as
    /// `M:Ns.Type.Method(System.String,System.Int32)`.
    pub fn new(id: &str) -> Self {
        let (kind, rest) = match id.split_once(':') {
            Some(("N", rest)) => (RawKind::Namespace, rest),
            Some(("T", rest)) => (RawKind::Type, rest),
            Some(("P", rest)) => (RawKind::Property, rest),
            Some(("F", rest)) => (RawKind::Field, rest),
            Some(("E", rest)) => (RawKind::Event, rest),
            Some(("M", rest)) => (RawKind::Method, rest),
            _ => (RawKind::Unknown, id),
        };

        let (target, signature) = match rest.split_once('(') {
            Some((target, args)) => (target, split_signature(args.trim_end_matches(')'))),
            None => (rest, Vec::new()),
        };

        RawDoc {
            kind,
            target_full_name: target.to_string(),
            signature,
            fragments: Vec::new(),
        }
    }

    pub fn with_fragment(mut self, element: &str, name: Option<&str>, text: &str) -> Self {
        self.fragments.push(DocFragment {
            element: element.to_string(),
            name: name.map(str::to_string),
            text: text.to_string(),
        });
        self
    }

    fn text_of(&self, element: &str) -> Option<&str> {
        self.fragments
            .iter()
            .find(|f| f.element == element && !f.text.is_empty())
            .map(|f| f.text.as_str())
    }

    fn summary(&self) -> String {
        self.text_of("summary")
            .or_else(|| self.text_of("value"))
            .unwrap_or_default()
            .to_string()
    }

    fn params(&self) -> Vec<ParameterDoc> {
        self.fragments
            .iter()
            .filter(|f| f.element == "param")
            .enumerate()
            .map(|(i, f)| ParameterDoc {
                name: f.name.clone().unwrap_or_default(),
                type_name: self.signature.get(i).cloned().unwrap_or_default(),
                description: f.text.clone(),
            })
            .collect()
    }

    /// Resolve into a member of its owning type, named `member_name`.
    fn into_member(self, member_name: &str) -> Option<MemberDoc> {
        let mut member = match self.kind {
            RawKind::Property | RawKind::Field => MemberDoc::property(member_name, Origin::Xml),
            RawKind::Event => MemberDoc::event(member_name, Origin::Xml),
            RawKind::Method => {
                let mut m = MemberDoc::method(member_name, Origin::Xml);
                if let MemberKind::Method { params, returns } = &mut m.kind {
                    *params = self.params();
                    *returns = self.text_of("returns").map(str::to_string);
                }
                m
            }
            RawKind::Namespace | RawKind::Type | RawKind::Unknown => return None,
        };
        member.summary = self.summary();
        Some(member)
    }
}

/// Split `System.String,System.Collections.Generic.List{System.Int32}` at
/// top-level commas.
fn split_signature(args: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut depth = 0usize;
    let mut current = String::new();
    for c in args.chars() {
        match c {
            '{' | '[' | '(' => depth += 1,
            '}' | ']' | ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                out.push(std::mem::take(&mut current));
                continue;
            }
            _ => {}
        }
        current.push(c);
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

// -- Aggregate ----------------------------------------------------------------

/// The unified documentation store: every type keyed by full name.
#[derive(Debug, Default, Clone)]
pub struct Documentation {
    types: BTreeMap<String, TypeDoc>,
}

impl Documentation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Group raw XML records by owning type and resolve them.
    pub fn add(&mut self, records: impl IntoIterator<Item = RawDoc>) {
        for raw in records {
            self.add_raw(raw);
        }
    }

    fn add_raw(&mut self, raw: RawDoc) {
        match raw.kind {
            RawKind::Namespace | RawKind::Unknown => {
                trace!(record = %raw.target_full_name, "skipping non-member record");
            }
            RawKind::Type => {
                let summary = raw.summary();
                let ty = self.entry(&raw.target_full_name);
                fill(&mut ty.summary, summary);
            }
            _ => {
                let Some((owner, member_name)) = raw.target_full_name.rsplit_once('.') else {
                    trace!(record = %raw.target_full_name, "member record without owner");
                    return;
                };
                let (owner, member_name) = (owner.to_string(), member_name.to_string());
                let Some(member) = raw.into_member(&member_name) else {
                    return;
                };
                let ty = self.entry(&owner);
                // Overloads collapse into the first record of the same name.
                match ty.member_mut(&member.name) {
                    Some(existing) => {
                        existing.absorb(member);
                    }
                    None => ty.members.push(member),
                }
            }
        }
    }

    fn entry(&mut self, full_name: &str) -> &mut TypeDoc {
        self.types
            .entry(full_name.to_string())
            .or_insert_with(|| TypeDoc::new(full_name))
    }

    pub fn get(&self, full_name: &str) -> Option<&TypeDoc> {
        self.types.get(full_name)
    }

    pub fn get_mut(&mut self, full_name: &str) -> Option<&mut TypeDoc> {
        self.types.get_mut(full_name)
    }

    /// Look a type up by its simple name.
    pub fn find(&self, name: &str) -> Option<&TypeDoc> {
        self.types.values().find(|t| t.name == name)
    }

    /// Types ordered by full name.
    pub fn types(&self) -> impl Iterator<Item = &TypeDoc> {
        self.types.values()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

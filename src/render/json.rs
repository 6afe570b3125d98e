//! JSON renderer — structured output for tooling integration.
//!
//! Serializes the merged model directly.

use crate::error::Result;
use crate::model::TypeDoc;
use crate::render::Renderer;
use serde::Serialize;

pub struct JsonRenderer;

#[derive(Serialize)]
struct IndexEntry<'a> {
    name: &'a str,
    full_name: &'a str,
    summary: &'a str,
}

impl Renderer for JsonRenderer {
    fn render_type(&self, ty: &TypeDoc) -> Result<String> {
        Ok(serde_json::to_string_pretty(ty)?)
    }

    fn render_index(&self, types: &[&TypeDoc]) -> Result<String> {
        let entries: Vec<IndexEntry> = types
            .iter()
            .map(|ty| IndexEntry {
                name: &ty.name,
                full_name: &ty.full_name,
                summary: &ty.summary,
            })
            .collect();
        Ok(serde_json::to_string_pretty(&entries)?)
    }

    fn render_all(&self, types: &[&TypeDoc]) -> Result<String> {
        Ok(serde_json::to_string_pretty(types)?)
    }

    fn file_extension(&self) -> &str {
        "json"
    }
}

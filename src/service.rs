//! Reference operations: type index, single type page, full markup.
//!
//! A service owns the configuration, the model cache and the renderer. It
//! is built once and shared by reference.

use crate::cache::{CacheKey, DocumentationCache};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::model::{Documentation, TypeDoc};
use crate::parser::{client, merge, xml};
use crate::render::Renderer;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

pub struct ReferenceService {
    config: Config,
    cache: DocumentationCache,
    renderer: Box<dyn Renderer>,
}

impl ReferenceService {
    pub fn new(config: Config, renderer: Box<dyn Renderer>) -> Self {
        ReferenceService {
            config,
            cache: DocumentationCache::new(),
            renderer,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn renderer(&self) -> &dyn Renderer {
        self.renderer.as_ref()
    }

    /// The fully merged model, rebuilt when any backing file changes.
    pub fn documentation(&self) -> Result<Arc<Documentation>> {
        let scripts: Vec<(String, PathBuf)> = self
            .config
            .script_paths()
            .map(|(ty, path)| (ty.to_string(), path))
            .collect();

        let key = CacheKey::new(
            std::iter::once(self.config.xml.as_path()).chain(scripts.iter().map(|(_, p)| p.as_path())),
        );

        self.cache.get_or_build(key, || build(&self.config, &scripts))
    }

    /// Index of the configured types that have documentation.
    pub fn index(&self) -> Result<String> {
        let doc = self.documentation()?;
        let types = self.index_types(&doc);
        self.renderer.render_index(&types)
    }

    /// Reference page for one type, by simple name.
    ///
    /// A type with a client script mapping but no XML record is reported as
    /// [`Error::TypeNotDocumented`]; any other missing type as
    /// [`Error::UnknownType`].
    pub fn type_page(&self, type_name: &str) -> Result<String> {
        let doc = self.documentation()?;
        let full_name = self.config.full_name(type_name);
        let Some(ty) = doc.get(&full_name) else {
            return Err(match self.config.script_path(type_name) {
                Some(_) => Error::TypeNotDocumented(full_name),
                None => Error::UnknownType(full_name),
            });
        };
        self.renderer.render_type(ty)
    }

    /// Every documented type in one document.
    pub fn markup(&self) -> Result<String> {
        let doc = self.documentation()?;
        let types: Vec<&TypeDoc> = doc.types().collect();
        self.renderer.render_all(&types)
    }

    /// Simple names of the types `index` would list.
    pub fn type_names(&self) -> Result<Vec<String>> {
        let doc = self.documentation()?;
        Ok(self
            .index_types(&doc)
            .into_iter()
            .map(|t| t.name.clone())
            .collect())
    }

    fn index_types<'d>(&self, doc: &'d Documentation) -> Vec<&'d TypeDoc> {
        doc.types()
            .filter(|t| t.namespace == self.config.namespace)
            .filter(|t| self.config.index.is_empty() || self.config.index.contains(&t.name))
            .collect()
    }
}

/// Load the XML records, then fold in every configured client script.
fn build(config: &Config, scripts: &[(String, PathBuf)]) -> Result<Documentation> {
    let mut doc = Documentation::new();
    doc.add(xml::load(&config.xml)?);

    for (type_name, path) in scripts {
        let Some(lines) = read_script(path)? else {
            continue;
        };
        let members = client::parse_file(&lines);
        debug!(
            script = %path.display(),
            members = members.members.len(),
            "parsed client script"
        );
        // Only a request for this type reports it; see `type_page`.
        match merge::merge(&mut doc, &config.full_name(type_name), members) {
            Ok(_) => {}
            Err(Error::TypeNotDocumented(name)) => {
                warn!(ty = %name, script = %path.display(), "client script for undocumented type");
            }
            Err(e) => return Err(e),
        }
    }

    Ok(doc)
}

/// A missing script only loses client docs; other read failures propagate.
fn read_script(path: &Path) -> Result<Option<Vec<String>>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content.lines().map(str::to_string).collect())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!(script = %path.display(), "client script not found");
            Ok(None)
        }
        Err(e) => Err(Error::io(path, e)),
    }
}

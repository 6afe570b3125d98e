//! `reference.toml` — where the XML documentation and client scripts live.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_NAMESPACE: &str = "AjaxControlToolkit";

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Namespace prepended to simple type names.
    #[serde(default = "default_namespace")]
    pub namespace: String,
    /// Compiler-emitted XML documentation file.
    pub xml: PathBuf,
    /// Directory holding the client script files.
    #[serde(default)]
    pub scripts_dir: PathBuf,
    /// Types listed by `index`. Empty means every documented type.
    #[serde(default)]
    pub index: Vec<String>,
    /// Simple type name → script resource name (without `.js`).
    #[serde(default)]
    pub scripts: BTreeMap<String, String>,
}

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

impl Config {
    /// Load a config file. Relative paths inside it resolve against the
    /// file's own directory.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let mut config: Config = toml::from_str(&content).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })?;
        if let Some(base) = path.parent() {
            config.resolve_relative(base);
        }
        Ok(config)
    }

    fn resolve_relative(&mut self, base: &Path) {
        if self.xml.is_relative() {
            self.xml = base.join(&self.xml);
        }
        if self.scripts_dir.is_relative() {
            self.scripts_dir = base.join(&self.scripts_dir);
        }
    }

    /// `Name` → `Namespace.Name`.
    pub fn full_name(&self, type_name: &str) -> String {
        if self.namespace.is_empty() {
            type_name.to_string()
        } else {
            format!("{}.{}", self.namespace, type_name)
        }
    }

    /// Script file documenting `type_name`, if the type has one.
    pub fn script_path(&self, type_name: &str) -> Option<PathBuf> {
        self.scripts
            .get(type_name)
            .map(|script| self.scripts_dir.join(format!("{}.js", script)))
    }

    /// Every script file named by the mapping, keyed by type name.
    pub fn script_paths(&self) -> impl Iterator<Item = (&str, PathBuf)> {
        self.scripts
            .iter()
            .map(|(ty, script)| (ty.as_str(), self.scripts_dir.join(format!("{}.js", script))))
    }
}

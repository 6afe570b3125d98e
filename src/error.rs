//! Error type shared by the loader, merge, cache and service layers.

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Merge target has no XML documentation record loaded.
    #[error("type not documented: {0}")]
    TypeNotDocumented(String),

    /// Requested type is not part of the documentation model at all.
    #[error("type not found: {0}")]
    UnknownType(String),

    #[error("unknown format: {0}. Use markdown, wiki, or json")]
    UnknownFormat(String),

    #[error("failed to render: {0}")]
    Render(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

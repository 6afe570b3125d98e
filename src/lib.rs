//! refdoc — reference documentation for a UI-control library, merged from
//! compiler XML documentation comments and annotated client scripts.

pub mod cache;
pub mod config;
pub mod error;
pub mod model;
pub mod parser;
pub mod render;
pub mod service;
pub mod toc;

pub use config::Config;
pub use error::{Error, Result};
pub use model::{Documentation, MemberDoc, MemberKind, Origin, ParameterDoc, RawDoc, TypeDoc};
pub use service::ReferenceService;

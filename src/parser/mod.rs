//! Parsers for both documentation sources, and the merge between them.
//!
//! Client scripts flow `scan` → `tags` → `client`; XML documentation files
//! are read by `xml`; `merge` folds the former into the latter.

pub mod client;
pub mod merge;
pub mod scan;
pub mod tags;
pub mod xml;

pub use client::{parse_file, ClassDoc, ClientMemberBuilder, ClientMembers};
pub use merge::{merge, MergeOutcome};
pub use scan::{CommentBlock, Scanner};
pub use tags::TagResult;

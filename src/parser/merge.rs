//! Fold client script members into the XML-sourced documentation model.
//!
//! XML documentation comments are the library author's canonical text, so
//! they win wherever both sources fill the same field. Client annotations
//! only fill gaps, or add members the server code does not have.

use crate::error::{Error, Result};
use crate::model::Documentation;
use crate::parser::client::ClientMembers;
use tracing::debug;

/// What a merge changed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Client members added as new entries.
    pub appended: usize,
    /// Existing members that gained at least one field.
    pub augmented: usize,
}

/// Merge `client` into the type named `type_full_name`.
///
/// Fails with [`Error::TypeNotDocumented`] when no XML record was loaded for
/// the type; the model is left untouched in that case.
pub fn merge(doc: &mut Documentation, type_full_name: &str, client: ClientMembers) -> Result<MergeOutcome> {
    let ty = doc
        .get_mut(type_full_name)
        .ok_or_else(|| Error::TypeNotDocumented(type_full_name.to_string()))?;

    let mut outcome = MergeOutcome::default();

    if let Some(class) = client.class {
        if ty.summary.is_empty() && !class.summary.is_empty() {
            ty.summary = class.summary;
        }
    }

    for member in client.members {
        match ty.member_mut(&member.name) {
            Some(existing) => {
                if existing.absorb(member) {
                    outcome.augmented += 1;
                }
            }
            None => {
                ty.members.push(member);
                outcome.appended += 1;
            }
        }
    }

    debug!(
        ty = type_full_name,
        appended = outcome.appended,
        augmented = outcome.augmented,
        "merged client members"
    );

    Ok(outcome)
}

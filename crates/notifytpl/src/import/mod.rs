//! Batch template import
//!
//! Importing is split in two:
//!
//! - [`Reconciler`] decides, per candidate, whether to create, overwrite,
//!   rename or skip it. It owns the live-store view: the set of ids already
//!   taken, including ids committed earlier in the same batch.
//! - [`Importer`] applies those decisions to a [`TemplateStore`] one item at a
//!   time and tallies the outcome into an [`ImportSummary`].
//!
//! Items are processed strictly in input order. Each store call is awaited
//! before the next decision is made, because a rename collision check must
//! see every id committed before it.
//!
//! [`TemplateStore`]: crate::storage::TemplateStore

mod bundle;
mod executor;
mod reconcile;
mod summary;

pub use bundle::{EXPORT_TYPE, EXPORT_VERSION, TemplateBundle};
pub use executor::Importer;
pub use reconcile::{
    IdSource, PlannedImport, Reconciler, SystemIdSource, plan_import, sanitize_id_base,
};
pub use summary::{ImportSummary, ItemOutcome, OutcomeStatus};

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::template::TemplateId;

/// How to treat a candidate whose id is already taken
///
/// `overwrite` takes precedence over `generate_new_ids`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportPolicy {
    /// Replace the stored template with the candidate
    pub overwrite: bool,

    /// Store the candidate under a freshly generated id
    pub generate_new_ids: bool,
}

impl ImportPolicy {
    pub fn overwrite() -> Self {
        Self {
            overwrite: true,
            generate_new_ids: false,
        }
    }

    pub fn rename() -> Self {
        Self {
            overwrite: false,
            generate_new_ids: true,
        }
    }

    pub fn skip() -> Self {
        Self::default()
    }
}

/// Action chosen for one import candidate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "id", rename_all = "lowercase")]
pub enum ImportDecision {
    Create,
    Overwrite,
    Rename(TemplateId),
    Skip,
}

impl fmt::Display for ImportDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportDecision::Create => write!(f, "create"),
            ImportDecision::Overwrite => write!(f, "overwrite"),
            ImportDecision::Rename(id) => write!(f, "rename -> {}", id),
            ImportDecision::Skip => write!(f, "skip"),
        }
    }
}

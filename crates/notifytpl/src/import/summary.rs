//! Aggregate result of an import batch

use std::fmt;

use serde::Serialize;

use super::{ImportDecision, PlannedImport};
use crate::template::{Template, TemplateId};

/// What happened to a single import candidate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "error", rename_all = "lowercase")]
pub enum OutcomeStatus {
    Applied,
    Skipped,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemOutcome {
    pub original_id: TemplateId,
    pub decision: ImportDecision,
    pub status: OutcomeStatus,
}

/// Counters and accepted templates for one import batch
///
/// `created` includes renamed items; `renamed` counts the subset that were
/// stored under a generated id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub created: usize,
    pub overwritten: usize,
    pub renamed: usize,
    pub skipped: usize,
    pub failed: usize,

    /// Templates written to the store, with their final ids
    pub accepted: Vec<Template>,

    /// One entry per candidate, in input order
    pub outcomes: Vec<ItemOutcome>,
}

impl ImportSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of candidates processed
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }

    /// Record a successful store write or a skip
    pub(crate) fn record_success(&mut self, planned: PlannedImport) {
        let status = match planned.decision {
            ImportDecision::Create => {
                self.created += 1;
                OutcomeStatus::Applied
            }
            ImportDecision::Rename(_) => {
                self.created += 1;
                self.renamed += 1;
                OutcomeStatus::Applied
            }
            ImportDecision::Overwrite => {
                self.overwritten += 1;
                OutcomeStatus::Applied
            }
            ImportDecision::Skip => {
                self.skipped += 1;
                OutcomeStatus::Skipped
            }
        };

        self.outcomes.push(ItemOutcome {
            original_id: planned.original_id,
            decision: planned.decision,
            status: status.clone(),
        });
        if status == OutcomeStatus::Applied {
            self.accepted.push(planned.template);
        }
    }

    pub(crate) fn record_failure(&mut self, planned: PlannedImport, error: impl fmt::Display) {
        self.failed += 1;
        self.outcomes.push(ItemOutcome {
            original_id: planned.original_id,
            decision: planned.decision,
            status: OutcomeStatus::Failed(error.to_string()),
        });
    }
}

impl fmt::Display for ImportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Import finished: {} created", self.created)?;
        if self.renamed > 0 {
            write!(f, " ({} renamed)", self.renamed)?;
        }
        write!(
            f,
            ", {} overwritten, {} skipped, {} failed",
            self.overwritten, self.skipped, self.failed
        )
    }
}

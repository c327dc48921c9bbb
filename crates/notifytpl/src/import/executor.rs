//! Sequential import execution against a template store

use std::sync::Arc;

use tracing::{info, warn};

use super::{
    IdSource, ImportDecision, ImportPolicy, ImportSummary, PlannedImport, Reconciler,
    SystemIdSource,
};
use crate::error::{Result, StoreError};
use crate::storage::TemplateStore;
use crate::template::Template;

/// Applies import decisions to a template store
///
/// One item is in flight at a time; a failed item is counted and the batch
/// moves on.
#[derive(Clone)]
pub struct Importer {
    store: Arc<dyn TemplateStore>,
}

impl Importer {
    pub fn new(store: Arc<dyn TemplateStore>) -> Self {
        Self { store }
    }

    /// Import a batch with system-generated rename ids
    pub async fn run(
        &self,
        candidates: &[Template],
        policy: ImportPolicy,
    ) -> Result<ImportSummary> {
        self.run_with_ids(candidates, policy, SystemIdSource).await
    }

    /// Import a batch, deciding each item against the live-store view
    ///
    /// Fails only when the initial store snapshot cannot be read, before
    /// anything has been written.
    pub async fn run_with_ids<S: IdSource>(
        &self,
        candidates: &[Template],
        policy: ImportPolicy,
        ids: S,
    ) -> Result<ImportSummary> {
        let snapshot = self.store.list().await?;
        let mut reconciler = Reconciler::new(snapshot.keys(), policy, ids);
        let mut summary = ImportSummary::new();

        for candidate in candidates {
            let planned = reconciler.plan(candidate);
            let committed = match &planned.decision {
                ImportDecision::Create | ImportDecision::Rename(_) => {
                    Some(planned.template.id.clone())
                }
                ImportDecision::Overwrite | ImportDecision::Skip => None,
            };

            if self.apply(planned, &mut summary).await {
                if let Some(id) = committed {
                    reconciler.commit(&id);
                }
            }
        }

        info!(
            total = summary.total(),
            created = summary.created,
            renamed = summary.renamed,
            overwritten = summary.overwritten,
            skipped = summary.skipped,
            failed = summary.failed,
            "template import finished"
        );
        Ok(summary)
    }

    /// Execute a precomputed plan in order
    pub async fn execute(&self, plan: Vec<PlannedImport>) -> ImportSummary {
        let mut summary = ImportSummary::new();
        for planned in plan {
            self.apply(planned, &mut summary).await;
        }
        summary
    }

    /// Perform the store call for one item; true when it succeeded
    async fn apply(&self, planned: PlannedImport, summary: &mut ImportSummary) -> bool {
        let result: std::result::Result<(), StoreError> = match &planned.decision {
            ImportDecision::Create | ImportDecision::Rename(_) => {
                self.store.create(&planned.template).await
            }
            ImportDecision::Overwrite => {
                self.store
                    .update(&planned.original_id, &planned.template)
                    .await
            }
            ImportDecision::Skip => Ok(()),
        };

        match result {
            Ok(()) => {
                summary.record_success(planned);
                true
            }
            Err(e) => {
                warn!(
                    id = %planned.original_id,
                    decision = %planned.decision,
                    error = %e,
                    "template import item failed"
                );
                summary.record_failure(planned, e);
                false
            }
        }
    }
}

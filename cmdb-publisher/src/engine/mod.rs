//! The reconciliation run: create/update generation, deletion detection and
//! late reference resolution, in that order, over a shared accumulator.

mod deletions;
mod reconcile;
mod references;

use anyhow::Result;

use crate::cmdb::CmdbStore;
use crate::model::{Record, filter_records};
use crate::schema::EntityType;
use crate::source::SourceView;

/// Drives one full publisher run, accumulating the records to bulk-post.
///
/// The accumulator is strictly pre-order (parent before children). The
/// deletion detector relies on it already containing the whole reconciled
/// tree with parent references rewritten to CMDB-id space, so the phases
/// must run in sequence.
pub struct Reconciler<'a> {
    source: &'a SourceView,
    cmdb: &'a dyn CmdbStore,
    records: Vec<Record>,
}

impl<'a> Reconciler<'a> {
    pub fn new(source: &'a SourceView, cmdb: &'a dyn CmdbStore) -> Self {
        Self {
            source,
            cmdb,
            records: Vec::new(),
        }
    }

    /// Runs the three phases and returns the final record set.
    pub async fn generate(mut self) -> Result<Vec<Record>> {
        self.reconcile(EntityType::Provider, None, None).await?;

        // Deletion detection starts from the tenants under each reconciled
        // service. Provider- and service-level CMDB records are never
        // deletion candidates, nor is any subtree whose parent chain is
        // broken in the CMDB; orphans are only found under survivors.
        let service_ids: Vec<String> = filter_records(&self.records, EntityType::Service, None)
            .into_iter()
            .filter_map(|r| r.id.clone())
            .collect();
        for service_id in service_ids {
            self.detect_deletions(EntityType::Tenant, &service_id)
                .await?;
        }

        self.resolve_service_parents().await?;

        let deletes = self.records.iter().filter(|r| r.deleted).count();
        let updates = self
            .records
            .iter()
            .filter(|r| !r.deleted && r.rev.is_some())
            .count();
        let creates = self.records.len() - deletes - updates;
        log::info!(
            "generated {} records ({creates} create, {updates} update, {deletes} delete)",
            self.records.len()
        );

        Ok(self.records)
    }
}

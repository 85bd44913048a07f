//! Deletion detection over CMDB subtrees rooted at reconciled records.

use std::collections::HashSet;

use anyhow::Result;

use super::Reconciler;
use crate::model::filter_records;
use crate::schema::EntityType;

impl Reconciler<'_> {
    /// Appends delete markers for CMDB records of `entity` under `parent`
    /// that have no surviving counterpart in the accumulator, then recurses
    /// into every CMDB child subtree whether or not its root was deleted.
    ///
    /// The surviving set is filtered from the accumulator with the same
    /// `parent` value used for the CMDB query: by this point the
    /// accumulator's parent-ref fields have been rewritten to CMDB-id space,
    /// so the comparison is internally consistent. CMDB records whose own
    /// parent chain is broken are never visited here and thus never removed.
    pub(super) async fn detect_deletions(
        &mut self,
        entity: EntityType,
        parent: &str,
    ) -> Result<()> {
        log::debug!("detecting deletions for {entity} under <{parent}>");

        let cmdb = self.cmdb.records_of(entity, Some(parent)).await?;
        let entity_key = entity.entity_key();
        let surviving: HashSet<String> = filter_records(&self.records, entity, Some(parent))
            .into_iter()
            .filter_map(|r| r.data_str(entity_key).map(str::to_owned))
            .collect();

        for mut cmdb_item in cmdb {
            // A stored record without _id cannot be removed: bulk-posting a
            // bare `_deleted` doc creates a fresh tombstone instead of
            // deleting anything. It also has no addressable children.
            let Some(cmdb_id) = cmdb_item.id.clone() else {
                log::warn!("CMDB {entity} record without _id, skipping");
                continue;
            };
            let natural_id = cmdb_item.data_str(entity_key).map(str::to_owned);
            if !natural_id
                .as_deref()
                .is_some_and(|id| surviving.contains(id))
            {
                log::debug!(
                    "CMDB {entity} <{natural_id:?}> has no CIP counterpart under <{parent}> \
                     [action: delete]"
                );
                cmdb_item.deleted = true;
                self.records.push(cmdb_item);
            }
            for &child in entity.children() {
                Box::pin(self.detect_deletions(child, &cmdb_id)).await?;
            }
        }
        Ok(())
    }
}

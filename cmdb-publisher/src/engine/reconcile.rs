//! Recursive create/update generation.

use anyhow::Result;
use serde_json::Value;
use uuid::Uuid;

use super::Reconciler;
use crate::model::Record;
use crate::schema::EntityType;

impl Reconciler<'_> {
    /// Walks one entity level, matching CIP records against the CMDB and
    /// appending the resulting create/update records in pre-order.
    ///
    /// `parent` is the CIP-side natural id of the parent record;
    /// `parent_cmdb` is the CMDB-side id the parent resolved to. Each
    /// record's parent-ref field is overwritten with `parent_cmdb`, which is
    /// the step that re-links the tree in CMDB-id space.
    pub(super) async fn reconcile(
        &mut self,
        entity: EntityType,
        parent: Option<&str>,
        parent_cmdb: Option<&str>,
    ) -> Result<()> {
        log::debug!("reconciling {entity} (parent: {parent:?}, parent_cmdb: {parent_cmdb:?})");

        let cip: Vec<Record> = self
            .source
            .records_of(entity, parent)
            .into_iter()
            .cloned()
            .collect();
        let entity_key = entity.entity_key();
        let parent_key = entity.parent_key();

        for mut item in cip {
            let Some(cip_id) = item.natural_id().map(str::to_owned) else {
                log::warn!("skipping {entity} record without {entity_key} field");
                continue;
            };

            // A provider at the root resolves its own CMDB parent reference
            // to its natural id. Resolved per item: sibling providers each
            // root their own subtree.
            let parent_cmdb: Option<String> = match parent_cmdb {
                Some(id) => Some(id.to_string()),
                None if entity == EntityType::Provider => Some(cip_id.clone()),
                None => None,
            };

            let matched = self
                .cmdb
                .match_by_natural_id(entity, &cip_id, parent_cmdb.as_deref())
                .await?;

            let cmdb_id = match matched {
                Some(Record { id: Some(id), rev, .. }) => {
                    log::debug!("{entity} <{cip_id}> found in CMDB [action: update]");
                    item.rev = rev;
                    Some(id)
                }
                // A match without _id cannot anchor an update and would leave
                // the children querying with a null parent; create instead.
                Some(_) => {
                    log::warn!("matched CMDB {entity} <{cip_id}> has no _id, treating as create");
                    new_cmdb_id(entity, &item, parent_cmdb.as_deref())
                }
                None => {
                    log::debug!("{entity} <{cip_id}> not in CMDB [action: create]");
                    new_cmdb_id(entity, &item, parent_cmdb.as_deref())
                }
            };

            item.id = cmdb_id.clone();
            item.data.insert(
                parent_key.to_string(),
                parent_cmdb.clone().map_or(Value::Null, Value::String),
            );
            self.records.push(item);

            for &child in entity.children() {
                Box::pin(self.reconcile(child, Some(&cip_id), cmdb_id.as_deref())).await?;
            }
        }
        Ok(())
    }
}

/// Id-generation policy for records being created.
///
/// Leaf types get no id at all: the CMDB assigns one on write. A provider
/// reuses its resolved root reference, keeping the root id human-meaningful.
/// A service prefixes a fresh UUID with its sitename, since downstream
/// consumers of service ids require them to start with a letter. Every other
/// non-leaf type gets a bare UUID.
fn new_cmdb_id(entity: EntityType, item: &Record, parent_cmdb: Option<&str>) -> Option<String> {
    if entity.children().is_empty() {
        return None;
    }
    if entity == EntityType::Provider {
        return parent_cmdb.map(str::to_owned);
    }
    let uuid = Uuid::new_v4().to_string();
    if entity == EntityType::Service {
        match item.data_str("sitename") {
            Some(sitename) => return Some(format!("{sitename}_{uuid}")),
            None => log::warn!("service record has no sitename, id left unprefixed"),
        }
    }
    Some(uuid)
}

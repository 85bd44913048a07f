//! Access to the records currently stored in the CMDB.

mod bulk;
mod remote;
mod snapshot;

pub use bulk::BulkSink;
pub use remote::RemoteStore;
pub use snapshot::SnapshotStore;

use anyhow::Result;
use async_trait::async_trait;

use crate::model::Record;
use crate::schema::EntityType;

/// Read access to existing CMDB records.
///
/// Two interchangeable backends implement this: an in-memory snapshot loaded
/// from a JSON file, and the live CouchDB-backed query endpoints.
#[async_trait]
pub trait CmdbStore: Send + Sync {
    /// Existing CMDB records of `entity`, optionally scoped to a CMDB-side
    /// parent id.
    async fn records_of(&self, entity: EntityType, parent: Option<&str>) -> Result<Vec<Record>>;

    /// First record of `entity` under `parent` whose natural id matches.
    ///
    /// A linear scan; per-parent fan-out in a CMDB is tens of records, not
    /// millions.
    async fn match_by_natural_id(
        &self,
        entity: EntityType,
        natural_id: &str,
        parent: Option<&str>,
    ) -> Result<Option<Record>> {
        let entity_key = entity.entity_key();
        let records = self.records_of(entity, parent).await?;
        Ok(records
            .into_iter()
            .find(|r| r.data_str(entity_key) == Some(natural_id)))
    }

    /// CMDB id of the service under `provider_id` with the given endpoint.
    async fn lookup_service_id(&self, endpoint: &str, provider_id: &str) -> Result<Option<String>> {
        let records = self
            .records_of(EntityType::Service, Some(provider_id))
            .await?;
        Ok(records
            .into_iter()
            .find(|r| r.data_str("endpoint") == Some(endpoint))
            .and_then(|r| r.id))
    }
}

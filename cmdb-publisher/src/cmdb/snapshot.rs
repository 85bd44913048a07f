//! Snapshot CMDB backend backed by a local JSON file.

use std::path::Path;

use anyhow::Result;
use async_trait::async_trait;

use super::CmdbStore;
use crate::error::Error;
use crate::model::{Record, filter_records};
use crate::schema::EntityType;

/// Immutable in-memory CMDB contents.
///
/// Also stands in for a CMDB that is not configured at all: an empty
/// snapshot makes every reconciliation a create.
#[derive(Debug)]
pub struct SnapshotStore {
    records: Vec<Record>,
}

impl SnapshotStore {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Loads the snapshot once at startup. An unreadable file is a
    /// configuration error, not a lenient read.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .map_err(|e| Error::TargetRead(format!("{}: {e}", path.display())))?;
        let records: Vec<Record> = serde_json::from_reader(std::io::BufReader::new(file))
            .map_err(|e| Error::TargetRead(format!("{}: {e}", path.display())))?;
        log::info!(
            "loaded {} CMDB records from {}",
            records.len(),
            path.display()
        );
        Ok(Self::new(records))
    }
}

#[async_trait]
impl CmdbStore for SnapshotStore {
    async fn records_of(&self, entity: EntityType, parent: Option<&str>) -> Result<Vec<Record>> {
        Ok(filter_records(&self.records, entity, parent)
            .into_iter()
            .cloned()
            .collect())
    }
}

//! Read-only view over the CIP records supplied at process start.

use std::io::Read;

use crate::error::Error;
use crate::model::{Record, filter_records};
use crate::schema::EntityType;

/// The flat CIP record set, loaded once and never mutated.
///
/// Parent/child relationships exist only implicitly: each record's
/// parent-ref field holds the natural id of its parent record.
#[derive(Debug)]
pub struct SourceView {
    records: Vec<Record>,
}

impl SourceView {
    /// Parses the CIP record set from JSON. A malformed or unreadable input
    /// is fatal before any traversal starts.
    pub fn from_reader(reader: impl Read) -> Result<Self, Error> {
        let records: Vec<Record> =
            serde_json::from_reader(reader).map_err(|e| Error::SourceRead(e.to_string()))?;
        log::info!("loaded {} CIP records", records.len());
        Ok(Self { records })
    }

    pub fn from_records(records: Vec<Record>) -> Self {
        Self { records }
    }

    /// All CIP records of `entity`, optionally scoped to a parent natural id.
    pub fn records_of(&self, entity: EntityType, parent: Option<&str>) -> Vec<&Record> {
        filter_records(&self.records, entity, parent)
    }
}

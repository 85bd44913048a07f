//! CMDB document model shared by the CIP input, the CMDB backends and the
//! bulk sink.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::schema::EntityType;

/// A single CMDB-shaped document.
///
/// CIP records arrive with only `type` and `data`; records headed for the
/// bulk sink carry `_id` (and `_rev` for updates) once resolved. Delete
/// markers keep the stored `_id`/`_rev` and set `_deleted`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "type")]
    pub entity: EntityType,
    #[serde(default)]
    pub data: Map<String, Value>,
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "_rev", default, skip_serializing_if = "Option::is_none")]
    pub rev: Option<String>,
    #[serde(rename = "_deleted", default, skip_serializing_if = "is_false")]
    pub deleted: bool,
}

fn is_false(v: &bool) -> bool {
    !*v
}

impl Record {
    pub fn new(entity: EntityType, data: Map<String, Value>) -> Self {
        Self {
            entity,
            data,
            id: None,
            rev: None,
            deleted: false,
        }
    }

    /// Value of the natural-id field for this record's type, if present and
    /// a string.
    pub fn natural_id(&self) -> Option<&str> {
        self.data_str(self.entity.entity_key())
    }

    /// String value of an arbitrary `data` field.
    pub fn data_str(&self, key: &str) -> Option<&str> {
        self.data.get(key).and_then(Value::as_str)
    }
}

/// Filters `records` down to `entity`, optionally scoped to records whose
/// parent-ref field equals `parent`.
///
/// This is the one filtering primitive shared by the CIP view, the snapshot
/// backend and the deletion detector's surviving-set computation. It works
/// over any record collection, not only the pristine CIP input.
pub fn filter_records<'a>(
    records: &'a [Record],
    entity: EntityType,
    parent: Option<&str>,
) -> Vec<&'a Record> {
    let parent_key = entity.parent_key();
    records
        .iter()
        .filter(|r| r.entity == entity)
        .filter(|r| match parent {
            Some(parent) => r.data_str(parent_key) == Some(parent),
            None => true,
        })
        .collect()
}

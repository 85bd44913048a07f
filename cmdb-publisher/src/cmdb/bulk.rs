//! Bulk writes to the CMDB.

use serde_json::{Value, json};

use crate::error::Error;
use crate::model::Record;

/// Posts the full record set to the CMDB `_bulk_docs` route in one request.
///
/// Records with `_id` set are upserts; records with `_deleted` are removals.
/// A rejected write is surfaced as [`Error::TargetWrite`] and never retried
/// here.
pub struct BulkSink {
    client: reqwest::Client,
    write_endpoint: String,
    username: Option<String>,
    password: Option<String>,
}

impl BulkSink {
    pub fn new(
        write_endpoint: impl Into<String>,
        username: Option<String>,
        password: Option<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            write_endpoint: write_endpoint.into().trim_end_matches('/').to_string(),
            username,
            password,
        }
    }

    pub async fn post(&self, records: &[Record]) -> Result<(), Error> {
        let url = format!("{}/_bulk_docs", self.write_endpoint);
        log::debug!("bulk posting {} records to {url}", records.len());

        let mut request = self.client.post(&url).json(&bulk_payload(records));
        if let Some(username) = &self.username {
            request = request.basic_auth(username, self.password.as_deref());
        }
        let response = request
            .send()
            .await
            .map_err(|e| Error::TargetWrite(e.to_string()))?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(Error::TargetWrite(format!("status {status}: {body}")));
        }
        log::debug!("bulk post result: {body}");
        Ok(())
    }
}

/// CouchDB bulk-operation envelope.
fn bulk_payload(records: &[Record]) -> Value {
    json!({ "docs": records })
}

#[cfg(test)]
mod tests {
    use serde_json::Map;

    use super::*;
    use crate::schema::EntityType;

    #[test]
    fn payload_wraps_records_in_docs() {
        let mut data = Map::new();
        data.insert("name".into(), "SiteA".into());
        let mut record = Record::new(EntityType::Provider, data);
        record.id = Some("SiteA".into());

        let payload = bulk_payload(&[record]);

        let docs = payload["docs"].as_array().unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0]["_id"], "SiteA");
        assert_eq!(docs[0]["type"], "provider");
    }

    #[test]
    fn delete_markers_carry_the_deleted_field() {
        let mut record = Record::new(EntityType::Tenant, Map::new());
        record.id = Some("u2".into());
        record.rev = Some("1-b".into());
        record.deleted = true;

        let payload = bulk_payload(&[record]);

        let doc = &payload["docs"][0];
        assert_eq!(doc["_deleted"], true);
        assert_eq!(doc["_rev"], "1-b");
    }
}

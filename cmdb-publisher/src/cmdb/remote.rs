//! Live CMDB backend over the CouchDB-style HTTP query endpoints.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

use super::CmdbStore;
use crate::model::Record;
use crate::schema::EntityType;

/// Issues one GET per (entity, parent) query against the CMDB read endpoint.
///
/// Each entity type has its own query route; all reads are lenient (see
/// [`CmdbStore`]): a failed request, a non-success status or a malformed
/// body degrades to "no records" for that subtree instead of aborting the
/// run.
pub struct RemoteStore {
    client: reqwest::Client,
    read_endpoint: String,
}

impl RemoteStore {
    pub fn new(read_endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            read_endpoint: read_endpoint.into().trim_end_matches('/').to_string(),
        }
    }

    /// Entity-specific query URL. Parent ids are percent-encoded because
    /// service parents are themselves URLs.
    fn query_url(&self, entity: EntityType, parent: &str) -> String {
        let parent = urlencoding::encode(parent);
        let path = match entity {
            EntityType::Provider => format!("provider/id/{parent}"),
            EntityType::Service => format!("service/filters/provider_id/{parent}"),
            EntityType::Tenant => format!("tenant/filters/service/{parent}"),
            EntityType::Image => format!("image/filters/tenant_id/{parent}"),
            EntityType::Flavor => format!("flavor/filters/tenant_id/{parent}"),
        };
        format!("{}/{}?include_docs=true", self.read_endpoint, path)
    }
}

#[async_trait]
impl CmdbStore for RemoteStore {
    async fn records_of(&self, entity: EntityType, parent: Option<&str>) -> Result<Vec<Record>> {
        // Every CMDB query route is parent-scoped; there is no list-all.
        let Some(parent) = parent else {
            log::debug!("unscoped CMDB query for {entity}, returning no records");
            return Ok(Vec::new());
        };
        let url = self.query_url(entity, parent);
        log::debug!("GET {url}");

        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                log::warn!("CMDB query failed for {url}: {e}");
                return Ok(Vec::new());
            }
        };
        if !response.status().is_success() {
            log::debug!("CMDB query for {url} returned {}", response.status());
            return Ok(Vec::new());
        }
        let body: Value = match response.json().await {
            Ok(body) => body,
            Err(e) => {
                log::warn!("malformed CMDB response from {url}: {e}");
                return Ok(Vec::new());
            }
        };
        Ok(unwrap_response(body))
    }
}

/// Unwraps a CMDB query response body into documents.
///
/// A body carrying an `error` field means "no data" (distinct from an empty
/// row list); a body with `rows` is a row-wrapped document list; anything
/// else is a single bare document (the provider/id route has no rows).
fn unwrap_response(body: Value) -> Vec<Record> {
    if body.get("error").is_some() {
        log::debug!("got CMDB error in HTTP response: {body}");
        return Vec::new();
    }
    let docs: Vec<Value> = if let Some(rows) = body.get("rows") {
        rows.as_array()
            .map(|rows| rows.iter().filter_map(|row| row.get("doc").cloned()).collect())
            .unwrap_or_default()
    } else {
        vec![body]
    };
    docs.into_iter()
        .filter_map(|doc| match serde_json::from_value::<Record>(doc) {
            Ok(record) => Some(record),
            Err(e) => {
                log::warn!("skipping malformed CMDB document: {e}");
                None
            }
        })
        .collect()
}

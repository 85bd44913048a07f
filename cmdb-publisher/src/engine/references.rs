//! Late resolution of cross-service references.

use anyhow::Result;

use super::Reconciler;
use crate::schema::EntityType;

impl Reconciler<'_> {
    /// Rewrites `service_parent_id` fields from endpoint values to CMDB
    /// service ids.
    ///
    /// A child service names its parent service by endpoint in CIP data; the
    /// parent's CMDB id may not exist until its own reconciliation step has
    /// run, so this has to be a second pass over the completed accumulator.
    /// An unresolved reference is not an error: it is logged and left as-is.
    pub(super) async fn resolve_service_parents(&mut self) -> Result<()> {
        let cmdb = self.cmdb;
        for record in &mut self.records {
            if record.entity != EntityType::Service {
                continue;
            }
            let Some(endpoint) = record.data_str("service_parent_id").map(str::to_owned) else {
                continue;
            };
            let Some(provider_id) = record.data_str("provider_id").map(str::to_owned) else {
                continue;
            };
            match cmdb.lookup_service_id(&endpoint, &provider_id).await? {
                Some(service_id) => {
                    log::info!(
                        "customizing service_parent_id <{endpoint}> with CMDB service id \
                         <{service_id}>"
                    );
                    record
                        .data
                        .insert("service_parent_id".to_string(), service_id.into());
                }
                None => {
                    log::info!("service_parent_id <{endpoint}> not found in CMDB, leaving as-is");
                }
            }
        }
        Ok(())
    }
}

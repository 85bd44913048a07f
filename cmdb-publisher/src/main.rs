//! CMDB publisher entry point.

mod cli;
mod cmdb;
mod engine;
mod error;
mod model;
mod schema;
mod source;

use anyhow::{Context, Result};
use clap::Parser;

use crate::cli::Args;
use crate::cmdb::{BulkSink, CmdbStore, RemoteStore, SnapshotStore};
use crate::engine::Reconciler;
use crate::source::SourceView;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let source = match &args.input {
        Some(path) => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("failed to open CIP input {}", path.display()))?;
            SourceView::from_reader(std::io::BufReader::new(file))?
        }
        None => SourceView::from_reader(std::io::stdin().lock())?,
    };

    let cmdb: Box<dyn CmdbStore> = if let Some(path) = &args.cmdb_data_file {
        Box::new(SnapshotStore::from_file(path)?)
    } else if let Some(endpoint) = &args.cmdb_read_endpoint {
        Box::new(RemoteStore::new(endpoint))
    } else {
        log::warn!("no CMDB read endpoint or data file configured, assuming an empty CMDB");
        Box::new(SnapshotStore::empty())
    };

    let records = Reconciler::new(&source, cmdb.as_ref()).generate().await?;

    if args.dry_run {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }
    log::debug!(
        "{}",
        serde_json::to_string_pretty(&records).unwrap_or_default()
    );

    let write_endpoint = args
        .cmdb_write_endpoint
        .as_deref()
        .context("--cmdb-write-endpoint is required unless --dry-run is given")?;
    let sink = BulkSink::new(write_endpoint, args.cmdb_db_user, args.cmdb_db_pass);
    sink.post(&records).await?;
    Ok(())
}

//! Command-line options.

use std::path::PathBuf;

use clap::Parser;

/// Publishes cloud-info-provider (CIP) records to a CouchDB-backed CMDB.
///
/// CIP records are read as JSON from stdin (or --input), reconciled against
/// the current CMDB contents, and the resulting create/update/delete set is
/// bulk-posted in a single request.
#[derive(Debug, Parser)]
#[command(name = "cmdb-publisher", version, about)]
pub struct Args {
    /// CMDB read URL
    #[arg(long, value_name = "URL")]
    pub cmdb_read_endpoint: Option<String>,

    /// CMDB write URL
    #[arg(long, value_name = "URL")]
    pub cmdb_write_endpoint: Option<String>,

    /// With password authentication, the CMDB username
    #[arg(long, value_name = "USERNAME")]
    pub cmdb_db_user: Option<String>,

    /// With password authentication, the CMDB password
    #[arg(long, value_name = "PASSWORD")]
    pub cmdb_db_pass: Option<String>,

    /// Read CMDB data from a JSON file rather than remotely
    #[arg(long, value_name = "JSON_FILE", conflicts_with = "cmdb_read_endpoint")]
    pub cmdb_data_file: Option<PathBuf>,

    /// Read CIP records from a file instead of stdin
    #[arg(long, value_name = "JSON_FILE")]
    pub input: Option<PathBuf>,

    /// Do not post to the remote CMDB service
    #[arg(long)]
    pub dry_run: bool,
}

//! Publisher error taxonomy.

use thiserror::Error;

/// Errors surfaced by the publisher.
///
/// CMDB reads are deliberately lenient: presence or absence of CMDB data is
/// routine, so per-query failures degrade to empty results inside the remote
/// backend. `TargetRead` therefore only surfaces from backend construction
/// (an unreadable snapshot file).
#[derive(Debug, Error)]
pub enum Error {
    /// A record or query named an entity type outside the fixed schema.
    #[error("unknown entity type: {0}")]
    UnknownEntityType(String),

    /// The CIP input could not be read or parsed. Fatal, aborts before any
    /// traversal.
    #[error("failed to read CIP records: {0}")]
    SourceRead(String),

    /// The CMDB snapshot could not be loaded.
    #[error("failed to read CMDB data: {0}")]
    TargetRead(String),

    /// The bulk write was rejected by the CMDB. Not retried here; retry
    /// policy belongs to the caller.
    #[error("CMDB bulk write failed: {0}")]
    TargetWrite(String),
}

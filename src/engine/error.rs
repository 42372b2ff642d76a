use datafusion::error::DataFusionError;
use thiserror::Error;

/// Errors surfaced by the ingestion and query layer.
///
/// None of these are fatal: a failed ingestion leaves prior registrations
/// untouched, and a failed query only aborts the current render cycle.
#[derive(Debug, Error)]
pub enum HubError {
    /// The upload could not be parsed as delimited text with a header row.
    #[error("failed to parse CSV: {0}")]
    Parse(String),

    /// Two raw headers normalized to the same column identifier.
    #[error("header `{raw}` collides with an earlier column `{normalized}`")]
    DuplicateColumn { raw: String, normalized: String },

    /// A dashboard asked for a table that is not registered.
    #[error("table `{0}` is not loaded")]
    MissingTable(String),

    /// The embedded SQL engine rejected a statement.
    #[error("query engine error: {0}")]
    Engine(#[from] DataFusionError),
}

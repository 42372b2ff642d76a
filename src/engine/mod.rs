/// Engine layer: CSV ingestion, the query namespace, and result frames.
///
/// Architecture:
/// ```text
///      .csv bytes
///          │
///          ▼
///     ┌──────────┐
///     │  ingest   │  parse + normalize headers → RecordBatch
///     └──────────┘
///          │
///          ▼
///     ┌────────────────┐
///     │ QueryNamespace  │  register(name, batch) / execute(sql)
///     └────────────────┘
///          │
///          ▼
///     ┌──────────┐
///     │  Frame    │  column names + rows of Value
///     └──────────┘
/// ```

pub mod error;
pub mod frame;
pub mod ingest;
pub mod namespace;

pub use error::HubError;
pub use frame::{Frame, Value};
pub use namespace::QueryNamespace;

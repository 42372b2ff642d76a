use std::sync::Arc;

use datafusion::arrow::record_batch::RecordBatch;
use datafusion::datasource::MemTable;
use datafusion::prelude::SessionContext;
use datafusion::scalar::ScalarValue;
use tokio::runtime::{Builder, Runtime};

use super::error::HubError;
use super::frame::Frame;

// ---------------------------------------------------------------------------
// QueryNamespace – registry of tables addressable by name
// ---------------------------------------------------------------------------

/// A session-scoped registry of in-memory tables backed by the embedded SQL
/// engine. Owned by the application state and passed by reference into the
/// dashboard builders; there is deliberately no process-wide instance.
///
/// The engine's API is async; a current-thread runtime drives each call to
/// completion so the rest of the app stays synchronous.
pub struct QueryNamespace {
    ctx: SessionContext,
    runtime: Runtime,
}

impl Default for QueryNamespace {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryNamespace {
    pub fn new() -> Self {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("failed to create tokio runtime");
        QueryNamespace {
            ctx: SessionContext::new(),
            runtime,
        }
    }

    /// Register `batch` under `name`, replacing any prior registration
    /// wholesale. No merge, no versioning.
    pub fn register(&self, name: &str, batch: RecordBatch) -> Result<(), HubError> {
        let table = MemTable::try_new(batch.schema(), vec![vec![batch]])?;
        self.ctx.register_table(name, Arc::new(table))?;
        Ok(())
    }

    /// Run a statement with no parameters and materialize the result.
    pub fn execute(&self, sql: &str) -> Result<Frame, HubError> {
        self.runtime.block_on(async {
            let batches = self.ctx.sql(sql).await?.collect().await?;
            Ok(Frame::from_batches(&batches))
        })
    }

    /// Run a statement containing `$1`-style placeholders, binding `params`
    /// positionally through the engine. All user-influenced values go
    /// through this path; nothing is spliced into the SQL text.
    pub fn execute_with_params(
        &self,
        sql: &str,
        params: Vec<ScalarValue>,
    ) -> Result<Frame, HubError> {
        self.runtime.block_on(async {
            let batches = self
                .ctx
                .sql(sql)
                .await?
                .with_param_values(params)?
                .collect()
                .await?;
            Ok(Frame::from_batches(&batches))
        })
    }

    pub fn has_table(&self, name: &str) -> bool {
        self.ctx.table_exist(name).unwrap_or(false)
    }

    /// Names of all registered tables, sorted.
    pub fn table_names(&self) -> Vec<String> {
        let mut names = Vec::new();
        for catalog_name in self.ctx.catalog_names() {
            let Some(catalog) = self.ctx.catalog(&catalog_name) else {
                continue;
            };
            for schema_name in catalog.schema_names() {
                if let Some(schema) = catalog.schema(&schema_name) {
                    names.extend(schema.table_names());
                }
            }
        }
        names.sort();
        names
    }

    /// Drop every registration and start from an empty context.
    pub fn reset(&mut self) {
        self.ctx = SessionContext::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ingest::ingest_csv;
    use crate::engine::frame::Value;

    fn namespace_with(name: &str, csv: &str) -> QueryNamespace {
        let ns = QueryNamespace::new();
        let batch = ingest_csv(csv.as_bytes()).unwrap();
        ns.register(name, batch).unwrap();
        ns
    }

    #[test]
    fn register_and_count() {
        let ns = namespace_with("t", "v\n1\n2\n3\n");
        let frame = ns.execute("SELECT count(*) FROM t").unwrap();
        assert_eq!(frame.scalar_i64(), 3);
    }

    #[test]
    fn re_registration_replaces_wholesale() {
        let ns = namespace_with("t", "v\n1\n2\n3\n");
        let batch = ingest_csv(b"v\n9\n").unwrap();
        ns.register("t", batch).unwrap();
        let frame = ns.execute("SELECT count(*) FROM t").unwrap();
        assert_eq!(frame.scalar_i64(), 1);
    }

    #[test]
    fn bound_parameters_filter_rows() {
        let ns = namespace_with("t", "year,kind\n2020,a\n2020,b\n2019,c\n");
        let frame = ns
            .execute_with_params(
                "SELECT count(*) FROM t WHERE \"year\" = $1",
                vec![ScalarValue::Int64(Some(2020))],
            )
            .unwrap();
        assert_eq!(frame.scalar_i64(), 2);
    }

    #[test]
    fn query_against_unknown_table_is_an_error() {
        let ns = QueryNamespace::new();
        assert!(!ns.has_table("missing"));
        assert!(ns.execute("SELECT count(*) FROM missing").is_err());
    }

    #[test]
    fn reset_discards_all_registrations() {
        let mut ns = namespace_with("t", "v\n1\n");
        assert!(ns.has_table("t"));
        ns.reset();
        assert!(!ns.has_table("t"));
        assert!(ns.execute("SELECT count(*) FROM t").is_err());
    }

    #[test]
    fn table_names_lists_registrations() {
        let ns = namespace_with("b_table", "v\n1\n");
        let batch = ingest_csv(b"v\n1\n").unwrap();
        ns.register("a_table", batch).unwrap();
        assert_eq!(ns.table_names(), vec!["a_table", "b_table"]);
    }

    #[test]
    fn null_aggregates_materialize_as_null() {
        let ns = namespace_with("t", "v\n1\n");
        let frame = ns.execute("SELECT sum(v) FROM t WHERE v > 5").unwrap();
        assert_eq!(frame.scalar(), Some(&Value::Null));
    }
}

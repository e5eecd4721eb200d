mod memory;
mod query;
mod rest;

pub use memory::MemoryDatabase;
pub use query::{Filter, FilterOp, Order, Query};
pub use rest::RestClient;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{BooksError, Result};

/// Table-scoped operations against the hosted database.
///
/// Rows travel as JSON objects; `fetch` turns them into typed records.
pub trait Database {
    /// Rows matching the query's filters, ordered and limited as requested
    fn select(&self, query: &Query) -> Result<Vec<Value>>;

    /// Exact number of rows matching the query's filters
    fn count(&self, query: &Query) -> Result<u64>;

    /// Insert rows and return them as stored
    fn insert(&self, table: &str, rows: &[Value]) -> Result<Vec<Value>>;

    /// Merge `patch` into every row matching the query's filters
    fn update(&self, query: &Query, patch: &Value) -> Result<Vec<Value>>;

    /// Delete every row matching the query's filters and return them
    fn delete(&self, query: &Query) -> Result<Vec<Value>>;
}

/// Run a select and deserialize each row into `T`
pub fn fetch<T, D>(db: &D, query: &Query) -> Result<Vec<T>>
where
    T: DeserializeOwned,
    D: Database + ?Sized,
{
    let rows = db.select(query)?;
    tracing::debug!(table = query.table_name(), rows = rows.len(), "fetched rows");
    rows.into_iter()
        .map(|row| {
            serde_json::from_value(row).map_err(|e| BooksError::Decode {
                table: query.table_name().to_string(),
                source: e,
            })
        })
        .collect()
}

//! Column metadata sources.
//!
//! Generation never talks to a database. It consumes the ordered column list
//! of one table through [`ColumnSource`]; the shipped adapter reads a JSON
//! export of `SHOW FULL COLUMNS FROM <table>`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::{ScaffoldError, ScaffoldResult};
use crate::schema::ColumnRecord;

#[async_trait]
pub trait ColumnSource: Send + Sync {
    /// Columns of `table` in declaration order.
    async fn columns(&self, table: &str) -> ScaffoldResult<Vec<ColumnRecord>>;
}

/// Either a bare column array, or several tables keyed by name.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ColumnExport {
    Single(Vec<ColumnRecord>),
    Keyed(BTreeMap<String, Vec<ColumnRecord>>),
}

#[derive(Debug, Clone)]
pub struct JsonColumnSource {
    path: PathBuf,
}

impl JsonColumnSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parses an export already in memory. `origin` only labels errors.
    pub fn parse(text: &str, table: &str, origin: &Path) -> ScaffoldResult<Vec<ColumnRecord>> {
        let export: ColumnExport = serde_json::from_str(text).map_err(|err| {
            ScaffoldError::schema(format!(
                "{} is not a column export: {err}",
                origin.display()
            ))
        })?;

        let columns = match export {
            ColumnExport::Single(columns) => columns,
            ColumnExport::Keyed(mut tables) => tables.remove(table).ok_or_else(|| {
                ScaffoldError::schema(format!(
                    "table `{table}` not found in {} (available: {})",
                    origin.display(),
                    tables.keys().cloned().collect::<Vec<_>>().join(", ")
                ))
            })?,
        };

        if columns.is_empty() {
            return Err(ScaffoldError::schema(format!(
                "table `{table}` has no columns in {}",
                origin.display()
            )));
        }
        Ok(columns)
    }
}

#[async_trait]
impl ColumnSource for JsonColumnSource {
    async fn columns(&self, table: &str) -> ScaffoldResult<Vec<ColumnRecord>> {
        let text = tokio::fs::read_to_string(&self.path).await.map_err(|err| {
            ScaffoldError::schema(format!("cannot read {}: {err}", self.path.display()))
        })?;
        let columns = Self::parse(&text, table, &self.path)?;
        tracing::debug!(
            table,
            columns = columns.len(),
            source = %self.path.display(),
            "loaded column metadata"
        );
        Ok(columns)
    }
}

/// A fixed column list, returned for any table name.
#[derive(Debug, Clone, Default)]
pub struct StaticColumnSource {
    columns: Vec<ColumnRecord>,
}

impl StaticColumnSource {
    pub fn new(columns: Vec<ColumnRecord>) -> Self {
        Self { columns }
    }
}

#[async_trait]
impl ColumnSource for StaticColumnSource {
    async fn columns(&self, _table: &str) -> ScaffoldResult<Vec<ColumnRecord>> {
        Ok(self.columns.clone())
    }
}

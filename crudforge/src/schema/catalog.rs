//! In-memory table catalog, optionally loaded from JSON

use std::path::Path;

use tracing::debug;

use super::{SchemaSource, Table, TableRef};
use crate::error::{CodegenError, Result};

/// A fixed set of tables, e.g. exported from a database catalog as JSON
#[derive(Debug, Clone, Default)]
pub struct CatalogSchemaSource {
    tables: Vec<Table>,
}

impl CatalogSchemaSource {
    pub fn new(tables: Vec<Table>) -> Self {
        Self { tables }
    }

    /// Parse a JSON array of tables
    pub fn from_json(json: &str) -> Result<Self> {
        let tables: Vec<Table> = serde_json::from_str(json)?;
        Ok(Self::new(tables))
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| CodegenError::io(path, e))?;
        let source = Self::from_json(&content).map_err(|e| {
            CodegenError::ConfigError(format!("Invalid catalog {}: {}", path.display(), e))
        })?;
        debug!(
            "Loaded {} tables from catalog {}",
            source.tables.len(),
            path.display()
        );
        Ok(source)
    }
}

impl SchemaSource for CatalogSchemaSource {
    fn table_schema(&self, name: &str, schema: &str) -> Result<Table> {
        let found = self.tables.iter().find(|t| {
            t.name.eq_ignore_ascii_case(name) && t.schema.eq_ignore_ascii_case(schema)
        });

        Ok(found.cloned().unwrap_or_else(|| Table {
            schema: schema.to_string(),
            name: name.to_string(),
            columns: Vec::new(),
        }))
    }

    fn list_tables(&self) -> Result<Vec<TableRef>> {
        Ok(self
            .tables
            .iter()
            .map(|t| TableRef::new(&t.schema, &t.name))
            .collect())
    }
}

//! Schema discovery: where `Table` values come from

mod catalog;
mod ddl;
mod metadata;

pub use catalog::*;
pub use ddl::*;
pub use metadata::*;

use crate::config::CodegenConfig;
use crate::error::{CodegenError, Result};

/// Supplies table metadata to the generator.
///
/// Lookups are by `(name, schema)`. A table the source does not know is
/// returned with no columns; the orchestrator reports that as a schema error
/// for that table only.
pub trait SchemaSource: Send + Sync {
    /// Fetch one table
    fn table_schema(&self, name: &str, schema: &str) -> Result<Table>;

    /// Every table the source knows about
    fn list_tables(&self) -> Result<Vec<TableRef>>;
}

/// Build the schema source named by the configuration
pub fn source_from_config(config: &CodegenConfig) -> Result<Box<dyn SchemaSource>> {
    match (&config.schema_file, &config.catalog_file) {
        (Some(ddl), None) => Ok(Box::new(DdlSchemaSource::from_file(
            ddl,
            &config.sql_dialect,
            &config.default_schema,
        )?)),
        (None, Some(catalog)) => Ok(Box::new(CatalogSchemaSource::from_json_file(catalog)?)),
        (Some(_), Some(_)) => Err(CodegenError::ValidationError(
            "schema_file and catalog_file are mutually exclusive".into(),
        )),
        (None, None) => Err(CodegenError::ValidationError(
            "a schema source is required (schema_file or catalog_file)".into(),
        )),
    }
}

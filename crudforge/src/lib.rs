//! crudforge: Generate Angular CRUD screens from table metadata
//!
//! This crate provides both a CLI tool and a library. Given table metadata
//! from a schema source (SQL DDL parsed with `sqlparser-rs`, or a JSON
//! catalog) it generates, per table:
//!
//! - A TypeScript model interface and an in-memory data service
//! - List and form components (class, template and stylesheet each)
//! - Optionally, an annotated C# entity for the backend
//!
//! It then wires the new screens into the application's route table and
//! sidebar menu. Those two files are patched line by line: re-running is a
//! no-op, and `cleanup` removes exactly what generation added.
//!
//! # Library Usage
//!
//! ```rust,ignore
//! use crudforge::CodegenBuilder;
//!
//! let result = CodegenBuilder::new("schema.sql")
//!     .output_base_path("web/src/app")
//!     .generate(&["dbo.Order_Items"])
//!     .expect("Failed to load schema");
//!
//! for file in &result.files {
//!     println!("{}", file.file_path.display());
//! }
//! ```
//!
//! # CLI Usage
//!
//! ```bash
//! crudforge --schema schema.sql generate dbo.Order_Items --base web/src/app
//! crudforge --schema schema.sql cleanup --base web/src/app
//! ```

pub mod codegen;
pub mod config;
pub mod error;
pub mod navigation;
pub mod orchestrator;
pub mod schema;

use std::path::Path;

use tracing::info;

pub use config::CodegenConfig;
pub use error::{CodegenError, Result};
pub use orchestrator::{
    CleanupRequest, CleanupResult, GenerationRequest, GenerationResult, Orchestrator,
};

/// Generate artifacts for `tables` using the paths in `config`.
///
/// An empty table list selects every table the schema source knows about.
/// Backend entities are generated when `config.backend_output_path` is set.
pub fn generate(config: &CodegenConfig, tables: &[String]) -> Result<GenerationResult> {
    let orchestrator = Orchestrator::from_config(config.clone())?;
    let tables = if tables.is_empty() {
        info!("No tables selected, generating every table in the schema source");
        orchestrator
            .source()
            .list_tables()?
            .into_iter()
            .map(|t| t.to_string())
            .collect()
    } else {
        tables.to_vec()
    };

    let mut request = GenerationRequest::from_config(config, &tables);
    request.generate_backend = config.backend_output_path.is_some();
    Ok(orchestrator.generate(&request))
}

/// Remove generated artifacts under the paths in `config`
pub fn cleanup(config: &CodegenConfig) -> Result<CleanupResult> {
    let orchestrator = Orchestrator::from_config(config.clone())?;
    Ok(orchestrator.cleanup(&CleanupRequest::from_config(config)))
}

/// Builder pattern for programmatic use
pub struct CodegenBuilder {
    config: CodegenConfig,
}

impl CodegenBuilder {
    /// Create a new builder reading tables from the given DDL file
    pub fn new(schema_file: impl AsRef<Path>) -> Self {
        Self {
            config: CodegenConfig::default_with_schema(schema_file.as_ref().to_path_buf()),
        }
    }

    /// Create a new builder reading tables from a JSON catalog
    pub fn from_catalog(catalog_file: impl AsRef<Path>) -> Self {
        Self {
            config: CodegenConfig {
                catalog_file: Some(catalog_file.as_ref().to_path_buf()),
                ..Default::default()
            },
        }
    }

    /// Set the Angular app root that receives the artifacts
    pub fn output_base_path(mut self, dir: impl AsRef<Path>) -> Self {
        self.config.output_base_path = dir.as_ref().to_path_buf();
        self
    }

    /// Also generate backend entities into `dir`
    pub fn backend_output_path(mut self, dir: impl AsRef<Path>) -> Self {
        self.config.backend_output_path = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Set the namespace of generated backend entities
    pub fn backend_namespace(mut self, namespace: &str) -> Self {
        self.config.backend_namespace = namespace.to_string();
        self
    }

    /// Set the SQL dialect used to parse the DDL file
    pub fn sql_dialect(mut self, dialect: &str) -> Self {
        self.config.sql_dialect = dialect.to_string();
        self
    }

    /// Set the schema for unqualified table names
    pub fn default_schema(mut self, schema: &str) -> Self {
        self.config.default_schema = schema.to_string();
        self
    }

    /// Enable dry run mode (render without writing files)
    pub fn dry_run(mut self) -> Self {
        self.config.dry_run = true;
        self
    }

    pub fn config(&self) -> &CodegenConfig {
        &self.config
    }

    /// Generate the selected tables; an empty slice means every table
    pub fn generate(self, tables: &[&str]) -> Result<GenerationResult> {
        let tables: Vec<String> = tables.iter().map(|t| t.to_string()).collect();
        generate(&self.config, &tables)
    }

    /// Remove everything previously generated
    pub fn cleanup(self) -> Result<CleanupResult> {
        cleanup(&self.config)
    }
}

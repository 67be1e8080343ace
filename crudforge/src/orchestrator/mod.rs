//! Batch generation and cleanup.
//!
//! The orchestrator is the only part of the crate that touches the disk for
//! generated artifacts. Tables are processed one after another so that the
//! navigation patches of one table see the result of the previous one.
//! Errors that belong to a single table or file are recorded and the batch
//! carries on; anything else aborts it.

mod cleanup;
mod request;

pub use request::*;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, error, info, warn};

use crate::codegen::{ensure_generatable, CodeGenerator, GeneratedFile, NamingBundle};
use crate::config::CodegenConfig;
use crate::error::{CodegenError, Result};
use crate::navigation::NavigationPatcher;
use crate::schema::{self, SchemaSource, TableRef};

/// Drives schema lookup, rendering, file output and navigation patching
pub struct Orchestrator {
    config: CodegenConfig,
    source: Box<dyn SchemaSource>,
    navigation: NavigationPatcher,
}

/// Files and errors accumulated over one batch
#[derive(Default)]
struct Batch {
    files: Vec<GeneratedFile>,
    errors: Vec<String>,
    /// Output path -> table that produced it
    claimed: HashMap<PathBuf, String>,
}

impl Batch {
    /// Reserve every output path of one table, or none if any is taken
    fn claim(&mut self, table: &TableRef, files: &[GeneratedFile]) -> Result<()> {
        if let Some((path, owner)) = files
            .iter()
            .find_map(|f| self.claimed.get_key_value(&f.file_path))
        {
            return Err(CodegenError::PathCollision {
                path: path.clone(),
                owner: owner.clone(),
            });
        }

        let owner = table.to_string();
        for file in files {
            self.claimed.insert(file.file_path.clone(), owner.clone());
        }
        Ok(())
    }
}

impl Orchestrator {
    pub fn new(config: CodegenConfig, source: Box<dyn SchemaSource>) -> Self {
        let navigation = NavigationPatcher::new(config.navigation.clone());
        Self {
            config,
            source,
            navigation,
        }
    }

    /// Validate `config` and open the schema source it names
    pub fn from_config(config: CodegenConfig) -> Result<Self> {
        config.validate()?;
        let source = schema::source_from_config(&config)?;
        Ok(Self::new(config, source))
    }

    pub fn config(&self) -> &CodegenConfig {
        &self.config
    }

    pub fn source(&self) -> &dyn SchemaSource {
        self.source.as_ref()
    }

    /// Generate artifacts for every selected table
    pub fn generate(&self, request: &GenerationRequest) -> GenerationResult {
        info!(
            "Starting code generation for {} table(s) into {}",
            request.selected_tables.len(),
            request.output_base_path.display()
        );

        let mut batch = Batch::default();
        let mut generated_tables = 0;

        for identifier in &request.selected_tables {
            match self.generate_table(identifier, request, &mut batch) {
                Ok(()) => generated_tables += 1,
                Err(CodegenError::SchemaError(msg)) => {
                    warn!("Skipping {}: {}", identifier, msg);
                    batch.errors.push(msg);
                }
                Err(e) if e.is_table_scoped() => {
                    warn!("Skipping {}: {}", identifier, e);
                    batch
                        .errors
                        .push(format!("Error generating code for table {}: {}", identifier, e));
                }
                Err(e) => {
                    error!("Code generation aborted: {}", e);
                    batch.errors.push(format!("Unexpected error: {}", e));
                    return GenerationResult {
                        success: false,
                        message: "Code generation failed".to_string(),
                        files: batch.files,
                        errors: batch.errors,
                    };
                }
            }
        }

        let success = batch.errors.is_empty() || !batch.files.is_empty();
        let message = if !success {
            "Code generation completed with errors".to_string()
        } else if request.dry_run {
            format!(
                "Dry run: {} files would be generated for {} table(s)",
                batch.files.len(),
                generated_tables
            )
        } else {
            format!(
                "Successfully generated {} files for {} table(s)",
                batch.files.len(),
                generated_tables
            )
        };

        info!("{}", message);
        GenerationResult {
            success,
            message,
            files: batch.files,
            errors: batch.errors,
        }
    }

    fn generate_table(
        &self,
        identifier: &str,
        request: &GenerationRequest,
        batch: &mut Batch,
    ) -> Result<()> {
        let table_ref = TableRef::parse(identifier, &self.config.default_schema)?;
        info!("Generating code for table: {}", table_ref);

        let table = self
            .source
            .table_schema(&table_ref.name, &table_ref.schema)
            .map_err(|e| match e {
                e @ CodegenError::SchemaError(_) => e,
                other => CodegenError::Discovery(other.to_string()),
            })?;
        ensure_generatable(&table)?;
        let naming = NamingBundle::derive(&table.name)?;
        let generator = CodeGenerator::new(&self.config.backend_namespace);

        let base = &request.output_base_path;
        let backend_dir = request
            .backend_output_path
            .as_deref()
            .filter(|_| request.generate_backend);

        let mut files = Vec::new();
        if request.generate_frontend {
            files.extend(generator.frontend_files(&table, &naming, base)?);
        }
        if let Some(dir) = backend_dir {
            files.push(generator.entity_file(&table, &naming, dir)?);
        }
        batch.claim(&table_ref, &files)?;
        self.write_files(files, request.dry_run, batch);

        if request.generate_frontend {
            if request.dry_run {
                debug!("Dry run, navigation left untouched");
            } else {
                let report = self.navigation.apply(base, &naming);
                batch.errors.extend(
                    report
                        .errors
                        .into_iter()
                        .map(|e| format!("Error generating code for table {}: {}", table_ref, e)),
                );
            }
        }

        if request.generate_backend && backend_dir.is_none() {
            batch.errors.push(format!(
                "Backend output path is required to generate backend code for table {}",
                table_ref
            ));
        }

        Ok(())
    }

    /// Write each file, recording failures without stopping at the first one
    fn write_files(&self, files: Vec<GeneratedFile>, dry_run: bool, batch: &mut Batch) {
        for file in files {
            if dry_run {
                debug!("Would write {}", file.file_path.display());
                batch.files.push(file);
                continue;
            }

            match write_file(&file.file_path, &file.content) {
                Ok(()) => {
                    debug!("Wrote {} ({})", file.file_path.display(), file.file_type);
                    batch.files.push(file);
                }
                Err(e) => {
                    warn!("{}", e);
                    batch.errors.push(e.to_string());
                }
            }
        }
    }
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| CodegenError::io(parent, e))?;
    }
    std::fs::write(path, content).map_err(|e| CodegenError::io(path, e))
}

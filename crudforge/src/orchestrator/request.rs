//! Request and result shapes for generation and cleanup

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::codegen::GeneratedFile;
use crate::config::CodegenConfig;

fn default_true() -> bool {
    true
}

/// Which tables to generate, and where
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    /// Table identifiers, optionally schema-qualified (`sales.Order_Items`)
    pub selected_tables: Vec<String>,

    /// Root of the Angular app
    pub output_base_path: PathBuf,

    #[serde(default = "default_true")]
    pub generate_frontend: bool,

    #[serde(default)]
    pub generate_backend: bool,

    /// Required when `generate_backend` is set
    #[serde(default)]
    pub backend_output_path: Option<PathBuf>,

    /// Render and report without touching the disk
    #[serde(default)]
    pub dry_run: bool,
}

impl GenerationRequest {
    /// Front-end only request for `tables` under `output_base_path`
    pub fn new(
        tables: impl IntoIterator<Item = impl Into<String>>,
        output_base_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            selected_tables: tables.into_iter().map(Into::into).collect(),
            output_base_path: output_base_path.into(),
            generate_frontend: true,
            generate_backend: false,
            backend_output_path: None,
            dry_run: false,
        }
    }

    /// Request using the paths and dry-run flag from `config`
    pub fn from_config(config: &CodegenConfig, tables: &[String]) -> Self {
        Self {
            backend_output_path: config.backend_output_path.clone(),
            dry_run: config.dry_run,
            ..Self::new(tables.iter().cloned(), config.output_base_path.clone())
        }
    }

    /// Also emit backend entities into `dir`
    pub fn with_backend(mut self, dir: impl Into<PathBuf>) -> Self {
        self.generate_backend = true;
        self.backend_output_path = Some(dir.into());
        self
    }

    pub fn without_frontend(mut self) -> Self {
        self.generate_frontend = false;
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// Outcome of a generation batch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    pub success: bool,
    pub message: String,
    pub files: Vec<GeneratedFile>,
    pub errors: Vec<String>,
}

impl GenerationResult {
    /// Succeeded without recording a single error
    pub fn is_complete(&self) -> bool {
        self.success && self.errors.is_empty()
    }
}

/// Where to look for generated artifacts to delete
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanupRequest {
    pub base_path: PathBuf,

    /// Backend entity directory; only marked files there are deleted
    #[serde(default)]
    pub backend_output_path: Option<PathBuf>,
}

impl CleanupRequest {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            backend_output_path: None,
        }
    }

    pub fn from_config(config: &CodegenConfig) -> Self {
        Self {
            base_path: config.output_base_path.clone(),
            backend_output_path: config.backend_output_path.clone(),
        }
    }
}

/// Outcome of a cleanup run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanupResult {
    pub success: bool,
    pub message: String,
    pub deleted_paths: Vec<PathBuf>,
    pub errors: Vec<String>,
}

impl CleanupResult {
    pub fn is_complete(&self) -> bool {
        self.success && self.errors.is_empty()
    }
}

//! Configuration settings for crudforge

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::defaults;
use crate::error::{CodegenError, Result};

/// Main configuration struct for generation and cleanup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodegenConfig {
    /// Path to a SQL DDL file used as the schema source
    #[serde(default)]
    pub schema_file: Option<PathBuf>,

    /// Path to a JSON table catalog used as the schema source
    #[serde(default)]
    pub catalog_file: Option<PathBuf>,

    /// Dialect used to parse `schema_file` (mssql, mysql, postgresql, generic, ...)
    #[serde(default = "default_sql_dialect")]
    pub sql_dialect: String,

    /// Schema assumed for unqualified table identifiers
    #[serde(default = "default_schema")]
    pub default_schema: String,

    /// Root of the Angular app that receives the generated artifacts
    #[serde(default = "default_output_base_path")]
    pub output_base_path: PathBuf,

    /// Directory for generated backend entities (required for backend output)
    #[serde(default)]
    pub backend_output_path: Option<PathBuf>,

    /// Namespace for generated backend entities
    #[serde(default = "default_backend_namespace")]
    pub backend_namespace: String,

    /// Navigation file locations and anchors
    #[serde(default)]
    pub navigation: NavigationSettings,

    /// Hand-written files that cleanup must never delete
    #[serde(default)]
    pub preserve: PreserveList,

    /// Dry run mode - render without writing files
    #[serde(default = "default_dry_run")]
    pub dry_run: bool,

    /// Log level (trace, debug, info, warn, error)
    /// Can be overridden by RUST_LOG env var
    #[serde(default)]
    pub log_level: Option<String>,
}

/// Where the two navigation files live and which anchors they use
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationSettings {
    /// Route table, relative to the output base path
    #[serde(default = "default_routes_file")]
    pub routes_file: PathBuf,

    /// Sidebar menu, relative to the output base path
    #[serde(default = "default_menu_file")]
    pub menu_file: PathBuf,

    /// Guard symbol; its import line is where new imports go
    #[serde(default = "default_guard_symbol")]
    pub guard_symbol: String,

    /// Menu item title that new items are inserted before
    #[serde(default = "default_menu_anchor_title")]
    pub menu_anchor_title: String,

    /// Icon for generated menu items
    #[serde(default = "default_menu_icon")]
    pub menu_icon: String,
}

/// Allow-lists of hand-written artifacts, by file or folder name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreserveList {
    #[serde(default = "default_preserved_components")]
    pub components: Vec<String>,

    #[serde(default = "default_preserved_models")]
    pub models: Vec<String>,

    #[serde(default = "default_preserved_services")]
    pub services: Vec<String>,
}

// Default value functions for serde
fn default_sql_dialect() -> String {
    defaults::SQL_DIALECT.to_string()
}
fn default_schema() -> String {
    defaults::DEFAULT_SCHEMA.to_string()
}
fn default_output_base_path() -> PathBuf {
    PathBuf::from(defaults::OUTPUT_BASE_PATH)
}
fn default_backend_namespace() -> String {
    defaults::BACKEND_NAMESPACE.to_string()
}
fn default_routes_file() -> PathBuf {
    PathBuf::from(defaults::ROUTES_FILE)
}
fn default_menu_file() -> PathBuf {
    PathBuf::from(defaults::MENU_FILE)
}
fn default_guard_symbol() -> String {
    defaults::GUARD_SYMBOL.to_string()
}
fn default_menu_anchor_title() -> String {
    defaults::MENU_ANCHOR_TITLE.to_string()
}
fn default_menu_icon() -> String {
    defaults::MENU_ICON.to_string()
}
fn default_preserved_components() -> Vec<String> {
    to_owned_list(defaults::PRESERVED_COMPONENTS)
}
fn default_preserved_models() -> Vec<String> {
    to_owned_list(defaults::PRESERVED_MODELS)
}
fn default_preserved_services() -> Vec<String> {
    to_owned_list(defaults::PRESERVED_SERVICES)
}
fn default_dry_run() -> bool {
    defaults::DRY_RUN
}

fn to_owned_list(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for NavigationSettings {
    fn default() -> Self {
        Self {
            routes_file: default_routes_file(),
            menu_file: default_menu_file(),
            guard_symbol: default_guard_symbol(),
            menu_anchor_title: default_menu_anchor_title(),
            menu_icon: default_menu_icon(),
        }
    }
}

impl Default for PreserveList {
    fn default() -> Self {
        Self {
            components: default_preserved_components(),
            models: default_preserved_models(),
            services: default_preserved_services(),
        }
    }
}

impl PreserveList {
    pub fn keeps_component(&self, folder: &str) -> bool {
        contains_ignore_case(&self.components, folder)
    }

    pub fn keeps_model(&self, file_name: &str) -> bool {
        contains_ignore_case(&self.models, file_name)
    }

    pub fn keeps_service(&self, file_name: &str) -> bool {
        contains_ignore_case(&self.services, file_name)
    }
}

fn contains_ignore_case(list: &[String], name: &str) -> bool {
    list.iter().any(|item| item.eq_ignore_ascii_case(name))
}

impl Default for CodegenConfig {
    fn default() -> Self {
        Self {
            schema_file: None,
            catalog_file: None,
            sql_dialect: default_sql_dialect(),
            default_schema: default_schema(),
            output_base_path: default_output_base_path(),
            backend_output_path: None,
            backend_namespace: default_backend_namespace(),
            navigation: NavigationSettings::default(),
            preserve: PreserveList::default(),
            dry_run: default_dry_run(),
            log_level: None,
        }
    }
}

impl CodegenConfig {
    /// Create a default config that reads tables from a DDL file
    pub fn default_with_schema(schema_file: PathBuf) -> Self {
        Self {
            schema_file: Some(schema_file),
            ..Default::default()
        }
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| CodegenError::io(path, e))?;
        let config: CodegenConfig = toml::from_str(&content).map_err(|e| {
            CodegenError::ConfigError(format!(
                "Failed to parse config file {}: {}",
                path.display(),
                e
            ))
        })?;
        Ok(config)
    }

    /// Load configuration using config-rs (file + environment variables)
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path));
        } else {
            builder = builder.add_source(File::with_name("crudforge").required(false));
        }

        // CRUDFORGE__OUTPUT_BASE_PATH, CRUDFORGE__NAVIGATION__MENU_ICON, ...
        builder = builder.add_source(Environment::with_prefix("CRUDFORGE").separator("__"));

        let config: CodegenConfig = builder.build()?.try_deserialize()?;

        Ok(config)
    }

    /// Absolute location of the route table
    pub fn routes_path(&self) -> PathBuf {
        self.output_base_path.join(&self.navigation.routes_file)
    }

    /// Absolute location of the sidebar menu
    pub fn menu_path(&self) -> PathBuf {
        self.output_base_path.join(&self.navigation.menu_file)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.schema_file.is_some() && self.catalog_file.is_some() {
            return Err(CodegenError::ValidationError(
                "schema_file and catalog_file are mutually exclusive".into(),
            ));
        }

        for source in [&self.schema_file, &self.catalog_file].into_iter().flatten() {
            if !source.exists() {
                return Err(CodegenError::ValidationError(format!(
                    "Schema source not found: {}",
                    source.display()
                )));
            }
        }

        if self.default_schema.trim().is_empty() {
            return Err(CodegenError::ValidationError(
                "default_schema must not be empty".into(),
            ));
        }

        if self.output_base_path.as_os_str().is_empty() {
            return Err(CodegenError::ValidationError(
                "output_base_path is required".into(),
            ));
        }

        let nav = &self.navigation;
        if nav.guard_symbol.trim().is_empty() || nav.menu_anchor_title.trim().is_empty() {
            return Err(CodegenError::ValidationError(
                "navigation anchors must not be empty".into(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CodegenConfig::default();
        assert_eq!(config.default_schema, "dbo");
        assert_eq!(config.navigation.guard_symbol, "authGuard");
        assert_eq!(config.navigation.menu_anchor_title, "Settings");
        assert!(config.preserve.keeps_component("sidebar"));
        assert!(config.log_level.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_conflicting_sources() {
        let config = CodegenConfig {
            schema_file: Some(PathBuf::from("a.sql")),
            catalog_file: Some(PathBuf::from("a.json")),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_missing_schema_file() {
        let config = CodegenConfig::default_with_schema(PathBuf::from("does/not/exist.sql"));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_toml() {
        let toml_content = r#"
            output_base_path = "web/src/app"
            log_level = "debug"

            [navigation]
            menu_icon = "🗂️"

            [preserve]
            components = ["login"]
        "#;
        let config: CodegenConfig = toml::from_str(toml_content).unwrap();
        assert_eq!(config.log_level, Some("debug".to_string()));
        assert_eq!(config.navigation.menu_icon, "🗂️");
        assert_eq!(config.navigation.routes_file, PathBuf::from("app.routes.ts"));
        assert!(config.preserve.keeps_component("LOGIN"));
        assert!(!config.preserve.keeps_component("sidebar"));
        assert_eq!(
            config.menu_path(),
            PathBuf::from("web/src/app").join("components/sidebar/sidebar.ts")
        );
    }
}

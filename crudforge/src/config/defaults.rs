//! Default configuration values - single source of truth

/// Schema assumed when a table identifier carries no `schema.` qualifier
pub const DEFAULT_SCHEMA: &str = "dbo";

/// SQL dialect used to parse DDL schema files
pub const SQL_DIALECT: &str = "mssql";

/// Root of the Angular application (`src/app`)
pub const OUTPUT_BASE_PATH: &str = "./src/app";

/// Route table, relative to the output base path
pub const ROUTES_FILE: &str = "app.routes.ts";

/// Sidebar menu, relative to the output base path
pub const MENU_FILE: &str = "components/sidebar/sidebar.ts";

/// Guard symbol whose import is the last stable import in the route table
pub const GUARD_SYMBOL: &str = "authGuard";

/// Title of the menu item new entries are inserted in front of
pub const MENU_ANCHOR_TITLE: &str = "Settings";

/// Icon used for generated menu items
pub const MENU_ICON: &str = "📋";

/// Namespace for generated backend entities
pub const BACKEND_NAMESPACE: &str = "CodeGenerator.API.Models";

/// Hand-written component folders that cleanup never touches
pub const PRESERVED_COMPONENTS: &[&str] = &[
    "login",
    "dashboard",
    "header",
    "sidebar",
    "footer",
    "code-generator",
    "product-list",
    "product-form",
];

/// Hand-written model files that cleanup never touches
pub const PRESERVED_MODELS: &[&str] = &["product.model.ts"];

/// Hand-written service files that cleanup never touches
pub const PRESERVED_SERVICES: &[&str] = &["product.ts", "auth.ts", "database.service.ts"];

/// Whether to run in dry-run mode by default
pub const DRY_RUN: bool = false;

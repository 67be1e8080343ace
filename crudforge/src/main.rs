//! CLI entry point for crudforge

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crudforge::codegen::{NamingBundle, TypeResolver};
use crudforge::config::CodegenConfig;
use crudforge::schema::{self, TableRef};
use crudforge::{CleanupRequest, GenerationRequest, Orchestrator};

#[derive(Parser)]
#[command(name = "crudforge")]
#[command(about = "Generate Angular CRUD screens from table metadata")]
#[command(version)]
struct Cli {
    /// Path to configuration file (TOML format)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Path to SQL DDL schema file (overrides config)
    #[arg(short, long, global = true, conflicts_with = "catalog")]
    schema: Option<PathBuf>,

    /// Path to JSON table catalog (overrides config)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate artifacts and navigation entries for tables
    Generate {
        /// Table identifiers, e.g. `dbo.Order_Items` (default: all tables)
        tables: Vec<String>,

        /// Angular app root (overrides config)
        #[arg(long)]
        base: Option<PathBuf>,

        /// Also generate backend entities
        #[arg(long)]
        backend: bool,

        /// Skip the Angular artifacts
        #[arg(long)]
        no_frontend: bool,

        /// Backend entity directory (overrides config, implies --backend)
        #[arg(long)]
        backend_out: Option<PathBuf>,

        /// Render without writing files or patching navigation
        #[arg(long)]
        dry_run: bool,

        /// Exit with failure when any table or file reported an error
        #[arg(long)]
        strict: bool,
    },
    /// Remove generated artifacts and their navigation entries
    Cleanup {
        /// Angular app root (overrides config)
        #[arg(long)]
        base: Option<PathBuf>,

        /// Backend entity directory (overrides config)
        #[arg(long)]
        backend_out: Option<PathBuf>,
    },
    /// Inspect schema (show tables, type mappings and derived names)
    Inspect {
        /// Tables to show (default: all tables)
        tables: Vec<String>,
    },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Load configuration first (before logging, so we can use config.log_level)
    let mut config = CodegenConfig::load(cli.config.as_deref())?;

    // Initialize logging
    // Priority: RUST_LOG env var > config.log_level > default (debug for dev, info for release)
    let default_level = if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    };
    let log_level = config.log_level.as_deref().unwrap_or(default_level);

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)),
        )
        .init();

    // Apply CLI overrides
    if let Some(schema) = cli.schema {
        config.schema_file = Some(schema);
        config.catalog_file = None;
    }
    if let Some(catalog) = cli.catalog {
        config.catalog_file = Some(catalog);
        config.schema_file = None;
    }

    match cli.command {
        Commands::Generate {
            tables,
            base,
            backend,
            no_frontend,
            backend_out,
            dry_run,
            strict,
        } => {
            if let Some(base) = base {
                config.output_base_path = base;
            }
            if let Some(dir) = backend_out.clone() {
                config.backend_output_path = Some(dir);
            }
            config.dry_run |= dry_run;

            let orchestrator = Orchestrator::from_config(config.clone())?;
            let tables = if tables.is_empty() {
                all_tables(&orchestrator)?
            } else {
                tables
            };

            let mut request = GenerationRequest::from_config(&config, &tables);
            request.generate_frontend = !no_frontend;
            request.generate_backend = backend || backend_out.is_some();

            info!("Generating code for {} table(s)", tables.len());
            let result = orchestrator.generate(&request);
            print_json(&result)?;

            let ok = if strict {
                result.is_complete()
            } else {
                result.success
            };
            Ok(exit_code(ok))
        }
        Commands::Cleanup { base, backend_out } => {
            if let Some(base) = base {
                config.output_base_path = base;
            }
            if let Some(dir) = backend_out {
                config.backend_output_path = Some(dir);
            }

            let orchestrator = Orchestrator::from_config(config.clone())?;
            let result = orchestrator.cleanup(&CleanupRequest::from_config(&config));
            print_json(&result)?;
            Ok(exit_code(result.success))
        }
        Commands::Inspect { tables } => {
            config.validate()?;
            inspect_schema(&config, tables)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn all_tables(orchestrator: &Orchestrator) -> Result<Vec<String>> {
    Ok(orchestrator
        .source()
        .list_tables()?
        .into_iter()
        .map(|t| t.to_string())
        .collect())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize result")?;
    println!("{}", json);
    Ok(())
}

fn exit_code(ok: bool) -> ExitCode {
    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn inspect_schema(config: &CodegenConfig, tables: Vec<String>) -> Result<()> {
    let source = schema::source_from_config(config)?;
    let refs = if tables.is_empty() {
        source.list_tables()?
    } else {
        tables
            .iter()
            .map(|t| TableRef::parse(t, &config.default_schema))
            .collect::<crudforge::Result<Vec<_>>>()?
    };

    println!("Found {} tables:\n", refs.len());
    for table_ref in &refs {
        let table = source.table_schema(&table_ref.name, &table_ref.schema)?;
        let naming = NamingBundle::derive(&table.name)?;

        println!("Table: {}", table.qualified_name());
        println!(
            "  Names: {} / {} / {} / {} ({})",
            naming.singular_pascal,
            naming.singular_camel,
            naming.plural_camel,
            naming.plural_kebab,
            naming.display_name
        );
        if table.columns.is_empty() {
            println!("  (no columns, table will be skipped)\n");
            continue;
        }

        println!("  Columns:");
        for col in &table.columns {
            let nullable = if col.nullable { "NULL" } else { "NOT NULL" };
            let key = if col.is_primary_key { " PK" } else { "" };
            let identity = if col.is_identity { " IDENTITY" } else { "" };
            let length = col
                .max_length
                .map(|n| format!("({})", n))
                .unwrap_or_default();
            println!(
                "    - {} {}{} {}{}{} -> {} / {}",
                col.name,
                col.raw_type,
                length,
                nullable,
                key,
                identity,
                TypeResolver::resolve(col),
                TypeResolver::wire_type(col).ts_type()
            );
            if let (Some(table), Some(column)) = (&col.referenced_table, &col.referenced_column) {
                println!("      references {}.{}", table, column);
            }
        }
        println!();
    }

    Ok(())
}

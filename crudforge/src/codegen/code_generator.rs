//! Main code generator: table metadata in, generated file records out

use std::path::Path;

use tracing::debug;

use crate::error::{CodegenError, Result};
use crate::schema::Table;

use super::artifact::{assemble_entity, assemble_frontend, GeneratedFile, RenderedArtifacts};
use super::context::TemplateContext;
use super::entity_generator::generate_entity;
use super::form_generator::{generate_form_component, generate_form_html};
use super::list_generator::{generate_list_component, generate_list_html};
use super::model_generator::generate_model;
use super::naming::NamingBundle;
use super::service_generator::generate_service;
use super::style_generator::{generate_form_css, generate_list_css};

/// Render the eight front-end bodies for a table
pub fn render_frontend(table: &Table, naming: &NamingBundle) -> RenderedArtifacts {
    let ctx = TemplateContext::new(table, naming);

    RenderedArtifacts {
        model: generate_model(&ctx),
        service: generate_service(&ctx),
        list_component: generate_list_component(&ctx),
        list_html: generate_list_html(&ctx),
        list_css: generate_list_css(),
        form_component: generate_form_component(&ctx),
        form_html: generate_form_html(&ctx),
        form_css: generate_form_css(),
    }
}

/// Reject tables that cannot produce artifacts
pub fn ensure_generatable(table: &Table) -> Result<()> {
    if table.columns.is_empty() {
        return Err(CodegenError::SchemaError(format!(
            "No columns found for table {}",
            table.qualified_name()
        )));
    }
    Ok(())
}

/// Renders and assembles artifacts for one table at a time
pub struct CodeGenerator<'a> {
    backend_namespace: &'a str,
}

impl<'a> CodeGenerator<'a> {
    /// Create a new code generator; entities land in `backend_namespace`
    pub fn new(backend_namespace: &'a str) -> Self {
        Self { backend_namespace }
    }

    /// Model, service, list and form files under `base`
    pub fn frontend_files(
        &self,
        table: &Table,
        naming: &NamingBundle,
        base: &Path,
    ) -> Result<Vec<GeneratedFile>> {
        ensure_generatable(table)?;
        let files = assemble_frontend(base, naming, render_frontend(table, naming));
        debug!(
            "Rendered {} front-end files for {}",
            files.len(),
            table.qualified_name()
        );
        Ok(files)
    }

    /// The backend entity under `backend`
    pub fn entity_file(
        &self,
        table: &Table,
        naming: &NamingBundle,
        backend: &Path,
    ) -> Result<GeneratedFile> {
        ensure_generatable(table)?;
        let ctx = TemplateContext::new(table, naming);
        Ok(assemble_entity(
            backend,
            naming,
            generate_entity(&ctx, self.backend_namespace),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::context::fixtures;

    #[test]
    fn test_render_is_pure() {
        let table = fixtures::order_items();
        let naming = NamingBundle::derive(&table.name).unwrap();
        assert_eq!(render_frontend(&table, &naming), render_frontend(&table, &naming));
    }

    #[test]
    fn test_empty_table_is_a_schema_error() {
        let table = Table {
            schema: "sales".into(),
            name: "Ghosts".into(),
            columns: Vec::new(),
        };
        let naming = NamingBundle::derive(&table.name).unwrap();
        let err = CodeGenerator::new("App.Models")
            .frontend_files(&table, &naming, Path::new("app"))
            .unwrap_err();
        assert!(matches!(err, CodegenError::SchemaError(_)));
        assert_eq!(err.to_string(), "No columns found for table sales.Ghosts");
    }

    #[test]
    fn test_frontend_and_entity_files() {
        let table = fixtures::order_items();
        let naming = NamingBundle::derive(&table.name).unwrap();
        let generator = CodeGenerator::new("App.Models");

        let files = generator
            .frontend_files(&table, &naming, Path::new("app"))
            .unwrap();
        assert_eq!(files.len(), 8);
        assert!(files[0].content.contains("unitPrice: number;"));

        let entity = generator
            .entity_file(&table, &naming, Path::new("api"))
            .unwrap();
        assert!(entity.content.contains("namespace App.Models"));
    }
}

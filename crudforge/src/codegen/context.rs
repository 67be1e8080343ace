//! Per-table values shared by every template

use crate::schema::{Column, Table};

use super::naming::{to_column_label, to_property_name, NamingBundle};
use super::type_resolver::{TargetType, TypeResolver, WireType};

/// Primary key property used when a table has no detectable key
pub const FALLBACK_KEY_PROPERTY: &str = "id";

/// One column, resolved for rendering
#[derive(Debug, Clone)]
pub struct Field<'a> {
    pub column: &'a Column,
    /// `unitPrice`
    pub property: String,
    /// `Unit Price`
    pub label: String,
    pub target: TargetType,
    pub wire: WireType,
}

impl Field<'_> {
    /// Optional in the front-end model
    pub fn is_optional(&self) -> bool {
        self.column.nullable && !self.column.is_primary_key
    }

    pub fn is_required(&self) -> bool {
        !self.column.nullable
    }

    /// Lowercased column name for the name heuristics
    pub fn lower_name(&self) -> String {
        self.column.name.to_lowercase()
    }
}

/// Everything a template needs, computed once per table
#[derive(Debug, Clone)]
pub struct TemplateContext<'a> {
    pub table: &'a Table,
    pub naming: &'a NamingBundle,
    pub fields: Vec<Field<'a>>,
    /// Key property name, `id` when the table has no primary key
    pub key_property: String,
    /// TypeScript type of the key, `number` when the table has no primary key
    pub key_type: &'static str,
}

impl<'a> TemplateContext<'a> {
    pub fn new(table: &'a Table, naming: &'a NamingBundle) -> Self {
        let fields: Vec<Field<'a>> = table
            .columns
            .iter()
            .map(|column| Field {
                column,
                property: to_property_name(&column.name),
                label: to_column_label(&column.name),
                target: TypeResolver::resolve(column),
                wire: TypeResolver::wire_type(column),
            })
            .collect();

        let key = table
            .primary_key()
            .and_then(|pk| fields.iter().find(|f| std::ptr::eq(f.column, pk)));
        let key_property = key
            .map(|f| f.property.clone())
            .unwrap_or_else(|| FALLBACK_KEY_PROPERTY.to_string());
        let key_type = key
            .map(|f| f.wire.ts_type())
            .unwrap_or(WireType::Number.ts_type());

        Self {
            table,
            naming,
            fields,
            key_property,
            key_type,
        }
    }

    /// Columns that get a form control (identity columns are server-assigned)
    pub fn editable_fields(&self) -> impl Iterator<Item = &Field<'a>> {
        self.fields.iter().filter(|f| !f.column.is_identity)
    }

    /// Columns matched by the service's free-text search
    pub fn searchable_fields(&self) -> impl Iterator<Item = &Field<'a>> {
        self.fields.iter().filter(|f| f.wire == WireType::String)
    }

    /// Columns shown in the list table
    pub fn display_fields(&self) -> impl Iterator<Item = &Field<'a>> {
        self.fields.iter().take(LIST_COLUMN_LIMIT)
    }
}

/// The list view shows only the leading columns
pub const LIST_COLUMN_LIMIT: usize = 5;


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_detection() {
        let table = fixtures::order_items();
        let naming = NamingBundle::derive(&table.name).unwrap();
        let ctx = TemplateContext::new(&table, &naming);
        assert_eq!(ctx.key_property, "id");
        assert_eq!(ctx.key_type, "number");
        assert_eq!(ctx.editable_fields().count(), 3);
        assert_eq!(ctx.searchable_fields().count(), 1);
    }

    #[test]
    fn test_key_fallback() {
        let table = Table {
            schema: "dbo".into(),
            name: "Tags".into(),
            columns: vec![Column::new("Code", "uniqueidentifier"), Column::new("Label", "nvarchar")],
        };
        let naming = NamingBundle::derive(&table.name).unwrap();
        let ctx = TemplateContext::new(&table, &naming);
        assert_eq!(ctx.key_property, FALLBACK_KEY_PROPERTY);
        assert_eq!(ctx.key_type, "number");
    }

    #[test]
    fn test_key_is_first_primary_key_column() {
        let mut code = Column::new("Code", "uniqueidentifier");
        code.is_primary_key = true;
        let mut line = Column::new("LineNo", "int");
        line.is_primary_key = true;
        let table = Table {
            schema: "dbo".into(),
            name: "Tags".into(),
            columns: vec![Column::new("Label", "nvarchar"), code, line],
        };
        let naming = NamingBundle::derive(&table.name).unwrap();
        let ctx = TemplateContext::new(&table, &naming);
        assert_eq!(ctx.key_property, "code");
        assert_eq!(ctx.key_type, "string");
    }

    #[test]
    fn test_display_fields_are_capped() {
        let table = Table {
            schema: "dbo".into(),
            name: "Wide".into(),
            columns: (0..8).map(|i| Column::new(format!("C{}", i), "int")).collect(),
        };
        let naming = NamingBundle::derive(&table.name).unwrap();
        let ctx = TemplateContext::new(&table, &naming);
        assert_eq!(ctx.display_fields().count(), LIST_COLUMN_LIMIT);
    }
}

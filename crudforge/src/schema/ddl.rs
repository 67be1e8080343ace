//! Schema source backed by `CREATE TABLE` DDL, parsed with sqlparser-rs

use std::path::Path;

use sqlparser::ast::{
    ColumnOption, Expr, ForeignKeyConstraint, Ident, IndexColumn, ObjectName,
    PrimaryKeyConstraint, Statement, TableConstraint,
};
use sqlparser::dialect::dialect_from_str;
use sqlparser::parser::Parser;
use tracing::{debug, info};

use super::{CatalogSchemaSource, Column, SchemaSource, Table, TableRef};
use crate::error::{CodegenError, Result};

/// Tables parsed from a DDL script
#[derive(Debug, Clone)]
pub struct DdlSchemaSource {
    catalog: CatalogSchemaSource,
}

impl DdlSchemaSource {
    /// Parse a DDL script; unqualified tables land in `default_schema`
    pub fn parse(sql: &str, dialect: &str, default_schema: &str) -> Result<Self> {
        let tables = parse_schema(sql, dialect, default_schema)?;
        Ok(Self {
            catalog: CatalogSchemaSource::new(tables),
        })
    }

    pub fn from_file(path: &Path, dialect: &str, default_schema: &str) -> Result<Self> {
        info!("Parsing schema: {}", path.display());
        let sql = std::fs::read_to_string(path).map_err(|e| CodegenError::io(path, e))?;
        Self::parse(&sql, dialect, default_schema)
    }
}

impl SchemaSource for DdlSchemaSource {
    fn table_schema(&self, name: &str, schema: &str) -> Result<Table> {
        self.catalog.table_schema(name, schema)
    }

    fn list_tables(&self) -> Result<Vec<TableRef>> {
        self.catalog.list_tables()
    }
}

/// Parse a SQL schema string into tables
pub fn parse_schema(sql: &str, dialect: &str, default_schema: &str) -> Result<Vec<Table>> {
    let dialect = dialect_from_str(dialect).ok_or_else(|| {
        CodegenError::ConfigError(format!("Unknown SQL dialect: {}", dialect))
    })?;
    let statements = Parser::parse_sql(dialect.as_ref(), sql)?;

    let mut tables = Vec::new();

    for stmt in statements {
        if let Statement::CreateTable(create_table) = stmt {
            let table = extract_table(&create_table, default_schema);
            debug!(
                "Parsed table {} with {} columns",
                table.qualified_name(),
                table.columns.len()
            );
            tables.push(table);
        }
    }

    Ok(tables)
}

/// Extract table metadata from a CREATE TABLE statement
fn extract_table(create: &sqlparser::ast::CreateTable, default_schema: &str) -> Table {
    let (schema, name) = extract_table_name(&create.name, default_schema);

    let mut columns: Vec<Column> = create.columns.iter().map(extract_column).collect();

    // Table-level constraints
    for constraint in &create.constraints {
        match constraint {
            TableConstraint::PrimaryKey(PrimaryKeyConstraint {
                columns: pk_cols, ..
            }) => {
                for pk_col in pk_cols {
                    let col_name = extract_ident_from_index_column(pk_col);
                    if let Some(col) = columns.iter_mut().find(|c| c.name == col_name) {
                        col.is_primary_key = true;
                        col.nullable = false;
                    }
                }
            }
            TableConstraint::ForeignKey(ForeignKeyConstraint {
                columns: fk_cols,
                foreign_table,
                referred_columns,
                ..
            }) => {
                let (_, referenced_table) = extract_table_name(foreign_table, default_schema);
                for (col, ref_col) in fk_cols.iter().zip(referred_columns.iter()) {
                    let col_name = extract_ident(col);
                    if let Some(column) = columns.iter_mut().find(|c| c.name == col_name) {
                        column.is_foreign_key = true;
                        column.referenced_table = Some(referenced_table.clone());
                        column.referenced_column = Some(extract_ident(ref_col));
                    }
                }
            }
            _ => {}
        }
    }

    Table {
        schema,
        name,
        columns,
    }
}

/// Extract column metadata from a column definition
fn extract_column(col_def: &sqlparser::ast::ColumnDef) -> Column {
    let (raw_type, max_length) = split_data_type(&col_def.data_type.to_string());
    let mut column = Column::new(extract_ident(&col_def.name), raw_type);
    column.max_length = max_length;
    column.nullable = true; // Default to nullable

    for option in &col_def.options {
        match &option.option {
            ColumnOption::NotNull => {
                column.nullable = false;
            }
            ColumnOption::Null => {
                column.nullable = true;
            }
            ColumnOption::PrimaryKey(_) => {
                column.is_primary_key = true;
                column.nullable = false;
            }
            ColumnOption::ForeignKey(ForeignKeyConstraint {
                foreign_table,
                referred_columns,
                ..
            }) => {
                let (_, referenced_table) = extract_table_name(foreign_table, "");
                column.is_foreign_key = true;
                column.referenced_table = Some(referenced_table);
                column.referenced_column = referred_columns.first().map(extract_ident);
            }
            ColumnOption::DialectSpecific(tokens) => {
                // MySQL AUTO_INCREMENT arrives as raw tokens
                let token_str = tokens
                    .iter()
                    .map(|t| t.to_string())
                    .collect::<Vec<_>>()
                    .join(" ")
                    .to_uppercase();
                if token_str.contains("AUTO_INCREMENT") || token_str.contains("IDENTITY") {
                    column.is_identity = true;
                }
            }
            other => {
                // SQL Server IDENTITY(seed, step) and AUTOINCREMENT variants
                let text = other.to_string().to_uppercase();
                if text.starts_with("IDENTITY") || text.contains("AUTO_INCREMENT") {
                    column.is_identity = true;
                }
            }
        }
    }

    column
}

/// Split `NVARCHAR(50)` into (`nvarchar`, Some(50)).
///
/// Lengths are only kept for character types; `MAX` means unbounded.
fn split_data_type(data_type: &str) -> (String, Option<u32>) {
    let lower = data_type.to_lowercase();
    let (base, args) = match lower.split_once('(') {
        Some((base, rest)) => (base.trim(), rest.split(')').next().unwrap_or("")),
        None => (lower.trim(), ""),
    };
    let base = base.trim_end_matches(" unsigned").trim().to_string();

    let max_length = if base.contains("char") {
        args.trim().parse::<u32>().ok()
    } else {
        None
    };

    (base, max_length)
}

/// Split an ObjectName into (schema, table)
fn extract_table_name(name: &ObjectName, default_schema: &str) -> (String, String) {
    let parts: Vec<String> = name
        .0
        .iter()
        .filter_map(|part| part.as_ident())
        .map(|ident| ident.value.clone())
        .collect();

    match parts.as_slice() {
        [.., schema, table] => (schema.clone(), table.clone()),
        [table] => (default_schema.to_string(), table.clone()),
        [] => (default_schema.to_string(), String::new()),
    }
}

/// Extract a string from an Ident, removing quoting if present
fn extract_ident(ident: &Ident) -> String {
    ident.value.clone()
}

/// Extract a column name string from an IndexColumn
fn extract_ident_from_index_column(ic: &IndexColumn) -> String {
    match &ic.column.expr {
        Expr::Identifier(ident) => ident.value.clone(),
        other => format!("{}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mysql_table() {
        let sql = r#"
            CREATE TABLE order_items (
                id BIGINT AUTO_INCREMENT PRIMARY KEY,
                sku VARCHAR(50) NOT NULL,
                note TEXT,
                unit_price DECIMAL(10,2) NOT NULL
            );
        "#;

        let tables = parse_schema(sql, "mysql", "dbo").unwrap();
        assert_eq!(tables.len(), 1);
        let table = &tables[0];
        assert_eq!(table.schema, "dbo");
        assert_eq!(table.name, "order_items");

        let id = table.get_column("id").unwrap();
        assert!(id.is_primary_key);
        assert!(id.is_identity);
        assert!(!id.nullable);

        let sku = table.get_column("sku").unwrap();
        assert_eq!(sku.raw_type, "varchar");
        assert_eq!(sku.max_length, Some(50));
        assert!(!sku.nullable);

        let note = table.get_column("note").unwrap();
        assert!(note.nullable);
        assert_eq!(note.max_length, None);

        let price = table.get_column("unit_price").unwrap();
        assert_eq!(price.raw_type, "decimal");
        assert_eq!(price.max_length, None);
    }

    #[test]
    fn test_parse_mssql_qualified_table() {
        let sql = r#"
            CREATE TABLE [sales].[Order_Items] (
                [Id] INT IDENTITY(1,1) NOT NULL,
                [Sku] NVARCHAR(50) NOT NULL,
                [Notes] NVARCHAR(MAX) NULL,
                CONSTRAINT PK_Order_Items PRIMARY KEY ([Id])
            );
        "#;

        let tables = parse_schema(sql, "mssql", "dbo").unwrap();
        let table = &tables[0];
        assert_eq!(table.schema, "sales");
        assert_eq!(table.name, "Order_Items");

        let id = table.get_column("Id").unwrap();
        assert!(id.is_primary_key);
        assert!(id.is_identity);

        let notes = table.get_column("Notes").unwrap();
        assert_eq!(notes.raw_type, "nvarchar");
        assert_eq!(notes.max_length, None);
    }

    #[test]
    fn test_parse_foreign_key() {
        let sql = r#"
            CREATE TABLE orders (
                id BIGINT PRIMARY KEY,
                customer_id BIGINT NOT NULL,
                FOREIGN KEY (customer_id) REFERENCES customers(id)
            );
        "#;

        let tables = parse_schema(sql, "mysql", "dbo").unwrap();
        let fk = tables[0].get_column("customer_id").unwrap();
        assert!(fk.is_foreign_key);
        assert_eq!(fk.referenced_table.as_deref(), Some("customers"));
        assert_eq!(fk.referenced_column.as_deref(), Some("id"));
    }

    #[test]
    fn test_parse_inline_foreign_key() {
        let sql = r#"
            CREATE TABLE orders (
                id INT PRIMARY KEY,
                customer_id INT REFERENCES sales.customers(id),
                note VARCHAR(20)
            );
        "#;

        let tables = parse_schema(sql, "generic", "dbo").unwrap();
        let table = &tables[0];

        let fk = table.get_column("customer_id").unwrap();
        assert!(fk.is_foreign_key);
        assert!(fk.nullable);
        assert_eq!(fk.referenced_table.as_deref(), Some("customers"));
        assert_eq!(fk.referenced_column.as_deref(), Some("id"));

        let note = table.get_column("note").unwrap();
        assert!(!note.is_foreign_key);
        assert_eq!(note.referenced_table, None);
    }

    #[test]
    fn test_parse_mssql_inline_foreign_key() {
        let sql = r#"
            CREATE TABLE [dbo].[Orders] (
                [Id] INT IDENTITY(1,1) NOT NULL PRIMARY KEY,
                [CustomerId] INT NOT NULL REFERENCES [dbo].[Customers]([Id])
            );
        "#;

        let tables = parse_schema(sql, "mssql", "dbo").unwrap();
        let fk = tables[0].get_column("CustomerId").unwrap();
        assert!(fk.is_foreign_key);
        assert!(!fk.nullable);
        assert_eq!(fk.referenced_table.as_deref(), Some("Customers"));
        assert_eq!(fk.referenced_column.as_deref(), Some("Id"));
    }

    #[test]
    fn test_unknown_dialect() {
        assert!(parse_schema("CREATE TABLE t (id INT);", "cobol", "dbo").is_err());
    }

    #[test]
    fn test_split_data_type() {
        assert_eq!(split_data_type("VARCHAR(255)"), ("varchar".into(), Some(255)));
        assert_eq!(split_data_type("NVARCHAR(MAX)"), ("nvarchar".into(), None));
        assert_eq!(split_data_type("DECIMAL(18,2)"), ("decimal".into(), None));
        assert_eq!(split_data_type("INT UNSIGNED"), ("int".into(), None));
        assert_eq!(split_data_type("DATETIME"), ("datetime".into(), None));
    }

    #[test]
    fn test_source_lookup() {
        let sql = "CREATE TABLE Products (Id INT PRIMARY KEY, Name VARCHAR(100) NOT NULL);";
        let source = DdlSchemaSource::parse(sql, "generic", "dbo").unwrap();
        let table = source.table_schema("products", "dbo").unwrap();
        assert_eq!(table.columns.len(), 2);
        assert_eq!(source.list_tables().unwrap().len(), 1);
    }
}

//! Metadata structures handed over by a schema source

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CodegenError, Result};

/// Metadata for a database table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    /// Owning schema (e.g. `dbo`)
    pub schema: String,

    /// Table name as stored in the catalog
    pub name: String,

    /// Columns in ordinal order
    #[serde(default)]
    pub columns: Vec<Column>,
}

/// Metadata for a column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    /// Column name
    pub name: String,

    /// Base data type without arguments (e.g. `varchar`, `decimal`)
    pub raw_type: String,

    #[serde(default)]
    pub nullable: bool,

    #[serde(default)]
    pub is_primary_key: bool,

    /// Identity / auto-increment column
    #[serde(default)]
    pub is_identity: bool,

    /// Character length for bounded textual columns
    #[serde(default)]
    pub max_length: Option<u32>,

    #[serde(default)]
    pub is_foreign_key: bool,

    #[serde(default)]
    pub referenced_table: Option<String>,

    #[serde(default)]
    pub referenced_column: Option<String>,
}

impl Table {
    /// Get a column by name
    pub fn get_column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// First primary key column, if the table has one
    pub fn primary_key(&self) -> Option<&Column> {
        self.columns.iter().find(|c| c.is_primary_key)
    }

    /// `schema.name`
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.schema, self.name)
    }
}

impl Column {
    /// Convenience constructor for a non-nullable, non-key column
    pub fn new(name: impl Into<String>, raw_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            raw_type: raw_type.into(),
            nullable: false,
            is_primary_key: false,
            is_identity: false,
            max_length: None,
            is_foreign_key: false,
            referenced_table: None,
            referenced_column: None,
        }
    }
}

/// A possibly schema-qualified table identifier, e.g. `sales.Order_Items`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TableRef {
    pub schema: String,
    pub name: String,
}

impl TableRef {
    pub fn new(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            name: name.into(),
        }
    }

    /// Parse `table`, `schema.table` or `[schema].[table]`.
    ///
    /// Unqualified identifiers get `default_schema`.
    pub fn parse(identifier: &str, default_schema: &str) -> Result<Self> {
        let parts: Vec<&str> = identifier
            .trim()
            .split('.')
            .map(strip_quoting)
            .collect();

        let (schema, name) = match parts.as_slice() {
            [name] => (default_schema, *name),
            [.., schema, name] => (*schema, *name),
            [] => (default_schema, ""),
        };

        if name.is_empty() {
            return Err(CodegenError::InvalidTableName(identifier.to_string()));
        }
        let schema = if schema.is_empty() {
            default_schema
        } else {
            schema
        };

        Ok(Self::new(schema, name))
    }
}

impl fmt::Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.schema, self.name)
    }
}

/// Remove `[...]`, `"..."` and backtick quoting around an identifier part
fn strip_quoting(part: &str) -> &str {
    part.trim()
        .trim_start_matches(['[', '"', '`'])
        .trim_end_matches([']', '"', '`'])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_unqualified() {
        let r = TableRef::parse("Order_Items", "dbo").unwrap();
        assert_eq!(r, TableRef::new("dbo", "Order_Items"));
    }

    #[test]
    fn test_parse_qualified() {
        let r = TableRef::parse("sales.Orders", "dbo").unwrap();
        assert_eq!(r.schema, "sales");
        assert_eq!(r.name, "Orders");

        let r = TableRef::parse("[sales].[Order Lines]", "dbo").unwrap();
        assert_eq!(r.to_string(), "sales.Order Lines");
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert!(TableRef::parse("", "dbo").is_err());
        assert!(TableRef::parse("dbo.", "dbo").is_err());
    }

    #[test]
    fn test_table_helpers() {
        let mut id = Column::new("Id", "int");
        id.is_primary_key = true;
        id.is_identity = true;
        let table = Table {
            schema: "dbo".into(),
            name: "Products".into(),
            columns: vec![id, Column::new("Name", "nvarchar")],
        };
        assert_eq!(table.primary_key().map(|c| c.name.as_str()), Some("Id"));
        assert_eq!(table.qualified_name(), "dbo.Products");
        assert!(table.get_column("Name").is_some());
    }

    #[test]
    fn test_column_json_shape() {
        let json = r#"{"name":"Sku","rawType":"varchar","maxLength":50}"#;
        let col: Column = serde_json::from_str(json).unwrap();
        assert_eq!(col.raw_type, "varchar");
        assert_eq!(col.max_length, Some(50));
        assert!(!col.nullable);
    }
}

//! Introspected table schemas
//!
//! Relational and wide-column operations discover the target's column names
//! and types at runtime, once per operation. The discovered [`TableSchema`]
//! drives type-aware literal formatting and, for the wide-column store, the
//! keyed-delete pre-pass. The document store has no fixed schema and never
//! produces one of these.

use serde::{Deserialize, Serialize};

/// Coarse field classification driving quoting decisions
///
/// Only the Integer/other distinction matters when rendering literals:
/// integers are emitted bare, everything else is single-quoted. Types the
/// backend reports that we do not recognize fall through to [`FieldType::Opaque`],
/// which quotes like text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Integer,
    Text,
    Opaque,
}

impl FieldType {
    /// Classify a MySQL `information_schema` data type name
    pub fn from_mysql(type_name: &str) -> Self {
        match type_name.to_ascii_lowercase().as_str() {
            "int" | "integer" | "bigint" | "smallint" | "mediumint" | "tinyint" => Self::Integer,
            "varchar" | "char" | "text" | "tinytext" | "mediumtext" | "longtext" => Self::Text,
            _ => Self::Opaque,
        }
    }

    /// Classify a CQL `system_schema` type name
    pub fn from_cql(type_name: &str) -> Self {
        match type_name.to_ascii_lowercase().as_str() {
            "int" | "bigint" | "smallint" | "tinyint" | "varint" | "counter" => Self::Integer,
            "text" | "varchar" | "ascii" => Self::Text,
            _ => Self::Opaque,
        }
    }

    /// Whether literals of this type are emitted without quotes
    pub fn is_bare(self) -> bool {
        matches!(self, Self::Integer)
    }
}

/// One introspected column: name plus coarse type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    pub field_type: FieldType,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
        }
    }
}

/// Ordered schema of one table, discovered fresh per operation
///
/// Field order follows the backend's declared column order. `partition_key`
/// is populated only by the wide-column introspector; the keyed delete needs
/// it to address rows.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableSchema {
    pub fields: Vec<FieldDef>,
    pub partition_key: Option<String>,
}

impl TableSchema {
    pub fn new(fields: Vec<FieldDef>) -> Self {
        Self {
            fields,
            partition_key: None,
        }
    }

    pub fn with_partition_key(mut self, key: impl Into<String>) -> Self {
        self.partition_key = Some(key.into());
        self
    }

    /// Look up a field's type; unknown fields quote like text
    pub fn field_type(&self, name: &str) -> FieldType {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.field_type)
            .unwrap_or(FieldType::Text)
    }

    /// Ordered field-name list, as rendered to schema-driven forms and used
    /// as result-set headers
    pub fn headers(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.name.clone()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // Type Classification Tests
    // =========================================================================

    #[test]
    fn test_mysql_integer_types() {
        assert_eq!(FieldType::from_mysql("int"), FieldType::Integer);
        assert_eq!(FieldType::from_mysql("INT"), FieldType::Integer);
        assert_eq!(FieldType::from_mysql("bigint"), FieldType::Integer);
        assert_eq!(FieldType::from_mysql("tinyint"), FieldType::Integer);
    }

    #[test]
    fn test_mysql_text_types() {
        assert_eq!(FieldType::from_mysql("varchar"), FieldType::Text);
        assert_eq!(FieldType::from_mysql("text"), FieldType::Text);
        assert_eq!(FieldType::from_mysql("longtext"), FieldType::Text);
    }

    #[test]
    fn test_mysql_unrecognized_is_opaque() {
        assert_eq!(FieldType::from_mysql("decimal"), FieldType::Opaque);
        assert_eq!(FieldType::from_mysql("datetime"), FieldType::Opaque);
        assert_eq!(FieldType::from_mysql("geometry"), FieldType::Opaque);
    }

    #[test]
    fn test_cql_types() {
        assert_eq!(FieldType::from_cql("int"), FieldType::Integer);
        assert_eq!(FieldType::from_cql("varint"), FieldType::Integer);
        assert_eq!(FieldType::from_cql("text"), FieldType::Text);
        assert_eq!(FieldType::from_cql("ascii"), FieldType::Text);
        assert_eq!(FieldType::from_cql("uuid"), FieldType::Opaque);
    }

    #[test]
    fn test_only_integer_is_bare() {
        assert!(FieldType::Integer.is_bare());
        assert!(!FieldType::Text.is_bare());
        assert!(!FieldType::Opaque.is_bare());
    }

    // =========================================================================
    // TableSchema Tests
    // =========================================================================

    fn sample_schema() -> TableSchema {
        TableSchema::new(vec![
            FieldDef::new("id", FieldType::Integer),
            FieldDef::new("name", FieldType::Text),
            FieldDef::new("created", FieldType::Opaque),
        ])
    }

    #[test]
    fn test_field_type_lookup() {
        let schema = sample_schema();
        assert_eq!(schema.field_type("id"), FieldType::Integer);
        assert_eq!(schema.field_type("name"), FieldType::Text);
    }

    #[test]
    fn test_unknown_field_quotes_like_text() {
        let schema = sample_schema();
        assert_eq!(schema.field_type("nonexistent"), FieldType::Text);
    }

    #[test]
    fn test_headers_preserve_order() {
        let schema = sample_schema();
        assert_eq!(schema.headers(), vec!["id", "name", "created"]);
    }

    #[test]
    fn test_partition_key() {
        let schema = sample_schema().with_partition_key("id");
        assert_eq!(schema.partition_key.as_deref(), Some("id"));
    }
}

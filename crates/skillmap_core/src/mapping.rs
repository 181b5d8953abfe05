//! Declarative source mappings for domain records.
//!
//! # Responsibility
//! - Describe which table and columns back a record type.
//! - Describe which JSON document and root pointer expose the same record.
//!
//! # Invariants
//! - Mappings are compile-time constants; repositories and sources read
//!   table/column names from here instead of hard-coding them.
//! - A JSON root is either empty (whole document) or a JSON pointer.

use crate::model::employee::Employee;
use crate::model::skills::Skills;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Identifier column that doubles as a foreign key to the owning record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoinColumn {
    pub name: &'static str,
    pub nullable: bool,
    pub updatable: bool,
}

/// Relational table backing a record type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableMapping {
    pub name: &'static str,
    pub id_column: JoinColumn,
    /// All mapped columns, identifier first.
    pub columns: &'static [&'static str],
}

impl TableMapping {
    /// Renders `SELECT <columns> FROM <table>`.
    pub fn select_sql(&self) -> String {
        format!("SELECT {} FROM {}", self.columns.join(", "), self.name)
    }
}

/// Where a JSON endpoint is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Endpoint is a path relative to the configured base directory.
    File,
}

impl SourceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::File => "file",
        }
    }
}

/// JSON document exposing a record type as a virtual table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsonTableMapping {
    pub endpoint: &'static str,
    pub source: SourceKind,
    pub root: &'static str,
    pub root_is_array: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappingError {
    /// The record type declares no JSON table.
    NoJsonTable(&'static str),
    EmptyEndpoint,
    InvalidRoot(String),
}

impl Display for MappingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoJsonTable(table) => write!(f, "`{table}` has no json table mapping"),
            Self::EmptyEndpoint => write!(f, "json table endpoint cannot be empty"),
            Self::InvalidRoot(root) => {
                write!(f, "json table root `{root}` must be empty or start with `/`")
            }
        }
    }
}

impl Error for MappingError {}

impl JsonTableMapping {
    pub fn validate(&self) -> Result<(), MappingError> {
        if self.endpoint.trim().is_empty() {
            return Err(MappingError::EmptyEndpoint);
        }
        if !self.root.is_empty() && !self.root.starts_with('/') {
            return Err(MappingError::InvalidRoot(self.root.to_string()));
        }
        Ok(())
    }
}

/// Record types with a relational mapping and an optional JSON mapping.
pub trait MappedEntity {
    const TABLE: TableMapping;
    const JSON_TABLE: Option<JsonTableMapping>;
}

impl MappedEntity for Skills {
    const TABLE: TableMapping = TableMapping {
        name: "employee_skills",
        id_column: JoinColumn {
            name: "id",
            nullable: false,
            updatable: true,
        },
        columns: &["id", "type", "rating"],
    };
    const JSON_TABLE: Option<JsonTableMapping> = Some(JsonTableMapping {
        endpoint: "employee.json",
        source: SourceKind::File,
        root: "/skills",
        root_is_array: true,
    });
}

impl MappedEntity for Employee {
    const TABLE: TableMapping = TableMapping {
        name: "employees",
        id_column: JoinColumn {
            name: "id",
            nullable: false,
            updatable: false,
        },
        columns: &["id", "name"],
    };
    const JSON_TABLE: Option<JsonTableMapping> = None;
}

#[cfg(test)]
mod tests {
    use super::{JsonTableMapping, MappedEntity, MappingError, SourceKind};
    use crate::model::skills::Skills;

    #[test]
    fn skills_table_mapping_matches_schema() {
        let table = Skills::TABLE;
        assert_eq!(table.name, "employee_skills");
        assert_eq!(table.id_column.name, "id");
        assert!(!table.id_column.nullable);
        assert!(table.id_column.updatable);
        assert_eq!(
            table.select_sql(),
            "SELECT id, type, rating FROM employee_skills"
        );
    }

    #[test]
    fn skills_json_mapping_reads_skills_array_from_file() {
        let json = Skills::JSON_TABLE.expect("skills should have a json table");
        assert_eq!(json.endpoint, "employee.json");
        assert_eq!(json.source, SourceKind::File);
        assert_eq!(json.source.as_str(), "file");
        assert_eq!(json.root, "/skills");
        assert!(json.root_is_array);
        assert!(json.validate().is_ok());
    }

    #[test]
    fn validate_rejects_root_without_leading_slash() {
        let mapping = JsonTableMapping {
            endpoint: "employee.json",
            source: SourceKind::File,
            root: "skills",
            root_is_array: true,
        };
        assert_eq!(
            mapping.validate(),
            Err(MappingError::InvalidRoot("skills".to_string()))
        );
    }
}

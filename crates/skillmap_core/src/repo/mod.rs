//! Repository contracts and SQLite implementations for mapped records.
//!
//! # Responsibility
//! - Keep SQL details behind `EmployeeRepository` / `SkillsRepository`.
//! - Check at construction time that the connection schema matches the
//!   record's `TableMapping`.
//!
//! # Invariants
//! - Table and column names come from `MappedEntity::TABLE`.
//! - Semantic failures (`NotFound`, `MissingEmployee`) are reported separately
//!   from SQLite transport errors.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::mapping::TableMapping;
use crate::model::employee::{EmployeeId, EmployeeValidationError};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod employee_repo;
pub mod skills_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Errors from employee and skills persistence.
#[derive(Debug)]
pub enum RepoError {
    /// Underlying SQLite/bootstrap error, including constraint violations.
    Db(DbError),
    /// No row exists for this employee id.
    NotFound(EmployeeId),
    /// A skills record was written without its identifying employee.
    MissingEmployee,
    Validation(EmployeeValidationError),
    /// Connection schema is not at the migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "no row for employee id {id}"),
            Self::MissingEmployee => {
                write!(f, "skills record has no employee; column `id` is not nullable")
            }
            Self::Validation(err) => write!(f, "{err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "repository requires column `{column}` in table `{table}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<EmployeeValidationError> for RepoError {
    fn from(value: EmployeeValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Verifies that `conn` is migrated and carries every column `table` maps.
pub(crate) fn ensure_mapping_ready(conn: &Connection, table: &TableMapping) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let columns = table_columns(conn, table.name)?;
    if columns.is_empty() {
        return Err(RepoError::MissingRequiredTable(table.name));
    }
    for &column in table.columns {
        if !columns.iter().any(|existing| existing.as_str() == column) {
            return Err(RepoError::MissingRequiredColumn {
                table: table.name,
                column,
            });
        }
    }

    Ok(())
}

fn table_columns(conn: &Connection, table: &str) -> RepoResult<Vec<String>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>("name"))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(names)
}

//! Employee repository contract and SQLite implementation.
//!
//! # Invariants
//! - Writes call `Employee::validate()` first.
//! - Deleting an employee removes its `employee_skills` row through the
//!   foreign-key cascade.

use crate::mapping::MappedEntity;
use crate::model::employee::{Employee, EmployeeId};
use crate::repo::{ensure_mapping_ready, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};

/// Repository interface for the owning side of the skills relation.
pub trait EmployeeRepository {
    fn create_employee(&self, employee: &Employee) -> RepoResult<EmployeeId>;
    fn get_employee(&self, id: EmployeeId) -> RepoResult<Option<Employee>>;
    /// Overwrites the mutable columns (`name`) of an existing row.
    fn update_employee(&self, employee: &Employee) -> RepoResult<()>;
    fn list_employees(&self) -> RepoResult<Vec<Employee>>;
    fn delete_employee(&self, id: EmployeeId) -> RepoResult<()>;
}

/// SQLite-backed employee repository.
pub struct SqliteEmployeeRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEmployeeRepository<'conn> {
    /// Creates a repository after checking the `employees` mapping against
    /// the connection schema.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_mapping_ready(conn, &Employee::TABLE)?;
        Ok(Self { conn })
    }
}

impl EmployeeRepository for SqliteEmployeeRepository<'_> {
    fn create_employee(&self, employee: &Employee) -> RepoResult<EmployeeId> {
        employee.validate()?;

        self.conn.execute(
            "INSERT INTO employees (id, name) VALUES (?1, ?2);",
            params![employee.id, employee.name.as_deref()],
        )?;

        Ok(employee.id)
    }

    fn get_employee(&self, id: EmployeeId) -> RepoResult<Option<Employee>> {
        let sql = format!("{} WHERE id = ?1;", Employee::TABLE.select_sql());
        let employee = self
            .conn
            .query_row(&sql, [id], parse_employee_row)
            .optional()?;
        Ok(employee)
    }

    fn update_employee(&self, employee: &Employee) -> RepoResult<()> {
        employee.validate()?;

        let changed = self.conn.execute(
            "UPDATE employees SET name = ?1 WHERE id = ?2;",
            params![employee.name.as_deref(), employee.id],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(employee.id));
        }
        Ok(())
    }

    fn list_employees(&self) -> RepoResult<Vec<Employee>> {
        let sql = format!("{} ORDER BY id ASC;", Employee::TABLE.select_sql());
        let mut stmt = self.conn.prepare(&sql)?;
        let employees = stmt
            .query_map([], parse_employee_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(employees)
    }

    fn delete_employee(&self, id: EmployeeId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM employees WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }
}

fn parse_employee_row(row: &Row<'_>) -> rusqlite::Result<Employee> {
    Ok(Employee {
        id: row.get("id")?,
        name: row.get("name")?,
    })
}

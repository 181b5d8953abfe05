//! Skills repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist `Skills` records into `employee_skills`, keyed by employee id.
//! - Resolve the employee reference when reading rows back.
//!
//! # Invariants
//! - `id` is not nullable: saving a record without an employee fails with
//!   `RepoError::MissingEmployee` before any SQL runs.
//! - `id` is updatable: `reassign_skills` moves a row to another employee.
//! - Rows whose `id` has no `employees` row are never returned (inner join).

use crate::mapping::MappedEntity;
use crate::model::employee::{Employee, EmployeeId};
use crate::model::skills::{Skills, SkillsRecord};
use crate::repo::{ensure_mapping_ready, RepoError, RepoResult};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::sync::Arc;

/// Filter and pagination options for listing skills.
#[derive(Debug, Clone, Default)]
pub struct SkillsListQuery {
    /// Exact match on `type`.
    pub kind: Option<String>,
    /// Inclusive lower bound on `rating`.
    pub min_rating: Option<i32>,
    pub limit: Option<u32>,
    pub offset: u32,
}

/// Repository interface for skills persistence.
pub trait SkillsRepository {
    /// Inserts or replaces the row identified by the record's employee.
    fn save_skills(&self, skills: &Skills) -> RepoResult<EmployeeId>;
    fn get_skills(&self, employee_id: EmployeeId) -> RepoResult<Option<Skills>>;
    fn list_skills(&self, query: &SkillsListQuery) -> RepoResult<Vec<Skills>>;
    /// Moves the row of `from` to employee `to`.
    fn reassign_skills(&self, from: EmployeeId, to: EmployeeId) -> RepoResult<()>;
    fn delete_skills(&self, employee_id: EmployeeId) -> RepoResult<()>;
}

/// SQLite-backed skills repository.
pub struct SqliteSkillsRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSkillsRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_mapping_ready(conn, &Skills::TABLE)?;
        ensure_mapping_ready(conn, &Employee::TABLE)?;
        Ok(Self { conn })
    }

    fn skills_select_sql() -> String {
        let columns = Skills::TABLE
            .columns
            .iter()
            .map(|column| format!("s.{column}"))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "SELECT {columns}, e.name AS employee_name
             FROM {} s
             JOIN {} e ON e.id = s.{}",
            Skills::TABLE.name,
            Employee::TABLE.name,
            Skills::TABLE.id_column.name,
        )
    }
}

impl SkillsRepository for SqliteSkillsRepository<'_> {
    fn save_skills(&self, skills: &Skills) -> RepoResult<EmployeeId> {
        let employee = skills.employee().ok_or(RepoError::MissingEmployee)?;
        employee.validate()?;

        self.conn.execute(
            "INSERT INTO employee_skills (id, type, rating) VALUES (?1, ?2, ?3)
             ON CONFLICT (id) DO UPDATE SET
                type = excluded.type,
                rating = excluded.rating;",
            params![employee.id, skills.kind(), skills.rating()],
        )?;

        Ok(employee.id)
    }

    fn get_skills(&self, employee_id: EmployeeId) -> RepoResult<Option<Skills>> {
        let sql = format!("{} WHERE s.id = ?1;", Self::skills_select_sql());
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query([employee_id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_skills_row(row)?));
        }
        Ok(None)
    }

    fn list_skills(&self, query: &SkillsListQuery) -> RepoResult<Vec<Skills>> {
        let mut sql = format!("{} WHERE 1 = 1", Self::skills_select_sql());
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(kind) = &query.kind {
            sql.push_str(" AND s.type = ?");
            bind_values.push(Value::Text(kind.clone()));
        }
        if let Some(min_rating) = query.min_rating {
            sql.push_str(" AND s.rating >= ?");
            bind_values.push(Value::Integer(i64::from(min_rating)));
        }

        sql.push_str(" ORDER BY s.id ASC");

        match query.limit {
            Some(limit) => {
                sql.push_str(" LIMIT ? OFFSET ?");
                bind_values.push(Value::Integer(i64::from(limit)));
                bind_values.push(Value::Integer(i64::from(query.offset)));
            }
            None if query.offset > 0 => {
                sql.push_str(" LIMIT -1 OFFSET ?");
                bind_values.push(Value::Integer(i64::from(query.offset)));
            }
            None => {}
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut skills = Vec::new();

        while let Some(row) = rows.next()? {
            skills.push(parse_skills_row(row)?);
        }

        Ok(skills)
    }

    fn reassign_skills(&self, from: EmployeeId, to: EmployeeId) -> RepoResult<()> {
        Employee::new(to).validate()?;

        let changed = self.conn.execute(
            "UPDATE employee_skills SET id = ?1 WHERE id = ?2;",
            params![to, from],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(from));
        }
        Ok(())
    }

    fn delete_skills(&self, employee_id: EmployeeId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM employee_skills WHERE id = ?1;", [employee_id])?;
        if changed == 0 {
            return Err(RepoError::NotFound(employee_id));
        }
        Ok(())
    }
}

fn parse_skills_row(row: &Row<'_>) -> RepoResult<Skills> {
    let id: EmployeeId = row.get("id")?;
    let record = SkillsRecord {
        id: Some(id),
        kind: row.get("type")?,
        rating: row.get("rating")?,
    };
    let name: Option<String> = row.get("employee_name")?;

    let mut skills = Skills::from(record);
    skills.set_employee(Some(Arc::new(Employee { id, name })));
    Ok(skills)
}

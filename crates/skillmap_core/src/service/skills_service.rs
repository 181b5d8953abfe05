//! Skills use-case service.
//!
//! # Responsibility
//! - Copy records from the JSON virtual table into the relational table.
//! - Provide record/rate/lookup entry points for CLI callers.
//!
//! # Invariants
//! - The service never writes SQL; it goes through the repository traits.
//! - Employees referenced by imported records are created before their
//!   skills row, so the foreign key holds.
//! - An import is all-or-nothing: it runs in one `IMMEDIATE` transaction and
//!   commits only after every record is written.
//! - One row per employee: later records for the same employee overwrite
//!   earlier ones during an import.
//! - A known employee's `name` is overwritten when a record brings a
//!   different non-empty one; an absent name never clears a stored one.

use crate::model::employee::{EmployeeId, EmployeeRef};
use crate::model::skills::Skills;
use crate::repo::employee_repo::{EmployeeRepository, SqliteEmployeeRepository};
use crate::repo::skills_repo::{SkillsListQuery, SkillsRepository, SqliteSkillsRepository};
use crate::repo::RepoError;
use crate::source::json::{JsonTableSource, SourceError};
use log::{error, info, warn};
use rusqlite::{Connection, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug)]
pub enum ServiceError {
    Repo(RepoError),
    Source(SourceError),
    SkillsNotFound(EmployeeId),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::Source(err) => write!(f, "{err}"),
            Self::SkillsNotFound(id) => write!(f, "no skills recorded for employee {id}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Source(err) => Some(err),
            Self::SkillsNotFound(_) => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::SkillsNotFound(id),
            other => Self::Repo(other),
        }
    }
}

impl From<rusqlite::Error> for ServiceError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Repo(RepoError::from(value))
    }
}

impl From<SourceError> for ServiceError {
    fn from(value: SourceError) -> Self {
        Self::Source(value)
    }
}

/// Counters returned by `import_skills_json`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub employees_created: usize,
    /// Known employees whose `name` changed.
    pub employees_renamed: usize,
    pub skills_saved: usize,
    /// Records with neither an element `id` nor a parent employee.
    pub skipped_without_employee: usize,
}

/// Use-case service over employee and skills repositories.
pub struct SkillsService<E: EmployeeRepository, S: SkillsRepository> {
    employees: E,
    skills: S,
}

impl<E: EmployeeRepository, S: SkillsRepository> SkillsService<E, S> {
    pub fn new(employees: E, skills: S) -> Self {
        Self { employees, skills }
    }

    /// Upserts loaded records in order, stopping at the first failure.
    ///
    /// Writes are not rolled back here; `import_skills_json` owns the
    /// transaction.
    fn save_records(&self, endpoint: &str, records: &[Skills]) -> ServiceResult<ImportReport> {
        let mut report = ImportReport::default();

        for record in records {
            let Some(employee) = record.employee() else {
                warn!(
                    "event=skills_import module=service status=skip reason=no_employee endpoint={endpoint}"
                );
                report.skipped_without_employee += 1;
                continue;
            };

            match self.ensure_employee(employee)? {
                EmployeeSync::Created => report.employees_created += 1,
                EmployeeSync::Renamed => report.employees_renamed += 1,
                EmployeeSync::Unchanged => {}
            }
            self.skills.save_skills(record)?;
            report.skills_saved += 1;
        }

        Ok(report)
    }

    /// Records a skill for `employee`, creating the employee row if needed.
    pub fn record_skill(
        &self,
        employee: EmployeeRef,
        kind: impl Into<String>,
        rating: i32,
    ) -> ServiceResult<Skills> {
        self.ensure_employee(&employee)?;

        let mut skills = Skills::with_rating(kind, rating);
        skills.set_employee(Some(employee));
        self.skills.save_skills(&skills)?;
        Ok(skills)
    }

    /// Replaces the rating of an existing skills row.
    pub fn rate(&self, employee_id: EmployeeId, rating: i32) -> ServiceResult<Skills> {
        let mut skills = self
            .skills
            .get_skills(employee_id)?
            .ok_or(ServiceError::SkillsNotFound(employee_id))?;
        skills.set_rating(rating);
        self.skills.save_skills(&skills)?;
        Ok(skills)
    }

    pub fn skills_for(&self, employee_id: EmployeeId) -> ServiceResult<Option<Skills>> {
        Ok(self.skills.get_skills(employee_id)?)
    }

    pub fn list(&self, query: &SkillsListQuery) -> ServiceResult<Vec<Skills>> {
        Ok(self.skills.list_skills(query)?)
    }

    fn ensure_employee(&self, employee: &EmployeeRef) -> ServiceResult<EmployeeSync> {
        let Some(stored) = self.employees.get_employee(employee.id)? else {
            self.employees.create_employee(employee)?;
            return Ok(EmployeeSync::Created);
        };

        match employee.name.as_deref() {
            Some(name) if !name.is_empty() && stored.name.as_deref() != Some(name) => {
                self.employees.update_employee(employee)?;
                Ok(EmployeeSync::Renamed)
            }
            _ => Ok(EmployeeSync::Unchanged),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EmployeeSync {
    Created,
    Renamed,
    Unchanged,
}

/// Loads every record from `source` and upserts it into the table inside one
/// transaction. Any failure rolls back every row written by this call.
///
/// Emits `skills_import` events with counters or the failure.
pub fn import_skills_json(
    conn: &mut Connection,
    source: &JsonTableSource,
) -> ServiceResult<ImportReport> {
    let endpoint = source.mapping().endpoint;
    let records = source.load_skills()?;

    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let saved = SqliteEmployeeRepository::try_new(&tx)
        .and_then(|employees| Ok((employees, SqliteSkillsRepository::try_new(&tx)?)))
        .map_err(ServiceError::from)
        .and_then(|(employees, skills)| {
            SkillsService::new(employees, skills).save_records(endpoint, &records)
        });

    let report = match saved {
        Ok(report) => report,
        Err(err) => {
            error!(
                "event=skills_import module=service status=error endpoint={endpoint} records={} error={err}",
                records.len()
            );
            return Err(err);
        }
    };
    tx.commit()?;

    info!(
        "event=skills_import module=service status=ok endpoint={endpoint} employees_created={} employees_renamed={} skills_saved={} skipped={}",
        report.employees_created,
        report.employees_renamed,
        report.skills_saved,
        report.skipped_without_employee
    );
    Ok(report)
}

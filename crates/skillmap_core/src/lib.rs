//! Core library for the employee skills store.
//! Maps the `Skills` record onto the `employee_skills` table and onto the
//! `/skills` array of `employee.json`.

pub mod config;
pub mod db;
pub mod logging;
pub mod mapping;
pub mod model;
pub mod repo;
pub mod service;
pub mod source;

pub use config::{ConfigError, Settings};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use mapping::{JsonTableMapping, MappedEntity, SourceKind, TableMapping};
pub use model::employee::{Employee, EmployeeId, EmployeeRef};
pub use model::skills::{Skills, SkillsRecord};
pub use repo::employee_repo::{EmployeeRepository, SqliteEmployeeRepository};
pub use repo::skills_repo::{SkillsListQuery, SkillsRepository, SqliteSkillsRepository};
pub use repo::{RepoError, RepoResult};
pub use service::skills_service::{import_skills_json, ImportReport, ServiceError, SkillsService};
pub use source::json::{JsonTableSource, SourceError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}

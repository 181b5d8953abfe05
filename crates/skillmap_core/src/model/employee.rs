//! Employee domain record.
//!
//! # Responsibility
//! - Define the owning side of the employee/skills relation.
//! - Provide a shared-reference alias so skills can point at one employee.
//!
//! # Invariants
//! - `id` is strictly positive once persisted.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Identifier value stored in `employees.id` and `employee_skills.id`.
pub type EmployeeId = i64;

/// Shared handle used by records that reference an employee without owning it.
pub type EmployeeRef = Arc<Employee>;

/// Employee record referenced by `Skills`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    #[serde(default)]
    pub name: Option<String>,
}

/// Validation failures for employee records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmployeeValidationError {
    NonPositiveId(EmployeeId),
}

impl Display for EmployeeValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonPositiveId(id) => write!(f, "employee id must be positive, got {id}"),
        }
    }
}

impl Error for EmployeeValidationError {}

impl Employee {
    /// Creates an employee with no display name.
    pub fn new(id: EmployeeId) -> Self {
        Self { id, name: None }
    }

    pub fn with_name(id: EmployeeId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: Some(name.into()),
        }
    }

    /// Checks the invariants required before persistence.
    pub fn validate(&self) -> Result<(), EmployeeValidationError> {
        if self.id <= 0 {
            return Err(EmployeeValidationError::NonPositiveId(self.id));
        }
        Ok(())
    }

    /// Wraps this record into a shareable reference.
    pub fn into_ref(self) -> EmployeeRef {
        Arc::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::{Employee, EmployeeValidationError};

    #[test]
    fn validate_rejects_zero_and_negative_ids() {
        assert_eq!(
            Employee::new(0).validate(),
            Err(EmployeeValidationError::NonPositiveId(0))
        );
        assert_eq!(
            Employee::new(-3).validate(),
            Err(EmployeeValidationError::NonPositiveId(-3))
        );
        assert!(Employee::with_name(7, "Ada").validate().is_ok());
    }
}

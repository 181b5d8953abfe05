//! Skills domain record.
//!
//! # Responsibility
//! - Hold one employee's skill type and rating.
//! - Keep a shared reference to the owning `Employee`.
//!
//! # Invariants
//! - Accessors never validate and never fail.
//! - The employee reference is the record identity; `kind` and `rating` are
//!   not unique.
//! - `Display` output is `[type=<type>, rating=<rating>]`, with `null` for an
//!   absent type.

use crate::model::employee::{Employee, EmployeeId, EmployeeRef};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Skill rating for one employee.
///
/// The Rust field is `kind` because `type` is reserved; every storage and
/// wire surface still names it `type`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "SkillsRecord", from = "SkillsRecord")]
pub struct Skills {
    employee: Option<EmployeeRef>,
    kind: Option<String>,
    rating: i32,
}

impl Skills {
    /// Creates an empty record: no type, rating `0`, no employee.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a record from a type and rating. The employee is set later.
    pub fn with_rating(kind: impl Into<String>, rating: i32) -> Self {
        Self {
            employee: None,
            kind: Some(kind.into()),
            rating,
        }
    }

    pub fn kind(&self) -> Option<&str> {
        self.kind.as_deref()
    }

    pub fn set_kind(&mut self, kind: Option<String>) {
        self.kind = kind;
    }

    pub fn rating(&self) -> i32 {
        self.rating
    }

    pub fn set_rating(&mut self, rating: i32) {
        self.rating = rating;
    }

    pub fn employee(&self) -> Option<&EmployeeRef> {
        self.employee.as_ref()
    }

    pub fn set_employee(&mut self, employee: Option<EmployeeRef>) {
        self.employee = employee;
    }

    pub fn clear_employee(&mut self) {
        self.employee = None;
    }

    /// Identifier value of the referenced employee, if any.
    pub fn employee_id(&self) -> Option<EmployeeId> {
        self.employee.as_ref().map(|employee| employee.id)
    }
}

impl Display for Skills {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[type={}, rating={}]",
            self.kind.as_deref().unwrap_or("null"),
            self.rating
        )
    }
}

/// Flat shape of a skills row as stored in `employee_skills` and as found in
/// one element of the JSON `/skills` array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillsRecord {
    /// Employee identifier (`employee_skills.id`).
    #[serde(default)]
    pub id: Option<EmployeeId>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    /// Missing or null ratings read as `0`.
    #[serde(default)]
    pub rating: Option<i32>,
}

impl From<Skills> for SkillsRecord {
    fn from(value: Skills) -> Self {
        Self {
            id: value.employee_id(),
            kind: value.kind,
            rating: Some(value.rating),
        }
    }
}

impl From<SkillsRecord> for Skills {
    fn from(value: SkillsRecord) -> Self {
        Self {
            employee: value.id.map(|id| Arc::new(Employee::new(id))),
            kind: value.kind,
            rating: value.rating.unwrap_or(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Skills;

    #[test]
    fn display_prints_null_for_absent_type() {
        assert_eq!(Skills::new().to_string(), "[type=null, rating=0]");
    }

    #[test]
    fn display_keeps_negative_ratings() {
        let skills = Skills::with_rating("Go", -1);
        assert_eq!(skills.to_string(), "[type=Go, rating=-1]");
    }
}

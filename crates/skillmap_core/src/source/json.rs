//! JSON document exposed as a virtual `Skills` table.
//!
//! # Responsibility
//! - Read the endpoint named by a `JsonTableMapping` from a base directory.
//! - Resolve the mapping root pointer and turn each element into `Skills`.
//!
//! # Invariants
//! - With `root_is_array`, the root must resolve to an array; one element
//!   yields one record, in document order.
//! - An element's employee comes from its own `id`, else from the document
//!   root object (`employee.json` nests skills under the employee).
//! - A root `id` follows the element rules: absent or null means no parent,
//!   anything but an integer is `InvalidRootId`.
//! - Records resolved from the document root share one `Arc<Employee>`.

use crate::mapping::{JsonTableMapping, MappedEntity, MappingError, SourceKind};
use crate::model::employee::{Employee, EmployeeId, EmployeeRef};
use crate::model::skills::{Skills, SkillsRecord};
use log::{error, info};
use serde::Deserialize;
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

pub type SourceResult<T> = Result<T, SourceError>;

/// Errors from reading a JSON virtual table.
#[derive(Debug)]
pub enum SourceError {
    Mapping(MappingError),
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    RootNotFound(String),
    RootNotArray(String),
    /// The document root carries an `id` that is not an integer.
    InvalidRootId(String),
    InvalidElement {
        index: usize,
        reason: String,
    },
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Mapping(err) => write!(f, "{err}"),
            Self::Io { path, source } => {
                write!(f, "failed to read `{}`: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "failed to parse `{}`: {source}", path.display())
            }
            Self::RootNotFound(root) => write!(f, "json root `{root}` not found in document"),
            Self::RootNotArray(root) => write!(f, "json root `{root}` is not an array"),
            Self::InvalidRootId(reason) => write!(f, "invalid document id: {reason}"),
            Self::InvalidElement { index, reason } => {
                write!(f, "invalid element at index {index}: {reason}")
            }
        }
    }
}

impl Error for SourceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Mapping(err) => Some(err),
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<MappingError> for SourceError {
    fn from(value: MappingError) -> Self {
        Self::Mapping(value)
    }
}

/// File-backed reader for one `JsonTableMapping`.
#[derive(Debug, Clone)]
pub struct JsonTableSource {
    mapping: JsonTableMapping,
    base_dir: PathBuf,
}

impl JsonTableSource {
    /// Creates a source for an explicit mapping.
    pub fn new(mapping: JsonTableMapping, base_dir: impl Into<PathBuf>) -> SourceResult<Self> {
        mapping.validate()?;
        Ok(Self {
            mapping,
            base_dir: base_dir.into(),
        })
    }

    /// Creates a source for the JSON table declared by `E`.
    pub fn for_entity<E: MappedEntity>(base_dir: impl Into<PathBuf>) -> SourceResult<Self> {
        let mapping = E::JSON_TABLE.ok_or(MappingError::NoJsonTable(E::TABLE.name))?;
        Self::new(mapping, base_dir)
    }

    /// Creates a source for the `Skills` JSON mapping (`employee.json`, `/skills`).
    pub fn for_skills(base_dir: impl Into<PathBuf>) -> SourceResult<Self> {
        Self::for_entity::<Skills>(base_dir)
    }

    pub fn mapping(&self) -> &JsonTableMapping {
        &self.mapping
    }

    /// Resolved location of the endpoint.
    pub fn endpoint_path(&self) -> PathBuf {
        match self.mapping.source {
            SourceKind::File => self.base_dir.join(self.mapping.endpoint),
        }
    }

    /// Loads and parses the whole endpoint document.
    pub fn read_document(&self) -> SourceResult<Value> {
        let path = self.endpoint_path();
        let text = std::fs::read_to_string(&path).map_err(|source| SourceError::Io {
            path: path.clone(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| SourceError::Parse { path, source })
    }

    /// Reads every `Skills` record exposed by the endpoint.
    ///
    /// Emits `json_load` events with record count and duration.
    pub fn load_skills(&self) -> SourceResult<Vec<Skills>> {
        let started_at = Instant::now();
        let result = self
            .read_document()
            .and_then(|document| skills_from_document(&self.mapping, &document));

        match &result {
            Ok(skills) => info!(
                "event=json_load module=source status=ok source={} endpoint={} records={} duration_ms={}",
                self.mapping.source.as_str(),
                self.mapping.endpoint,
                skills.len(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=json_load module=source status=error endpoint={} duration_ms={} error={err}",
                self.mapping.endpoint,
                started_at.elapsed().as_millis()
            ),
        }
        result
    }
}

/// Maps an already-parsed document through `mapping`.
pub fn skills_from_document(
    mapping: &JsonTableMapping,
    document: &Value,
) -> SourceResult<Vec<Skills>> {
    let root = document
        .pointer(mapping.root)
        .ok_or_else(|| SourceError::RootNotFound(mapping.root.to_string()))?;

    let elements: Vec<&Value> = match root {
        Value::Array(items) => items.iter().collect(),
        _ if mapping.root_is_array => {
            return Err(SourceError::RootNotArray(mapping.root.to_string()));
        }
        other => vec![other],
    };

    let parent = parent_employee(document)?;
    elements
        .into_iter()
        .enumerate()
        .map(|(index, element)| skills_from_element(index, element, parent.as_ref()))
        .collect()
}

fn skills_from_element(
    index: usize,
    element: &Value,
    parent: Option<&EmployeeRef>,
) -> SourceResult<Skills> {
    if !element.is_object() {
        return Err(SourceError::InvalidElement {
            index,
            reason: "expected an object".to_string(),
        });
    }

    let record = SkillsRecord::deserialize(element).map_err(|err| SourceError::InvalidElement {
        index,
        reason: err.to_string(),
    })?;

    let own_employee = record.id.map(|id| Employee {
        id,
        name: element
            .get("name")
            .and_then(Value::as_str)
            .map(str::to_string),
    });

    let mut skills = Skills::from(record);
    skills.set_employee(match own_employee {
        Some(employee) => Some(Arc::new(employee)),
        None => parent.cloned(),
    });
    Ok(skills)
}

/// Employee described by the document root object, when it carries an `id`.
fn parent_employee(document: &Value) -> SourceResult<Option<EmployeeRef>> {
    let Some(raw_id) = document.get("id") else {
        return Ok(None);
    };
    let id = Option::<EmployeeId>::deserialize(raw_id)
        .map_err(|err| SourceError::InvalidRootId(err.to_string()))?;

    Ok(id.map(|id| {
        let name = document
            .get("name")
            .and_then(Value::as_str)
            .map(str::to_string);
        Arc::new(Employee { id, name })
    }))
}

#[cfg(test)]
mod tests {
    use super::{skills_from_document, JsonTableSource, SourceError};
    use crate::mapping::{MappedEntity, MappingError};
    use crate::model::employee::Employee;
    use crate::model::skills::Skills;
    use serde_json::json;
    use std::sync::Arc;

    fn mapping() -> crate::mapping::JsonTableMapping {
        Skills::JSON_TABLE.expect("skills json mapping")
    }

    #[test]
    fn elements_without_id_share_parent_employee() {
        let document = json!({
            "id": 11,
            "name": "Ada",
            "skills": [
                {"type": "Java", "rating": 5},
                {"type": "Rust", "rating": 4}
            ]
        });

        let skills = skills_from_document(&mapping(), &document).unwrap();
        assert_eq!(skills.len(), 2);
        let first = skills[0].employee().unwrap();
        let second = skills[1].employee().unwrap();
        assert!(Arc::ptr_eq(first, second));
        assert_eq!(first.id, 11);
        assert_eq!(first.name.as_deref(), Some("Ada"));
    }

    #[test]
    fn element_id_overrides_parent() {
        let document = json!({"id": 1, "skills": [{"id": 2, "type": "Go", "rating": 3}]});

        let skills = skills_from_document(&mapping(), &document).unwrap();
        assert_eq!(skills[0].employee_id(), Some(2));
    }

    #[test]
    fn null_and_missing_fields_use_defaults() {
        let document = json!({"skills": [{"type": null}, {}]});

        let skills = skills_from_document(&mapping(), &document).unwrap();
        assert_eq!(skills[0], Skills::new());
        assert_eq!(skills[1].to_string(), "[type=null, rating=0]");
    }

    #[test]
    fn non_array_root_is_rejected() {
        let document = json!({"skills": {"type": "Java", "rating": 5}});

        let err = skills_from_document(&mapping(), &document).unwrap_err();
        assert!(matches!(err, SourceError::RootNotArray(root) if root == "/skills"));
    }

    #[test]
    fn fractional_rating_is_rejected_with_index() {
        let document = json!({"skills": [{"type": "Java", "rating": 5}, {"type": "C", "rating": 2.5}]});

        let err = skills_from_document(&mapping(), &document).unwrap_err();
        assert!(matches!(err, SourceError::InvalidElement { index: 1, .. }));
    }

    #[test]
    fn non_integer_document_id_is_rejected() {
        for bad_id in [json!("7"), json!(7.5), json!(-0.0), json!({"value": 7})] {
            let document = json!({"id": bad_id, "skills": [{"type": "Java", "rating": 5}]});

            let err = skills_from_document(&mapping(), &document).unwrap_err();
            assert!(
                matches!(err, SourceError::InvalidRootId(_)),
                "unexpected result for {document}: {err}"
            );
        }
    }

    #[test]
    fn null_document_id_means_no_parent() {
        let document = json!({"id": null, "skills": [{"type": "Java", "rating": 5}]});

        let skills = skills_from_document(&mapping(), &document).unwrap();
        assert_eq!(skills[0].employee(), None);
    }

    #[test]
    fn entity_without_json_table_is_reported() {
        let err = JsonTableSource::for_entity::<Employee>("/tmp").unwrap_err();
        assert!(matches!(
            err,
            SourceError::Mapping(MappingError::NoJsonTable("employees"))
        ));
    }

    #[test]
    fn missing_root_is_reported() {
        let err = skills_from_document(&mapping(), &json!({"id": 1})).unwrap_err();
        assert!(matches!(err, SourceError::RootNotFound(_)));
    }
}

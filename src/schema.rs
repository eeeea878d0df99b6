//! Schema validation for candidate world documents.
//!
//! A candidate arrives from the codec with its region types still raw
//! strings; validation decides whether it may become a [`World`] before
//! any state is replaced. Validation is pure: it never mutates the
//! candidate and has no side effects.

use std::collections::HashSet;

use thiserror::Error;

use crate::domain::region::{is_valid_id, RegionType};

/// Parsed but not yet accepted world document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawWorld {
    pub name: String,
    pub regions: Vec<RawRegion>,
}

/// Parsed but not yet accepted region element. Required attributes stay
/// `Option` so that absence can be reported as a violation instead of
/// being silently defaulted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRegion {
    pub id: Option<String>,
    pub name: Option<String>,
    pub kind: Option<String>,
    pub capital: Option<String>,
    pub children: Vec<RawRegion>,
}

/// A schema violation names the offending id and the violated rule so
/// the caller can produce an actionable message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaViolation {
    #[error("document root must be a <world> element with a 'name' attribute")]
    BadRoot,

    #[error("unexpected element <{0}> in world document")]
    UnexpectedElement(String),

    #[error("unexpected attribute '{attribute}' on <{element}>")]
    UnexpectedAttribute {
        element: &'static str,
        attribute: String,
    },

    #[error("region element under '{parent_id}' is missing its 'id' attribute")]
    MissingId { parent_id: String },

    #[error("region '{id}' is missing required attribute '{attribute}'")]
    MissingAttribute { id: String, attribute: &'static str },

    #[error("invalid region id '{0}': ids start with a letter and contain only letters, digits, '_', '.', '-'")]
    InvalidId(String),

    #[error("duplicate region id '{0}'")]
    DuplicateId(String),

    #[error("region '{id}' has unrecognized type '{kind}'")]
    UnknownType { id: String, kind: String },

    #[error("region '{id}' has an empty name")]
    EmptyName { id: String },

    #[error("{child_kind} region '{child_id}' cannot be nested under {parent_kind} region '{parent_id}'")]
    IllegalNesting {
        parent_id: String,
        parent_kind: RegionType,
        child_id: String,
        child_kind: RegionType,
    },
}

/// Decides whether a candidate parsed structure is an acceptable world.
pub struct SchemaValidator;

impl SchemaValidator {
    /// Check required attributes, id syntax, tree-wide id uniqueness,
    /// recognized region types and the nesting rule. The world name
    /// participates in uniqueness because it doubles as the root id.
    pub fn validate(candidate: &RawWorld) -> Result<(), SchemaViolation> {
        if candidate.name.trim().is_empty() {
            return Err(SchemaViolation::BadRoot);
        }

        let mut seen: HashSet<&str> = HashSet::new();
        seen.insert(candidate.name.as_str());

        // (parent id, parent kind, region) in document order
        let mut stack: Vec<(&str, RegionType, &RawRegion)> = candidate
            .regions
            .iter()
            .rev()
            .map(|r| (candidate.name.as_str(), RegionType::World, r))
            .collect();

        while let Some((parent_id, parent_kind, raw)) = stack.pop() {
            let id = raw.id.as_deref().ok_or_else(|| SchemaViolation::MissingId {
                parent_id: parent_id.to_string(),
            })?;
            if !is_valid_id(id) {
                return Err(SchemaViolation::InvalidId(id.to_string()));
            }
            if !seen.insert(id) {
                return Err(SchemaViolation::DuplicateId(id.to_string()));
            }

            let name = raw
                .name
                .as_deref()
                .ok_or_else(|| SchemaViolation::MissingAttribute {
                    id: id.to_string(),
                    attribute: "name",
                })?;
            if name.trim().is_empty() {
                return Err(SchemaViolation::EmptyName { id: id.to_string() });
            }

            let kind_name = raw
                .kind
                .as_deref()
                .ok_or_else(|| SchemaViolation::MissingAttribute {
                    id: id.to_string(),
                    attribute: "type",
                })?;
            let kind = RegionType::from_schema_name(kind_name).ok_or_else(|| {
                SchemaViolation::UnknownType {
                    id: id.to_string(),
                    kind: kind_name.to_string(),
                }
            })?;

            if !parent_kind.may_contain(kind) {
                return Err(SchemaViolation::IllegalNesting {
                    parent_id: parent_id.to_string(),
                    parent_kind,
                    child_id: id.to_string(),
                    child_kind: kind,
                });
            }

            for child in raw.children.iter().rev() {
                stack.push((id, kind, child));
            }
        }

        Ok(())
    }
}

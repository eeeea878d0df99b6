//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::region::RegionType;

/// Domain errors represent violations of the region tree's invariants.
/// Every mutation checks these before touching the tree, so a failed
/// mutation leaves the tree unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("duplicate region id: {0}")]
    DuplicateId(String),

    #[error("no region with id: {0}")]
    RegionNotFound(String),

    #[error("region id must not be empty")]
    EmptyId,

    #[error("invalid region id '{0}': ids start with a letter and contain only letters, digits, '_', '.', '-'")]
    InvalidId(String),

    #[error("region name must not be empty")]
    EmptyName,

    #[error("{child_kind} region '{child_id}' cannot be nested under {parent_kind} region '{parent_id}'")]
    IllegalNesting {
        parent_id: String,
        parent_kind: RegionType,
        child_id: String,
        child_kind: RegionType,
    },

    #[error("the root region represents the world itself and can only be changed through the world name")]
    RootImmutable,
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

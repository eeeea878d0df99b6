//! rsworld: hierarchical world region documents with schema-validated XML I/O
//!
//! A world is a named document owning a tree of regions (continents,
//! nations, states, counties). The crate keeps that tree structurally
//! valid at all times (globally unique ids, acyclic ownership, a fixed
//! nesting order) and maps it to and from an XML wire format that is
//! validated before any in-memory state is replaced.
//!
//! Layering follows the usual split:
//! - [`domain`]: the region tree, its invariants, queries and mutations
//! - [`schema`]: validation of candidate documents before acceptance
//! - [`codec`]: the XML wire format
//! - [`application`]: the world service owning load/save
//! - [`cli`]: the binary surface

pub mod application;
pub mod cli;
pub mod codec;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod schema;
pub mod util;

pub use application::{LoadError, SaveError, WorldService};
pub use codec::{DecodeError, DocumentCodec};
pub use domain::{DomainError, Region, RegionType, World};
pub use schema::{RawRegion, RawWorld, SchemaValidator, SchemaViolation};

//! Domain layer: the region tree and its invariants
//!
//! This layer is independent of external concerns (no I/O, no wire
//! format, no CLI).

pub mod arena;
pub mod error;
pub mod region;
pub mod world;

pub use arena::{PreOrderIter, RegionArena, RegionNode};
pub use error::{DomainError, DomainResult};
pub use region::{is_valid_id, Region, RegionType};
pub use world::World;

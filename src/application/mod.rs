//! Application layer: services and use cases
//!
//! This layer orchestrates domain logic and owns the load/save
//! boundary; everything here is synchronous and single-threaded.

pub mod error;
pub mod services;

pub use error::{LoadError, SaveError};
pub use services::WorldService;

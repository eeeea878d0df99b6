//! Application services
//!
//! Concrete service implementations that orchestrate domain logic
//! against file I/O.

mod world;

pub use world::WorldService;

//! Core data structures for the Shoal simulation.

pub mod agent;
pub mod mesh;
pub mod species;
pub mod volume;

pub use agent::*;
pub use mesh::*;
pub use species::*;
pub use volume::*;

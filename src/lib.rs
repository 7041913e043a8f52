//! Shoal: an underwater multi-species fish swarm, driven one frame at a time.
//!
//! The simulation itself lives in [`model::world::World`]; the logic it
//! composes comes from `shoal_core`, the component types from `shoal_data`.

pub mod model;

pub use model::world::{AgentSnapshot, TickReport, World, WorldView};

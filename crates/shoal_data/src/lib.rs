//! # Shoal Data
//!
//! Plain data shared by the simulation crates: species profiles, per-agent
//! components, the containment volume and the mesh/skeleton artifacts produced
//! by rigging. Behavior lives in `shoal_core`.

pub mod data;

pub use data::*;

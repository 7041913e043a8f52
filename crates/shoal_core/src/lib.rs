//! # Shoal Core
//!
//! The simulation engine behind Shoal, an underwater multi-species fish
//! swarm.
//!
//! This crate contains the deterministic simulation logic, including:
//! - Steering forces (seek, separation, containment), integration and
//!   orientation
//! - The observer-tracking swim box agents are confined to
//! - Biased spawn/target sampling per species
//! - Auto-rigging of unrigged meshes and the procedural swim wiggle
//! - Spatial hashing for neighbor queries
//! - Metrics collection and structured logging
//!
//! ## Architecture
//!
//! Agents are hecs entities with plain components from `shoal_data`. Systems
//! run once per frame as rayon parallel passes; each agent draws randomness
//! from its own ChaCha8 generator seeded by world seed, tick and agent id.
//!
//! ## Example
//!
//! ```
//! use glam::Vec3;
//! use shoal_core::containment::{ContainmentLogic, ShoreFrame};
//! use shoal_core::sampler::biased_point;
//! use shoal_data::{AxisBias, SwimBox};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//!
//! let frame = ShoreFrame {
//!     shoreline: 0.0,
//!     floor: -5.0,
//!     surface: 0.0,
//!     lateral_min: -20.0,
//!     lateral_max: 20.0,
//!     min_shore_span: 0.5,
//! };
//! let mut volume = SwimBox::default();
//! volume.recompute(&frame, Vec3::new(10.0, -1.0, 0.0));
//!
//! let mut rng = ChaCha8Rng::seed_from_u64(42);
//! let p = biased_point(&volume, AxisBias::new(0.85, 0.1), AxisBias::new(0.9, 0.08), &mut rng);
//! assert!(volume.contains(p));
//! ```

/// Species asset loading, fallbacks and per-species runtime data
pub mod assets;
/// Configuration management for simulation parameters
pub mod config;
/// Swim box recomputation and containment queries
pub mod containment;
/// Error types
pub mod error;
/// Agent construction
pub mod lifecycle;
/// Performance metrics collection and logging
pub mod metrics;
/// Auto-rigging for meshes without a skeleton
pub mod rig;
/// Biased random positions inside the swim box
pub mod sampler;
/// Spatial hashing for neighbor queries
pub mod spatial_hash;
/// Per-agent steering math
pub mod steering;
/// Per-frame parallel passes (steering, animation, visibility)
pub mod systems;
/// Procedural wiggle and bone self-healing
pub mod wiggle;

pub use assets::{AssetLoader, ProceduralFishLoader, SpeciesRuntime};
pub use containment::{ContainmentLogic, ShoreFrame};
pub use error::{AssetError, RigError};
pub use metrics::Metrics;
pub use spatial_hash::{RebuildClock, SpatialHash};

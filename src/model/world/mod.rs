use crate::model::assets::SpeciesRuntime;
use crate::model::config::AppConfig;
use crate::model::containment::ShoreFrame;
use crate::model::metrics::Metrics;
use crate::model::spatial_hash::{RebuildClock, SpatialHash};
use glam::{Quat, Vec3};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use shoal_data::{SpeciesId, SwimBox};
use std::time::Duration;

pub mod init;
pub mod logic;
pub mod state;
pub mod update;

pub use state::WorldView;

/// The agent simulation: owns the ECS, the species catalog, the swim box and
/// the neighbor index. Frame-driven; call [`World::update`] once per frame.
pub struct World {
    pub tick: u64,
    /// Simulated seconds since construction.
    pub time: f64,
    pub ecs: hecs::World,
    pub config: AppConfig,
    pub runtimes: Vec<SpeciesRuntime>,
    pub swim_box: SwimBox,
    pub shore_frame: ShoreFrame,
    pub observer: Vec3,
    pub spatial_hash: SpatialHash,
    pub rebuild_clock: RebuildClock,
    /// Handles and positions the spatial hash was last built from, in index order.
    pub index_handles: Vec<hecs::Entity>,
    pub index_positions: Vec<Vec3>,
    pub world_seed: u64,
    pub rng: ChaCha8Rng,
    pub metrics: Metrics,
}

/// Summary of one [`World::update`] call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TickReport {
    pub tick: u64,
    /// The step actually simulated, after clamping.
    pub dt: f32,
    pub agents: usize,
    pub visible: usize,
    pub retargets: usize,
    pub index_rebuilt: bool,
    pub wiggle_recovered: usize,
    pub wiggle_disabled: usize,
    pub duration: Duration,
}

/// Read-only copy of one agent's state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSnapshot {
    pub id: uuid::Uuid,
    pub species: SpeciesId,
    pub species_key: String,
    pub position: Vec3,
    pub velocity: Vec3,
    pub heading: Quat,
    pub target: Vec3,
    pub speed_min: f32,
    pub speed_max: f32,
    pub visible: bool,
    pub wiggle_phase: f32,
    pub wiggle_disabled: bool,
    pub skinned: bool,
}

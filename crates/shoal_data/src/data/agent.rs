//! Per-agent ECS components.

use super::mesh::{ClipHandle, Skeleton, SkeletonId};
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Index of a species in the simulation's catalog.
pub type SpeciesId = usize;

/// Unique identification of an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
    pub id: Uuid,
    pub species: SpeciesId,
}

/// World position of an agent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Position(pub Vec3);

/// Velocity of an agent in world units per second.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Velocity(pub Vec3);

/// Mesh orientation in world space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Heading(pub Quat);

impl Default for Heading {
    fn default() -> Self {
        Self(Quat::IDENTITY)
    }
}

/// Behavioral target and speed envelope.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Steering {
    pub target: Vec3,
    /// Simulation time (seconds) at which the agent picks a new target anyway.
    pub next_retarget: f64,
    pub speed_min: f32,
    pub speed_max: f32,
}

/// Handle to one bone of one specific skeleton instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoneHandle {
    pub skeleton: SkeletonId,
    pub index: usize,
}

/// Procedural secondary motion state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Wiggle {
    pub phase: f32,
    /// Lazily resolved; `None` until the first animation pass.
    pub bone: Option<BoneHandle>,
    /// Set once bone recovery has failed. Never cleared.
    pub disabled: bool,
}

/// Visual representation flags.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Visual {
    pub scale: f32,
    pub visible: bool,
}

impl Default for Visual {
    fn default() -> Self {
        Self {
            scale: 1.0,
            visible: true,
        }
    }
}

/// The agent's own skeleton instance, duplicated from the species template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rig(pub Skeleton);

/// Playback state of an authored clip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationPlayer {
    pub clip: ClipHandle,
    pub time: f32,
    pub playing: bool,
}

impl AnimationPlayer {
    #[must_use]
    pub fn new(clip: ClipHandle, time: f32) -> Self {
        Self {
            clip,
            time,
            playing: true,
        }
    }

    pub fn stop(&mut self) {
        self.playing = false;
    }

    /// Moves the playhead by `dt`, looping at the clip end. Clips without a
    /// usable length just accumulate.
    pub fn advance(&mut self, dt: f32) {
        if !self.playing {
            return;
        }
        self.time += dt;
        let duration = self.clip.duration;
        if duration.is_finite() && duration > 0.0 {
            self.time = self.time.rem_euclid(duration);
        }
    }
}

//! Per-frame passes over the agent ECS.
//!
//! Each pass collects its query rows and runs a rayon parallel-for over them.
//! Agents only read shared, frame-constant context plus their own components,
//! so the passes need no locks.

pub mod animation;
pub mod steering;
pub mod visibility;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use uuid::Uuid;

pub use animation::{animation_pass, AnimationContext, AnimationReport};
pub use steering::{steering_pass, SteeringContext};
pub use visibility::visibility_pass;

/// Per-agent generator for one tick. Depends only on the world seed, the tick
/// and the agent id, so results do not depend on thread scheduling.
#[must_use]
pub fn agent_rng(world_seed: u64, tick: u64, id: Uuid) -> ChaCha8Rng {
    let u = id.as_u128();
    let seed = world_seed
        .wrapping_add(tick)
        .wrapping_mul(0x517CC1B727220A95)
        ^ (u >> 64) as u64
        ^ (u as u64);
    ChaCha8Rng::seed_from_u64(seed)
}

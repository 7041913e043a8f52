use crate::assets::SpeciesRuntime;
use crate::config::{SteeringConfig, WorldConfig};
use crate::sampler::species_point;
use crate::steering::{draw_countdown, orient_to_velocity};
use glam::{Quat, Vec3};
use rand::Rng;
use rand_distr::StandardNormal;
use shoal_data::{
    AnimationPlayer, Heading, Identity, Position, Rig, SpeciesAsset, SpeciesId, SpeciesProfile,
    Steering, SwimBox, Velocity, Visual, Wiggle,
};
use std::f32::consts::TAU;
use uuid::Uuid;

/// Species-scaled `(speed_min, speed_max)`.
#[must_use]
pub fn speed_bounds(species: &SpeciesProfile, steering: &SteeringConfig) -> (f32, f32) {
    (
        steering.base_speed_min * species.speed_scale,
        steering.base_speed_max * species.speed_scale,
    )
}

/// How many agents of `species` to spawn.
#[must_use]
pub fn population_for(species: &SpeciesProfile, world: &WorldConfig) -> usize {
    let n = (world.base_population as f32 * species.abundance_scale).round();
    if n.is_finite() && n > 0.0 {
        n as usize
    } else {
        0
    }
}

/// Everything an agent's initial state is drawn from.
pub struct SpawnContext<'a> {
    pub species_id: SpeciesId,
    pub species: &'a SpeciesProfile,
    pub runtime: &'a SpeciesRuntime,
    pub steering: &'a SteeringConfig,
    pub volume: &'a SwimBox,
    /// Current simulation time, seconds.
    pub now: f64,
}

fn random_direction<R: Rng>(rng: &mut R) -> Vec3 {
    let v = Vec3::new(
        rng.sample(StandardNormal),
        rng.sample(StandardNormal),
        rng.sample(StandardNormal),
    );
    v.try_normalize().unwrap_or(Vec3::X)
}

/// Builds the component bundle for one new agent. All randomness, including
/// the agent id, comes from `rng`.
pub fn create_agent_with_rng<R: Rng>(ctx: &SpawnContext, rng: &mut R) -> hecs::EntityBuilder {
    let id = Uuid::from_u128(rng.gen::<u128>());
    let (speed_min, speed_max) = speed_bounds(ctx.species, ctx.steering);

    let position = species_point(ctx.volume, ctx.species, rng);
    let target = species_point(ctx.volume, ctx.species, rng);
    let velocity = random_direction(rng) * speed_min;
    let countdown = draw_countdown(rng, ctx.steering.retarget_min, ctx.steering.retarget_max);
    let phase = rng.gen_range(0.0..TAU);

    let mut builder = hecs::EntityBuilder::new();
    builder
        .add(Identity {
            id,
            species: ctx.species_id,
        })
        .add(Position(position))
        .add(Velocity(velocity))
        .add(Heading(orient_to_velocity(
            Quat::IDENTITY,
            velocity,
            &ctx.runtime.frame,
        )))
        .add(Steering {
            target,
            next_retarget: ctx.now + f64::from(countdown),
            speed_min,
            speed_max,
        })
        .add(Wiggle {
            phase,
            bone: None,
            disabled: false,
        })
        .add(Visual {
            scale: ctx.species.size_scale,
            visible: true,
        });

    if let Some(template) = ctx.runtime.asset.skeleton() {
        builder.add(Rig(template.duplicate()));
    }
    if let SpeciesAsset::PreRigged {
        clip: Some(clip), ..
    } = &ctx.runtime.asset
    {
        let start = rng.gen_range(0.0..1.0) * clip.duration.max(0.0);
        builder.add(AnimationPlayer::new(clip.clone(), start));
    }
    builder
}

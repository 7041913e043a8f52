use crate::assets::SpeciesRuntime;
use crate::config::SteeringConfig;
use crate::containment::ContainmentLogic;
use crate::sampler::species_point;
use crate::spatial_hash::SpatialHash;
use crate::steering::{
    containment_force, draw_countdown, fallback_direction, integrate, needs_retarget,
    orient_to_velocity, seek, separation, steering_force, RetargetReason, SpeedRange,
};
use glam::Vec3;
use rayon::prelude::*;
use shoal_data::{Heading, Identity, Position, SpeciesProfile, Steering, SwimBox, Velocity};

/// Frame-constant inputs shared by every agent in the steering pass.
pub struct SteeringContext<'a> {
    pub config: &'a SteeringConfig,
    pub volume: &'a SwimBox,
    pub species: &'a [SpeciesProfile],
    pub runtimes: &'a [SpeciesRuntime],
    /// Index built at the last rebuild, together with the positions and
    /// handles it was built from. Agents that moved since are seen where they
    /// were then.
    pub index: &'a SpatialHash,
    pub index_positions: &'a [Vec3],
    pub index_handles: &'a [hecs::Entity],
    pub now: f64,
    pub dt: f32,
    pub world_seed: u64,
    pub tick: u64,
}

pub struct SteeringAgent<'a> {
    pub handle: hecs::Entity,
    pub identity: &'a Identity,
    pub position: &'a mut Position,
    pub velocity: &'a mut Velocity,
    pub heading: &'a mut Heading,
    pub steering: &'a mut Steering,
}

/// One agent's step: retarget if needed, sum forces, integrate, reorient.
/// Returns why the agent retargeted, if it did.
pub fn steer_one(
    agent: SteeringAgent,
    ctx: &SteeringContext,
    scratch: &mut Vec<usize>,
) -> Option<RetargetReason> {
    let SteeringAgent {
        handle,
        identity,
        position,
        velocity,
        heading,
        steering,
    } = agent;
    let species = ctx.species.get(identity.species)?;
    let runtime = ctx.runtimes.get(identity.species)?;
    let cfg = ctx.config;

    let reason = needs_retarget(
        position.0,
        steering,
        ctx.volume,
        ctx.now,
        cfg.target_reach_dist,
    );
    if let Some(reason) = reason {
        let mut rng = super::agent_rng(ctx.world_seed, ctx.tick, identity.id);
        steering.target = species_point(ctx.volume, species, &mut rng);
        let countdown = draw_countdown(&mut rng, cfg.retarget_min, cfg.retarget_max);
        steering.next_retarget = ctx.now + f64::from(countdown);
        tracing::trace!(agent = %identity.id, ?reason, "Retarget");
    }

    ctx.index.neighbors_into(position.0, scratch);
    let neighbors = scratch
        .iter()
        .filter(|&&i| ctx.index_handles.get(i) != Some(&handle))
        .filter_map(|&i| ctx.index_positions.get(i).copied());

    let force = steering_force(
        seek(
            position.0,
            velocity.0,
            steering.target,
            steering.speed_max,
            cfg.seek_intensity,
            cfg.arrival_epsilon,
        ),
        separation(
            position.0,
            neighbors,
            cfg.separation_radius,
            cfg.separation_strength,
        ),
        containment_force(ctx.volume, position.0, cfg.containment_gain),
        cfg.max_accel,
    );

    let facing = heading.0 * runtime.frame.forward;
    let (new_pos, new_vel) = integrate(
        position.0,
        velocity.0,
        force,
        ctx.dt,
        SpeedRange::of(steering),
        fallback_direction(position.0, steering.target, facing),
        ctx.volume,
    );
    position.0 = new_pos;
    velocity.0 = new_vel;
    heading.0 = orient_to_velocity(heading.0, new_vel, &runtime.frame);

    debug_assert!(ctx.volume.contains(position.0));
    reason
}

/// Steers every agent in parallel. Returns the number of retargets.
pub fn steering_pass(ecs: &mut hecs::World, ctx: &SteeringContext) -> usize {
    let mut query = ecs.query::<(
        &Identity,
        &mut Position,
        &mut Velocity,
        &mut Heading,
        &mut Steering,
    )>();
    let mut rows: Vec<_> = query.iter().collect();

    rows.par_iter_mut()
        .map_init(Vec::new, |scratch, (handle, (identity, position, velocity, heading, steering))| {
            steer_one(
                SteeringAgent {
                    handle: *handle,
                    identity,
                    position,
                    velocity,
                    heading,
                    steering,
                },
                ctx,
                scratch,
            )
        })
        .filter(Option::is_some)
        .count()
}

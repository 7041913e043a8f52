use crate::assets::SpeciesRuntime;
use crate::config::AnimationConfig;
use crate::wiggle::{advance_phase, apply_wiggle, ensure_bone, speed_factor, wiggle_rotation, BoneStatus};
use rayon::prelude::*;
use shoal_data::{AnimationPlayer, Identity, Rig, SpeciesProfile, Steering, Velocity, Wiggle};

pub struct AnimationContext<'a> {
    pub config: &'a AnimationConfig,
    pub species: &'a [SpeciesProfile],
    pub runtimes: &'a [SpeciesRuntime],
    pub dt: f32,
}

/// Bone bookkeeping from one animation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnimationReport {
    pub recovered: usize,
    pub disabled: usize,
}

pub struct AnimatedAgent<'a> {
    pub identity: &'a Identity,
    pub velocity: &'a Velocity,
    pub steering: &'a Steering,
    pub wiggle: &'a mut Wiggle,
    pub rig: Option<&'a mut Rig>,
    pub player: Option<&'a mut AnimationPlayer>,
}

/// Advances clip playback and the wiggle for one agent. `None` when the agent
/// has nothing to wiggle this frame.
pub fn animate_one(agent: AnimatedAgent, ctx: &AnimationContext) -> Option<BoneStatus> {
    if let Some(player) = agent.player {
        player.advance(ctx.dt);
    }

    let species = ctx.species.get(agent.identity.species)?;
    let runtime = ctx.runtimes.get(agent.identity.species)?;
    let wiggle_cfg = &species.wiggle;
    if !wiggle_cfg.enabled || agent.wiggle.disabled {
        return None;
    }
    let rig = agent.rig?;

    let status = ensure_bone(
        agent.wiggle,
        &rig.0,
        &runtime.bounds,
        species.flips,
        wiggle_cfg.end,
    );
    let Some(handle) = agent.wiggle.bone else {
        return Some(status);
    };

    let factor = speed_factor(
        agent.velocity.0.length(),
        agent.steering.speed_max,
        ctx.config.speed_factor_min,
        ctx.config.speed_factor_max,
    );
    agent.wiggle.phase = advance_phase(agent.wiggle.phase, ctx.dt, wiggle_cfg.period, factor);
    let offset = wiggle_rotation(wiggle_cfg, &runtime.frame, agent.wiggle.phase);
    if !apply_wiggle(&mut rig.0, &handle, offset) {
        agent.wiggle.bone = None;
    }
    Some(status)
}

/// Animates every agent in parallel.
pub fn animation_pass(ecs: &mut hecs::World, ctx: &AnimationContext) -> AnimationReport {
    let mut query = ecs.query::<(
        &Identity,
        &Velocity,
        &Steering,
        &mut Wiggle,
        Option<&mut Rig>,
        Option<&mut AnimationPlayer>,
    )>();
    let mut rows: Vec<_> = query.iter().collect();

    rows.par_iter_mut()
        .map(|(_, (identity, velocity, steering, wiggle, rig, player))| {
            animate_one(
                AnimatedAgent {
                    identity,
                    velocity,
                    steering,
                    wiggle,
                    rig: rig.as_deref_mut(),
                    player: player.as_deref_mut(),
                },
                ctx,
            )
        })
        .fold(AnimationReport::default, |mut acc, status| {
            match status {
                Some(BoneStatus::Recovered) => acc.recovered += 1,
                Some(BoneStatus::Disabled) => acc.disabled += 1,
                _ => {}
            }
            acc
        })
        .reduce(AnimationReport::default, |a, b| AnimationReport {
            recovered: a.recovered + b.recovered,
            disabled: a.disabled + b.disabled,
        })
}

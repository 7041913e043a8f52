use crate::model::containment::ContainmentLogic;
use crate::model::systems::{
    animation_pass, steering_pass, visibility_pass, AnimationContext, SteeringContext,
};
use crate::model::world::{TickReport, World};
use glam::Vec3;
use shoal_data::Identity;
use std::time::Instant;

impl World {
    /// Advances the simulation by one frame.
    ///
    /// In order:
    /// - recompute the swim box from `observer`
    /// - rebuild the neighbor index when its clock says so
    /// - steer every agent (retarget, forces, integrate, orient)
    /// - animate every agent (clip playback, wiggle with bone self-heal)
    /// - flag agents beyond render distance as invisible
    ///
    /// `dt` is clamped into `[0, max_dt]`; a non-finite `dt` counts as zero.
    /// A non-finite `observer` keeps the previous one.
    pub fn update(&mut self, dt: f32, observer: Vec3) -> TickReport {
        let start = Instant::now();
        let dt = if dt.is_finite() {
            dt.clamp(0.0, self.config.world.max_dt)
        } else {
            0.0
        };
        self.tick += 1;
        self.time += f64::from(dt);

        if observer.is_finite() {
            self.observer = observer;
        }
        self.swim_box.recompute(&self.shore_frame, self.observer);

        // Separation reads positions as of the last rebuild, so neighbors can
        // lag by up to one rebuild interval. Agents that left the radius since
        // are still filtered by their stale position.
        let index_rebuilt = self.rebuild_clock.tick(dt);
        if index_rebuilt {
            self.rebuild_index();
        }

        let retargets = {
            let ctx = SteeringContext {
                config: &self.config.steering,
                volume: &self.swim_box,
                species: &self.config.species,
                runtimes: &self.runtimes,
                index: &self.spatial_hash,
                index_positions: &self.index_positions,
                index_handles: &self.index_handles,
                now: self.time,
                dt,
                world_seed: self.world_seed,
                tick: self.tick,
            };
            steering_pass(&mut self.ecs, &ctx)
        };

        let animation = {
            let ctx = AnimationContext {
                config: &self.config.animation,
                species: &self.config.species,
                runtimes: &self.runtimes,
                dt,
            };
            animation_pass(&mut self.ecs, &ctx)
        };
        if animation.disabled > 0 {
            tracing::warn!(count = animation.disabled, tick = self.tick, "Wiggle disabled after bone recovery failed");
            self.metrics.record_wiggle_disabled(animation.disabled);
        }

        let visible = visibility_pass(
            &mut self.ecs,
            self.observer,
            self.config.world.render_distance,
        );

        let agents = self.ecs.query::<&Identity>().iter().count();
        let duration = start.elapsed();
        self.metrics.record_tick(duration, agents, retargets);

        TickReport {
            tick: self.tick,
            dt,
            agents,
            visible,
            retargets,
            index_rebuilt,
            wiggle_recovered: animation.recovered,
            wiggle_disabled: animation.disabled,
            duration,
        }
    }

    /// Re-buckets every agent at its current position.
    pub fn rebuild_index(&mut self) {
        let mut rows: Vec<_> = self
            .ecs
            .query::<(&Identity, &shoal_data::Position)>()
            .iter()
            .map(|(handle, (identity, pos))| (identity.id, handle, pos.0))
            .collect();
        rows.sort_by_key(|row| row.0);

        self.index_handles.clear();
        self.index_positions.clear();
        for (_, handle, pos) in rows {
            self.index_handles.push(handle);
            self.index_positions.push(pos);
        }
        self.spatial_hash.rebuild(&self.index_positions);
        self.metrics.record_rebuild();
    }
}

use crate::model::lifecycle::{self, SpawnContext};
use crate::model::world::World;
use shoal_data::{AnimationPlayer, SpeciesId};

impl World {
    /// Spawns one more agent of `species` inside the current swim box.
    /// `None` for an unknown species.
    pub fn spawn_agent(&mut self, species: SpeciesId) -> Option<hecs::Entity> {
        let profile = self.config.species.get(species)?;
        let runtime = self.runtimes.get(species)?;
        let ctx = SpawnContext {
            species_id: species,
            species: profile,
            runtime,
            steering: &self.config.steering,
            volume: &self.swim_box,
            now: self.time,
        };
        let mut builder = lifecycle::create_agent_with_rng(&ctx, &mut self.rng);
        let handle = self.ecs.spawn(builder.build());
        self.rebuild_index();
        self.rebuild_clock.reset();
        Some(handle)
    }

    /// Stops the agent's animation, despawns it and drops it from the neighbor
    /// index. Returns false when `handle` is not a live agent.
    pub fn remove_agent(&mut self, handle: hecs::Entity) -> bool {
        if !self.ecs.contains(handle) {
            return false;
        }
        if let Ok(mut player) = self.ecs.get::<&mut AnimationPlayer>(handle) {
            player.stop();
        }
        if self.ecs.despawn(handle).is_err() {
            return false;
        }
        self.rebuild_index();
        self.rebuild_clock.reset();
        self.metrics.increment_counter("agents_removed");
        tracing::debug!(?handle, remaining = self.population(), "Agent removed");
        true
    }

    /// Releases every agent and its animation state.
    pub fn teardown(&mut self) {
        for (_, player) in self.ecs.query_mut::<&mut AnimationPlayer>() {
            player.stop();
        }
        let released = self.population();
        self.ecs.clear();
        self.rebuild_index();
        tracing::info!(released, tick = self.tick, "World torn down");
    }
}

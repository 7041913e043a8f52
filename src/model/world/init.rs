use crate::model::assets::{prepare_species_asset, AssetLoader, SpeciesRuntime};
use crate::model::config::AppConfig;
use crate::model::containment::ContainmentLogic;
use crate::model::lifecycle::{self, SpawnContext};
use crate::model::metrics::Metrics;
use crate::model::spatial_hash::{RebuildClock, SpatialHash};
use crate::model::world::World;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use shoal_data::SwimBox;

impl World {
    /// Validates `config`, prepares every species asset through `loader`,
    /// spawns the initial population and builds the first neighbor index.
    ///
    /// Asset and rigging failures degrade the affected species and are logged;
    /// only an invalid configuration is an error.
    pub fn new(config: AppConfig, loader: &dyn AssetLoader) -> anyhow::Result<Self> {
        config.validate()?;

        let world_seed = config.world.seed.unwrap_or_else(rand::random);
        let mut rng = ChaCha8Rng::seed_from_u64(world_seed);
        let metrics = Metrics::new(config.log_interval_ticks);

        let runtimes: Vec<SpeciesRuntime> = config
            .species
            .iter()
            .map(|species| {
                let prepared = prepare_species_asset(species, loader);
                if prepared.rig_error.is_some() {
                    metrics.record_rig_failure();
                }
                if prepared.placeholder {
                    metrics.increment_counter("placeholder_assets");
                }
                SpeciesRuntime::new(prepared.asset, species.flips)
            })
            .collect();

        let shore_frame = config.world.shore_frame();
        let observer = config.world.observer();
        let mut swim_box = SwimBox::default();
        swim_box.recompute(&shore_frame, observer);

        let mut ecs = hecs::World::new();
        for (species_id, (species, runtime)) in config.species.iter().zip(&runtimes).enumerate() {
            let count = lifecycle::population_for(species, &config.world);
            let ctx = SpawnContext {
                species_id,
                species,
                runtime,
                steering: &config.steering,
                volume: &swim_box,
                now: 0.0,
            };
            for _ in 0..count {
                ecs.spawn(lifecycle::create_agent_with_rng(&ctx, &mut rng).build());
            }
            tracing::debug!(species = %species.key, count, skinned = runtime.is_skinned(), "Spawned species");
        }

        let mut world = Self {
            tick: 0,
            time: 0.0,
            ecs,
            spatial_hash: SpatialHash::new(config.steering.separation_radius),
            rebuild_clock: RebuildClock::new(config.spatial.rebuild_hz),
            config,
            runtimes,
            swim_box,
            shore_frame,
            observer,
            index_handles: Vec::new(),
            index_positions: Vec::new(),
            world_seed,
            rng,
            metrics,
        };
        world.rebuild_index();

        tracing::info!(
            seed = world.world_seed,
            agents = world.population(),
            species = world.config.species.len(),
            fingerprint = %world.config.fingerprint(),
            "World created"
        );
        Ok(world)
    }
}

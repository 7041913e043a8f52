pub mod macros;

use glam::Vec3;
use shoal_data::{SpeciesProfile, WiggleConfig};
use shoal_lib::model::config::AppConfig;
use shoal_lib::model::ProceduralFishLoader;
use shoal_lib::World;

type WorldMod = Box<dyn FnOnce(&mut World)>;

/// Default test volume: x [0, 10], y [-5, 0], z [-20, 20].
#[allow(dead_code)]
pub const OBSERVER: Vec3 = Vec3::new(10.0, -1.0, 0.0);

#[allow(dead_code)]
pub const DT: f32 = 1.0 / 60.0;

#[allow(dead_code)]
pub struct WorldBuilder {
    config: AppConfig,
    loader: ProceduralFishLoader,
    mods: Vec<WorldMod>,
}

#[allow(dead_code)]
impl WorldBuilder {
    /// One plain species, no agents, fixed seed.
    pub fn new() -> Self {
        let mut config = AppConfig::default();
        config.world.seed = Some(42);
        config.world.base_population = 0;
        config.world.initial_observer = OBSERVER.to_array();
        config.species = vec![fish("cod")];
        Self {
            config,
            loader: ProceduralFishLoader::default(),
            mods: Vec::new(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.world.seed = Some(seed);
        self
    }

    pub fn with_population(mut self, base: usize) -> Self {
        self.config.world.base_population = base;
        self
    }

    pub fn with_species(mut self, species: Vec<SpeciesProfile>) -> Self {
        self.config.species = species;
        self
    }

    pub fn with_default_catalog(mut self) -> Self {
        self.config.species = shoal_lib::model::config::default_catalog();
        self
    }

    pub fn with_config<F>(mut self, modifier: F) -> Self
    where
        F: FnOnce(&mut AppConfig),
    {
        modifier(&mut self.config);
        self
    }

    pub fn with_missing_asset(mut self, key: &str) -> Self {
        self.loader = self.loader.without([key]);
        self
    }

    pub fn with_world_mod<F>(mut self, modifier: F) -> Self
    where
        F: FnOnce(&mut World) + 'static,
    {
        self.mods.push(Box::new(modifier));
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn build(self) -> World {
        let mut world =
            World::new(self.config, &self.loader).expect("Failed to create world in test builder");
        for modifier in self.mods {
            modifier(&mut world);
        }
        world
    }
}

/// A species with neutral scales and default wiggle.
#[allow(dead_code)]
pub fn fish(key: &str) -> SpeciesProfile {
    SpeciesProfile::new(key)
}

#[allow(dead_code)]
pub fn still_fish(key: &str) -> SpeciesProfile {
    SpeciesProfile {
        wiggle: WiggleConfig {
            enabled: false,
            ..WiggleConfig::default()
        },
        ..SpeciesProfile::new(key)
    }
}

/// Runs `frames` updates at [`DT`] with a fixed observer.
#[allow(dead_code)]
pub fn run(world: &mut World, frames: usize) {
    for _ in 0..frames {
        world.update(DT, OBSERVER);
    }
}

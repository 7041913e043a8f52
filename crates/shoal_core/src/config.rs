//! Configuration management for simulation parameters.
//!
//! This module provides strongly-typed configuration structures that map to
//! the `config.toml` file. Every tunable of the simulation (radii, speeds,
//! counts, bias tags, wiggle parameters) is plain data consumed when the
//! simulation is constructed.
//!
//! ## Configuration Hierarchy
//!
//! 1. Default values (hardcoded in `Default` impl)
//! 2. `config.toml` file (overrides defaults)
//!
//! ## Example `config.toml`
//!
//! ```toml
//! [world]
//! seed = 7
//! shoreline = 0.0
//! floor = -5.0
//! surface = 0.0
//!
//! [steering]
//! separation_radius = 1.5
//! max_accel = 6.0
//!
//! [[species]]
//! key = "sardine"
//! column = "Surface"
//! ```

use crate::containment::ShoreFrame;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use shoal_data::{
    AxisFlips, ShoreZone, SpeciesProfile, WaterColumn, WiggleConfig, WiggleEnd, WiggleMode,
};
use std::path::Path;

/// Upper bound on agents across all species.
pub const MAX_POPULATION: usize = 10_000;

/// Fixed world geometry and population parameters.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct WorldConfig {
    pub seed: Option<u64>,
    /// Shore-axis minimum of the swim box.
    pub shoreline: f32,
    /// Depth-axis minimum.
    pub floor: f32,
    /// Depth-axis maximum.
    pub surface: f32,
    pub lateral_min: f32,
    pub lateral_max: f32,
    /// Smallest allowed distance between the shoreline and the moving bound.
    pub min_shore_span: f32,
    pub initial_observer: [f32; 3],
    pub render_distance: f32,
    /// Agents per species before `abundance_scale` is applied.
    pub base_population: usize,
    /// Longest frame step the simulation accepts, in seconds.
    pub max_dt: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: None,
            shoreline: 0.0,
            floor: -5.0,
            surface: 0.0,
            lateral_min: -20.0,
            lateral_max: 20.0,
            min_shore_span: 0.5,
            initial_observer: [10.0, -1.0, 0.0],
            render_distance: 35.0,
            base_population: 40,
            max_dt: 0.1,
        }
    }
}

impl WorldConfig {
    #[must_use]
    pub fn shore_frame(&self) -> ShoreFrame {
        ShoreFrame {
            shoreline: self.shoreline,
            floor: self.floor,
            surface: self.surface,
            lateral_min: self.lateral_min,
            lateral_max: self.lateral_max,
            min_shore_span: self.min_shore_span,
        }
    }

    #[must_use]
    pub fn observer(&self) -> Vec3 {
        Vec3::from_array(self.initial_observer)
    }
}

/// Steering force gains and speed envelope.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct SteeringConfig {
    pub separation_radius: f32,
    pub separation_strength: f32,
    pub seek_intensity: f32,
    pub max_accel: f32,
    pub containment_gain: f32,
    pub target_reach_dist: f32,
    /// Lower bound of the randomized retarget countdown, seconds.
    pub retarget_min: f32,
    /// Upper bound of the randomized retarget countdown, seconds.
    pub retarget_max: f32,
    pub base_speed_min: f32,
    pub base_speed_max: f32,
    /// Distance below which seek contributes nothing.
    pub arrival_epsilon: f32,
}

impl Default for SteeringConfig {
    fn default() -> Self {
        Self {
            separation_radius: 1.5,
            separation_strength: 2.0,
            seek_intensity: 1.5,
            max_accel: 6.0,
            containment_gain: 25.0,
            target_reach_dist: 0.75,
            retarget_min: 3.0,
            retarget_max: 8.0,
            base_speed_min: 0.6,
            base_speed_max: 2.0,
            arrival_epsilon: 1e-3,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct SpatialConfig {
    /// Spatial index rebuilds per simulated second.
    pub rebuild_hz: f32,
}

impl Default for SpatialConfig {
    fn default() -> Self {
        Self { rebuild_hz: 30.0 }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct AnimationConfig {
    pub speed_factor_min: f32,
    pub speed_factor_max: f32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            speed_factor_min: 0.4,
            speed_factor_max: 1.5,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub world: WorldConfig,
    pub steering: SteeringConfig,
    pub spatial: SpatialConfig,
    pub animation: AnimationConfig,
    pub species: Vec<SpeciesProfile>,
    pub target_fps: u64,
    pub log_interval_ticks: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            steering: SteeringConfig::default(),
            spatial: SpatialConfig::default(),
            animation: AnimationConfig::default(),
            species: default_catalog(),
            target_fps: 60,
            log_interval_ticks: 600,
        }
    }
}

/// Species shipped with the default configuration.
#[must_use]
pub fn default_catalog() -> Vec<SpeciesProfile> {
    let sardine = SpeciesProfile {
        size_scale: 0.6,
        speed_scale: 1.3,
        abundance_scale: 1.5,
        shore: ShoreZone::Offshore,
        column: WaterColumn::Surface,
        wiggle: WiggleConfig {
            period: 0.45,
            amplitude: 0.3,
            ..WiggleConfig::default()
        },
        ..SpeciesProfile::new("sardine")
    };

    let wrasse = SpeciesProfile {
        size_scale: 0.9,
        speed_scale: 0.8,
        abundance_scale: 0.6,
        shore: ShoreZone::Shallows,
        column: WaterColumn::Benthic,
        wiggle: WiggleConfig {
            softness: 0.5,
            ..WiggleConfig::default()
        },
        flips: AxisFlips {
            x: true,
            ..AxisFlips::default()
        },
        ..SpeciesProfile::new("wrasse")
    };

    let ray = SpeciesProfile {
        size_scale: 1.8,
        speed_scale: 0.7,
        abundance_scale: 0.25,
        shore: ShoreZone::Midwater,
        column: WaterColumn::Benthic,
        wiggle: WiggleConfig {
            mode: WiggleMode::UpDown,
            end: WiggleEnd::Tail,
            period: 1.6,
            amplitude: 0.2,
            ..WiggleConfig::default()
        },
        clip: Some("ray_glide".to_string()),
        ..SpeciesProfile::new("ray")
    };

    vec![sardine, wrasse, ray]
}

impl AppConfig {
    /// Validates all configuration parameters.
    ///
    /// Returns `Ok(())` if all parameters are valid, or `Err` with a description
    /// of the first validation failure.
    pub fn validate(&self) -> anyhow::Result<()> {
        // World validation
        self.world.shore_frame().validate()?;
        anyhow::ensure!(
            self.world.render_distance > 0.0,
            "Render distance must be positive"
        );
        anyhow::ensure!(
            self.world.base_population <= MAX_POPULATION,
            "Base population too large (max {MAX_POPULATION})"
        );
        anyhow::ensure!(self.world.max_dt > 0.0, "Max dt must be positive");
        anyhow::ensure!(
            self.world.initial_observer.iter().all(|c| c.is_finite()),
            "Initial observer position must be finite"
        );

        // Steering validation
        let s = &self.steering;
        anyhow::ensure!(
            s.separation_radius > 0.0,
            "Separation radius must be positive"
        );
        anyhow::ensure!(
            s.separation_strength >= 0.0,
            "Separation strength must be non-negative"
        );
        anyhow::ensure!(
            s.seek_intensity >= 0.0,
            "Seek intensity must be non-negative"
        );
        anyhow::ensure!(s.max_accel > 0.0, "Max acceleration must be positive");
        anyhow::ensure!(
            s.containment_gain >= 0.0,
            "Containment gain must be non-negative"
        );
        anyhow::ensure!(
            s.target_reach_dist >= 0.0,
            "Target reach distance must be non-negative"
        );
        anyhow::ensure!(
            s.retarget_min > 0.0 && s.retarget_min <= s.retarget_max,
            "Retarget range must satisfy 0 < min <= max"
        );
        anyhow::ensure!(
            s.base_speed_max > 0.0,
            "Base max speed must be positive"
        );
        anyhow::ensure!(
            s.base_speed_min > 0.0 && s.base_speed_min <= s.base_speed_max,
            "Base speed range must satisfy 0 < min <= max"
        );

        // Spatial validation
        anyhow::ensure!(
            self.spatial.rebuild_hz > 0.0,
            "Spatial rebuild rate must be positive"
        );

        // Animation validation
        anyhow::ensure!(
            self.animation.speed_factor_min > 0.0
                && self.animation.speed_factor_min <= self.animation.speed_factor_max,
            "Wiggle speed factor range must satisfy 0 < min <= max"
        );

        // Species validation
        for species in &self.species {
            anyhow::ensure!(!species.key.is_empty(), "Species key must not be empty");
            anyhow::ensure!(
                species.speed_scale > 0.0,
                "Species {} speed scale must be positive",
                species.key
            );
            anyhow::ensure!(
                species.size_scale > 0.0,
                "Species {} size scale must be positive",
                species.key
            );
            anyhow::ensure!(
                species.abundance_scale >= 0.0 && species.abundance_scale.is_finite(),
                "Species {} abundance scale must be finite and non-negative",
                species.key
            );
            for bias in [species.resolved_shore_bias(), species.resolved_depth_bias()] {
                anyhow::ensure!(
                    bias.sigma >= 0.0 && bias.mean.is_finite(),
                    "Species {} bias must have finite mean and non-negative sigma",
                    species.key
                );
            }
            if species.wiggle.enabled {
                anyhow::ensure!(
                    species.wiggle.period > 0.0,
                    "Species {} wiggle period must be positive",
                    species.key
                );
                anyhow::ensure!(
                    species.wiggle.softness.is_finite() && species.wiggle.amplitude.is_finite(),
                    "Species {} wiggle softness and amplitude must be finite",
                    species.key
                );
            }
        }
        let total: usize = self
            .species
            .iter()
            .map(|s| crate::lifecycle::population_for(s, &self.world))
            .fold(0_usize, usize::saturating_add);
        anyhow::ensure!(
            total <= MAX_POPULATION,
            "Total population {total} exceeds {MAX_POPULATION}"
        );
        let mut keys: Vec<&str> = self.species.iter().map(|s| s.key.as_str()).collect();
        keys.sort_unstable();
        keys.dedup();
        anyhow::ensure!(
            keys.len() == self.species.len(),
            "Species keys must be unique"
        );

        // Target FPS validation
        anyhow::ensure!(self.target_fps > 0, "Target FPS must be positive");
        anyhow::ensure!(self.target_fps <= 240, "Target FPS too high (max 240)");

        Ok(())
    }

    /// Parses and validates configuration from TOML text.
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config = toml::from_str::<Self>(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from `path`, falling back to defaults when the file
    /// does not exist. A file that exists but fails to parse or validate is an
    /// error.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::warn!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
            .map_err(|e| e.context(format!("invalid config {}", path.display())))
    }

    /// Stable hash of every behavior-affecting section, for run provenance.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(format!("{:?}", self.world).as_bytes());
        hasher.update(format!("{:?}", self.steering).as_bytes());
        hasher.update(format!("{:?}", self.spatial).as_bytes());
        hasher.update(format!("{:?}", self.animation).as_bytes());
        hasher.update(format!("{:?}", self.species).as_bytes());
        hex::encode(hasher.finalize())
    }
}

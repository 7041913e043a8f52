use serde::{Deserialize, Serialize};

/// Normalized preference along one axis of the swim box.
///
/// `mean` is a fraction of the axis span measured from the volume minimum,
/// `sigma` is the standard deviation expressed as a fraction of the span.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisBias {
    pub mean: f32,
    pub sigma: f32,
}

impl AxisBias {
    #[must_use]
    pub const fn new(mean: f32, sigma: f32) -> Self {
        Self { mean, sigma }
    }
}

/// Where along the shore-axis a species likes to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ShoreZone {
    Shallows,
    #[default]
    Midwater,
    Offshore,
}

impl ShoreZone {
    #[must_use]
    pub fn bias(self) -> AxisBias {
        match self {
            ShoreZone::Shallows => AxisBias::new(0.15, 0.10),
            ShoreZone::Midwater => AxisBias::new(0.50, 0.20),
            ShoreZone::Offshore => AxisBias::new(0.85, 0.10),
        }
    }
}

/// Where in the water column a species likes to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum WaterColumn {
    Benthic,
    #[default]
    Midwater,
    Surface,
}

impl WaterColumn {
    #[must_use]
    pub fn bias(self) -> AxisBias {
        match self {
            WaterColumn::Benthic => AxisBias::new(0.10, 0.08),
            WaterColumn::Midwater => AxisBias::new(0.50, 0.20),
            WaterColumn::Surface => AxisBias::new(0.90, 0.08),
        }
    }
}

/// Swing plane of the procedural wiggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum WiggleMode {
    /// Rotates about the mesh up axis (fish tail).
    #[default]
    SideToSide,
    /// Rotates about the mesh lateral axis (dolphin/whale flukes).
    UpDown,
}

/// Which end of the body the wiggle drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum WiggleEnd {
    Head,
    #[default]
    Tail,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WiggleConfig {
    pub enabled: bool,
    pub mode: WiggleMode,
    pub end: WiggleEnd,
    /// Seconds per full cycle at the reference speed.
    pub period: f32,
    /// Peak rotation in radians.
    pub amplitude: f32,
    /// Width of the head/tail skin blend band, as a fraction of body length.
    pub softness: f32,
}

impl Default for WiggleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            mode: WiggleMode::SideToSide,
            end: WiggleEnd::Tail,
            period: 0.8,
            amplitude: 0.35,
            softness: 0.3,
        }
    }
}

/// Per-axis sign flips for meshes authored facing the "wrong" way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AxisFlips {
    pub x: bool,
    pub y: bool,
    pub z: bool,
}

impl AxisFlips {
    /// Sign multiplier for the given axis index (0 = x, 1 = y, 2 = z).
    #[must_use]
    pub fn sign(&self, axis: usize) -> f32 {
        let flipped = match axis {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        };
        if flipped {
            -1.0
        } else {
            1.0
        }
    }
}

/// Static description of one fish species. Loaded once from the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesProfile {
    pub key: String,
    #[serde(default = "one")]
    pub size_scale: f32,
    #[serde(default = "one")]
    pub speed_scale: f32,
    #[serde(default = "one")]
    pub abundance_scale: f32,
    #[serde(default)]
    pub shore: ShoreZone,
    #[serde(default)]
    pub column: WaterColumn,
    /// Explicit shore-axis bias, overriding the `shore` tag.
    #[serde(default)]
    pub shore_bias: Option<AxisBias>,
    /// Explicit depth-axis bias, overriding the `column` tag.
    #[serde(default)]
    pub depth_bias: Option<AxisBias>,
    #[serde(default)]
    pub wiggle: WiggleConfig,
    #[serde(default)]
    pub flips: AxisFlips,
    #[serde(default)]
    pub clip: Option<String>,
}

fn one() -> f32 {
    1.0
}

impl SpeciesProfile {
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            size_scale: 1.0,
            speed_scale: 1.0,
            abundance_scale: 1.0,
            shore: ShoreZone::default(),
            column: WaterColumn::default(),
            shore_bias: None,
            depth_bias: None,
            wiggle: WiggleConfig::default(),
            flips: AxisFlips::default(),
            clip: None,
        }
    }

    #[must_use]
    pub fn resolved_shore_bias(&self) -> AxisBias {
        self.shore_bias.unwrap_or_else(|| self.shore.bias())
    }

    #[must_use]
    pub fn resolved_depth_bias(&self) -> AxisBias {
        self.depth_bias.unwrap_or_else(|| self.column.bias())
    }
}

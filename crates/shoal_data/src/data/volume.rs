use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Axis-aligned containment volume agents swim in.
///
/// Axes: x runs from the shoreline out toward the observer, y from the floor up
/// to the water surface, z is lateral.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SwimBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl SwimBox {
    #[must_use]
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    #[must_use]
    pub fn span(&self) -> Vec3 {
        self.max - self.min
    }

    #[must_use]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }
}

impl Default for SwimBox {
    fn default() -> Self {
        Self {
            min: Vec3::new(0.0, -5.0, -20.0),
            max: Vec3::new(10.0, 0.0, 20.0),
        }
    }
}

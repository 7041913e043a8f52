//! The swim box: an axis-aligned volume whose shore-axis maximum follows the
//! observer. Recomputed every frame from a handful of scalars.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use shoal_data::SwimBox;

/// Fixed world constants the swim box is derived from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShoreFrame {
    pub shoreline: f32,
    pub floor: f32,
    pub surface: f32,
    pub lateral_min: f32,
    pub lateral_max: f32,
    /// The moving bound never comes closer than this to the shoreline.
    pub min_shore_span: f32,
}

impl ShoreFrame {
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            [
                self.shoreline,
                self.floor,
                self.surface,
                self.lateral_min,
                self.lateral_max,
                self.min_shore_span
            ]
            .iter()
            .all(|v| v.is_finite()),
            "Shore frame values must be finite"
        );
        anyhow::ensure!(self.floor < self.surface, "Floor must be below surface");
        anyhow::ensure!(
            self.lateral_min < self.lateral_max,
            "Lateral min must be less than lateral max"
        );
        anyhow::ensure!(
            self.min_shore_span > 0.0,
            "Minimum shore span must be positive"
        );
        Ok(())
    }
}

pub trait ContainmentLogic {
    /// Rewrites all six bounds from the frame constants and the observer.
    fn recompute(&mut self, frame: &ShoreFrame, observer: Vec3);
    fn contains(&self, p: Vec3) -> bool;
    fn clamp_point(&self, p: Vec3) -> Vec3;
    /// Signed distance back inside, per axis; zero on axes where `p` is inside.
    fn penetration(&self, p: Vec3) -> Vec3;
}

impl ContainmentLogic for SwimBox {
    fn recompute(&mut self, frame: &ShoreFrame, observer: Vec3) {
        let floor_of_max = frame.shoreline + frame.min_shore_span;
        let shore_max = if observer.x.is_finite() {
            observer.x.max(floor_of_max)
        } else {
            floor_of_max
        };
        self.min = Vec3::new(frame.shoreline, frame.floor, frame.lateral_min);
        self.max = Vec3::new(shore_max, frame.surface, frame.lateral_max);
    }

    fn contains(&self, p: Vec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }

    fn clamp_point(&self, p: Vec3) -> Vec3 {
        // NaN lanes go to the center rather than whichever bound `clamp` picks.
        let p = Vec3::select(p.is_nan_mask(), self.center(), p);
        p.clamp(self.min, self.max)
    }

    fn penetration(&self, p: Vec3) -> Vec3 {
        let below = (self.min - p).max(Vec3::ZERO);
        let above = (p - self.max).max(Vec3::ZERO);
        below - above
    }
}

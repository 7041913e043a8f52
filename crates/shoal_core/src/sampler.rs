//! Biased random positions inside the swim box.
//!
//! The shore-axis (x) and depth-axis (y) are drawn from a normal distribution
//! centered on the species' preferred fraction of the span; the lateral axis
//! (z) is uniform. Results are always clamped into the volume.

use crate::containment::ContainmentLogic;
use glam::Vec3;
use rand::Rng;
use rand_distr::StandardNormal;
use shoal_data::{AxisBias, SpeciesProfile, SwimBox};

/// Draws one point inside `volume` biased toward the given normalized means.
///
/// A sigma of zero pins that axis to exactly `min + mean * span`.
pub fn biased_point<R: Rng + ?Sized>(
    volume: &SwimBox,
    shore: AxisBias,
    depth: AxisBias,
    rng: &mut R,
) -> Vec3 {
    let span = volume.span();
    let x = biased_coord(volume.min.x, span.x, shore, rng);
    let y = biased_coord(volume.min.y, span.y, depth, rng);
    let z = volume.min.z + rng.gen::<f32>() * span.z;
    volume.clamp_point(Vec3::new(x, y, z))
}

/// [`biased_point`] with the species' resolved shore and depth preferences.
pub fn species_point<R: Rng + ?Sized>(
    volume: &SwimBox,
    species: &SpeciesProfile,
    rng: &mut R,
) -> Vec3 {
    biased_point(
        volume,
        species.resolved_shore_bias(),
        species.resolved_depth_bias(),
        rng,
    )
}

pub fn uniform_point<R: Rng + ?Sized>(volume: &SwimBox, rng: &mut R) -> Vec3 {
    let t = Vec3::new(rng.gen(), rng.gen(), rng.gen());
    volume.clamp_point(volume.min + t * volume.span())
}

fn biased_coord<R: Rng + ?Sized>(min: f32, span: f32, bias: AxisBias, rng: &mut R) -> f32 {
    let mean = min + bias.mean.clamp(0.0, 1.0) * span;
    if bias.sigma <= 0.0 {
        return mean;
    }
    let n: f32 = rng.sample(StandardNormal);
    mean + bias.sigma * span * n
}

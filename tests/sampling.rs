use glam::Vec3;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use shoal_core::sampler::{biased_point, species_point};
use shoal_data::{AxisBias, ShoreZone, SpeciesProfile, SwimBox, WaterColumn};

const SAMPLES: usize = 10_000;

fn volume() -> SwimBox {
    SwimBox::new(Vec3::new(0.0, -5.0, -20.0), Vec3::new(10.0, 0.0, 20.0))
}

fn mean_and_std(values: &[f32]) -> (f32, f32) {
    let n = values.len() as f64;
    let mean = values.iter().map(|&v| f64::from(v)).sum::<f64>() / n;
    let var = values
        .iter()
        .map(|&v| (f64::from(v) - mean).powi(2))
        .sum::<f64>()
        / n;
    (mean as f32, var.sqrt() as f32)
}

#[test]
fn test_shore_axis_distribution_matches_bias() {
    let mut rng = ChaCha8Rng::seed_from_u64(2024);
    let v = volume();
    let xs: Vec<f32> = (0..SAMPLES)
        .map(|_| {
            biased_point(&v, AxisBias::new(0.3, 0.1), AxisBias::new(0.5, 0.0), &mut rng).x
        })
        .collect();
    let (mean, std) = mean_and_std(&xs);
    // mean 0.3 * 10, sigma 0.1 * 10
    assert!((mean - 3.0).abs() < 0.05, "mean {mean}");
    assert!((std - 1.0).abs() < 0.05, "std {std}");
}

#[test]
fn test_depth_axis_distribution_matches_bias() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let v = volume();
    let ys: Vec<f32> = (0..SAMPLES)
        .map(|_| {
            biased_point(&v, AxisBias::new(0.5, 0.0), AxisBias::new(0.8, 0.05), &mut rng).y
        })
        .collect();
    let (mean, std) = mean_and_std(&ys);
    // -5 + 0.8 * 5, sigma 0.05 * 5
    assert!((mean + 1.0).abs() < 0.03, "mean {mean}");
    assert!((std - 0.25).abs() < 0.02, "std {std}");
}

#[test]
fn test_lateral_axis_is_uniform() {
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    let v = volume();
    let zs: Vec<f32> = (0..SAMPLES)
        .map(|_| biased_point(&v, AxisBias::new(0.5, 0.1), AxisBias::new(0.5, 0.1), &mut rng).z)
        .collect();
    let (mean, _) = mean_and_std(&zs);
    assert!(mean.abs() < 0.6, "mean {mean}");
    let left = zs.iter().filter(|&&z| z < -10.0).count();
    let right = zs.iter().filter(|&&z| z > 10.0).count();
    // each outer quarter holds about a quarter of the samples
    assert!((2000..3000).contains(&left), "left {left}");
    assert!((2000..3000).contains(&right), "right {right}");
}

#[test]
fn test_zero_sigma_pins_both_axes() {
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let v = volume();
    for _ in 0..1000 {
        let p = biased_point(&v, AxisBias::new(0.3, 0.0), AxisBias::new(0.8, 0.0), &mut rng);
        assert_eq!(p.x, 3.0);
        assert_eq!(p.y, -1.0);
    }
}

#[test]
fn test_tags_separate_species() {
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let v = volume();
    let shallow_benthic = SpeciesProfile {
        shore: ShoreZone::Shallows,
        column: WaterColumn::Benthic,
        ..SpeciesProfile::new("goby")
    };
    let offshore_surface = SpeciesProfile {
        shore: ShoreZone::Offshore,
        column: WaterColumn::Surface,
        ..SpeciesProfile::new("sardine")
    };
    let avg = |species: &SpeciesProfile, rng: &mut ChaCha8Rng| {
        (0..2000).fold(Vec3::ZERO, |acc, _| acc + species_point(&v, species, rng)) / 2000.0
    };
    let a = avg(&shallow_benthic, &mut rng);
    let b = avg(&offshore_surface, &mut rng);
    assert!(a.x < 3.0 && b.x > 7.0, "shore means {} {}", a.x, b.x);
    assert!(a.y < -4.0 && b.y > -1.0, "depth means {} {}", a.y, b.y);
}

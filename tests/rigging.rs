use glam::Vec3;
use shoal_core::assets::{prepare_species_asset, AssetLoader, ProceduralFishLoader, SpeciesRuntime};
use shoal_core::error::RigError;
use shoal_core::rig::{auto_rig, detect_frame};
use shoal_data::{AxisFlips, MaterialId, MeshGeometry, SpeciesAsset, SpeciesProfile};

fn fish_geometry(species: &SpeciesProfile) -> MeshGeometry {
    ProceduralFishLoader::default()
        .load(species)
        .expect("procedural loader never fails for known keys")
        .geometry
}

#[test]
fn test_weights_partition_unity() {
    let species = SpeciesProfile::new("cod");
    let rigged = auto_rig(&fish_geometry(&species), AxisFlips::default(), 0.3, MaterialId(1))
        .expect("fish mesh should rig");

    assert_eq!(rigged.skin.weights.len(), rigged.geometry.positions.len());
    assert_eq!(rigged.skin.joints.len(), rigged.geometry.positions.len());
    assert!(rigged.geometry.indices.is_none());
    for (w, j) in rigged.skin.weights.iter().zip(&rigged.skin.joints) {
        assert!((w.iter().sum::<f32>() - 1.0).abs() < 1e-5, "{w:?}");
        assert!(w.iter().all(|x| (0.0..=1.0).contains(x)));
        assert_eq!(*j, [0, 1, 0, 0]);
    }
}

#[test]
fn test_head_weight_monotonic_along_body() {
    for flips in [AxisFlips::default(), AxisFlips { x: true, ..AxisFlips::default() }] {
        let species = SpeciesProfile {
            flips,
            ..SpeciesProfile::new("cod")
        };
        let geometry = fish_geometry(&species);
        let rigged = auto_rig(&geometry, flips, 0.4, MaterialId(0)).expect("rig");
        let bounds = rigged.geometry.bounding_box().expect("non-empty");
        let frame = detect_frame(&bounds, flips).expect("finite");

        let mut rows: Vec<(f32, f32)> = rigged
            .geometry
            .positions
            .iter()
            .zip(&rigged.skin.weights)
            .map(|(p, w)| (p.dot(frame.forward), w[0]))
            .collect();
        rows.sort_by(|a, b| a.0.total_cmp(&b.0));
        for pair in rows.windows(2) {
            assert!(pair[0].1 <= pair[1].1 + 1e-6, "{pair:?}");
        }
        // the nose is all head, the tail tip all tail
        assert_eq!(rows.first().map(|r| r.1), Some(0.0));
        assert_eq!(rows.last().map(|r| r.1), Some(1.0));
    }
}

#[test]
fn test_head_bone_sits_toward_nose() {
    let species = SpeciesProfile::new("cod");
    let rigged = auto_rig(&fish_geometry(&species), AxisFlips::default(), 0.3, MaterialId(0))
        .expect("rig");
    let head = rigged.skeleton.model_position(0).expect("head");
    let tail = rigged.skeleton.model_position(1).expect("tail");
    assert!(head.x > 0.0 && tail.x < 0.0);
    assert!((head.x - 0.25).abs() < 1e-4 && (tail.x + 0.25).abs() < 1e-4);
}

#[test]
fn test_flat_mesh_is_degenerate() {
    let flat = MeshGeometry::new(vec![Vec3::ONE; 12], None);
    let err = auto_rig(&flat, AxisFlips::default(), 0.3, MaterialId(0)).unwrap_err();
    assert!(matches!(err, RigError::DegenerateSpan { .. }));
    let empty = MeshGeometry::new(Vec::new(), None);
    assert!(matches!(
        auto_rig(&empty, AxisFlips::default(), 0.3, MaterialId(0)),
        Err(RigError::EmptyGeometry)
    ));
}

#[test]
fn test_asset_selection() {
    let loader = ProceduralFishLoader::default().without(["ghost"]);

    let plain = prepare_species_asset(&SpeciesProfile::new("cod"), &loader);
    assert!(matches!(plain.asset, SpeciesAsset::AutoRigged { .. }));

    let mut authored = SpeciesProfile::new("ray");
    authored.clip = Some("glide".to_string());
    let prepared = prepare_species_asset(&authored, &loader);
    assert!(matches!(prepared.asset, SpeciesAsset::PreRigged { .. }));
    assert!(prepared.asset.clip().is_some());

    let mut still = SpeciesProfile::new("rock");
    still.wiggle.enabled = false;
    let prepared = prepare_species_asset(&still, &loader);
    assert!(matches!(prepared.asset, SpeciesAsset::Rigid { .. }));

    let missing = prepare_species_asset(&SpeciesProfile::new("ghost"), &loader);
    assert!(missing.placeholder);
    assert!(!SpeciesRuntime::new(missing.asset, AxisFlips::default()).is_skinned());
}

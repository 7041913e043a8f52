//! Species asset preparation.
//!
//! Mesh loading is an external concern behind [`AssetLoader`]. Whatever the
//! loader returns is turned once per species into a [`SpeciesAsset`]: a
//! shipped skeleton is kept as-is, a bare mesh is auto-rigged when the species
//! wiggles, and anything that fails degrades to a rigid mesh (or a placeholder
//! box when loading itself failed). None of these failures stop the
//! simulation.

use crate::error::{AssetError, AssetResult, RigError};
use crate::rig::{auto_rig, detect_frame, MeshFrame};
use glam::Vec3;
use shoal_data::{
    Aabb, AxisFlips, Bone, ClipHandle, MaterialId, MeshGeometry, SkinAttributes, Skeleton,
    SkinnedMesh, SpeciesAsset, SpeciesProfile,
};
use std::collections::HashSet;
use std::f32::consts::{PI, TAU};

/// Placeholder box dimensions (length, height, width).
pub const PLACEHOLDER_SIZE: Vec3 = Vec3::new(1.0, 0.4, 0.25);

/// Length of the clips the procedural loader attaches.
pub const AUTHORED_CLIP_SECONDS: f32 = 1.2;

/// What a loader hands back for one species.
#[derive(Debug, Clone)]
pub struct LoadedAsset {
    pub geometry: MeshGeometry,
    /// Authored skeleton and its skin, when the asset ships one.
    pub skeleton: Option<(Skeleton, SkinAttributes)>,
    pub clip: Option<ClipHandle>,
    pub material: MaterialId,
}

pub trait AssetLoader: Send + Sync {
    fn load(&self, species: &SpeciesProfile) -> AssetResult<LoadedAsset>;
}

/// A prepared species asset plus how it got that way.
#[derive(Debug, Clone)]
pub struct PreparedAsset {
    pub asset: SpeciesAsset,
    pub placeholder: bool,
    pub rig_error: Option<RigError>,
}

/// Axis-aligned box centered on the origin, long along +x.
#[must_use]
pub fn placeholder_geometry() -> MeshGeometry {
    let h = PLACEHOLDER_SIZE * 0.5;
    let positions = (0..8)
        .map(|i| {
            Vec3::new(
                if i & 1 == 0 { -h.x } else { h.x },
                if i & 2 == 0 { -h.y } else { h.y },
                if i & 4 == 0 { -h.z } else { h.z },
            )
        })
        .collect();
    #[rustfmt::skip]
    let indices = vec![
        0, 2, 1, 1, 2, 3, // -z
        4, 5, 6, 5, 7, 6, // +z
        0, 1, 4, 1, 5, 4, // -y
        2, 6, 3, 3, 6, 7, // +y
        0, 4, 2, 2, 4, 6, // -x
        1, 3, 5, 3, 7, 5, // +x
    ];
    MeshGeometry::new(positions, Some(indices))
}

/// Loads and prepares one species' asset. Never fails; see module docs.
pub fn prepare_species_asset(species: &SpeciesProfile, loader: &dyn AssetLoader) -> PreparedAsset {
    let loaded = loader.load(species).and_then(|asset| {
        if asset.geometry.is_empty() {
            Err(AssetError::invalid("mesh has no vertices"))
        } else {
            Ok(asset)
        }
    });
    let loaded = match loaded {
        Ok(asset) => asset,
        Err(e) => {
            tracing::warn!(species = %species.key, error = %e, "Asset unavailable, using placeholder");
            return PreparedAsset {
                asset: SpeciesAsset::Rigid {
                    geometry: placeholder_geometry(),
                    material: MaterialId::default(),
                },
                placeholder: true,
                rig_error: None,
            };
        }
    };

    let LoadedAsset {
        geometry,
        skeleton,
        clip,
        material,
    } = loaded;

    if let Some((skeleton, skin)) = skeleton {
        return PreparedAsset {
            asset: SpeciesAsset::PreRigged {
                mesh: SkinnedMesh {
                    geometry,
                    skin,
                    skeleton,
                    material,
                },
                clip,
            },
            placeholder: false,
            rig_error: None,
        };
    }

    if !species.wiggle.enabled {
        return PreparedAsset {
            asset: SpeciesAsset::Rigid { geometry, material },
            placeholder: false,
            rig_error: None,
        };
    }

    match auto_rig(&geometry, species.flips, species.wiggle.softness, material) {
        Ok(mesh) => {
            tracing::debug!(species = %species.key, vertices = mesh.geometry.vertex_count(), "Auto-rigged mesh");
            PreparedAsset {
                asset: SpeciesAsset::AutoRigged { mesh },
                placeholder: false,
                rig_error: None,
            }
        }
        Err(e) => {
            tracing::warn!(species = %species.key, error = %e, "Auto-rig failed, species stays rigid");
            PreparedAsset {
                asset: SpeciesAsset::Rigid { geometry, material },
                placeholder: false,
                rig_error: Some(e),
            }
        }
    }
}

/// Per-species data cached at startup and shared by every agent of it.
#[derive(Debug, Clone)]
pub struct SpeciesRuntime {
    pub asset: SpeciesAsset,
    /// Bind-pose bounds of the species mesh.
    pub bounds: Aabb,
    pub frame: MeshFrame,
}

impl SpeciesRuntime {
    #[must_use]
    pub fn new(asset: SpeciesAsset, flips: AxisFlips) -> Self {
        let bounds = asset.geometry().bounding_box().unwrap_or(Aabb {
            min: -PLACEHOLDER_SIZE * 0.5,
            max: PLACEHOLDER_SIZE * 0.5,
        });
        let frame = detect_frame(&bounds, flips).unwrap_or(MeshFrame {
            forward: Vec3::X,
            up: Vec3::Y,
            forward_axis: 0,
        });
        Self {
            asset,
            bounds,
            frame,
        }
    }

    #[must_use]
    pub fn is_skinned(&self) -> bool {
        self.asset.skeleton().is_some()
    }
}

/// Built-in loader that generates a spindle-shaped fish for every species.
///
/// Meshes face +x and are mirrored on the axes the species flips, as if they
/// had been authored that way. Species with a clip get a three-bone authored
/// skeleton; the rest come back unrigged. Keys in `missing` fail to load.
#[derive(Debug, Clone)]
pub struct ProceduralFishLoader {
    pub rings: usize,
    pub segments: usize,
    pub missing: HashSet<String>,
}

impl Default for ProceduralFishLoader {
    fn default() -> Self {
        Self {
            rings: 8,
            segments: 8,
            missing: HashSet::new(),
        }
    }
}

impl ProceduralFishLoader {
    #[must_use]
    pub fn without<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.missing.extend(keys.into_iter().map(Into::into));
        self
    }

    fn spindle(&self) -> MeshGeometry {
        let rings = self.rings.max(1);
        let segments = self.segments.max(3);
        let step = TAU / segments as f32;
        let mut positions = Vec::with_capacity(rings * segments + 2);
        positions.push(Vec3::new(0.5, 0.0, 0.0));
        for r in 0..rings {
            let t = (r + 1) as f32 / (rings + 1) as f32;
            let x = 0.5 - t;
            // fuller toward the head
            let girth = (PI * t).sin() * (1.2 - 0.4 * t);
            for s in 0..segments {
                let a = step * s as f32;
                positions.push(Vec3::new(x, 0.14 * girth * a.sin(), 0.06 * girth * a.cos()));
            }
        }
        positions.push(Vec3::new(-0.5, 0.0, 0.0));

        let ring = |r: usize, s: usize| (1 + r * segments + s % segments) as u32;
        let tail = (positions.len() - 1) as u32;
        let mut indices = Vec::with_capacity(rings * segments * 6);
        for s in 0..segments {
            indices.extend([0, ring(0, s + 1), ring(0, s)]);
            indices.extend([tail, ring(rings - 1, s), ring(rings - 1, s + 1)]);
        }
        for r in 0..rings - 1 {
            for s in 0..segments {
                let (a, b) = (ring(r, s), ring(r, s + 1));
                let (c, d) = (ring(r + 1, s), ring(r + 1, s + 1));
                indices.extend([a, b, c, b, d, c]);
            }
        }
        MeshGeometry::new(positions, Some(indices))
    }

    fn authored_rig(positions: &[Vec3]) -> (Skeleton, SkinAttributes) {
        let skeleton = Skeleton::new(vec![
            Bone::new("spine", None, Vec3::ZERO),
            Bone::new("head", Some(0), Vec3::new(0.3, 0.0, 0.0)),
            Bone::new("tail", Some(0), Vec3::new(-0.35, 0.0, 0.0)),
        ]);
        let mut skin = SkinAttributes::default();
        for p in positions {
            let (bone, w) = if p.x >= 0.0 {
                (1, (p.x / 0.5).clamp(0.0, 1.0))
            } else {
                (2, (-p.x / 0.5).clamp(0.0, 1.0))
            };
            skin.joints.push([0, bone, 0, 0]);
            skin.weights.push([1.0 - w, w, 0.0, 0.0]);
        }
        (skeleton, skin)
    }
}

fn mirror(flips: AxisFlips) -> Vec3 {
    Vec3::new(flips.sign(0), flips.sign(1), flips.sign(2))
}

impl AssetLoader for ProceduralFishLoader {
    fn load(&self, species: &SpeciesProfile) -> AssetResult<LoadedAsset> {
        if self.missing.contains(&species.key) {
            return Err(AssetError::not_found(species.key.clone()));
        }
        let mut geometry = self.spindle();
        let (skeleton, clip) = match &species.clip {
            Some(clip) => {
                let flat = geometry.to_non_indexed();
                let rig = Self::authored_rig(&flat.positions);
                geometry = flat;
                (Some(rig), Some(ClipHandle::new(clip.as_str(), AUTHORED_CLIP_SECONDS)))
            }
            None => (None, None),
        };

        let m = mirror(species.flips);
        for p in &mut geometry.positions {
            *p *= m;
        }
        let skeleton = skeleton.map(|(mut skeleton, skin)| {
            for bone in &mut skeleton.bones {
                bone.translation *= m;
            }
            (skeleton, skin)
        });

        Ok(LoadedAsset {
            geometry,
            skeleton,
            clip,
            material: MaterialId(species_material(&species.key)),
        })
    }
}

fn species_material(key: &str) -> u32 {
    key.bytes()
        .fold(0x811c_9dc5_u32, |h, b| (h ^ u32::from(b)).wrapping_mul(0x0100_0193))
}

#[cfg(test)]
mod tests {
    use super::*;
    use shoal_data::WiggleConfig;

    struct Failing;

    impl AssetLoader for Failing {
        fn load(&self, species: &SpeciesProfile) -> AssetResult<LoadedAsset> {
            Err(AssetError::not_found(species.key.clone()).with_context("test loader"))
        }
    }

    struct Flat;

    impl AssetLoader for Flat {
        fn load(&self, _species: &SpeciesProfile) -> AssetResult<LoadedAsset> {
            Ok(LoadedAsset {
                geometry: MeshGeometry::new(vec![Vec3::ZERO; 4], None),
                skeleton: None,
                clip: None,
                material: MaterialId(3),
            })
        }
    }

    #[test]
    fn test_placeholder_dimensions() {
        let size = placeholder_geometry().bounding_box().unwrap().size();
        assert_eq!(size, PLACEHOLDER_SIZE);
    }

    #[test]
    fn test_load_failure_gives_placeholder() {
        let prepared = prepare_species_asset(&SpeciesProfile::new("cod"), &Failing);
        assert!(prepared.placeholder);
        assert!(matches!(prepared.asset, SpeciesAsset::Rigid { .. }));
        assert!(prepared.asset.skeleton().is_none());
    }

    #[test]
    fn test_bare_mesh_is_auto_rigged() {
        let prepared = prepare_species_asset(&SpeciesProfile::new("cod"), &ProceduralFishLoader::default());
        assert!(matches!(prepared.asset, SpeciesAsset::AutoRigged { .. }));
        assert_eq!(prepared.asset.skeleton().unwrap().len(), 2);
    }

    #[test]
    fn test_no_wiggle_no_rig() {
        let species = SpeciesProfile {
            wiggle: WiggleConfig {
                enabled: false,
                ..WiggleConfig::default()
            },
            ..SpeciesProfile::new("eel")
        };
        let prepared = prepare_species_asset(&species, &ProceduralFishLoader::default());
        assert!(matches!(prepared.asset, SpeciesAsset::Rigid { .. }));
        assert!(!prepared.placeholder);
    }

    #[test]
    fn test_authored_skeleton_kept() {
        let species = SpeciesProfile {
            clip: Some("glide".into()),
            ..SpeciesProfile::new("ray")
        };
        let prepared = prepare_species_asset(&species, &ProceduralFishLoader::default());
        match &prepared.asset {
            SpeciesAsset::PreRigged { mesh, clip } => {
                assert_eq!(mesh.skeleton.len(), 3);
                let clip = clip.as_ref().unwrap();
                assert_eq!(clip.name, "glide");
                assert_eq!(clip.duration, AUTHORED_CLIP_SECONDS);
                assert_eq!(mesh.skin.weights.len(), mesh.geometry.vertex_count());
            }
            other => panic!("expected pre-rigged, got {other:?}"),
        }
    }

    #[test]
    fn test_rig_failure_stays_rigid() {
        let prepared = prepare_species_asset(&SpeciesProfile::new("blob"), &Flat);
        assert!(matches!(prepared.asset, SpeciesAsset::Rigid { material: MaterialId(3), .. }));
        assert!(matches!(prepared.rig_error, Some(RigError::DegenerateSpan { .. })));
    }

    #[test]
    fn test_missing_key_fails_to_load() {
        let loader = ProceduralFishLoader::default().without(["ray"]);
        assert!(loader.load(&SpeciesProfile::new("ray")).is_err());
        assert!(loader.load(&SpeciesProfile::new("cod")).is_ok());
    }

    #[test]
    fn test_flipped_species_faces_backward() {
        let species = SpeciesProfile {
            flips: AxisFlips {
                x: true,
                ..AxisFlips::default()
            },
            ..SpeciesProfile::new("wrasse")
        };
        let loaded = ProceduralFishLoader::default().load(&species).unwrap();
        assert_eq!(loaded.geometry.positions[0], Vec3::new(-0.5, 0.0, 0.0));
        let runtime = SpeciesRuntime::new(
            SpeciesAsset::Rigid {
                geometry: loaded.geometry,
                material: loaded.material,
            },
            species.flips,
        );
        assert_eq!(runtime.frame.forward, -Vec3::X);
    }
}

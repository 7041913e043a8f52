//! Mesh, skin and skeleton artifacts.
//!
//! These are deliberately renderer-agnostic: a mesh is a list of positions with
//! optional indices, a skeleton is a flat list of bones with parent links.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Smallest box containing every point, or `None` for an empty slice.
    #[must_use]
    pub fn from_points(points: &[Vec3]) -> Option<Self> {
        let first = *points.first()?;
        let (min, max) = points
            .iter()
            .fold((first, first), |(lo, hi), &p| (lo.min(p), hi.max(p)));
        Some(Self { min, max })
    }

    #[must_use]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    #[must_use]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }
}

/// Opaque handle to a surface material owned by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct MaterialId(pub u32);

/// Handle to an authored animation clip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipHandle {
    pub name: String,
    /// Clip length in seconds. Playback loops over `[0, duration)`.
    pub duration: f32,
}

impl ClipHandle {
    #[must_use]
    pub fn new(name: impl Into<String>, duration: f32) -> Self {
        Self {
            name: name.into(),
            duration,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct MeshGeometry {
    pub positions: Vec<Vec3>,
    pub indices: Option<Vec<u32>>,
}

impl MeshGeometry {
    #[must_use]
    pub fn new(positions: Vec<Vec3>, indices: Option<Vec<u32>>) -> Self {
        Self { positions, indices }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[must_use]
    pub fn bounding_box(&self) -> Option<Aabb> {
        Aabb::from_points(&self.positions)
    }

    /// Expands indexed triangles into one vertex per corner.
    ///
    /// Indices pointing past the vertex buffer are dropped.
    #[must_use]
    pub fn to_non_indexed(&self) -> MeshGeometry {
        match &self.indices {
            None => self.clone(),
            Some(indices) => MeshGeometry {
                positions: indices
                    .iter()
                    .filter_map(|&i| self.positions.get(i as usize).copied())
                    .collect(),
                indices: None,
            },
        }
    }
}

/// Four skin influences per vertex, matching common GPU skinning layouts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SkinAttributes {
    pub joints: Vec<[u16; 4]>,
    pub weights: Vec<[f32; 4]>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bone {
    pub name: String,
    pub parent: Option<usize>,
    /// Rest translation relative to the parent (or mesh origin for roots).
    pub translation: Vec3,
    pub rest_rotation: Quat,
    /// Current pose rotation, rewritten every frame by the animator.
    pub rotation: Quat,
}

impl Bone {
    #[must_use]
    pub fn new(name: impl Into<String>, parent: Option<usize>, translation: Vec3) -> Self {
        Self {
            name: name.into(),
            parent,
            translation,
            rest_rotation: Quat::IDENTITY,
            rotation: Quat::IDENTITY,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SkeletonId(pub Uuid);

impl SkeletonId {
    #[must_use]
    pub fn fresh() -> Self {
        Self(Uuid::new_v4())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skeleton {
    pub id: SkeletonId,
    pub bones: Vec<Bone>,
}

impl Skeleton {
    #[must_use]
    pub fn new(bones: Vec<Bone>) -> Self {
        Self {
            id: SkeletonId::fresh(),
            bones,
        }
    }

    /// Copy of this skeleton under a new identity, as happens when a mesh
    /// template is instantiated for an agent. Bone handles minted against the
    /// original no longer resolve against the copy.
    #[must_use]
    pub fn duplicate(&self) -> Self {
        Self {
            id: SkeletonId::fresh(),
            bones: self.bones.clone(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bones.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }

    /// Rest-pose position of a bone in mesh space. `None` for a bad index or a
    /// cyclic parent chain.
    #[must_use]
    pub fn model_position(&self, index: usize) -> Option<Vec3> {
        self.model_transform(index).map(|(position, _)| position)
    }

    /// Accumulated rest rotation of a bone's frame in mesh space.
    #[must_use]
    pub fn model_rotation(&self, index: usize) -> Option<Quat> {
        self.model_transform(index).map(|(_, rotation)| rotation)
    }

    fn model_transform(&self, index: usize) -> Option<(Vec3, Quat)> {
        let mut chain = Vec::new();
        let mut cursor = Some(index);
        while let Some(i) = cursor {
            let bone = self.bones.get(i)?;
            if chain.len() > self.bones.len() {
                return None;
            }
            chain.push(bone);
            cursor = bone.parent;
        }

        let mut position = Vec3::ZERO;
        let mut rotation = Quat::IDENTITY;
        for bone in chain.iter().rev() {
            position += rotation * bone.translation;
            rotation *= bone.rest_rotation;
        }
        Some((position, rotation))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkinnedMesh {
    pub geometry: MeshGeometry,
    pub skin: SkinAttributes,
    pub skeleton: Skeleton,
    pub material: MaterialId,
}

/// Renderable form of a species after the one-time asset preparation step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SpeciesAsset {
    /// No skeleton; agents orient rigidly.
    Rigid {
        geometry: MeshGeometry,
        material: MaterialId,
    },
    /// Authored skeleton shipped with the asset.
    PreRigged {
        mesh: SkinnedMesh,
        clip: Option<ClipHandle>,
    },
    /// Skeleton synthesized by the auto-rigger.
    AutoRigged { mesh: SkinnedMesh },
}

impl SpeciesAsset {
    #[must_use]
    pub fn geometry(&self) -> &MeshGeometry {
        match self {
            SpeciesAsset::Rigid { geometry, .. } => geometry,
            SpeciesAsset::PreRigged { mesh, .. } | SpeciesAsset::AutoRigged { mesh } => {
                &mesh.geometry
            }
        }
    }

    #[must_use]
    pub fn skeleton(&self) -> Option<&Skeleton> {
        match self {
            SpeciesAsset::Rigid { .. } => None,
            SpeciesAsset::PreRigged { mesh, .. } | SpeciesAsset::AutoRigged { mesh } => {
                Some(&mesh.skeleton)
            }
        }
    }

    #[must_use]
    pub fn clip(&self) -> Option<&ClipHandle> {
        match self {
            SpeciesAsset::PreRigged { clip, .. } => clip.as_ref(),
            _ => None,
        }
    }
}

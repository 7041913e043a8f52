//! Auto-rigging: synthesizes a two-bone (head/tail) skinned skeleton for
//! meshes that ship without one, so the wiggle animator has something to drive.
//!
//! The mesh's long axis is taken as "forward". Each vertex is skinned to the
//! head bone with a weight that ramps smoothly from 0 at the tail half to 1 at
//! the head half; the tail bone takes the remainder.

use crate::error::RigError;
use glam::Vec3;
use shoal_data::{
    Aabb, AxisFlips, Bone, MaterialId, MeshGeometry, SkinAttributes, Skeleton, SkinnedMesh,
};

/// Spans shorter than this along the forward axis are treated as degenerate.
pub const SPAN_EPSILON: f32 = 1e-5;

/// Fraction of the body length (from the tail end) where each bone sits.
pub const HEAD_BONE_T: f32 = 0.75;
pub const TAIL_BONE_T: f32 = 0.25;

/// Local axes of a mesh as detected from its bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshFrame {
    /// Unit vector along the longest box axis, sign-flipped per species.
    pub forward: Vec3,
    /// Unit vector treated as the mesh's "up"; orthogonal to `forward`.
    pub up: Vec3,
    pub forward_axis: usize,
}

impl MeshFrame {
    #[must_use]
    pub fn lateral(&self) -> Vec3 {
        self.forward.cross(self.up)
    }
}

/// Picks the longest box axis as forward (ties go to the lower axis index)
/// and y as up, or z when y is the forward axis. `None` for non-finite boxes.
#[must_use]
pub fn detect_frame(bounds: &Aabb, flips: AxisFlips) -> Option<MeshFrame> {
    let size = bounds.size();
    if !size.is_finite() {
        return None;
    }
    let extents = size.abs().to_array();
    let mut forward_axis = 0;
    for axis in 1..3 {
        if extents[axis] > extents[forward_axis] {
            forward_axis = axis;
        }
    }
    let up_axis = if forward_axis == 1 { 2 } else { 1 };

    Some(MeshFrame {
        forward: unit(forward_axis) * flips.sign(forward_axis),
        up: unit(up_axis) * flips.sign(up_axis),
        forward_axis,
    })
}

fn unit(axis: usize) -> Vec3 {
    match axis {
        0 => Vec3::X,
        1 => Vec3::Y,
        _ => Vec3::Z,
    }
}

/// Head influence for a vertex at normalized position `t` (0 = tail end,
/// 1 = head end). `softness` is the width of the blend band centered on 0.5;
/// zero gives a hard split.
#[must_use]
pub fn head_weight(t: f32, softness: f32) -> f32 {
    let band = softness.clamp(0.0, 1.0);
    if band <= f32::EPSILON {
        return if t >= 0.5 { 1.0 } else { 0.0 };
    }
    let edge0 = 0.5 - band * 0.5;
    let x = ((t - edge0) / band).clamp(0.0, 1.0);
    x * x * (3.0 - 2.0 * x)
}

/// Builds the skinned version of `geometry`.
///
/// # Errors
/// [`RigError::EmptyGeometry`] when there is nothing to skin, and
/// [`RigError::NonFiniteBounds`] when a vertex is not finite, and
/// [`RigError::DegenerateSpan`] when the mesh has no usable length.
pub fn auto_rig(
    geometry: &MeshGeometry,
    flips: AxisFlips,
    softness: f32,
    material: MaterialId,
) -> Result<SkinnedMesh, RigError> {
    let flat = geometry.to_non_indexed();
    let bounds = flat.bounding_box().ok_or(RigError::EmptyGeometry)?;
    let frame = detect_frame(&bounds, flips).ok_or(RigError::NonFiniteBounds {
        size: bounds.size(),
    })?;

    let projections: Vec<f32> = flat.positions.iter().map(|p| p.dot(frame.forward)).collect();
    let (lo, hi) = projections
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &d| {
            (lo.min(d), hi.max(d))
        });
    let span = hi - lo;
    if !(span > SPAN_EPSILON) {
        return Err(RigError::DegenerateSpan { span });
    }

    let mut skin = SkinAttributes {
        joints: Vec::with_capacity(projections.len()),
        weights: Vec::with_capacity(projections.len()),
    };
    for d in &projections {
        let head = head_weight((d - lo) / span, softness);
        skin.joints.push([0, 1, 0, 0]);
        skin.weights.push([head, 1.0 - head, 0.0, 0.0]);
    }

    let center = bounds.center();
    let center_d = center.dot(frame.forward);
    let along = |t: f32| center + frame.forward * (lo + t * span - center_d);
    let head_pos = along(HEAD_BONE_T);
    let tail_pos = along(TAIL_BONE_T);

    let skeleton = Skeleton::new(vec![
        Bone::new("head", None, head_pos),
        Bone::new("tail", Some(0), tail_pos - head_pos),
    ]);

    Ok(SkinnedMesh {
        geometry: flat,
        skin,
        skeleton,
        material,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slab() -> MeshGeometry {
        // 4 long along x, thin on y/z
        MeshGeometry::new(
            vec![
                Vec3::new(-2.0, -0.2, -0.1),
                Vec3::new(2.0, -0.2, -0.1),
                Vec3::new(-2.0, 0.2, 0.1),
                Vec3::new(2.0, 0.2, 0.1),
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.1, 0.0),
            ],
            None,
        )
    }

    #[test]
    fn test_detect_frame_longest_axis() {
        let bounds = slab().bounding_box().unwrap();
        let frame = detect_frame(&bounds, AxisFlips::default()).unwrap();
        assert_eq!(frame.forward, Vec3::X);
        assert_eq!(frame.up, Vec3::Y);
        assert_eq!(frame.forward_axis, 0);
    }

    #[test]
    fn test_detect_frame_vertical_mesh_uses_z_up() {
        let bounds = Aabb {
            min: Vec3::new(-0.1, -3.0, -0.2),
            max: Vec3::new(0.1, 3.0, 0.2),
        };
        let frame = detect_frame(&bounds, AxisFlips::default()).unwrap();
        assert_eq!(frame.forward, Vec3::Y);
        assert_eq!(frame.up, Vec3::Z);
    }

    #[test]
    fn test_bones_at_quarter_points() {
        let rigged = auto_rig(&slab(), AxisFlips::default(), 0.3, MaterialId(7)).unwrap();
        let head = rigged.skeleton.model_position(0).unwrap();
        let tail = rigged.skeleton.model_position(1).unwrap();
        assert!((head.x - 1.0).abs() < 1e-5);
        assert!((tail.x + 1.0).abs() < 1e-5);
        assert_eq!(rigged.skeleton.bones[1].parent, Some(0));
        assert_eq!(rigged.material, MaterialId(7));
    }

    #[test]
    fn test_flip_swaps_head_end() {
        let flips = AxisFlips {
            x: true,
            ..AxisFlips::default()
        };
        let rigged = auto_rig(&slab(), flips, 0.0, MaterialId(0)).unwrap();
        let head = rigged.skeleton.model_position(0).unwrap();
        assert!(head.x < 0.0);
        // vertex at x = -2 is now fully head
        assert_eq!(rigged.skin.weights[0][0], 1.0);
        assert_eq!(rigged.skin.weights[1][0], 0.0);
    }

    #[test]
    fn test_weights_normalized() {
        let rigged = auto_rig(&slab(), AxisFlips::default(), 0.6, MaterialId(0)).unwrap();
        for (w, j) in rigged.skin.weights.iter().zip(&rigged.skin.joints) {
            assert!((w.iter().sum::<f32>() - 1.0).abs() < 1e-6);
            assert_eq!(*j, [0, 1, 0, 0]);
            assert_eq!(w[2], 0.0);
            assert_eq!(w[3], 0.0);
        }
    }

    #[test]
    fn test_head_weight_shape() {
        assert_eq!(head_weight(0.0, 0.3), 0.0);
        assert_eq!(head_weight(1.0, 0.3), 1.0);
        assert!((head_weight(0.5, 0.3) - 0.5).abs() < 1e-6);
        assert_eq!(head_weight(0.49, 0.0), 0.0);
        assert_eq!(head_weight(0.5, 0.0), 1.0);
        // wider softness blends more of the body
        assert!(head_weight(0.7, 1.0) < head_weight(0.7, 0.2));
    }

    #[test]
    fn test_indexed_mesh_is_flattened() {
        let mut mesh = slab();
        mesh.indices = Some(vec![0, 1, 2, 1, 3, 2]);
        let rigged = auto_rig(&mesh, AxisFlips::default(), 0.3, MaterialId(0)).unwrap();
        assert_eq!(rigged.geometry.vertex_count(), 6);
        assert!(rigged.geometry.indices.is_none());
        assert_eq!(rigged.skin.weights.len(), 6);
    }

    #[test]
    fn test_empty_mesh_rejected() {
        let err = auto_rig(&MeshGeometry::default(), AxisFlips::default(), 0.3, MaterialId(0));
        assert_eq!(err.unwrap_err(), RigError::EmptyGeometry);
    }

    #[test]
    fn test_point_mesh_rejected() {
        let mesh = MeshGeometry::new(vec![Vec3::ONE; 5], None);
        let err = auto_rig(&mesh, AxisFlips::default(), 0.3, MaterialId(0)).unwrap_err();
        assert!(matches!(err, RigError::DegenerateSpan { .. }));
    }

    #[test]
    fn test_infinite_vertex_reports_bounds() {
        let mesh = MeshGeometry::new(
            vec![Vec3::ZERO, Vec3::new(1.0, 0.2, 0.1), Vec3::new(f32::INFINITY, 0.0, 0.0)],
            None,
        );
        let err = auto_rig(&mesh, AxisFlips::default(), 0.3, MaterialId(0)).unwrap_err();
        let RigError::NonFiniteBounds { size } = &err else {
            panic!("expected non-finite bounds, got {err:?}");
        };
        assert_eq!(size.x, f32::INFINITY);
        assert!(err.to_string().contains("not finite"));
    }
}

//! Procedural swim wiggle driven through a single bone.
//!
//! Bone targets are resolve-or-defer: an agent's [`BoneHandle`] is derived
//! from its current skeleton by [`resolve_bone`] and re-derived whenever it no
//! longer matches (for example after the skeleton was duplicated). An agent
//! whose skeleton yields no usable bone has its wiggle switched off for good.

use crate::rig::{detect_frame, MeshFrame};
use glam::Quat;
use shoal_data::{Aabb, AxisFlips, BoneHandle, Skeleton, Wiggle, WiggleConfig, WiggleEnd, WiggleMode};
use std::f32::consts::TAU;

/// Outcome of [`ensure_bone`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoneStatus {
    /// The existing handle was still good.
    Valid,
    /// The handle was missing or stale and has been re-derived.
    Recovered,
    /// No usable bone; the agent's wiggle is now off permanently.
    Disabled,
}

/// Picks the bone at the animated end of the body: the one whose rest position
/// projects furthest along mesh forward for the head, least for the tail.
#[must_use]
pub fn resolve_bone(
    skeleton: &Skeleton,
    bounds: &Aabb,
    flips: AxisFlips,
    end: WiggleEnd,
) -> Option<BoneHandle> {
    let frame = detect_frame(bounds, flips)?;
    let projected = (0..skeleton.len()).filter_map(|index| {
        let d = skeleton.model_position(index)?.dot(frame.forward);
        d.is_finite().then_some((index, d))
    });
    let picked = match end {
        WiggleEnd::Tail => projected.min_by(|a, b| a.1.total_cmp(&b.1)),
        WiggleEnd::Head => projected.max_by(|a, b| a.1.total_cmp(&b.1)),
    }?;
    Some(BoneHandle {
        skeleton: skeleton.id,
        index: picked.0,
    })
}

#[inline]
#[must_use]
pub fn is_valid(handle: &BoneHandle, skeleton: &Skeleton) -> bool {
    handle.skeleton == skeleton.id && handle.index < skeleton.len()
}

/// Makes sure `wiggle.bone` points into `skeleton`, re-running the bone search
/// when it doesn't. Does nothing when the handle is already valid.
pub fn ensure_bone(
    wiggle: &mut Wiggle,
    skeleton: &Skeleton,
    bounds: &Aabb,
    flips: AxisFlips,
    end: WiggleEnd,
) -> BoneStatus {
    if wiggle.disabled {
        return BoneStatus::Disabled;
    }
    if wiggle.bone.is_some_and(|h| is_valid(&h, skeleton)) {
        return BoneStatus::Valid;
    }
    match resolve_bone(skeleton, bounds, flips, end) {
        Some(handle) => {
            wiggle.bone = Some(handle);
            BoneStatus::Recovered
        }
        None => {
            wiggle.bone = None;
            wiggle.disabled = true;
            BoneStatus::Disabled
        }
    }
}

/// Ratio of current to top speed, limited to `[min, max]`.
#[must_use]
pub fn speed_factor(speed: f32, speed_max: f32, min: f32, max: f32) -> f32 {
    if speed_max <= 0.0 || !speed.is_finite() {
        return min;
    }
    (speed / speed_max).clamp(min, max)
}

/// Advances the phase by one step and wraps it into `[0, TAU)`.
#[must_use]
pub fn advance_phase(phase: f32, dt: f32, period: f32, factor: f32) -> f32 {
    if period <= 0.0 {
        return phase;
    }
    let next = (phase + (dt / period) * TAU * factor).rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU
    if next >= TAU {
        0.0
    } else {
        next
    }
}

/// The wiggle offset for `phase`, as a rotation in mesh space.
#[must_use]
pub fn wiggle_rotation(config: &WiggleConfig, frame: &MeshFrame, phase: f32) -> Quat {
    let axis = match config.mode {
        WiggleMode::SideToSide => frame.up,
        WiggleMode::UpDown => frame.lateral(),
    };
    match axis.try_normalize() {
        Some(axis) => Quat::from_axis_angle(axis, config.amplitude * phase.sin()),
        None => Quat::IDENTITY,
    }
}

/// Writes the posed rotation of the handle's bone: its rest rotation followed
/// by `offset` (given in mesh space). Returns false for a bad handle.
pub fn apply_wiggle(skeleton: &mut Skeleton, handle: &BoneHandle, offset: Quat) -> bool {
    if !is_valid(handle, skeleton) {
        return false;
    }
    let Some(bone_frame) = skeleton.model_rotation(handle.index) else {
        return false;
    };
    // express the mesh-space offset in the bone's own frame
    let local = bone_frame.inverse() * offset * bone_frame;
    let bone = &mut skeleton.bones[handle.index];
    bone.rotation = (bone.rest_rotation * local).normalize();
    true
}

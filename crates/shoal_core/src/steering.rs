//! Steering forces, integration and orientation for a single agent.
//!
//! Everything here is a pure function of its inputs so the per-agent pass can
//! run in parallel without shared mutable state.

use crate::containment::ContainmentLogic;
use crate::rig::MeshFrame;
use glam::{Quat, Vec3};
use rand::Rng;
use shoal_data::{Steering, SwimBox};

/// Velocities shorter than this leave the heading untouched.
pub const MIN_ORIENT_SPEED: f32 = 1e-4;

/// Neighbors closer than this (squared) are treated as coincident.
const COINCIDENT_DIST_SQ: f32 = 1e-10;

/// Why an agent picked a new target this step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RetargetReason {
    OutOfBounds,
    Reached,
    TimerExpired,
}

/// Lowest and highest allowed speed for an agent.
///
/// The floor is pulled below the ceiling when a species' configured minimum
/// would otherwise meet or exceed its maximum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedRange {
    pub floor: f32,
    pub ceiling: f32,
}

impl SpeedRange {
    #[must_use]
    pub fn new(speed_min: f32, speed_max: f32) -> Self {
        Self {
            floor: speed_min.min(0.9 * speed_max),
            ceiling: speed_max,
        }
    }

    #[must_use]
    pub fn of(steering: &Steering) -> Self {
        Self::new(steering.speed_min, steering.speed_max)
    }
}

#[inline]
fn finite_or_zero(v: Vec3) -> Vec3 {
    if v.is_finite() {
        v
    } else {
        Vec3::ZERO
    }
}

/// Steer toward `target` at full speed. Zero once within `arrival_epsilon`.
#[must_use]
pub fn seek(
    position: Vec3,
    velocity: Vec3,
    target: Vec3,
    speed_max: f32,
    intensity: f32,
    arrival_epsilon: f32,
) -> Vec3 {
    let to_target = target - position;
    if to_target.length() < arrival_epsilon {
        return Vec3::ZERO;
    }
    let desired = to_target.normalize_or_zero() * speed_max;
    finite_or_zero((desired - velocity) * intensity)
}

/// Inverse-distance push away from every neighbor inside `radius`.
///
/// `neighbors` may include points outside the radius; they are filtered here.
/// Coincident points contribute nothing.
#[must_use]
pub fn separation<I>(position: Vec3, neighbors: I, radius: f32, strength: f32) -> Vec3
where
    I: IntoIterator<Item = Vec3>,
{
    let radius_sq = radius * radius;
    let mut push = Vec3::ZERO;
    for other in neighbors {
        let away = position - other;
        let dist_sq = away.length_squared();
        if dist_sq <= COINCIDENT_DIST_SQ || dist_sq >= radius_sq || !dist_sq.is_finite() {
            continue;
        }
        // (pos - other) / |pos - other|^2, i.e. unit direction over distance
        push += away / dist_sq;
    }
    finite_or_zero(push * strength)
}

/// Spring back toward the volume on every axis where `position` is outside.
#[must_use]
pub fn containment_force(volume: &SwimBox, position: Vec3, gain: f32) -> Vec3 {
    finite_or_zero(volume.penetration(position) * gain)
}

/// Sum of the three forces, length-limited to `max_accel`.
#[must_use]
pub fn steering_force(seek: Vec3, separation: Vec3, containment: Vec3, max_accel: f32) -> Vec3 {
    let total = finite_or_zero(seek) + finite_or_zero(separation) + finite_or_zero(containment);
    total.clamp_length_max(max_accel.max(0.0))
}

/// Direction used when the integrated velocity collapses to zero: toward the
/// target, else the current facing, else +x.
#[must_use]
pub fn fallback_direction(position: Vec3, target: Vec3, facing: Vec3) -> Vec3 {
    (target - position)
        .try_normalize()
        .or_else(|| facing.try_normalize())
        .unwrap_or(Vec3::X)
}

/// Semi-implicit Euler step with speed limiting and a hard clamp into the
/// volume. Returns the new `(position, velocity)`.
#[must_use]
pub fn integrate(
    position: Vec3,
    velocity: Vec3,
    force: Vec3,
    dt: f32,
    speed: SpeedRange,
    fallback: Vec3,
    volume: &SwimBox,
) -> (Vec3, Vec3) {
    let raw = finite_or_zero(velocity + force * dt);
    let magnitude = raw.length();
    let direction = if magnitude > f32::EPSILON {
        raw / magnitude
    } else {
        fallback.try_normalize().unwrap_or(Vec3::X)
    };
    let velocity = direction * magnitude.clamp(speed.floor, speed.ceiling);
    let position = volume.clamp_point(position + velocity * dt);
    (position, velocity)
}

/// Checks the three retarget triggers. Out-of-bounds wins over the others
/// so a shrinking volume is always reported as such.
#[must_use]
pub fn needs_retarget(
    position: Vec3,
    steering: &Steering,
    volume: &SwimBox,
    now: f64,
    reach_dist: f32,
) -> Option<RetargetReason> {
    if !volume.contains(steering.target) {
        Some(RetargetReason::OutOfBounds)
    } else if position.distance(steering.target) < reach_dist {
        Some(RetargetReason::Reached)
    } else if now >= steering.next_retarget {
        Some(RetargetReason::TimerExpired)
    } else {
        None
    }
}

/// Seconds until the next forced retarget, uniform in `[min, max]`.
pub fn draw_countdown<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    if max > min {
        rng.gen_range(min..=max)
    } else {
        min
    }
}

/// Rotates the mesh forward axis onto the velocity, then twists about it so
/// the mesh up points as close to world +y as possible.
///
/// Returns `current` unchanged for negligible velocities. When moving straight
/// up or down there is no preferred roll and the twist is skipped.
#[must_use]
pub fn orient_to_velocity(current: Quat, velocity: Vec3, frame: &MeshFrame) -> Quat {
    if !velocity.is_finite() || velocity.length() < MIN_ORIENT_SPEED {
        return current;
    }
    let dir = velocity.normalize();
    let align = Quat::from_rotation_arc(frame.forward, dir);

    let world_up = Vec3::Y - dir * Vec3::Y.dot(dir);
    let Some(wanted_up) = world_up.try_normalize() else {
        return align.normalize();
    };
    let current_up = align * frame.up;
    let current_up = (current_up - dir * current_up.dot(dir)).normalize_or_zero();
    let angle = dir
        .dot(current_up.cross(wanted_up))
        .atan2(current_up.dot(wanted_up));

    (Quat::from_axis_angle(dir, angle) * align).normalize()
}

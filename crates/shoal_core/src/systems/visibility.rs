use glam::Vec3;
use shoal_data::{Position, Visual};

/// Flags agents beyond `render_distance` from the observer as invisible.
/// They keep simulating. Returns the number left visible.
pub fn visibility_pass(ecs: &mut hecs::World, observer: Vec3, render_distance: f32) -> usize {
    let limit_sq = render_distance * render_distance;
    let mut visible = 0;
    for (_, (pos, visual)) in ecs.query_mut::<(&Position, &mut Visual)>() {
        visual.visible = pos.0.distance_squared(observer) <= limit_sq;
        visible += usize::from(visual.visible);
    }
    visible
}

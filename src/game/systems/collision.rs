//! Geometry and collision primitives
//!
//! Circle-circle and circle-rectangle overlap tests plus arena bounds checks.
//! Everything here is pure: no entity mutation.

use crate::game::state::{Arena, Obstacle};
use crate::util::vec2::Vec2;

/// Two circles overlap when their centers are closer than the sum of radii
#[inline]
pub fn circles_overlap(a: Vec2, radius_a: f32, b: Vec2, radius_b: f32) -> bool {
    let r = radius_a + radius_b;
    a.distance_sq_to(b) < r * r
}

/// Circle vs axis-aligned rectangle, via the closest point on the rectangle
#[inline]
pub fn circle_rect_overlap(center: Vec2, radius: f32, rect: &Obstacle) -> bool {
    let closest_x = center.x.clamp(rect.x, rect.x + rect.width);
    let closest_y = center.y.clamp(rect.y, rect.y + rect.height);
    let dx = center.x - closest_x;
    let dy = center.y - closest_y;
    dx * dx + dy * dy < radius * radius
}

/// True when the circle overlaps any obstacle in the arena
pub fn overlaps_any_obstacle(arena: &Arena, center: Vec2, radius: f32) -> bool {
    arena
        .obstacles
        .iter()
        .any(|obstacle| circle_rect_overlap(center, radius, obstacle))
}

/// How deep a circle sits in one rectangle; 0 when clear. A center inside
/// the rectangle adds its distance to the nearest edge.
pub fn rect_penetration(center: Vec2, radius: f32, rect: &Obstacle) -> f32 {
    let right = rect.x + rect.width;
    let bottom = rect.y + rect.height;
    let inside = center.x > rect.x && center.x < right && center.y > rect.y && center.y < bottom;
    if inside {
        let edge = (center.x - rect.x)
            .min(right - center.x)
            .min(center.y - rect.y)
            .min(bottom - center.y);
        return radius + edge;
    }

    let closest = Vec2::new(center.x.clamp(rect.x, right), center.y.clamp(rect.y, bottom));
    (radius - center.distance_to(closest)).max(0.0)
}

/// Summed penetration into every obstacle in the arena
pub fn obstacle_penetration(arena: &Arena, center: Vec2, radius: f32) -> f32 {
    arena
        .obstacles
        .iter()
        .map(|obstacle| rect_penetration(center, radius, obstacle))
        .sum()
}

/// Circle fits in the arena rectangle along X
#[inline]
pub fn within_x(arena: &Arena, x: f32, radius: f32) -> bool {
    x - radius >= 0.0 && x + radius <= arena.width
}

/// Circle fits in the arena rectangle along Y
#[inline]
pub fn within_y(arena: &Arena, y: f32, radius: f32) -> bool {
    y - radius >= 0.0 && y + radius <= arena.height
}

/// Whole circle inside the arena (the arena inflated inward by `radius`)
#[inline]
pub fn circle_in_bounds(arena: &Arena, center: Vec2, radius: f32) -> bool {
    within_x(arena, center.x, radius) && within_y(arena, center.y, radius)
}

/// Projectile center has left the arena
#[inline]
pub fn point_out_of_bounds(arena: &Arena, point: Vec2) -> bool {
    point.x < 0.0 || point.x > arena.width || point.y < 0.0 || point.y > arena.height
}

/// Pull a circle center back inside the arena
pub fn clamp_into_arena(arena: &Arena, center: Vec2, radius: f32) -> Vec2 {
    Vec2::new(
        center.x.clamp(radius, (arena.width - radius).max(radius)),
        center.y.clamp(radius, (arena.height - radius).max(radius)),
    )
}

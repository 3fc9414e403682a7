//! Circular push-apart between two players
//!
//! Only the first circle moves. The world calls this once per ordered pair,
//! so two overlapping players each get their own push, and the result
//! depends on iteration order.

use glam::Vec2;

use crate::consts::PUSH_EPSILON;

/// Push `pos1` out of the exclusion radius shared with circle 2.
///
/// The pivot sits between the centers weighted by `size1 / (size1 + size2)`,
/// so the bigger circle's side of the pivot is shorter. The push is bounded
/// by the overlap depth and by `push_speed * dt`, so large overlaps resolve
/// over several frames. Returns the distance moved.
pub fn separate(
    pos1: &mut Vec2,
    size1: f32,
    pos2: Vec2,
    size2: f32,
    dt: f32,
    push_speed: f32,
) -> f32 {
    let pivot = pos1.lerp(pos2, size1 / (size1 + size2));
    let offset = *pos1 - pivot;
    let offset_sq = offset.length_squared();

    if offset_sq >= size1 * size1 {
        return 0.0;
    }

    let mut magnitude = offset_sq.sqrt();
    if magnitude == 0.0 {
        magnitude = PUSH_EPSILON;
    }

    let push = (size1 - magnitude).min((1.0 - magnitude / size1) * dt * push_speed);
    // Coincident centers have no direction to push along
    *pos1 += offset.normalize_or_zero() * push;
    push
}

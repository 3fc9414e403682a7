//! Consumption: a player swallowing a smaller entity
//!
//! The pure half lives here (bite test, area growth, visual detachment).
//! The world handles the structural half: staging the eaten entity for
//! removal, starting the absorption effect and respawning food.

use glam::Vec2;

use super::state::{Entity, EntityId};
use crate::platform::VisualHandle;

/// What an eaten entity leaves behind for the absorption effect
#[derive(Debug)]
pub struct Bite {
    pub eater: EntityId,
    pub eaten: EntityId,
    /// Visual detached from the eaten entity
    pub visual: Option<VisualHandle>,
    /// Where the eaten entity was
    pub from: Vec2,
    /// Where the eater was at the moment of the bite
    pub to: Vec2,
}

/// True when the circles overlap within `margin`
#[inline]
pub fn within_reach(a_pos: Vec2, a_size: f32, b_pos: Vec2, b_size: f32, margin: f32) -> bool {
    let reach = a_size + b_size + margin;
    a_pos.distance_squared(b_pos) < reach * reach
}

/// Radius after absorbing `eaten`: areas add, radii do not
#[inline]
pub fn grown_size(eater: f32, eaten: f32) -> f32 {
    (eater * eater + eaten * eaten).sqrt()
}

/// Test `source` against `target` and, on a bite, grow `source` and take
/// `target`'s visual. Leaves both untouched on a miss.
pub fn try_consume(source: &mut Entity, target: &mut Entity, margin: f32) -> Option<Bite> {
    if !within_reach(
        source.position.value,
        source.size.value,
        target.position.value,
        target.size.value,
        margin,
    ) {
        return None;
    }

    source.size.value = grown_size(source.size.value, target.size.value);

    Some(Bite {
        eater: source.id,
        eaten: target.id,
        visual: target.visual.take(),
        from: target.position.value,
        to: source.position.value,
    })
}

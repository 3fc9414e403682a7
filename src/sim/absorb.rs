//! Absorption animation
//!
//! When a player eats, the eaten entity's visual is handed to a short-lived
//! effect that slides it from where the food was toward the midpoint of the
//! bite, measured relative to the eater's *live* position. Once the
//! duration runs out the effect destroys the visual and stages itself for
//! removal. There is no way back from expiry.

use glam::Vec2;

use super::dlist::Deferred;
use super::state::EntityId;
use crate::platform::{RenderBridge, VisualHandle};

/// Transient animated visual detached from an eaten entity
#[derive(Debug)]
pub struct AbsorptionEffect {
    /// Taken on expiry
    pub visual: Option<VisualHandle>,
    /// The eater. Read each tick, never owned.
    pub target: EntityId,
    /// Fallback if the eater disappears first
    pub last_target_pos: Vec2,
    pub start_offset: Vec2,
    pub end_offset: Vec2,
    pub duration: f32,
    pub expires_at: f32,
    destroyed: bool,
}

impl AbsorptionEffect {
    /// Start an effect at `now` for food at `source_pos` eaten by `target`
    pub fn new(
        visual: Option<VisualHandle>,
        target: EntityId,
        source_pos: Vec2,
        target_pos: Vec2,
        now: f32,
        duration: f32,
    ) -> Self {
        Self {
            visual,
            target,
            last_target_pos: target_pos,
            start_offset: source_pos - target_pos,
            end_offset: source_pos.lerp(target_pos, 0.5) - target_pos,
            duration,
            expires_at: now + duration,
            destroyed: false,
        }
    }

    /// 0 at creation, 1 at expiry. Not clamped above.
    pub fn life_percent(&self, now: f32) -> f32 {
        1.0 - (self.expires_at - now) / self.duration
    }

    #[inline]
    pub fn is_expired(&self, now: f32) -> bool {
        now >= self.expires_at
    }

    /// Animated world position given the eater's current position
    pub fn position(&self, target_pos: Vec2, now: f32) -> Vec2 {
        target_pos + self.start_offset.lerp(self.end_offset, self.life_percent(now))
    }
}

impl Deferred for AbsorptionEffect {
    fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    fn mark_destroyed(&mut self) {
        self.destroyed = true;
    }
}

/// Advance one effect. `target_pos` is the eater's live position, `None`
/// if it is gone. Returns `true` once expired; the visual has then been
/// destroyed and the caller must stage the effect for removal.
pub fn tick<R: RenderBridge + ?Sized>(
    effect: &mut AbsorptionEffect,
    target_pos: Option<Vec2>,
    now: f32,
    renderer: &mut R,
) -> bool {
    if let Some(pos) = target_pos {
        effect.last_target_pos = pos;
    }
    let position = effect.position(effect.last_target_pos, now);
    if let Some(visual) = effect.visual.as_ref() {
        renderer.move_visual(visual, position);
    }

    if !effect.is_expired(now) {
        return false;
    }
    if let Some(visual) = effect.visual.take() {
        renderer.destroy_visual(visual);
    }
    true
}

//! Entity and component data model
//!
//! An entity owns one each of Position, Size, Color and Team, an optional
//! Velocity (present only on movable entities) and at most one visual
//! handle. Components point back at their owner by `EntityId` so a system
//! handed a single component can find its siblings through the world.

use glam::{Vec2, Vec4};
use serde::{Deserialize, Serialize};

use super::dlist::Deferred;
use crate::platform::VisualHandle;

/// Stable entity identity. Allocated monotonically and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Team tag used for pairwise dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TeamId(pub u32);

impl TeamId {
    /// Food: can be eaten
    pub const CONSUMABLE: TeamId = TeamId(0);
    /// Player-controlled: eats food, pushes other players
    pub const PLAYER: TeamId = TeamId(1);
}

/// A single typed attribute slot owned by exactly one entity
#[derive(Debug, Clone, PartialEq)]
pub struct Component<T> {
    pub value: T,
    owner: EntityId,
    destroyed: bool,
}

impl<T> Component<T> {
    pub fn new(owner: EntityId, value: T) -> Self {
        Self {
            value,
            owner,
            destroyed: false,
        }
    }

    /// The entity this component belongs to
    #[inline]
    pub fn owner(&self) -> EntityId {
        self.owner
    }
}

impl<T> Deferred for Component<T> {
    fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    fn mark_destroyed(&mut self) {
        self.destroyed = true;
    }
}

/// Velocity with its speed cap
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Speed {
    pub value: Vec2,
    pub max: f32,
}

pub type Position = Component<Vec2>;
/// Radius in arena units
pub type Size = Component<f32>;
pub type Velocity = Component<Speed>;
/// RGBA, read only by the renderer
pub type Color = Component<Vec4>;
pub type Team = Component<TeamId>;

/// One simulated circle
#[derive(Debug)]
pub struct Entity {
    pub id: EntityId,
    pub position: Position,
    pub size: Size,
    pub color: Color,
    pub team: Team,
    /// Present only on movable entities
    pub velocity: Option<Velocity>,
    /// Cleared when the visual is handed to an absorption effect
    pub visual: Option<VisualHandle>,
    destroyed: bool,
}

impl Entity {
    /// Build an entity with its full component set
    pub fn new(id: EntityId, position: Vec2, size: f32, color: Vec4, team: TeamId) -> Self {
        Self {
            id,
            position: Component::new(id, position),
            size: Component::new(id, size),
            color: Component::new(id, color),
            team: Component::new(id, team),
            velocity: None,
            visual: None,
            destroyed: false,
        }
    }

    /// Attach a velocity component, making this a movable entity
    pub fn with_velocity(mut self, max_speed: f32) -> Self {
        self.velocity = Some(Component::new(
            self.id,
            Speed {
                value: Vec2::ZERO,
                max: max_speed,
            },
        ));
        self
    }

    #[inline]
    pub fn is_movable(&self) -> bool {
        self.velocity.is_some()
    }

    #[inline]
    pub fn team_id(&self) -> TeamId {
        self.team.value
    }
}

impl Deferred for Entity {
    fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Marks the entity and every component it owns
    fn mark_destroyed(&mut self) {
        self.destroyed = true;
        self.position.mark_destroyed();
        self.size.mark_destroyed();
        self.color.mark_destroyed();
        self.team.mark_destroyed();
        if let Some(velocity) = self.velocity.as_mut() {
            velocity.mark_destroyed();
        }
    }
}

/// Handle entry in the movable-entity and velocity lists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityRef {
    pub id: EntityId,
    destroyed: bool,
}

impl EntityRef {
    pub fn new(id: EntityId) -> Self {
        Self { id, destroyed: false }
    }
}

impl Deferred for EntityRef {
    fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    fn mark_destroyed(&mut self) {
        self.destroyed = true;
    }
}

/// Axis-aligned arena rectangle, fixed for a session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Unit-height arena `[-aspect, aspect] x [-1, 1]`
    pub fn from_aspect(aspect: f32) -> Self {
        Self {
            min: Vec2::new(-aspect, -1.0),
            max: Vec2::new(aspect, 1.0),
        }
    }

    /// Range a circle of `radius` may occupy without touching a wall
    pub fn inset(&self, radius: f32) -> (Vec2, Vec2) {
        (self.min + Vec2::splat(radius), self.max - Vec2::splat(radius))
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::from_aspect(1.0)
    }
}

/// Time values sampled once per tick and shared by every system
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameContext {
    /// Seconds since session start
    pub now: f32,
    /// Seconds since the previous tick
    pub dt: f32,
}

impl FrameContext {
    pub fn new(now: f32, dt: f32) -> Self {
        Self { now, dt }
    }
}

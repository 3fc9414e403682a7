//! World orchestrator
//!
//! Owns every deferred list, the session RNG and the host collaborators,
//! and runs the fixed per-frame pipeline:
//! 1. Sync visuals of live entities
//! 2. For each live player: steer, then eat food / push other players
//! 3. Integrate every live velocity
//! 4. Tick absorption effects
//! 5. Commit entities, players, velocities, effects (in that order)
//!
//! Entity ids are allocated monotonically and staged entities are appended
//! on commit, so the entity list stays sorted by id and an id lookup is a
//! binary search.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::absorb::{self, AbsorptionEffect};
use super::consume;
use super::dlist::{Deferred, DeferredList};
use super::movement;
use super::separation;
use super::state::{Bounds, Entity, EntityId, EntityRef, FrameContext, TeamId};
use super::steering;
use crate::platform::{
    Clock, FixedStepClock, FixedTarget, InputProvider, RecordingRenderer, RenderBridge,
};
use crate::settings::Settings;

pub struct World<R = RecordingRenderer, I = FixedTarget, C = FixedStepClock> {
    settings: Settings,
    bounds: Bounds,
    /// Every entity, sorted by id
    entities: DeferredList<Entity>,
    /// Player-controlled entities
    movers: DeferredList<EntityRef>,
    /// Owners of velocity components
    velocities: DeferredList<EntityRef>,
    effects: DeferredList<AbsorptionEffect>,
    renderer: R,
    input: I,
    clock: C,
    rng: Pcg32,
    next_id: u32,
    frame: u64,
}

impl<R: RenderBridge, I: InputProvider, C: Clock> World<R, I, C> {
    /// Build a world and spawn the initial population from `settings`
    pub fn new(settings: Settings, bounds: Bounds, renderer: R, input: I, clock: C) -> Self {
        let rng = Pcg32::seed_from_u64(settings.seed);
        let mut world = Self {
            settings,
            bounds,
            entities: DeferredList::new(),
            movers: DeferredList::new(),
            velocities: DeferredList::new(),
            effects: DeferredList::new(),
            renderer,
            input,
            clock,
            rng,
            next_id: 1,
            frame: 0,
        };
        world.populate();
        world
    }

    /// Initial food and players, committed immediately
    fn populate(&mut self) {
        for _ in 0..self.settings.food_count {
            self.spawn_food();
        }

        let jitter = self.settings.mover_spawn_jitter;
        for _ in 0..self.settings.mover_count {
            let x = random_between(&mut self.rng, -jitter, jitter);
            let y = random_between(&mut self.rng, -jitter, jitter);
            self.spawn_mover(Vec2::new(x, y));
        }

        self.commit();
        log::info!(
            "Arena populated: {} food, {} players (seed {})",
            self.settings.food_count,
            self.settings.mover_count,
            self.settings.seed
        );
    }

    /// Sample the clock once and run a frame with it
    pub fn tick(&mut self) -> FrameContext {
        let ctx = FrameContext::new(self.clock.now(), self.clock.delta_time());
        self.step(ctx);
        ctx
    }

    /// Run one frame with explicit time values
    pub fn step(&mut self, ctx: FrameContext) {
        self.sync_visuals();
        self.update_players(ctx);
        self.update_movement(ctx);
        self.update_effects(ctx);
        self.commit();
        self.frame += 1;
    }

    fn sync_visuals(&mut self) {
        for entity in self.entities.iter_live() {
            if let Some(visual) = entity.visual.as_ref() {
                self.renderer.update_visual(
                    visual,
                    entity.position.value,
                    entity.size.value,
                    entity.color.value,
                );
            }
        }
    }

    fn update_players(&mut self, ctx: FrameContext) {
        for m in 0..self.movers.len() {
            let mover = self.movers[m];
            if mover.is_destroyed() {
                continue;
            }
            let Some(a) = self.find(mover.id) else {
                continue;
            };
            if self.entities[a].is_destroyed() {
                continue;
            }

            let target = self.input.current_target_point();
            let player = &mut self.entities[a];
            let position = player.position.value;
            if let Some(velocity) = player.velocity.as_mut() {
                steering::steer(&mut velocity.value, position, target, ctx.dt);
            }

            for b in 0..self.entities.len() {
                let other = &self.entities[b];
                if b == a || other.is_destroyed() {
                    continue;
                }
                match other.team_id() {
                    TeamId::CONSUMABLE => self.try_eat(a, b, ctx),
                    TeamId::PLAYER => {
                        let (other_pos, other_size) = (other.position.value, other.size.value);
                        let player = &mut self.entities[a];
                        separation::separate(
                            &mut player.position.value,
                            player.size.value,
                            other_pos,
                            other_size,
                            ctx.dt,
                            self.settings.push_speed,
                        );
                    }
                    _ => {}
                }
            }
        }
    }

    fn try_eat(&mut self, eater: usize, food: usize, ctx: FrameContext) {
        let margin = self.settings.eat_margin;
        let Some((source, target)) = self.entities.pair_mut(eater, food) else {
            return;
        };
        let Some(bite) = consume::try_consume(source, target, margin) else {
            return;
        };
        log::debug!(
            "Entity {} ate {} (size now {:.4})",
            bite.eater.0,
            bite.eaten.0,
            source.size.value
        );

        self.effects.delay_add(AbsorptionEffect::new(
            bite.visual,
            bite.eater,
            bite.from,
            bite.to,
            ctx.now,
            self.settings.absorb_duration,
        ));
        self.remove_at(food);
        self.spawn_food();
    }

    fn update_movement(&mut self, ctx: FrameContext) {
        for i in 0..self.velocities.len() {
            let owner = self.velocities[i];
            if owner.is_destroyed() {
                continue;
            }
            let Some(idx) = self.find(owner.id) else {
                continue;
            };
            let entity = &mut self.entities[idx];
            if entity.is_destroyed() {
                continue;
            }
            let size = entity.size.value;
            if let Some(velocity) = entity.velocity.as_mut() {
                movement::advance(
                    &mut velocity.value,
                    &mut entity.position.value,
                    size,
                    ctx.dt,
                    &self.bounds,
                );
            }
        }
    }

    fn update_effects(&mut self, ctx: FrameContext) {
        for i in 0..self.effects.len() {
            if self.effects[i].is_destroyed() {
                continue;
            }
            let target_pos = self
                .entity(self.effects[i].target)
                .filter(|e| !e.is_destroyed())
                .map(|e| e.position.value);
            if absorb::tick(&mut self.effects[i], target_pos, ctx.now, &mut self.renderer) {
                self.effects.delay_remove(i);
            }
        }
    }

    /// The single structural mutation point of a frame
    pub fn commit(&mut self) {
        let entities = self.entities.commit();
        let movers = self.movers.commit();
        let velocities = self.velocities.commit();
        let effects = self.effects.commit();
        log::trace!(
            "Commit frame {}: entities {:?}, players {:?}, velocities {:?}, effects {:?}",
            self.frame,
            entities,
            movers,
            velocities,
            effects
        );
        debug_assert!(
            self.entities.as_slice().windows(2).all(|w| w[0].id < w[1].id),
            "entity list must stay sorted by id"
        );
    }

    /// Allocate a new entity ID
    fn next_entity_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Create the visual now, stage the entity for the next commit.
    /// Movable entities are also staged as players and promoted.
    fn spawn_entity(&mut self, mut entity: Entity) -> EntityId {
        let id = entity.id;
        let visual = self.renderer.create_visual(entity.size.value, entity.color.value);
        if entity.is_movable() {
            self.renderer.promote_visual(&visual);
            self.movers.delay_add(EntityRef::new(id));
            self.velocities.delay_add(EntityRef::new(id));
        }
        entity.visual = Some(visual);
        self.entities.delay_add(entity);
        id
    }

    /// Stage food at a random spot inside the walls
    pub fn spawn_food(&mut self) -> EntityId {
        let size = self.settings.food_size;
        let (lo, hi) = self.bounds.inset(size);
        let x = random_between(&mut self.rng, lo.x, hi.x);
        let y = random_between(&mut self.rng, lo.y, hi.y);
        self.spawn_food_at(Vec2::new(x, y), size)
    }

    pub fn spawn_food_at(&mut self, position: Vec2, size: f32) -> EntityId {
        let id = self.next_entity_id();
        let color = self.settings.food_color;
        self.spawn_entity(Entity::new(id, position, size, color, TeamId::CONSUMABLE))
    }

    /// Stage a player with the configured size, color and speed cap
    pub fn spawn_mover(&mut self, position: Vec2) -> EntityId {
        let (size, max_speed) = (self.settings.mover_size, self.settings.mover_max_speed);
        self.spawn_mover_with(position, size, max_speed)
    }

    pub fn spawn_mover_with(&mut self, position: Vec2, size: f32, max_speed: f32) -> EntityId {
        let id = self.next_entity_id();
        let color = self.settings.mover_color;
        let entity = Entity::new(id, position, size, color, TeamId::PLAYER).with_velocity(max_speed);
        self.spawn_entity(entity)
    }

    /// Stage a committed entity for removal. Its visual, if it still has
    /// one, is destroyed right away. Returns `false` if the entity is
    /// unknown or already pending removal.
    pub fn remove_entity(&mut self, id: EntityId) -> bool {
        match self.find(id) {
            Some(index) if !self.entities[index].is_destroyed() => {
                self.remove_at(index);
                true
            }
            _ => false,
        }
    }

    fn remove_at(&mut self, index: usize) {
        let Some(entity) = self.entities.get_mut(index) else {
            return;
        };
        if entity.is_destroyed() {
            return;
        }
        let id = entity.id;
        let visual = entity.visual.take();
        self.entities.delay_remove(index);
        if let Some(visual) = visual {
            self.renderer.destroy_visual(visual);
        }
        self.movers.delay_remove_where(|r| r.id == id);
        self.velocities.delay_remove_where(|r| r.id == id);
    }
}

impl<R, I, C> World<R, I, C> {
    /// Index of a committed entity, destroyed or not
    pub fn find(&self, id: EntityId) -> Option<usize> {
        self.entities
            .as_slice()
            .binary_search_by_key(&id, |e| e.id)
            .ok()
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.find(id).map(|i| &self.entities[i])
    }

    /// Live committed entities on `team`
    pub fn count_team(&self, team: TeamId) -> usize {
        self.entities
            .iter_live()
            .filter(|e| e.team_id() == team)
            .count()
    }

    pub fn entities(&self) -> &DeferredList<Entity> {
        &self.entities
    }

    pub fn movers(&self) -> &DeferredList<EntityRef> {
        &self.movers
    }

    pub fn velocities(&self) -> &DeferredList<EntityRef> {
        &self.velocities
    }

    pub fn effects(&self) -> &DeferredList<AbsorptionEffect> {
        &self.effects
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    /// Frames run so far
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn input_mut(&mut self) -> &mut I {
        &mut self.input
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }
}

/// Uniform in `[lo, hi)`, or the midpoint when the range is empty
fn random_between(rng: &mut Pcg32, lo: f32, hi: f32) -> f32 {
    if lo < hi {
        rng.random_range(lo..hi)
    } else {
        (lo + hi) * 0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::platform::OrbitTarget;

    fn empty_settings() -> Settings {
        Settings {
            food_count: 0,
            mover_count: 0,
            ..Default::default()
        }
    }

    fn empty_world(target: Vec2) -> World {
        World::new(
            empty_settings(),
            Bounds::default(),
            RecordingRenderer::new(),
            FixedTarget(target),
            FixedStepClock::default(),
        )
    }

    fn at(now: f32) -> FrameContext {
        FrameContext::new(now, SIM_DT)
    }

    #[test]
    fn test_populate_counts() {
        let world: World = World::new(
            Settings::default(),
            Bounds::default(),
            RecordingRenderer::new(),
            FixedTarget::default(),
            FixedStepClock::default(),
        );
        assert_eq!(world.count_team(TeamId::CONSUMABLE), 50);
        assert_eq!(world.count_team(TeamId::PLAYER), 2);
        assert_eq!(world.movers().len(), 2);
        assert_eq!(world.velocities().len(), 2);
        assert_eq!(world.renderer().live_count(), 52);
        assert_eq!(world.renderer().iter().filter(|(_, v)| v.promoted).count(), 2);

        let (lo, hi) = world.bounds().inset(world.settings().food_size);
        for e in world.entities().iter() {
            let p = e.position.value;
            assert!(p.x >= lo.x && p.x <= hi.x && p.y >= lo.y && p.y <= hi.y);
        }
    }

    #[test]
    fn test_spawns_are_staged() {
        let mut world = empty_world(Vec2::ZERO);
        let id = world.spawn_mover(Vec2::ZERO);
        assert!(world.entity(id).is_none());
        assert_eq!(world.entities().staged_len(), 1);
        // Visual exists as soon as the entity is staged
        assert_eq!(world.renderer().live_count(), 1);

        world.commit();
        assert!(world.entity(id).is_some_and(|e| e.is_movable()));
        assert_eq!(world.movers().len(), 1);
    }

    #[test]
    fn test_consumption_conserves_population() {
        let mut world = empty_world(Vec2::ZERO);
        let player = world.spawn_mover(Vec2::ZERO);
        let food = world.spawn_food_at(Vec2::new(0.05, 0.0), 0.025);
        world.spawn_food_at(Vec2::new(0.8, 0.8), 0.025);
        world.commit();
        assert_eq!(world.count_team(TeamId::CONSUMABLE), 2);

        world.step(at(0.0));

        assert_eq!(world.count_team(TeamId::CONSUMABLE), 2);
        assert!(world.entity(food).is_none());
        let size = world.entity(player).map(|e| e.size.value).unwrap();
        let expected = (0.05f32 * 0.05 + 0.025 * 0.025).sqrt();
        assert!((size - expected).abs() < 1e-6);
        assert_eq!(world.effects().len(), 1);
    }

    #[test]
    fn test_eaten_visual_moves_to_effect() {
        let mut world = empty_world(Vec2::ZERO);
        world.spawn_mover(Vec2::ZERO);
        let food = world.spawn_food_at(Vec2::new(0.05, 0.0), 0.025);
        world.commit();
        let raw = world
            .entity(food)
            .and_then(|e| e.visual.as_ref())
            .map(|v| v.raw())
            .unwrap();

        world.step(at(0.0));

        let effect = &world.effects()[0];
        assert_eq!(effect.visual.as_ref().map(|v| v.raw()), Some(raw));
        // Visual survives the removal of its entity; a new food got its own
        assert!(world.renderer().is_live(raw));
        assert_eq!(world.renderer().live_count(), 3);
        assert_eq!(world.renderer().destroyed, 0);
    }

    #[test]
    fn test_effect_expires_on_schedule() {
        let mut world = empty_world(Vec2::ZERO);
        world.spawn_mover(Vec2::ZERO);
        world.spawn_food_at(Vec2::new(0.05, 0.0), 0.025);
        world.commit();

        world.step(at(1.0));
        assert_eq!(world.effects().len(), 1);
        let expires = world.effects()[0].expires_at;
        let raw = world.effects()[0].visual.as_ref().map(|v| v.raw()).unwrap();

        // Respawned food may be eaten too, so track this effect by its visual
        let holds_raw = |w: &World| {
            w.effects()
                .iter()
                .any(|e| e.visual.as_ref().is_some_and(|v| v.raw() == raw))
        };

        for now in [1.0, 1.1, expires - 0.01] {
            world.step(at(now));
            assert!(holds_raw(&world), "effect gone early at {now}");
            assert!(world.renderer().is_live(raw));
        }

        world.step(at(expires));
        assert!(world.effects().iter().all(|e| e.expires_at != expires));
        assert!(!world.renderer().is_live(raw));
    }

    #[test]
    fn test_food_eaten_only_once() {
        let mut world = empty_world(Vec2::ZERO);
        world.spawn_mover(Vec2::new(-0.04, 0.0));
        world.spawn_mover(Vec2::new(0.04, 0.0));
        world.spawn_food_at(Vec2::ZERO, 0.025);
        world.commit();

        world.step(at(0.0));
        assert_eq!(world.effects().len(), 1);
        assert_eq!(world.count_team(TeamId::CONSUMABLE), 1);
        let grown = world
            .entities()
            .iter()
            .filter(|e| e.team_id() == TeamId::PLAYER && e.size.value > 0.05)
            .count();
        assert_eq!(grown, 1);
    }

    #[test]
    fn test_players_push_apart() {
        let mut world = empty_world(Vec2::ZERO);
        let a = world.spawn_mover(Vec2::new(-0.02, 0.0));
        let b = world.spawn_mover(Vec2::new(0.02, 0.0));
        world.commit();

        let distance = |w: &World| {
            let pa = w.entity(a).map(|e| e.position.value).unwrap();
            let pb = w.entity(b).map(|e| e.position.value).unwrap();
            pa.distance(pb)
        };
        let before = distance(&world);
        world.step(at(0.0));
        assert!(distance(&world) > before);
    }

    #[test]
    fn test_lone_player_not_paired_with_itself() {
        let mut world = empty_world(Vec2::new(0.3, 0.3));
        let id = world.spawn_mover(Vec2::new(0.3, 0.3));
        world.commit();

        world.step(at(0.0));
        let e = world.entity(id).unwrap();
        assert_eq!(e.position.value, Vec2::new(0.3, 0.3));
        assert_eq!(e.size.value, world.settings().mover_size);
    }

    #[test]
    fn test_players_stay_in_bounds_and_under_speed_cap() {
        let mut world = World::new(
            Settings {
                seed: 3,
                ..Default::default()
            },
            Bounds::default(),
            RecordingRenderer::new(),
            FixedTarget(Vec2::new(5.0, 5.0)),
            FixedStepClock::default(),
        );

        for _ in 0..600 {
            world.clock_mut().advance();
            world.tick();
        }

        for e in world.entities().iter().filter(|e| e.is_movable()) {
            let velocity = e.velocity.as_ref().unwrap();
            assert!(velocity.value.value.length() <= velocity.value.max + 1e-5);
            let (lo, hi) = world.bounds().inset(e.size.value);
            let p = e.position.value;
            assert!(p.x >= lo.x - 1e-5 && p.x <= hi.x + 1e-5);
            assert!(p.y >= lo.y - 1e-5 && p.y <= hi.y + 1e-5);
        }
        assert_eq!(world.count_team(TeamId::CONSUMABLE), 50);
    }

    #[test]
    fn test_remove_entity_cascades() {
        let mut world = empty_world(Vec2::ZERO);
        let id = world.spawn_mover(Vec2::ZERO);
        world.commit();

        assert!(world.remove_entity(id));
        assert!(!world.remove_entity(id));
        // Visual goes now, structure at commit
        assert_eq!(world.renderer().live_count(), 0);
        assert_eq!(world.entities().len(), 1);
        assert_eq!(world.movers().iter_live().count(), 0);

        world.commit();
        assert!(world.entity(id).is_none());
        assert!(world.movers().is_empty());
        assert!(world.velocities().is_empty());
        assert_eq!(world.renderer().destroyed, 1);
    }

    #[test]
    fn test_tick_samples_clock() {
        let mut world = empty_world(Vec2::ZERO);
        world.clock_mut().advance();
        world.clock_mut().advance();
        let ctx = world.tick();
        assert!((ctx.now - 2.0 * SIM_DT).abs() < 1e-6);
        assert_eq!(ctx.dt, SIM_DT);
        assert_eq!(world.frame(), 1);
    }

    #[test]
    fn test_determinism() {
        fn run() -> World<RecordingRenderer, OrbitTarget> {
            let mut world = World::new(
                Settings {
                    seed: 99,
                    ..Default::default()
                },
                Bounds::default(),
                RecordingRenderer::new(),
                OrbitTarget::new(0.6, 0.02),
                FixedStepClock::default(),
            );
            for _ in 0..240 {
                world.clock_mut().advance();
                world.tick();
            }
            world
        }

        let (w1, w2) = (run(), run());
        assert_eq!(w1.entities().len(), w2.entities().len());
        for (e1, e2) in w1.entities().iter().zip(w2.entities().iter()) {
            assert_eq!(e1.id, e2.id);
            assert_eq!(e1.position.value, e2.position.value);
            assert_eq!(e1.size.value, e2.size.value);
        }
    }
}

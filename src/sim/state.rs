//! Session state and entity types
//!
//! A session owns every live entity, the RNG and the running/terminated flag.
//! Each entity lives in exactly one typed collection; the creation-ordered
//! "all entities" view is derived from those collections on demand.

use std::sync::Arc;

use glam::Vec2;
use rand::{Rng, RngCore, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::mask::Mask;
use super::rect::Rect;
use super::sprites::SpriteSet;
use crate::settings::Settings;

/// Creation-ordered entity identifier
pub type EntityId = u32;

/// Whether the session is still being simulated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Active gameplay
    Running,
    /// Run ended; nothing changes any more
    Terminated,
}

/// What ended the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Termination {
    /// Quit signal from the platform
    Quit,
    /// A meteor hit the player
    Collision,
}

/// Things that happened during a frame, drained by the frontend (sound, stats)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// A laser left the ship
    LaserFired { pos: Vec2 },
    /// A meteor entered the field
    MeteorSpawned { pos: Vec2 },
    /// A laser destroyed a meteor; an explosion starts at `pos`
    MeteorDestroyed { pos: Vec2 },
    /// A meteor hit the player; the session is over
    PlayerHit { pos: Vec2 },
}

/// The player's ship
#[derive(Debug, Clone)]
pub struct Player {
    pub id: EntityId,
    /// Center position (pixels)
    pub pos: Vec2,
    /// Unit movement direction, or zero
    pub direction: Vec2,
    /// Pixels per second
    pub speed: f32,
    /// Cooldown: whether the next shot is allowed
    pub can_shoot: bool,
    /// Cooldown: time of the last shot (ms)
    pub last_shot_ms: u64,
    /// Cooldown: minimum time between shots (ms)
    pub cooldown_ms: u64,
    pub mask: Arc<Mask>,
}

impl Player {
    pub fn new(id: EntityId, pos: Vec2, speed: f32, cooldown_ms: u64, mask: Arc<Mask>) -> Self {
        Self {
            id,
            pos,
            direction: Vec2::ZERO,
            speed,
            can_shoot: true,
            last_shot_ms: 0,
            cooldown_ms,
            mask,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_center(self.pos, self.mask.size())
    }

    /// Set the direction from axis inputs; non-zero input is normalized
    pub fn steer(&mut self, right_minus_left: f32, down_minus_up: f32) {
        // normalize_or_zero leaves a zero vector untouched
        self.direction = Vec2::new(right_minus_left, down_minus_up).normalize_or_zero();
    }

    /// Move along the current direction
    pub fn advance(&mut self, dt: f32) {
        self.pos += self.direction * self.speed * dt;
    }

    /// Try to fire; returns the laser spawn point (ship's top-center) on success
    pub fn try_fire(&mut self, now_ms: u64) -> Option<Vec2> {
        if !self.can_shoot {
            return None;
        }
        self.can_shoot = false;
        self.last_shot_ms = now_ms;
        Some(self.rect().midtop())
    }

    /// Re-arm once the cooldown has elapsed
    pub fn recharge(&mut self, now_ms: u64) {
        if !self.can_shoot && now_ms.saturating_sub(self.last_shot_ms) >= self.cooldown_ms {
            self.can_shoot = true;
        }
    }
}

/// A projectile flying straight up
#[derive(Debug, Clone)]
pub struct Laser {
    pub id: EntityId,
    /// Center position (pixels)
    pub pos: Vec2,
    /// Pixels per second, upward
    pub speed: f32,
    pub mask: Arc<Mask>,
    /// Marked for removal at the end of the frame
    pub marked: bool,
}

impl Laser {
    /// Create a laser whose bottom edge is centered on `midbottom`
    pub fn new(id: EntityId, midbottom: Vec2, speed: f32, mask: Arc<Mask>) -> Self {
        let rect = Rect::from_midbottom(midbottom, mask.size());
        Self {
            id,
            pos: rect.center(),
            speed,
            mask,
            marked: false,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_center(self.pos, self.mask.size())
    }

    pub fn update(&mut self, dt: f32) {
        self.pos.y -= self.speed * dt;
        if self.rect().bottom() < 0 {
            self.marked = true;
        }
    }
}

/// Randomized flight parameters of a meteor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeteorParams {
    /// Direction before normalization; mostly down
    pub heading: Vec2,
    /// Pixels per second
    pub speed: f32,
    /// Degrees per second
    pub rotation_speed: f32,
}

impl MeteorParams {
    /// Roll parameters from the settings' ranges
    pub fn roll(rng: &mut impl Rng, settings: &Settings) -> Self {
        let drift = settings.meteor_drift;
        let (speed_lo, speed_hi) = settings.meteor_speed;
        let (rot_lo, rot_hi) = settings.meteor_rotation_speed;
        Self {
            heading: Vec2::new(rng.random_range(-drift..=drift), 1.0),
            speed: rng.random_range(speed_lo..=speed_hi) as f32,
            rotation_speed: rng.random_range(rot_lo..=rot_hi) as f32,
        }
    }

    /// Straight down with no spin
    pub fn straight_down(speed: f32) -> Self {
        Self {
            heading: Vec2::Y,
            speed,
            rotation_speed: 0.0,
        }
    }
}

/// A falling, spinning obstacle
#[derive(Debug, Clone)]
pub struct Meteor {
    pub id: EntityId,
    /// Center position (pixels)
    pub pos: Vec2,
    /// Unit direction of travel
    pub direction: Vec2,
    /// Pixels per second
    pub speed: f32,
    /// Degrees per second
    pub rotation_speed: f32,
    /// Accumulated rotation (degrees)
    pub rotation: f32,
    pub spawned_ms: u64,
    pub lifetime_ms: u64,
    /// Unrotated footprint
    pub original: Arc<Mask>,
    /// Footprint at the current rotation (drawn and collided)
    pub image: Arc<Mask>,
    /// Marked for removal at the end of the frame
    pub marked: bool,
}

impl Meteor {
    pub fn new(
        id: EntityId,
        pos: Vec2,
        params: MeteorParams,
        spawned_ms: u64,
        lifetime_ms: u64,
        mask: Arc<Mask>,
    ) -> Self {
        Self {
            id,
            pos,
            direction: params.heading.normalize_or_zero(),
            speed: params.speed,
            rotation_speed: params.rotation_speed,
            rotation: 0.0,
            spawned_ms,
            lifetime_ms,
            original: mask.clone(),
            image: mask,
            marked: false,
        }
    }

    /// Current bounds, sized by the rotated image
    pub fn rect(&self) -> Rect {
        Rect::from_center(self.pos, self.image.size())
    }

    /// Whether the lifetime has run out at `now_ms`
    pub fn expired(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.spawned_ms) >= self.lifetime_ms
    }

    pub fn update(&mut self, dt: f32, now_ms: u64) {
        self.pos += self.direction * self.speed * dt;
        if self.expired(now_ms) {
            self.marked = true;
            return;
        }

        if self.rotation_speed != 0.0 {
            self.rotation = (self.rotation + self.rotation_speed * dt) % 360.0;
            self.image = Arc::new(self.original.rotated(self.rotation));
        }
    }
}

/// Background decoration; never moves or collides
#[derive(Debug, Clone)]
pub struct Star {
    pub id: EntityId,
    pub pos: Vec2,
}

/// A one-shot explosion animation
#[derive(Debug, Clone)]
pub struct Explosion {
    pub id: EntityId,
    /// Center position (pixels)
    pub pos: Vec2,
    /// Fractional frame cursor
    pub frame_index: f32,
    /// Frames per second
    pub fps: f32,
    /// Number of frames in the animation
    pub frame_count: usize,
    /// Marked for removal at the end of the frame
    pub marked: bool,
}

impl Explosion {
    pub fn new(id: EntityId, pos: Vec2, fps: f32, frame_count: usize) -> Self {
        Self {
            id,
            pos,
            frame_index: 0.0,
            fps,
            frame_count,
            marked: false,
        }
    }

    /// Frame to show
    pub fn current_frame(&self) -> usize {
        (self.frame_index as usize).min(self.frame_count.saturating_sub(1))
    }

    pub fn update(&mut self, dt: f32) {
        self.frame_index += self.fps * dt;
        if self.frame_index >= self.frame_count as f32 {
            self.marked = true;
        }
    }
}

/// Borrowed view of any entity, for creation-ordered iteration
#[derive(Debug, Clone, Copy)]
pub enum EntityRef<'a> {
    Star(&'a Star),
    Player(&'a Player),
    Laser(&'a Laser),
    Meteor(&'a Meteor),
    Explosion(&'a Explosion),
}

impl EntityRef<'_> {
    pub fn id(&self) -> EntityId {
        match self {
            EntityRef::Star(e) => e.id,
            EntityRef::Player(e) => e.id,
            EntityRef::Laser(e) => e.id,
            EntityRef::Meteor(e) => e.id,
            EntityRef::Explosion(e) => e.id,
        }
    }

    /// Whether the entity waits for the end-of-frame sweep
    pub fn is_marked(&self) -> bool {
        match self {
            EntityRef::Star(_) | EntityRef::Player(_) => false,
            EntityRef::Laser(e) => e.marked,
            EntityRef::Meteor(e) => e.marked,
            EntityRef::Explosion(e) => e.marked,
        }
    }
}

/// Mutable view of any entity, for the per-frame update pass
#[derive(Debug)]
pub enum EntityMut<'a> {
    Star(&'a mut Star),
    Player(&'a mut Player),
    Laser(&'a mut Laser),
    Meteor(&'a mut Meteor),
    Explosion(&'a mut Explosion),
}

impl EntityMut<'_> {
    pub fn id(&self) -> EntityId {
        match self {
            EntityMut::Star(e) => e.id,
            EntityMut::Player(e) => e.id,
            EntityMut::Laser(e) => e.id,
            EntityMut::Meteor(e) => e.id,
            EntityMut::Explosion(e) => e.id,
        }
    }
}

/// Running totals for the end-of-run summary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    pub lasers_fired: u32,
    pub meteors_spawned: u32,
    pub meteors_destroyed: u32,
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct Session<R = Pcg32> {
    pub settings: Settings,
    pub sprites: SpriteSet,
    /// Current phase
    pub phase: SessionPhase,
    /// Why the session ended, once it has
    pub termination: Option<Termination>,
    /// Clock time of the latest frame (ms since start)
    pub time_ms: u64,
    /// Frames stepped so far
    pub frame: u64,
    pub player: Player,
    pub stars: Vec<Star>,
    pub lasers: Vec<Laser>,
    pub meteors: Vec<Meteor>,
    pub explosions: Vec<Explosion>,
    /// Events raised since the last drain
    pub events: Vec<GameEvent>,
    pub stats: SessionStats,
    rng: R,
    next_id: EntityId,
}

impl Session<Pcg32> {
    /// Create a session with a seeded PCG generator and the procedural sprites
    pub fn new(settings: Settings, seed: u64) -> Self {
        let sprites = SpriteSet::procedural(settings.explosion_frames);
        Self::with_rng(settings, sprites, Pcg32::seed_from_u64(seed))
    }
}

impl<R: RngCore> Session<R> {
    /// Create a session with an injected random source and sprite set
    ///
    /// Stars are scattered first, then the player is placed at the center.
    pub fn with_rng(settings: Settings, sprites: SpriteSet, rng: R) -> Self {
        let settings = settings.sanitized();
        let center = settings.screen_size() / 2.0;
        let player = Player::new(
            0,
            center,
            settings.player_speed,
            settings.shoot_cooldown_ms,
            sprites.player.clone(),
        );

        let mut session = Self {
            settings,
            sprites,
            phase: SessionPhase::Running,
            termination: None,
            time_ms: 0,
            frame: 0,
            player,
            stars: Vec::new(),
            lasers: Vec::new(),
            meteors: Vec::new(),
            explosions: Vec::new(),
            events: Vec::new(),
            stats: SessionStats::default(),
            rng,
            next_id: 1,
        };

        super::spawner::spawn_stars(&mut session);
        session.player.id = session.next_entity_id();
        session
    }
}

impl<R> Session<R> {

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// The injected random source
    pub fn rng(&mut self) -> &mut R {
        &mut self.rng
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.phase == SessionPhase::Running
    }

    /// End the session; only the first call has any effect
    pub fn terminate(&mut self, cause: Termination) {
        if self.phase == SessionPhase::Terminated {
            return;
        }
        log::info!("Session terminated ({cause:?}) at {} ms", self.time_ms);
        self.phase = SessionPhase::Terminated;
        self.termination = Some(cause);
    }

    /// Survival score: elapsed time scaled down
    pub fn score(&self) -> u64 {
        self.time_ms / self.settings.score_divisor
    }

    /// Add a laser whose bottom edge sits on `midbottom`
    pub fn spawn_laser(&mut self, midbottom: Vec2) -> EntityId {
        let id = self.next_entity_id();
        let laser = Laser::new(id, midbottom, self.settings.laser_speed, self.sprites.laser.clone());
        self.lasers.push(laser);
        self.stats.lasers_fired += 1;
        self.events.push(GameEvent::LaserFired { pos: midbottom });
        id
    }

    /// Add a meteor centered on `pos`, born now
    pub fn spawn_meteor_at(&mut self, pos: Vec2, params: MeteorParams) -> EntityId {
        let id = self.next_entity_id();
        let meteor = Meteor::new(
            id,
            pos,
            params,
            self.time_ms,
            self.settings.meteor_lifetime_ms,
            self.sprites.meteor.clone(),
        );
        self.meteors.push(meteor);
        self.stats.meteors_spawned += 1;
        self.events.push(GameEvent::MeteorSpawned { pos });
        id
    }

    /// Add an explosion centered on `pos`
    pub fn spawn_explosion(&mut self, pos: Vec2) -> EntityId {
        let id = self.next_entity_id();
        let explosion = Explosion::new(
            id,
            pos,
            self.settings.explosion_fps,
            self.sprites.explosion.len(),
        );
        self.explosions.push(explosion);
        id
    }

    /// Mark an entity for removal; unknown, already-marked and permanent
    /// entities are left alone
    pub fn mark(&mut self, id: EntityId) {
        if let Some(l) = self.lasers.iter_mut().find(|l| l.id == id) {
            l.marked = true;
        } else if let Some(m) = self.meteors.iter_mut().find(|m| m.id == id) {
            m.marked = true;
        } else if let Some(e) = self.explosions.iter_mut().find(|e| e.id == id) {
            e.marked = true;
        }
    }

    /// Drop every marked entity (end-of-frame compaction)
    pub fn sweep(&mut self) {
        self.lasers.retain(|l| !l.marked);
        self.meteors.retain(|m| !m.marked);
        self.explosions.retain(|e| !e.marked);
    }

    /// Whether an entity is still in the session (marked or not)
    pub fn contains(&self, id: EntityId) -> bool {
        self.entities().iter().any(|e| e.id() == id)
    }

    /// Number of entities, the player and stars included
    pub fn entity_count(&self) -> usize {
        self.stars.len() + 1 + self.lasers.len() + self.meteors.len() + self.explosions.len()
    }

    /// All entities in creation order
    pub fn entities(&self) -> Vec<EntityRef<'_>> {
        let mut all = Vec::with_capacity(self.entity_count());
        all.extend(self.stars.iter().map(EntityRef::Star));
        all.push(EntityRef::Player(&self.player));
        all.extend(self.lasers.iter().map(EntityRef::Laser));
        all.extend(self.meteors.iter().map(EntityRef::Meteor));
        all.extend(self.explosions.iter().map(EntityRef::Explosion));
        all.sort_by_key(|e| e.id());
        all
    }

    /// All entities in creation order, mutably
    pub fn entities_mut(&mut self) -> Vec<EntityMut<'_>> {
        let mut all = Vec::with_capacity(self.entity_count());
        all.extend(self.stars.iter_mut().map(EntityMut::Star));
        all.push(EntityMut::Player(&mut self.player));
        all.extend(self.lasers.iter_mut().map(EntityMut::Laser));
        all.extend(self.meteors.iter_mut().map(EntityMut::Meteor));
        all.extend(self.explosions.iter_mut().map(EntityMut::Explosion));
        all.sort_by_key(|e| e.id());
        all
    }

    /// Take the events raised since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session::new(Settings::default(), 12345)
    }

    #[test]
    fn test_new_session_layout() {
        let s = session();
        assert_eq!(s.phase, SessionPhase::Running);
        assert_eq!(s.stars.len(), 20);
        // Stars come first, then the player
        assert_eq!(s.player.id, 21);
        assert_eq!(s.player.pos, Vec2::new(640.0, 360.0));
        assert_eq!(s.entity_count(), 21);
        assert!(s.lasers.is_empty() && s.meteors.is_empty() && s.explosions.is_empty());
    }

    #[test]
    fn test_steer_normalizes_diagonals() {
        let mut s = session();
        s.player.steer(1.0, -1.0);
        assert!((s.player.direction.length() - 1.0).abs() < 1e-6);
        s.player.steer(0.0, 0.0);
        assert_eq!(s.player.direction, Vec2::ZERO);
    }

    #[test]
    fn test_fire_and_recharge() {
        let mut s = session();
        assert!(s.player.try_fire(1000).is_some());
        assert!(s.player.try_fire(1001).is_none());
        s.player.recharge(1399);
        assert!(!s.player.can_shoot);
        s.player.recharge(1400);
        assert!(s.player.can_shoot);
    }

    #[test]
    fn test_laser_spawns_on_ship_nose() {
        let mut s = session();
        let nose = s.player.rect().midtop();
        let id = s.spawn_laser(nose);
        let laser = s.lasers.iter().find(|l| l.id == id).unwrap();
        assert_eq!(laser.rect().midbottom(), nose);
        assert_eq!(s.stats.lasers_fired, 1);
    }

    #[test]
    fn test_mark_is_idempotent_and_sweep_removes() {
        let mut s = session();
        let id = s.spawn_meteor_at(Vec2::new(100.0, 100.0), MeteorParams::straight_down(400.0));
        s.mark(id);
        s.mark(id);
        assert!(s.contains(id));
        s.sweep();
        assert!(!s.contains(id));
        // Marking a removed or unknown id is a no-op
        s.mark(id);
        s.mark(9999);
        s.sweep();
        assert_eq!(s.entity_count(), 21);
    }

    #[test]
    fn test_marking_the_player_does_nothing() {
        let mut s = session();
        let player_id = s.player.id;
        s.mark(player_id);
        s.sweep();
        assert!(s.contains(player_id));
    }

    #[test]
    fn test_entities_are_creation_ordered() {
        let mut s = session();
        let m = s.spawn_meteor_at(Vec2::new(10.0, 10.0), MeteorParams::straight_down(400.0));
        let l = s.spawn_laser(Vec2::new(20.0, 20.0));
        let e = s.spawn_explosion(Vec2::new(30.0, 30.0));
        let ids: Vec<_> = s.entities().iter().map(|e| e.id()).collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(&ids[ids.len() - 3..], &[m, l, e]);
    }

    #[test]
    fn test_meteor_params_roll_within_ranges() {
        let mut rng = Pcg32::seed_from_u64(7);
        let settings = Settings::default();
        for _ in 0..100 {
            let p = MeteorParams::roll(&mut rng, &settings);
            assert!(p.heading.x.abs() <= 0.5 && p.heading.y == 1.0);
            assert!((400.0..=500.0).contains(&p.speed));
            assert!((40.0..=80.0).contains(&p.rotation_speed));
            assert_eq!(p.speed.fract(), 0.0);
        }
    }

    #[test]
    fn test_meteor_direction_is_unit() {
        let params = MeteorParams {
            heading: Vec2::new(0.5, 1.0),
            speed: 450.0,
            rotation_speed: 60.0,
        };
        let mask = Arc::new(Mask::filled(10, 10));
        let meteor = Meteor::new(1, Vec2::ZERO, params, 0, 3000, mask);
        assert!((meteor.direction.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_explosion_runs_through_its_frames() {
        let mut e = Explosion::new(1, Vec2::ZERO, 20.0, 21);
        e.update(0.5);
        assert_eq!(e.current_frame(), 10);
        assert!(!e.marked);
        e.update(0.55);
        assert!(e.marked);
    }

    /// Read-only queries need nothing from the random source
    fn overview<R>(s: &Session<R>) -> (bool, u64, usize, usize) {
        (s.is_running(), s.score(), s.entities().len(), s.entity_count())
    }

    #[test]
    fn test_queries_work_for_any_rng_type() {
        let mut s = session();
        s.time_ms = 1234;
        assert_eq!(overview(&s), (true, 12, 21, 21));
        assert!(s.contains(s.player.id));
        assert!(s.drain_events().is_empty());
    }

    #[test]
    fn test_terminate_only_once() {
        let mut s = session();
        s.terminate(Termination::Collision);
        s.terminate(Termination::Quit);
        assert_eq!(s.phase, SessionPhase::Terminated);
        assert_eq!(s.termination, Some(Termination::Collision));
    }
}

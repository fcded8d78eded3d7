//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay deterministic:
//! - Time comes in through `FrameTime` only
//! - Randomness comes from the session's injected RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod mask;
pub mod rect;
pub mod spawner;
pub mod sprites;
pub mod state;
pub mod tick;

pub use collision::{LaserHit, laser_meteor_collisions, player_meteor_collisions, resolve_collisions};
pub use mask::Mask;
pub use rect::Rect;
pub use spawner::{SpawnTimer, spawn_meteor, spawn_stars};
pub use sprites::SpriteSet;
pub use state::{
    EntityId, EntityMut, EntityRef, Explosion, GameEvent, Laser, Meteor, MeteorParams, Player,
    Session, SessionPhase, SessionStats, Star, Termination,
};
pub use tick::{FrameTime, SessionEvent, TickInput, step};

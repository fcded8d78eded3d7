//! Per-frame simulation step
//!
//! Advances a session by one variable-length frame: events, player control,
//! entity updates, collisions and the end-of-frame sweep, in that order.

use rand::RngCore;

use super::collision::resolve_collisions;
use super::spawner::spawn_meteor;
use super::state::{EntityMut, Session, Termination};

/// Input commands for a single frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Fire is held
    pub fire: bool,
}

impl TickInput {
    /// Horizontal axis: +1 right, -1 left
    pub fn axis_x(&self) -> f32 {
        self.right as i32 as f32 - self.left as i32 as f32
    }

    /// Vertical axis: +1 down, -1 up
    pub fn axis_y(&self) -> f32 {
        self.down as i32 as f32 - self.up as i32 as f32
    }
}

/// Timing of one frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameTime {
    /// Milliseconds since the session started
    pub now_ms: u64,
    /// Seconds since the previous frame
    pub dt: f32,
}

impl FrameTime {
    pub fn new(now_ms: u64, dt: f32) -> Self {
        Self { now_ms, dt }
    }
}

/// Discrete events delivered to the session at the start of a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// The platform asked to close
    Quit,
    /// The spawn timer elapsed once
    SpawnMeteor,
    /// Anything else the platform reports; ignored
    Other(u32),
}

/// Advance the session by one frame
///
/// Does nothing once the session has terminated.
pub fn step<R: RngCore>(
    session: &mut Session<R>,
    input: &TickInput,
    events: &[SessionEvent],
    frame: FrameTime,
) {
    if !session.is_running() {
        return;
    }

    let dt = frame.dt.max(0.0);
    let now_ms = frame.now_ms;
    session.time_ms = now_ms;
    session.frame += 1;

    for event in events {
        match event {
            SessionEvent::Quit => {
                session.terminate(Termination::Quit);
                return;
            }
            SessionEvent::SpawnMeteor => {
                spawn_meteor(session);
            }
            SessionEvent::Other(code) => log::trace!("Ignoring event {code}"),
        }
    }

    // New lasers join after the pass, so they first move next frame
    let mut fire_from = None;
    for entity in session.entities_mut() {
        match entity {
            EntityMut::Star(_) => {}
            EntityMut::Player(player) => {
                player.steer(input.axis_x(), input.axis_y());
                player.advance(dt);
                if input.fire {
                    fire_from = player.try_fire(now_ms);
                }
                player.recharge(now_ms);
            }
            EntityMut::Laser(laser) => laser.update(dt),
            EntityMut::Meteor(meteor) => meteor.update(dt, now_ms),
            EntityMut::Explosion(explosion) => explosion.update(dt),
        }
    }
    if let Some(point) = fire_from {
        session.spawn_laser(point);
    }

    resolve_collisions(session);
    session.sweep();
}

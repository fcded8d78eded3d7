//! Input sources
//!
//! Every source is sampled once per frame and yields a `KeyState`. The
//! browser tracks real key events, tests play back a script and the headless
//! native run uses an autopilot that reads the session.

use glam::Vec2;

use crate::sim::{FrameTime, Session, TickInput};

/// Held keys for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyState {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub fire: bool,
    /// Close requested
    pub quit: bool,
}

impl KeyState {
    /// Only fire held
    pub const FIRE: Self = Self {
        up: false,
        down: false,
        left: false,
        right: false,
        fire: true,
        quit: false,
    };

    /// Only quit requested
    pub const QUIT: Self = Self {
        up: false,
        down: false,
        left: false,
        right: false,
        fire: false,
        quit: true,
    };
}

impl From<KeyState> for TickInput {
    fn from(keys: KeyState) -> Self {
        TickInput {
            up: keys.up,
            down: keys.down,
            left: keys.left,
            right: keys.right,
            fire: keys.fire,
        }
    }
}

/// Anything that can be polled for the keys held this frame
pub trait InputSource {
    fn sample<R>(&mut self, frame: FrameTime, session: &Session<R>) -> KeyState;
}

/// A fixed key state is its own input source
impl InputSource for KeyState {
    fn sample<R>(&mut self, _frame: FrameTime, _session: &Session<R>) -> KeyState {
        *self
    }
}

/// Keyboard tracked from key-down/key-up events
///
/// Arrow keys steer, space fires and escape quits. The quit request
/// latches until sampled.
#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    keys: KeyState,
}

impl KeyboardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle a key press by its `KeyboardEvent.code`; returns whether the key is used
    pub fn key_down(&mut self, code: &str) -> bool {
        self.set(code, true)
    }

    /// Handle a key release by its `KeyboardEvent.code`
    pub fn key_up(&mut self, code: &str) -> bool {
        if code == "Escape" {
            return true;
        }
        self.set(code, false)
    }

    /// Drop every held key (window lost focus)
    pub fn release_all(&mut self) {
        self.keys = KeyState {
            quit: self.keys.quit,
            ..KeyState::default()
        };
    }

    fn set(&mut self, code: &str, held: bool) -> bool {
        match code {
            "ArrowUp" => self.keys.up = held,
            "ArrowDown" => self.keys.down = held,
            "ArrowLeft" => self.keys.left = held,
            "ArrowRight" => self.keys.right = held,
            "Space" => self.keys.fire = held,
            "Escape" => self.keys.quit |= held,
            _ => return false,
        }
        true
    }
}

impl InputSource for KeyboardState {
    fn sample<R>(&mut self, _frame: FrameTime, _session: &Session<R>) -> KeyState {
        let keys = self.keys;
        self.keys.quit = false;
        keys
    }
}

/// Timed key script; each entry holds from its start time until the next
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    steps: Vec<(u64, KeyState)>,
}

impl ScriptedInput {
    /// Build from `(start_ms, keys)` pairs in any order
    pub fn new(mut steps: Vec<(u64, KeyState)>) -> Self {
        steps.sort_by_key(|(t, _)| *t);
        Self { steps }
    }

    /// Hold `keys` for the whole run
    pub fn constant(keys: KeyState) -> Self {
        Self::new(vec![(0, keys)])
    }

    /// Keys held at `now_ms`
    pub fn keys_at(&self, now_ms: u64) -> KeyState {
        self.steps
            .iter()
            .take_while(|(t, _)| *t <= now_ms)
            .last()
            .map(|(_, k)| *k)
            .unwrap_or_default()
    }
}

impl InputSource for ScriptedInput {
    fn sample<R>(&mut self, frame: FrameTime, _session: &Session<R>) -> KeyState {
        self.keys_at(frame.now_ms)
    }
}

/// Simple bot for headless runs
///
/// Keeps firing, sidesteps the closest meteor that is falling toward the
/// ship and otherwise drifts back to a home spot low on the screen.
#[derive(Debug, Clone)]
pub struct Autopilot {
    /// How far above the ship a meteor counts as a threat (pixels)
    pub lookahead: f32,
    /// Extra horizontal clearance kept from a threat (pixels)
    pub clearance: f32,
    /// Distance from home that still counts as home (pixels)
    pub dead_zone: f32,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self {
            lookahead: 320.0,
            clearance: 24.0,
            dead_zone: 8.0,
        }
    }
}

impl Autopilot {
    fn home<R>(session: &Session<R>) -> Vec2 {
        let size = session.settings.screen_size();
        Vec2::new(size.x / 2.0, size.y * 0.75)
    }

    fn steer_toward(&self, from: Vec2, to: Vec2, keys: &mut KeyState) {
        let d = to - from;
        keys.left = d.x < -self.dead_zone;
        keys.right = d.x > self.dead_zone;
        keys.up = d.y < -self.dead_zone;
        keys.down = d.y > self.dead_zone;
    }
}

impl InputSource for Autopilot {
    fn sample<R>(&mut self, _frame: FrameTime, session: &Session<R>) -> KeyState {
        let player = &session.player;
        let ship_half_width = player.mask.size().x / 2.0;
        let width = session.settings.screen_size().x;

        let threat = session
            .meteors
            .iter()
            .filter(|m| {
                let reach = ship_half_width + m.image.size().x / 2.0 + self.clearance;
                let above = player.pos.y - m.pos.y;
                (m.pos.x - player.pos.x).abs() < reach && above > -reach && above < self.lookahead
            })
            .min_by(|a, b| {
                a.pos
                    .distance_squared(player.pos)
                    .partial_cmp(&b.pos.distance_squared(player.pos))
                    .unwrap_or(std::cmp::Ordering::Equal)
            });

        let mut keys = KeyState {
            fire: true,
            ..KeyState::default()
        };

        match threat {
            Some(meteor) => {
                // Dodge sideways, away from the meteor unless a wall is in the way
                let margin = ship_half_width * 2.0;
                let go_right = if player.pos.x < margin {
                    true
                } else if player.pos.x > width - margin {
                    false
                } else {
                    meteor.pos.x <= player.pos.x
                };
                keys.right = go_right;
                keys.left = !go_right;
                // Backing off buys time
                keys.down = player.pos.y < session.settings.screen_size().y - margin;
            }
            None => self.steer_toward(player.pos, Self::home(session), &mut keys),
        }
        keys
    }
}

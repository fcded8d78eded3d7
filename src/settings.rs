//! Game settings and tuning
//!
//! Every gameplay constant lives here so a run can be re-tuned from JSON
//! (LocalStorage on web, a file named by `SPACE_SHOOTER_SETTINGS` on native).

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Game settings/tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Window ===
    /// Visible width in pixels
    pub width: u32,
    /// Visible height in pixels
    pub height: u32,
    /// Window/page title
    pub title: String,

    // === Player ===
    /// Movement speed (pixels/second)
    pub player_speed: f32,
    /// Minimum time between two shots (ms)
    pub shoot_cooldown_ms: u64,

    // === Laser ===
    /// Upward speed (pixels/second)
    pub laser_speed: f32,

    // === Meteors ===
    /// Spawn timer period (ms)
    pub spawn_interval_ms: u64,
    /// Time after which a meteor is removed regardless of position (ms)
    pub meteor_lifetime_ms: u64,
    /// Inclusive speed range (pixels/second)
    pub meteor_speed: (i32, i32),
    /// Inclusive rotation speed range (degrees/second)
    pub meteor_rotation_speed: (i32, i32),
    /// Maximum horizontal drift before normalization (direction is (drift, 1))
    pub meteor_drift: f32,
    /// Inclusive spawn height range, negative = above the top edge
    pub meteor_spawn_y: (i32, i32),

    // === Explosions ===
    /// Animation speed (frames/second)
    pub explosion_fps: f32,
    /// Number of animation frames
    pub explosion_frames: usize,

    // === Scene ===
    /// Background stars created at session start
    pub star_count: usize,
    /// Background color as 0xRRGGBB
    pub background: u32,
    /// Score text and box color
    pub score_color: [u8; 3],
    /// Elapsed ms per score point
    pub score_divisor: u64,

    // === Audio ===
    /// Laser cue volume (0.0 - 1.0)
    pub laser_volume: f32,
    /// Explosion cue volume (0.0 - 1.0)
    pub explosion_volume: f32,
    /// Background music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Play background music
    pub music_enabled: bool,
    /// Mute everything
    pub muted: bool,

    /// Fixed RNG seed (None = seed from the clock)
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            title: "Timbit travels".to_string(),

            player_speed: 300.0,
            shoot_cooldown_ms: 400,

            laser_speed: 400.0,

            spawn_interval_ms: 200,
            meteor_lifetime_ms: 3000,
            meteor_speed: (400, 500),
            meteor_rotation_speed: (40, 80),
            meteor_drift: 0.5,
            meteor_spawn_y: (-200, -100),

            explosion_fps: 20.0,
            explosion_frames: 21,

            star_count: 20,
            background: 0x150053,
            score_color: [240, 240, 240],
            score_divisor: 100,

            laser_volume: 0.5,
            explosion_volume: 1.0,
            music_volume: 0.4,
            // Music ships disabled
            music_enabled: false,
            muted: false,

            seed: None,
        }
    }
}

impl Settings {
    /// Screen size as a vector
    pub fn screen_size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    /// Parse settings from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let settings: Self = serde_json::from_str(json)?;
        Ok(settings.sanitized())
    }

    /// Clamp values that would otherwise break the simulation
    pub fn sanitized(mut self) -> Self {
        self.width = self.width.max(1);
        self.height = self.height.max(1);
        self.spawn_interval_ms = self.spawn_interval_ms.max(1);
        self.score_divisor = self.score_divisor.max(1);
        self.explosion_frames = self.explosion_frames.max(1);
        if self.meteor_speed.0 > self.meteor_speed.1 {
            self.meteor_speed = (self.meteor_speed.1, self.meteor_speed.0);
        }
        if self.meteor_rotation_speed.0 > self.meteor_rotation_speed.1 {
            self.meteor_rotation_speed = (self.meteor_rotation_speed.1, self.meteor_rotation_speed.0);
        }
        if self.meteor_spawn_y.0 > self.meteor_spawn_y.1 {
            self.meteor_spawn_y = (self.meteor_spawn_y.1, self.meteor_spawn_y.0);
        }
        let defaults = Self::default();
        self.meteor_drift = finite_or(self.meteor_drift, defaults.meteor_drift).abs();
        self.player_speed = finite_or(self.player_speed, defaults.player_speed);
        self.laser_speed = finite_or(self.laser_speed, defaults.laser_speed);
        self.explosion_fps = finite_or(self.explosion_fps, defaults.explosion_fps);
        if self.explosion_fps <= 0.0 {
            self.explosion_fps = defaults.explosion_fps;
        }
        self.laser_volume = finite_or(self.laser_volume, defaults.laser_volume).clamp(0.0, 1.0);
        self.explosion_volume =
            finite_or(self.explosion_volume, defaults.explosion_volume).clamp(0.0, 1.0);
        self.music_volume = finite_or(self.music_volume, defaults.music_volume).clamp(0.0, 1.0);
        self
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "space_shooter_settings";

    /// Environment variable naming a JSON settings file
    #[cfg(not(target_arch = "wasm32"))]
    pub const ENV_VAR: &'static str = "SPACE_SHOOTER_SETTINGS";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {e}"),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Load settings from the file named by `SPACE_SHOOTER_SETTINGS`, if any
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let Ok(path) = std::env::var(Self::ENV_VAR) else {
            log::info!("Using default settings");
            return Self::default();
        };

        match std::fs::read_to_string(&path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {path}");
                    settings
                }
                Err(e) => {
                    log::warn!("Malformed settings in {path}: {e}; using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Cannot read settings file {path}: {e}; using defaults");
                Self::default()
            }
        }
    }

}

/// `value`, or `fallback` when it is NaN or infinite
fn finite_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tuning() {
        let s = Settings::default();
        assert_eq!((s.width, s.height), (1280, 720));
        assert_eq!(s.shoot_cooldown_ms, 400);
        assert_eq!(s.spawn_interval_ms, 200);
        assert_eq!(s.meteor_lifetime_ms, 3000);
        assert_eq!(s.star_count, 20);
        assert_eq!(s.explosion_frames, 21);
        assert!(!s.music_enabled);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let s = Settings::from_json(r#"{ "player_speed": 450.0, "seed": 7 }"#).unwrap();
        assert_eq!(s.player_speed, 450.0);
        assert_eq!(s.seed, Some(7));
        assert_eq!(s.laser_speed, 400.0);
        assert_eq!(s.meteor_speed, (400, 500));
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(Settings::from_json("{ width: nope").is_err());
    }

    #[test]
    fn test_sanitize_swaps_inverted_ranges() {
        let s = Settings {
            meteor_speed: (500, 400),
            spawn_interval_ms: 0,
            laser_volume: 3.0,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(s.meteor_speed, (400, 500));
        assert_eq!(s.spawn_interval_ms, 1);
        assert_eq!(s.laser_volume, 1.0);
    }

    #[test]
    fn test_json_roundtrip_preserves_title() {
        let s = Settings::default();
        let json = serde_json::to_string(&s).unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), s);
    }

    #[test]
    fn test_sanitize_replaces_non_finite_values() {
        let s = Settings {
            meteor_drift: f32::NAN,
            player_speed: f32::INFINITY,
            laser_speed: f32::NEG_INFINITY,
            explosion_fps: 0.0,
            music_volume: f32::NAN,
            ..Default::default()
        }
        .sanitized();
        let defaults = Settings::default();
        assert_eq!(s.meteor_drift, defaults.meteor_drift);
        assert_eq!(s.player_speed, defaults.player_speed);
        assert_eq!(s.laser_speed, defaults.laser_speed);
        assert_eq!(s.explosion_fps, defaults.explosion_fps);
        assert_eq!(s.music_volume, defaults.music_volume);
    }

    #[test]
    fn test_non_finite_drift_still_rolls_meteors() {
        use crate::sim::{FrameTime, Session, SessionEvent, TickInput, step};

        let settings = Settings {
            meteor_drift: f32::INFINITY,
            ..Default::default()
        };
        let mut session = Session::new(settings, 5);
        step(
            &mut session,
            &TickInput::default(),
            &[SessionEvent::SpawnMeteor],
            FrameTime::new(200, 0.016),
        );
        assert_eq!(session.meteors.len(), 1);
        assert!(session.meteors[0].direction.is_finite());
    }
}

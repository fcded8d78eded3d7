//! Space Shooter - dodge the meteor shower, shoot what you can
//!
//! Core modules:
//! - `sim`: Frame-stepped simulation (entities, spawning, collisions, session state)
//! - `game`: Loop driver wiring the simulation to its collaborators
//! - `renderer`: Render sink trait, vertex batching and the WebGPU pipeline
//! - `platform`: Clock and input sources
//! - `audio`: Sound cues and audio sinks
//! - `settings`: Data-driven game constants

pub mod audio;
pub mod game;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use game::{EndReason, Game, RunSummary};
pub use settings::Settings;

/// Game configuration constants that are not worth tuning
pub mod consts {
    /// Alpha value above which a pixel counts as solid (matches the usual sprite mask threshold)
    pub const MASK_ALPHA_THRESHOLD: u8 = 127;
    /// Gap between browser frames treated as a pause (hidden tab, debugger)
    pub const MAX_FRAME_GAP_MS: f64 = 250.0;
    /// Fixed step used by the headless native run
    pub const HEADLESS_DT_MS: u64 = 16;
    /// Frame cap for the headless native run (two minutes of game time)
    pub const HEADLESS_MAX_FRAMES: u64 = 7_500;
    /// Frames between progress log lines in long runs
    pub const PROGRESS_LOG_FRAMES: u64 = 600;
    /// Score overlay: distance from the bottom edge to the text baseline
    pub const SCORE_BOTTOM_MARGIN: f32 = 50.0;
    /// Score overlay: box inflation around the text
    pub const SCORE_BOX_INFLATE: (f32, f32) = (20.0, 10.0);
    /// Score overlay: box vertical offset (negative = up)
    pub const SCORE_BOX_SHIFT_Y: f32 = -8.0;
    /// Score overlay: box border width and corner radius
    pub const SCORE_BOX_BORDER: f32 = 5.0;
    pub const SCORE_BOX_RADIUS: f32 = 10.0;
    /// Score overlay: glyph cell scale (pixels per font cell)
    pub const SCORE_GLYPH_SCALE: f32 = 6.0;
}

/// Convert a `0xRRGGBB` color to linear-ish RGBA floats in 0..1
#[inline]
pub fn rgb_hex(hex: u32) -> [f32; 4] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
        1.0,
    ]
}

/// Convert an 8-bit RGB triple to RGBA floats in 0..1
#[inline]
pub fn rgb8(r: u8, g: u8, b: u8) -> [f32; 4] {
    [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_hex_background() {
        let c = rgb_hex(0x150053);
        assert!((c[0] - 21.0 / 255.0).abs() < 1e-6);
        assert_eq!(c[1], 0.0);
        assert!((c[2] - 83.0 / 255.0).abs() < 1e-6);
        assert_eq!(c[3], 1.0);
    }

    #[test]
    fn test_rgb8_matches_hex() {
        assert_eq!(rgb8(240, 240, 240), rgb_hex(0xf0f0f0));
    }
}

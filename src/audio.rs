//! Sound cues and audio sinks
//!
//! The simulation never plays audio itself; it raises `GameEvent`s and the
//! game loop turns them into cues for whichever sink is plugged in. In the
//! browser the cues are synthesized with Web Audio oscillators, so no sound
//! files are needed.

use crate::settings::Settings;
use crate::sim::GameEvent;

/// Sounds the game can ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    /// A laser was fired
    Laser,
    /// A meteor blew up
    Explosion,
    /// Background music loop (start)
    Music,
}

impl SoundCue {
    /// Cue for a simulation event, if it makes a sound
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::LaserFired { .. } => Some(SoundCue::Laser),
            GameEvent::MeteorDestroyed { .. } => Some(SoundCue::Explosion),
            GameEvent::MeteorSpawned { .. } | GameEvent::PlayerHit { .. } => None,
        }
    }

    /// Volume for this cue under the given settings (0.0 when muted)
    pub fn volume(self, settings: &Settings) -> f32 {
        if settings.muted {
            return 0.0;
        }
        match self {
            SoundCue::Laser => settings.laser_volume,
            SoundCue::Explosion => settings.explosion_volume,
            SoundCue::Music => {
                if settings.music_enabled {
                    settings.music_volume
                } else {
                    0.0
                }
            }
        }
    }
}

/// Destination for sound cues
pub trait AudioSink {
    fn play(&mut self, cue: SoundCue);
}

/// Sink that only counts what it was asked to play (native/headless)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SilentAudio {
    pub lasers: u32,
    pub explosions: u32,
    pub music: u32,
}

impl AudioSink for SilentAudio {
    fn play(&mut self, cue: SoundCue) {
        log::trace!("Sound cue {cue:?}");
        match cue {
            SoundCue::Laser => self.lasers += 1,
            SoundCue::Explosion => self.explosions += 1,
            SoundCue::Music => self.music += 1,
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::WebAudio;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{AudioSink, SoundCue};
    use crate::settings::Settings;

    /// Web Audio sink with procedurally generated effects
    pub struct WebAudio {
        ctx: Option<AudioContext>,
        settings: Settings,
        music: Option<(OscillatorNode, OscillatorNode)>,
    }

    impl WebAudio {
        pub fn new(settings: &Settings) -> Self {
            // Fails outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                settings: settings.clone(),
                music: None,
            }
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        /// Create an oscillator with gain envelope
        fn create_osc(
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        /// Laser - falling square zap
        fn play_laser(ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = Self::create_osc(ctx, 1400.0, OscillatorType::Square) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.25, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.15)
                .ok();
            osc.frequency().set_value_at_time(1400.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(220.0, t + 0.15)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.2).ok();
        }

        /// Explosion - low rumble with a crack on top
        fn play_explosion(ctx: &AudioContext, vol: f32) {
            let t = ctx.current_time();

            if let Some((osc, gain)) = Self::create_osc(ctx, 100.0, OscillatorType::Sawtooth) {
                gain.gain().set_value_at_time(vol * 0.5, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.4)
                    .ok();
                osc.frequency().set_value_at_time(100.0, t).ok();
                osc.frequency()
                    .exponential_ramp_to_value_at_time(30.0, t + 0.4)
                    .ok();
                osc.start().ok();
                osc.stop_with_when(t + 0.5).ok();
            }

            if let Some((osc, gain)) = Self::create_osc(ctx, 1500.0, OscillatorType::Square) {
                gain.gain().set_value_at_time(vol * 0.2, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.1)
                    .ok();
                osc.start().ok();
                osc.stop_with_when(t + 0.15).ok();
            }
        }

        /// Music - two detuned drones that run until dropped
        fn start_music(&mut self, vol: f32) {
            if self.music.is_some() {
                return;
            }
            let Some(ctx) = &self.ctx else { return };
            let low = Self::create_osc(ctx, 55.0, OscillatorType::Triangle);
            let high = Self::create_osc(ctx, 82.8, OscillatorType::Sine);
            if let (Some((a, ga)), Some((b, gb))) = (low, high) {
                ga.gain().set_value(vol * 0.15);
                gb.gain().set_value(vol * 0.1);
                a.start().ok();
                b.start().ok();
                self.music = Some((a, b));
            }
        }
    }

    impl AudioSink for WebAudio {
        fn play(&mut self, cue: SoundCue) {
            let vol = cue.volume(&self.settings);
            if vol <= 0.0 {
                return;
            }
            if cue == SoundCue::Music {
                self.start_music(vol);
                return;
            }

            let Some(ctx) = &self.ctx else { return };

            // Resume context if suspended (browsers require user gesture)
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            match cue {
                SoundCue::Laser => Self::play_laser(ctx, vol),
                SoundCue::Explosion => Self::play_explosion(ctx, vol),
                SoundCue::Music => {}
            }
        }
    }

    impl Drop for WebAudio {
        fn drop(&mut self) {
            if let Some((a, b)) = self.music.take() {
                a.stop().ok();
                b.stop().ok();
            }
        }
    }
}

//! Game loop driver
//!
//! `Game` owns a session plus its four collaborators (clock, input, render
//! sink, audio sink) and runs the per-frame schedule: sample input, dispatch
//! timer events, step the simulation, play sound cues, draw.

use rand::RngCore;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::audio::{AudioSink, SoundCue};
use crate::consts::PROGRESS_LOG_FRAMES;
use crate::platform::{Clock, FrameClock, InputSource};
use crate::renderer::{RenderSink, render_session};
use crate::sim::{Session, SessionEvent, SessionPhase, SpawnTimer, Termination, TickInput, step};

/// Why a run stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    /// Quit requested
    Quit,
    /// The player was hit
    Collision,
    /// The frame cap was reached while still running
    FrameLimit,
}

/// Outcome of a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub frames: u64,
    pub elapsed_ms: u64,
    pub score: u64,
    pub meteors_spawned: u32,
    pub meteors_destroyed: u32,
    pub lasers_fired: u32,
    pub end_reason: EndReason,
}

/// A session wired to its platform collaborators
pub struct Game<C, I, S, A, R = Pcg32> {
    session: Session<R>,
    clock: FrameClock<C>,
    spawn_timer: SpawnTimer,
    input: I,
    sink: S,
    audio: A,
}

impl<C, I, S, A, R> Game<C, I, S, A, R>
where
    C: Clock,
    I: InputSource,
    S: RenderSink,
    A: AudioSink,
    R: RngCore,
{
    pub fn new(session: Session<R>, clock: C, input: I, sink: S, mut audio: A) -> Self {
        let clock = FrameClock::new(clock);
        let spawn_timer = SpawnTimer::new(session.settings.spawn_interval_ms, session.time_ms);
        log::info!(
            "Session started: {}x{}, {} stars, meteor every {} ms",
            session.settings.width,
            session.settings.height,
            session.stars.len(),
            spawn_timer.interval_ms
        );

        if session.settings.music_enabled {
            audio.play(SoundCue::Music);
        }

        Self {
            session,
            clock,
            spawn_timer,
            input,
            sink,
            audio,
        }
    }

    /// Run one full frame; returns the phase afterwards
    ///
    /// A terminated game does nothing and returns `Terminated` immediately.
    pub fn run_frame(&mut self) -> Result<SessionPhase, S::Error> {
        if !self.session.is_running() {
            return Ok(SessionPhase::Terminated);
        }

        let frame = self.clock.tick();
        let keys = self.input.sample(frame, &self.session);

        let mut events = Vec::new();
        if keys.quit {
            events.push(SessionEvent::Quit);
        }
        for _ in 0..self.spawn_timer.poll(frame.now_ms) {
            events.push(SessionEvent::SpawnMeteor);
        }

        step(&mut self.session, &TickInput::from(keys), &events, frame);

        for event in self.session.drain_events() {
            if let Some(cue) = SoundCue::for_event(&event) {
                self.audio.play(cue);
            }
        }

        render_session(&self.session, &mut self.sink)?;
        Ok(self.session.phase)
    }

    /// Run until the session ends or `max_frames` frames have run
    pub fn run(&mut self, max_frames: u64) -> Result<RunSummary, S::Error> {
        let mut frames = 0;
        while frames < max_frames && self.session.is_running() {
            self.run_frame()?;
            frames += 1;
            if frames % PROGRESS_LOG_FRAMES == 0 {
                log::info!(
                    "Frame {frames}: {} ms, score {}, {} meteors on screen",
                    self.session.time_ms,
                    self.session.score(),
                    self.session.meteors.len()
                );
            }
        }

        let summary = self.summary(frames);
        log::info!("Run over: {:?} with score {}", summary.end_reason, summary.score);
        Ok(summary)
    }

    /// Summary of the run so far
    pub fn summary(&self, frames: u64) -> RunSummary {
        let stats = self.session.stats;
        RunSummary {
            frames,
            elapsed_ms: self.session.time_ms,
            score: self.session.score(),
            meteors_spawned: stats.meteors_spawned,
            meteors_destroyed: stats.meteors_destroyed,
            lasers_fired: stats.lasers_fired,
            end_reason: match self.session.termination {
                Some(Termination::Quit) => EndReason::Quit,
                Some(Termination::Collision) => EndReason::Collision,
                None => EndReason::FrameLimit,
            },
        }
    }

    pub fn session(&self) -> &Session<R> {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session<R> {
        &mut self.session
    }

    pub fn clock_mut(&mut self) -> &mut C {
        self.clock.clock_mut()
    }

    pub fn input_mut(&mut self) -> &mut I {
        &mut self.input
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }
}

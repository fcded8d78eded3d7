//! Clocks and per-frame timing

pub use crate::sim::FrameTime;

/// Monotonic millisecond time source
pub trait Clock {
    /// Milliseconds since the clock started; never decreases
    fn now_ms(&mut self) -> u64;
}

/// Clock advanced by hand: rAF timestamps in the browser, explicit steps in tests
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ManualClock {
    now_ms: u64,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move forward by `ms`
    pub fn advance(&mut self, ms: u64) {
        self.now_ms = self.now_ms.saturating_add(ms);
    }

    /// Jump to `ms`; earlier times are ignored to stay monotonic
    pub fn set(&mut self, ms: u64) {
        self.now_ms = self.now_ms.max(ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&mut self) -> u64 {
        self.now_ms
    }
}

/// Clock that moves forward a fixed step on every read (headless runs)
///
/// Reads return 0, `step_ms`, 2 * `step_ms` and so on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SteppedClock {
    step_ms: u64,
    next_ms: u64,
}

impl SteppedClock {
    pub fn new(step_ms: u64) -> Self {
        Self {
            step_ms,
            next_ms: 0,
        }
    }
}

impl Clock for SteppedClock {
    fn now_ms(&mut self) -> u64 {
        let now = self.next_ms;
        self.next_ms = self.next_ms.saturating_add(self.step_ms);
        now
    }
}

/// Maps browser frame timestamps to game time, freezing it across stalls
///
/// A gap between two timestamps longer than `max_gap_ms` (hidden tab,
/// debugger pause) is skipped entirely, so the game resumes where it left
/// off instead of replaying the missed seconds in one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timeline {
    origin_ms: Option<f64>,
    last_ms: f64,
    paused_ms: f64,
    max_gap_ms: f64,
}

impl Timeline {
    pub fn new(max_gap_ms: f64) -> Self {
        Self {
            origin_ms: None,
            last_ms: 0.0,
            paused_ms: 0.0,
            max_gap_ms,
        }
    }

    /// Game time in ms for a frame timestamp; the first timestamp is 0
    pub fn game_ms(&mut self, timestamp_ms: f64) -> u64 {
        let origin = match self.origin_ms {
            Some(origin) => origin,
            None => {
                self.origin_ms = Some(timestamp_ms);
                self.last_ms = timestamp_ms;
                timestamp_ms
            }
        };

        let gap = timestamp_ms - self.last_ms;
        if gap > self.max_gap_ms {
            log::info!("Skipping {gap:.0} ms stall");
            self.paused_ms += gap;
        }
        self.last_ms = self.last_ms.max(timestamp_ms);

        (timestamp_ms - origin - self.paused_ms).max(0.0) as u64
    }
}

/// Derives the per-frame delta from a clock
#[derive(Debug, Clone)]
pub struct FrameClock<C> {
    clock: C,
    last_ms: u64,
}

impl<C: Clock> FrameClock<C> {
    pub fn new(mut clock: C) -> Self {
        let last_ms = clock.now_ms();
        Self { clock, last_ms }
    }

    /// Time of this frame and seconds since the previous call
    pub fn tick(&mut self) -> FrameTime {
        let now_ms = self.clock.now_ms();
        let dt = now_ms.saturating_sub(self.last_ms) as f32 / 1000.0;
        self.last_ms = now_ms;
        FrameTime { now_ms, dt }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_clock_deltas() {
        let mut clock = FrameClock::new(ManualClock::new());
        assert_eq!(clock.tick(), FrameTime { now_ms: 0, dt: 0.0 });

        clock.clock_mut().advance(16);
        let f = clock.tick();
        assert_eq!(f.now_ms, 16);
        assert!((f.dt - 0.016).abs() < 1e-6);

        // No time passed
        assert_eq!(clock.tick().dt, 0.0);
    }

    #[test]
    fn test_timeline_follows_timestamps() {
        let mut timeline = Timeline::new(250.0);
        assert_eq!(timeline.game_ms(5_000.0), 0);
        assert_eq!(timeline.game_ms(5_016.0), 16);
        assert_eq!(timeline.game_ms(5_250.0), 250);
    }

    #[test]
    fn test_timeline_skips_stalls() {
        let mut timeline = Timeline::new(250.0);
        timeline.game_ms(1_000.0);
        assert_eq!(timeline.game_ms(1_100.0), 100);
        // Tab hidden for a minute: game time does not move
        assert_eq!(timeline.game_ms(61_100.0), 100);
        assert_eq!(timeline.game_ms(61_116.0), 116);
    }

    #[test]
    fn test_timeline_feeds_frame_clock() {
        let mut timeline = Timeline::new(250.0);
        let mut clock = FrameClock::new(ManualClock::new());
        clock.clock_mut().set(timeline.game_ms(0.0));
        clock.tick();
        clock.clock_mut().set(timeline.game_ms(30_000.0));
        assert_eq!(clock.tick().dt, 0.0);
        clock.clock_mut().set(timeline.game_ms(30_020.0));
        let f = clock.tick();
        assert_eq!(f.now_ms, 20);
        assert!((f.dt - 0.02).abs() < 1e-6);
    }

    #[test]
    fn test_stepped_clock() {
        let mut clock = FrameClock::new(SteppedClock::new(16));
        let f = clock.tick();
        assert_eq!(f.now_ms, 16);
        assert!((f.dt - 0.016).abs() < 1e-6);
        assert_eq!(clock.tick().now_ms, 32);
    }

    #[test]
    fn test_manual_clock_is_monotonic() {
        let mut clock = ManualClock::new();
        clock.set(500);
        clock.set(100);
        assert_eq!(clock.now_ms(), 500);
    }
}

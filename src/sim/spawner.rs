//! Meteor spawning and the star field

use glam::Vec2;
use rand::{Rng, RngCore};

use super::state::{EntityId, MeteorParams, Session, Star};

/// Periodic timer that reports how many periods have elapsed
///
/// Polling after a long frame returns every period that was missed, so the
/// spawn rate stays tied to the clock rather than the frame rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnTimer {
    pub interval_ms: u64,
    pub next_due_ms: u64,
}

impl SpawnTimer {
    /// First period elapses `interval_ms` after `start_ms`
    pub fn new(interval_ms: u64, start_ms: u64) -> Self {
        let interval_ms = interval_ms.max(1);
        Self {
            interval_ms,
            next_due_ms: start_ms + interval_ms,
        }
    }

    /// Number of periods that elapsed up to `now_ms`
    pub fn poll(&mut self, now_ms: u64) -> u32 {
        if now_ms < self.next_due_ms {
            return 0;
        }
        let fired = (now_ms - self.next_due_ms) / self.interval_ms + 1;
        self.next_due_ms += fired * self.interval_ms;
        fired as u32
    }
}

/// Spawn one meteor above the visible area with random placement and flight
pub fn spawn_meteor<R: RngCore>(session: &mut Session<R>) -> EntityId {
    let width = session.settings.width as i32;
    let (y_lo, y_hi) = session.settings.meteor_spawn_y;
    let settings = session.settings.clone();

    let rng = session.rng();
    let x = rng.random_range(0..=width);
    let y = rng.random_range(y_lo..=y_hi);
    let params = MeteorParams::roll(rng, &settings);

    let pos = Vec2::new(x as f32, y as f32);
    let id = session.spawn_meteor_at(pos, params);
    log::debug!(
        "Spawned meteor {id} at ({x}, {y}) speed {} spin {}",
        params.speed,
        params.rotation_speed
    );
    id
}

/// Scatter the background stars inside the window
pub fn spawn_stars<R: RngCore>(session: &mut Session<R>) {
    let width = session.settings.width as i32;
    let height = session.settings.height as i32;
    for _ in 0..session.settings.star_count {
        let x = session.rng().random_range(0..=width);
        let y = session.rng().random_range(0..=height);
        let id = session.next_entity_id();
        session.stars.push(Star {
            id,
            pos: Vec2::new(x as f32, y as f32),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;

    #[test]
    fn test_timer_fires_every_interval() {
        let mut timer = SpawnTimer::new(200, 0);
        assert_eq!(timer.poll(0), 0);
        assert_eq!(timer.poll(199), 0);
        assert_eq!(timer.poll(200), 1);
        assert_eq!(timer.poll(250), 0);
        assert_eq!(timer.poll(400), 1);
    }

    #[test]
    fn test_timer_catches_up_after_long_frame() {
        let mut timer = SpawnTimer::new(200, 0);
        assert_eq!(timer.poll(1000), 5);
        assert_eq!(timer.next_due_ms, 1200);
        assert_eq!(timer.poll(1199), 0);
    }

    #[test]
    fn test_meteors_spawn_above_the_screen() {
        let mut session = Session::new(Settings::default(), 99);
        for _ in 0..200 {
            spawn_meteor(&mut session);
        }
        assert_eq!(session.meteors.len(), 200);
        for m in &session.meteors {
            assert!((0.0..=1280.0).contains(&m.pos.x));
            assert!((-200.0..=-100.0).contains(&m.pos.y));
            // Drift never exceeds half the downward component before normalizing
            assert!(m.direction.y > 0.0);
            assert!(m.direction.x.abs() / m.direction.y <= 0.5 + 1e-6);
            assert!((m.direction.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_stars_inside_window() {
        let session = Session::new(Settings::default(), 3);
        assert_eq!(session.stars.len(), 20);
        for star in &session.stars {
            assert!((0.0..=1280.0).contains(&star.pos.x));
            assert!((0.0..=720.0).contains(&star.pos.y));
        }
    }

    #[test]
    fn test_same_seed_same_meteors() {
        let mut a = Session::new(Settings::default(), 42);
        let mut b = Session::new(Settings::default(), 42);
        for _ in 0..10 {
            spawn_meteor(&mut a);
            spawn_meteor(&mut b);
        }
        let pa: Vec<_> = a.meteors.iter().map(|m| (m.pos, m.speed, m.rotation_speed)).collect();
        let pb: Vec<_> = b.meteors.iter().map(|m| (m.pos, m.speed, m.rotation_speed)).collect();
        assert_eq!(pa, pb);
    }
}

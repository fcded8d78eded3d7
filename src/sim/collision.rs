//! Collision detection between the player, lasers and meteors
//!
//! The player is tested pixel-exact against each meteor's current (rotated)
//! footprint. Lasers only use their bounding rectangles, which makes them a
//! little more forgiving than the ship.

use glam::Vec2;
use rand::RngCore;

use super::mask::Mask;
use super::rect::Rect;
use super::state::{EntityId, GameEvent, Session, Termination};

/// Whether two masks placed at their rectangles share a solid pixel
pub fn masks_collide(a: &Mask, a_rect: Rect, b: &Mask, b_rect: Rect) -> bool {
    if !a_rect.overlaps(&b_rect) {
        return false;
    }
    let offset = b_rect.top_left() - a_rect.top_left();
    a.overlap(b, offset).is_some()
}

/// Meteors whose footprint touches the player's
pub fn player_meteor_collisions<R>(session: &Session<R>) -> Vec<EntityId> {
    let player = &session.player;
    let player_rect = player.rect();
    session
        .meteors
        .iter()
        .filter(|m| !m.marked)
        .filter(|m| masks_collide(&player.mask, player_rect, &m.image, m.rect()))
        .map(|m| m.id)
        .collect()
}

/// A laser and the meteors it struck this frame
#[derive(Debug, Clone, PartialEq)]
pub struct LaserHit {
    pub laser: EntityId,
    pub meteors: Vec<EntityId>,
    /// Where the explosion goes (the laser's top-center)
    pub point: Vec2,
}

/// Lasers overlapping meteors by rectangle, in laser creation order
///
/// A meteor claimed by an earlier laser is not offered to later ones.
pub fn laser_meteor_collisions<R>(session: &Session<R>) -> Vec<LaserHit> {
    let mut claimed: Vec<EntityId> = Vec::new();
    let mut hits = Vec::new();

    for laser in session.lasers.iter().filter(|l| !l.marked) {
        let laser_rect = laser.rect();
        let meteors: Vec<EntityId> = session
            .meteors
            .iter()
            .filter(|m| !m.marked && !claimed.contains(&m.id))
            .filter(|m| laser_rect.overlaps(&m.rect()))
            .map(|m| m.id)
            .collect();

        if !meteors.is_empty() {
            claimed.extend_from_slice(&meteors);
            hits.push(LaserHit {
                laser: laser.id,
                meteors,
                point: laser_rect.midtop(),
            });
        }
    }
    hits
}

/// Run both collision passes and apply their outcomes
///
/// The player pass goes first; any hit ends the session. Laser hits mark the
/// laser and its meteors, then start one explosion per laser.
pub fn resolve_collisions<R: RngCore>(session: &mut Session<R>) {
    let hit_by = player_meteor_collisions(session);
    if !hit_by.is_empty() {
        for &id in &hit_by {
            session.mark(id);
        }
        log::debug!("Player hit by meteor(s) {hit_by:?}");
        let pos = session.player.pos;
        session.events.push(GameEvent::PlayerHit { pos });
        session.terminate(Termination::Collision);
    }

    for hit in laser_meteor_collisions(session) {
        session.mark(hit.laser);
        for &id in &hit.meteors {
            session.mark(id);
        }
        session.stats.meteors_destroyed += hit.meteors.len() as u32;
        session.spawn_explosion(hit.point);
        session.events.push(GameEvent::MeteorDestroyed { pos: hit.point });
        log::debug!("Laser {} destroyed meteor(s) {:?}", hit.laser, hit.meteors);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    use super::*;
    use crate::settings::Settings;
    use crate::sim::sprites::SpriteSet;
    use crate::sim::state::{MeteorParams, SessionPhase};
    use crate::sim::tick::{FrameTime, TickInput, step};

    fn session() -> Session {
        Session::new(Settings::default(), 1)
    }

    #[test]
    fn test_masks_collide_needs_solid_pixels() {
        let ring = Mask::from_fn(10, 10, |x, y| x == 0 || y == 0 || x == 9 || y == 9);
        let dot = Mask::filled(2, 2);
        // Dot sits in the hollow middle of the ring
        assert!(!masks_collide(&ring, Rect::new(0, 0, 10, 10), &dot, Rect::new(4, 4, 2, 2)));
        // Dot sits on the ring's edge
        assert!(masks_collide(&ring, Rect::new(0, 0, 10, 10), &dot, Rect::new(8, 4, 2, 2)));
    }

    #[test]
    fn test_meteor_on_player_terminates() {
        let mut s = session();
        let pos = s.player.pos;
        let id = s.spawn_meteor_at(pos, MeteorParams::straight_down(400.0));
        resolve_collisions(&mut s);
        assert_eq!(s.phase, SessionPhase::Terminated);
        assert_eq!(s.termination, Some(Termination::Collision));
        assert!(s.meteors.iter().find(|m| m.id == id).unwrap().marked);
    }

    #[test]
    fn test_bounding_box_only_is_not_a_player_hit() {
        let mut s = session();
        // Top-left corner of the ship's box is transparent (the nose is narrow)
        let ship = s.player.rect();
        let meteor_rect = s.sprites.meteor.size();
        let pos = Vec2::new(
            ship.left() as f32 - meteor_rect.x / 2.0 + 4.0,
            ship.top() as f32 - meteor_rect.y / 2.0 + 4.0,
        );
        s.spawn_meteor_at(pos, MeteorParams::straight_down(400.0));
        assert!(player_meteor_collisions(&s).is_empty());
    }

    #[test]
    fn test_laser_hit_marks_both_and_explodes_once() {
        let mut s = session();
        let meteor = s.spawn_meteor_at(Vec2::new(200.0, 200.0), MeteorParams::straight_down(400.0));
        let laser = s.spawn_laser(Vec2::new(200.0, 230.0));
        resolve_collisions(&mut s);

        assert!(s.lasers.iter().find(|l| l.id == laser).unwrap().marked);
        assert!(s.meteors.iter().find(|m| m.id == meteor).unwrap().marked);
        assert_eq!(s.explosions.len(), 1);
        assert_eq!(s.stats.meteors_destroyed, 1);
        assert_eq!(s.phase, SessionPhase::Running);

        // Already marked entities are skipped on a second pass
        resolve_collisions(&mut s);
        assert_eq!(s.explosions.len(), 1);
    }

    #[test]
    fn test_touching_edges_do_not_collide() {
        let mut s = session();
        let meteor = s.spawn_meteor_at(Vec2::new(200.0, 200.0), MeteorParams::straight_down(400.0));
        let bottom = s.meteors[0].rect().bottom() as f32;
        // Laser top edge sits exactly on the meteor's bottom edge
        s.spawn_laser(Vec2::new(200.0, bottom + 40.0));
        resolve_collisions(&mut s);
        assert!(!s.meteors.iter().find(|m| m.id == meteor).unwrap().marked);
        assert!(s.explosions.is_empty());
    }

    #[test]
    fn test_one_laser_can_take_out_two_meteors() {
        let mut s = session();
        s.spawn_meteor_at(Vec2::new(200.0, 200.0), MeteorParams::straight_down(400.0));
        s.spawn_meteor_at(Vec2::new(205.0, 210.0), MeteorParams::straight_down(400.0));
        s.spawn_laser(Vec2::new(200.0, 230.0));
        let hits = laser_meteor_collisions(&s);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].meteors.len(), 2);
    }

    /// Small square ship and a 60x4 bar for a meteor
    fn bar_session(meteor: Mask) -> Session {
        let bar = Arc::new(meteor);
        let sprites = SpriteSet {
            player: Arc::new(Mask::filled(10, 10)),
            laser: Arc::new(Mask::filled(2, 10)),
            meteor: bar,
            star: Arc::new(Mask::filled(1, 1)),
            explosion: vec![Arc::new(Mask::filled(4, 4))],
        };
        Session::with_rng(Settings::default(), sprites, Pcg32::seed_from_u64(3))
    }

    /// A meteor that stays put and turns a quarter per second
    fn quarter_turn() -> MeteorParams {
        MeteorParams {
            heading: Vec2::Y,
            speed: 0.0,
            rotation_speed: 90.0,
        }
    }

    #[test]
    fn test_rotated_meteor_reaches_the_player() {
        // Lying flat 30 px above the ship's center: misses until it turns upright
        let mut s = bar_session(Mask::filled(60, 4));
        let pos = s.player.pos - Vec2::new(0.0, 30.0);
        s.spawn_meteor_at(pos, quarter_turn());
        assert!(player_meteor_collisions(&s).is_empty());

        step(&mut s, &TickInput::default(), &[], FrameTime::new(1000, 1.0));
        assert_eq!((s.meteors[0].image.width(), s.meteors[0].image.height()), (4, 60));
        assert_eq!(s.meteors[0].rect().center(), pos);
        assert_eq!(s.phase, SessionPhase::Terminated);
        assert_eq!(s.termination, Some(Termination::Collision));
    }

    #[test]
    fn test_rotated_meteor_swings_clear_of_the_player() {
        // Standing upright it touches the ship; turned flat it no longer does
        let mut s = bar_session(Mask::filled(4, 60));
        let pos = s.player.pos - Vec2::new(0.0, 30.0);
        s.spawn_meteor_at(pos, quarter_turn());
        assert_eq!(player_meteor_collisions(&s).len(), 1);

        step(&mut s, &TickInput::default(), &[], FrameTime::new(1000, 1.0));
        assert_eq!((s.meteors[0].image.width(), s.meteors[0].image.height()), (60, 4));
        assert_eq!(s.phase, SessionPhase::Running);
        assert!(s.termination.is_none());
    }

    #[test]
    fn test_empty_collections_are_fine() {
        let mut s = session();
        resolve_collisions(&mut s);
        assert_eq!(s.phase, SessionPhase::Running);
        assert!(s.explosions.is_empty());
    }
}

//! Sprite footprints for every entity kind
//!
//! The simulation only needs each sprite's solid footprint, so the shapes are
//! generated procedurally and the game runs (and tests) without any assets
//! on disk.

use std::f32::consts::TAU;
use std::sync::Arc;

use super::mask::Mask;

/// Player ship size
pub const PLAYER_SIZE: (u32, u32) = (64, 72);
/// Laser size
pub const LASER_SIZE: (u32, u32) = (8, 40);
/// Meteor base radius (before the rocky outline)
pub const METEOR_RADIUS: f32 = 40.0;
/// Star size
pub const STAR_SIZE: u32 = 9;
/// Explosion frame size
pub const EXPLOSION_SIZE: u32 = 96;

/// Shared, immutable sprite masks
#[derive(Debug, Clone)]
pub struct SpriteSet {
    pub player: Arc<Mask>,
    pub laser: Arc<Mask>,
    pub meteor: Arc<Mask>,
    pub star: Arc<Mask>,
    pub explosion: Vec<Arc<Mask>>,
}

impl SpriteSet {
    /// Build the procedural sprite set
    pub fn procedural(explosion_frames: usize) -> Self {
        let frames = explosion_frames.max(1);
        Self {
            player: Arc::new(ship_mask(PLAYER_SIZE.0, PLAYER_SIZE.1)),
            laser: Arc::new(laser_mask(LASER_SIZE.0, LASER_SIZE.1)),
            meteor: Arc::new(meteor_mask(METEOR_RADIUS)),
            star: Arc::new(star_mask(STAR_SIZE)),
            explosion: (0..frames)
                .map(|i| Arc::new(explosion_mask(EXPLOSION_SIZE, i as f32 / frames as f32)))
                .collect(),
        }
    }
}

/// Arrowhead ship: a nose triangle with swept wings and an engine notch
fn ship_mask(width: u32, height: u32) -> Mask {
    let w = width as f32;
    let h = height as f32;
    Mask::from_fn(width, height, |x, y| {
        let px = x as f32 + 0.5 - w / 2.0;
        let py = y as f32 + 0.5;
        // Hull widens linearly from the nose to the tail
        let half_width = (py / h) * (w / 2.0);
        let inside_hull = px.abs() <= half_width;
        // Cut an engine notch into the tail
        let notch = py > h * 0.8 && px.abs() < w * 0.12;
        inside_hull && !notch
    })
}

/// Rounded capsule
fn laser_mask(width: u32, height: u32) -> Mask {
    let r = width as f32 / 2.0;
    let h = height as f32;
    Mask::from_fn(width, height, |x, y| {
        let px = x as f32 + 0.5 - r;
        let py = y as f32 + 0.5;
        let cy = py.clamp(r, h - r);
        px * px + (py - cy) * (py - cy) <= r * r
    })
}

/// Lumpy disc so rotation visibly changes the outline
fn meteor_mask(radius: f32) -> Mask {
    let size = (radius * 2.4).ceil() as u32;
    let c = size as f32 / 2.0;
    Mask::from_fn(size, size, |x, y| {
        let dx = x as f32 + 0.5 - c;
        let dy = y as f32 + 0.5 - c;
        let angle = dy.atan2(dx);
        let edge = radius * (1.0 + 0.12 * (5.0 * angle).sin() + 0.06 * (3.0 * angle + 1.0).cos());
        dx * dx + dy * dy <= edge * edge
    })
}

/// Four-point sparkle
fn star_mask(size: u32) -> Mask {
    let c = size as i32 / 2;
    Mask::from_fn(size, size, |x, y| {
        let dx = (x as i32 - c).abs();
        let dy = (y as i32 - c).abs();
        dx == 0 || dy == 0 || dx + dy <= 2
    })
}

/// Expanding ragged ring; `t` goes from 0 (first frame) toward 1 (last)
///
/// The ring is shaded with a soft falloff and cut at the mask alpha
/// threshold, so only its bright core is solid.
fn explosion_mask(size: u32, t: f32) -> Mask {
    let c = size as f32 / 2.0;
    let outer = c * (0.25 + 0.75 * t);
    let thickness = (c * 0.45 * (1.0 - t)).max(2.0);
    let middle = (outer - thickness / 2.0).max(0.0);
    Mask::from_alpha_fn(size, size, |x, y| {
        let dx = x as f32 + 0.5 - c;
        let dy = y as f32 + 0.5 - c;
        let angle = dy.atan2(dx);
        let jag = 1.0 + 0.15 * (7.0 * angle + t * TAU).sin();
        let d = (dx * dx + dy * dy).sqrt();
        let falloff = 1.0 - (d - middle * jag).abs() / (thickness * jag);
        (falloff.clamp(0.0, 1.0) * 255.0) as u8
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_procedural_set_shapes() {
        let set = SpriteSet::procedural(21);
        assert_eq!(set.explosion.len(), 21);
        assert_eq!((set.player.width(), set.player.height()), PLAYER_SIZE);
        assert_eq!((set.laser.width(), set.laser.height()), LASER_SIZE);
        assert!(set.meteor.count() > 0);
        assert!(set.star.count() > 0);
        assert!(set.explosion.iter().all(|f| f.count() > 0));
    }

    #[test]
    fn test_explosion_frames_grow() {
        let set = SpriteSet::procedural(21);
        let first = &set.explosion[0];
        let last = &set.explosion[20];
        // The ring's center stays hollow once it has expanded
        let mid = EXPLOSION_SIZE as i32 / 2;
        assert!(!last.get(mid, mid));
        let radius = |m: &Mask| (0..mid).rev().find(|&x| m.get(mid + x, mid)).unwrap_or(0);
        assert!(radius(last) > radius(first));
    }

    #[test]
    fn test_ship_has_transparent_corners() {
        let ship = ship_mask(PLAYER_SIZE.0, PLAYER_SIZE.1);
        // Nose is narrow: top corners are empty, center column is solid
        assert!(!ship.get(0, 0));
        assert!(!ship.get(PLAYER_SIZE.0 as i32 - 1, 0));
        assert!(ship.get(PLAYER_SIZE.0 as i32 / 2, 10));
    }
}

//! Integer screen rectangles
//!
//! Screen space is pixels with the origin at the top-left and y growing
//! downward. Entities keep a float center; their rectangle is derived from it
//! and the current sprite extent whenever collision or drawing needs one.

use glam::{IVec2, Vec2};

/// An axis-aligned pixel rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Rectangle of the given size centered on `center`
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let (w, h) = (size.x as i32, size.y as i32);
        Self {
            x: center.x.floor() as i32 - w / 2,
            y: center.y.floor() as i32 - h / 2,
            w,
            h,
        }
    }

    /// Rectangle of the given size whose bottom edge is centered on `point`
    pub fn from_midbottom(point: Vec2, size: Vec2) -> Self {
        let (w, h) = (size.x as i32, size.y as i32);
        Self {
            x: point.x.floor() as i32 - w / 2,
            y: point.y.floor() as i32 - h,
            w,
            h,
        }
    }

    #[inline]
    pub fn left(&self) -> i32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    #[inline]
    pub fn top(&self) -> i32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    #[inline]
    pub fn top_left(&self) -> IVec2 {
        IVec2::new(self.x, self.y)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x as f32 + self.w as f32 / 2.0, self.y as f32 + self.h as f32 / 2.0)
    }

    /// Middle of the top edge
    pub fn midtop(&self) -> Vec2 {
        Vec2::new(self.x as f32 + self.w as f32 / 2.0, self.y as f32)
    }

    /// Middle of the bottom edge
    pub fn midbottom(&self) -> Vec2 {
        Vec2::new(self.x as f32 + self.w as f32 / 2.0, self.bottom() as f32)
    }

    /// True when the rectangles share at least one pixel (touching edges do not count)
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.w > 0
            && self.h > 0
            && other.w > 0
            && other.h > 0
            && self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Grow (or shrink) around the same center by `dx` x `dy` pixels in total
    pub fn inflate(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x - dx / 2,
            y: self.y - dy / 2,
            w: self.w + dx,
            h: self.h + dy,
        }
    }

    /// Translate by (dx, dy)
    pub fn moved(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }
}

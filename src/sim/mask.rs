//! Pixel masks for collision and drawing
//!
//! A mask is the solid (non-transparent) footprint of a sprite image. Player
//! collisions are tested mask against mask, so two sprites only touch when at
//! least one solid pixel overlaps, not when their bounding boxes do.

use glam::{IVec2, Vec2};

use crate::consts::MASK_ALPHA_THRESHOLD;

/// A 1-bit footprint of a sprite
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    width: u32,
    height: u32,
    bits: Vec<bool>,
}

impl Mask {
    /// An empty (fully transparent) mask
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bits: vec![false; (width * height) as usize],
        }
    }

    /// A fully solid mask
    pub fn filled(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bits: vec![true; (width * height) as usize],
        }
    }

    /// Build a mask by evaluating `solid(x, y)` for every pixel
    pub fn from_fn(width: u32, height: u32, mut solid: impl FnMut(u32, u32) -> bool) -> Self {
        let mut bits = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            for x in 0..width {
                bits.push(solid(x, y));
            }
        }
        Self { width, height, bits }
    }

    /// Build a mask from per-pixel alpha; pixels above the threshold are solid
    pub fn from_alpha_fn(width: u32, height: u32, mut alpha: impl FnMut(u32, u32) -> u8) -> Self {
        Self::from_fn(width, height, |x, y| alpha(x, y) > MASK_ALPHA_THRESHOLD)
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Width and height as a float vector
    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    /// Whether the pixel at (x, y) is solid; out of bounds is transparent
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return false;
        }
        self.bits[(y as u32 * self.width + x as u32) as usize]
    }

    /// Set a pixel; out of bounds writes are ignored
    pub fn set(&mut self, x: i32, y: i32, solid: bool) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        self.bits[(y as u32 * self.width + x as u32) as usize] = solid;
    }

    /// Number of solid pixels
    pub fn count(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    /// Horizontal runs of solid pixels as `(y, x_start, x_end_exclusive)`
    ///
    /// Used by the renderer to draw a mask with one quad per run.
    pub fn runs(&self) -> impl Iterator<Item = (u32, u32, u32)> + '_ {
        (0..self.height).flat_map(move |y| {
            let row = &self.bits[(y * self.width) as usize..((y + 1) * self.width) as usize];
            let mut runs = Vec::new();
            let mut start = None;
            for (x, &solid) in row.iter().enumerate() {
                match (solid, start) {
                    (true, None) => start = Some(x as u32),
                    (false, Some(s)) => {
                        runs.push((y, s, x as u32));
                        start = None;
                    }
                    _ => {}
                }
            }
            if let Some(s) = start {
                runs.push((y, s, self.width));
            }
            runs
        })
    }

    /// First overlapping solid pixel, in this mask's coordinates
    ///
    /// `offset` is the position of `other`'s top-left corner relative to this
    /// mask's top-left corner.
    pub fn overlap(&self, other: &Mask, offset: IVec2) -> Option<IVec2> {
        let x0 = offset.x.max(0);
        let y0 = offset.y.max(0);
        let x1 = (offset.x + other.width as i32).min(self.width as i32);
        let y1 = (offset.y + other.height as i32).min(self.height as i32);

        for y in y0..y1 {
            for x in x0..x1 {
                if self.get(x, y) && other.get(x - offset.x, y - offset.y) {
                    return Some(IVec2::new(x, y));
                }
            }
        }
        None
    }

    /// Rotate counter-clockwise (as seen on screen) by `degrees`
    ///
    /// The result grows to the bounding box of the rotated image, like a
    /// sprite rotated about its center. Sampling is nearest-neighbour.
    pub fn rotated(&self, degrees: f32) -> Mask {
        let (sin, cos) = degrees.to_radians().sin_cos();
        let (w, h) = (self.width as f32, self.height as f32);
        let out_w = (w * cos.abs() + h * sin.abs() - 1e-3).ceil().max(1.0) as u32;
        let out_h = (w * sin.abs() + h * cos.abs() - 1e-3).ceil().max(1.0) as u32;

        let half_out = Vec2::new(out_w as f32, out_h as f32) / 2.0;
        let half_src = Vec2::new(w, h) / 2.0;

        Mask::from_fn(out_w, out_h, |x, y| {
            // Pixel center relative to the output center, mapped back into the source
            let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5) - half_out;
            let src = Vec2::new(p.x * cos - p.y * sin, p.x * sin + p.y * cos) + half_src;
            self.get(src.x.floor() as i32, src.y.floor() as i32)
        })
    }
}

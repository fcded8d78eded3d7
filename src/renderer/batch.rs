//! CPU-side vertex batching
//!
//! `VertexBatch` is a complete `RenderSink`: it turns every draw call into
//! colored triangles and keeps a light record of what was drawn. The GPU sink
//! wraps one and uploads its vertices on present; headless runs and tests use
//! it directly.

use std::convert::Infallible;

use glam::{IVec2, Vec2};

use super::vertex::Vertex;
use super::{RenderSink, font, shapes};
use crate::sim::{Mask, Rect};

/// Record of a single draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Mask { top_left: IVec2, width: u32, height: u32 },
    Text { text: String, top_left: Vec2 },
    Outline { rect: Rect },
}

/// Frame being assembled
#[derive(Debug, Clone, Default)]
pub struct VertexBatch {
    clear_color: [f32; 4],
    vertices: Vec<Vertex>,
    ops: Vec<DrawOp>,
    /// Draw calls of the last presented frame
    presented_ops: Vec<DrawOp>,
    presented_vertices: usize,
    frames_presented: u64,
}

impl VertexBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear_color(&self) -> [f32; 4] {
        self.clear_color
    }

    /// Vertices of the frame being assembled
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Draw calls of the last presented frame
    pub fn last_frame(&self) -> &[DrawOp] {
        &self.presented_ops
    }

    /// Vertex count of the last presented frame
    pub fn last_frame_vertices(&self) -> usize {
        self.presented_vertices
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    /// Finish the frame; the pending vertices are handed to the caller
    pub fn finish(&mut self) -> Vec<Vertex> {
        self.frames_presented += 1;
        self.presented_vertices = self.vertices.len();
        self.presented_ops = std::mem::take(&mut self.ops);
        std::mem::take(&mut self.vertices)
    }
}

impl RenderSink for VertexBatch {
    type Error = Infallible;

    fn clear(&mut self, color: [f32; 4]) {
        self.clear_color = color;
        self.vertices.clear();
        self.ops.clear();
    }

    fn draw_mask(&mut self, mask: &Mask, top_left: IVec2, color: [f32; 4]) {
        self.vertices.extend(shapes::mask(mask, top_left, color));
        self.ops.push(DrawOp::Mask {
            top_left,
            width: mask.width(),
            height: mask.height(),
        });
    }

    fn draw_text(&mut self, text: &str, top_left: Vec2, scale: f32, color: [f32; 4]) {
        self.vertices.extend(font::text(text, top_left, scale, color));
        self.ops.push(DrawOp::Text {
            text: text.to_string(),
            top_left,
        });
    }

    fn draw_rect_outline(&mut self, rect: Rect, width: f32, radius: f32, color: [f32; 4]) {
        self.vertices
            .extend(shapes::rounded_rect_outline(rect, width, radius, color));
        self.ops.push(DrawOp::Outline { rect });
    }

    fn present(&mut self) -> Result<(), Infallible> {
        self.finish();
        Ok(())
    }
}

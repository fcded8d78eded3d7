//! Shape generation for 2D primitives

use glam::{IVec2, Vec2};
use std::f32::consts::{FRAC_PI_2, PI};

use super::vertex::Vertex;
use crate::sim::{Mask, Rect};

/// Append an axis-aligned quad as two triangles
pub fn push_quad(out: &mut Vec<Vertex>, min: Vec2, max: Vec2, color: [f32; 4]) {
    out.push(Vertex::new(min.x, min.y, color));
    out.push(Vertex::new(max.x, min.y, color));
    out.push(Vertex::new(min.x, max.y, color));

    out.push(Vertex::new(min.x, max.y, color));
    out.push(Vertex::new(max.x, min.y, color));
    out.push(Vertex::new(max.x, max.y, color));
}

/// Generate vertices covering the solid pixels of a mask, one quad per run
pub fn mask(mask: &Mask, top_left: IVec2, color: [f32; 4]) -> Vec<Vertex> {
    let origin = top_left.as_vec2();
    let mut vertices = Vec::new();
    for (y, x0, x1) in mask.runs() {
        push_quad(
            &mut vertices,
            origin + Vec2::new(x0 as f32, y as f32),
            origin + Vec2::new(x1 as f32, (y + 1) as f32),
            color,
        );
    }
    vertices
}

/// Generate vertices for a quarter of a ring (rounded corner band)
fn corner_arc(
    out: &mut Vec<Vertex>,
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    start: f32,
    color: [f32; 4],
    segments: u32,
) {
    for i in 0..segments {
        let theta1 = start + (i as f32 / segments as f32) * FRAC_PI_2;
        let theta2 = start + ((i + 1) as f32 / segments as f32) * FRAC_PI_2;

        let (s1, c1) = theta1.sin_cos();
        let (s2, c2) = theta2.sin_cos();
        let inner1 = center + Vec2::new(c1, s1) * inner_radius;
        let outer1 = center + Vec2::new(c1, s1) * outer_radius;
        let inner2 = center + Vec2::new(c2, s2) * inner_radius;
        let outer2 = center + Vec2::new(c2, s2) * outer_radius;

        // Two triangles per segment
        out.push(Vertex::new(inner1.x, inner1.y, color));
        out.push(Vertex::new(outer1.x, outer1.y, color));
        out.push(Vertex::new(inner2.x, inner2.y, color));

        out.push(Vertex::new(inner2.x, inner2.y, color));
        out.push(Vertex::new(outer1.x, outer1.y, color));
        out.push(Vertex::new(outer2.x, outer2.y, color));
    }
}

/// Generate vertices for a rounded rectangle outline
///
/// The border of `width` pixels lies inside `r`; corners are rounded with
/// `radius` (clamped to half the shorter side).
pub fn rounded_rect_outline(r: Rect, width: f32, radius: f32, color: [f32; 4]) -> Vec<Vertex> {
    let min = Vec2::new(r.left() as f32, r.top() as f32);
    let max = Vec2::new(r.right() as f32, r.bottom() as f32);
    let size = max - min;
    if size.x <= 0.0 || size.y <= 0.0 {
        return Vec::new();
    }
    let radius = radius.clamp(0.0, size.x.min(size.y) / 2.0);
    let width = width.clamp(0.0, size.x.min(size.y) / 2.0);
    let inner = (radius - width).max(0.0);

    let mut vertices = Vec::new();

    // Straight edges between the corners
    push_quad(&mut vertices, Vec2::new(min.x + radius, min.y), Vec2::new(max.x - radius, min.y + width), color);
    push_quad(&mut vertices, Vec2::new(min.x + radius, max.y - width), Vec2::new(max.x - radius, max.y), color);
    push_quad(&mut vertices, Vec2::new(min.x, min.y + radius), Vec2::new(min.x + width, max.y - radius), color);
    push_quad(&mut vertices, Vec2::new(max.x - width, min.y + radius), Vec2::new(max.x, max.y - radius), color);

    if radius > 0.0 {
        let segments = ((radius / 2.0).ceil() as u32).max(4);
        // Screen space has y down, so angles sweep clockwise on screen
        corner_arc(&mut vertices, Vec2::new(max.x - radius, max.y - radius), inner, radius, 0.0, color, segments);
        corner_arc(&mut vertices, Vec2::new(min.x + radius, max.y - radius), inner, radius, FRAC_PI_2, color, segments);
        corner_arc(&mut vertices, Vec2::new(min.x + radius, min.y + radius), inner, radius, PI, color, segments);
        corner_arc(&mut vertices, Vec2::new(max.x - radius, min.y + radius), inner, radius, PI + FRAC_PI_2, color, segments);
    }

    vertices
}

//! Tiny block font for the score overlay
//!
//! Each glyph is 3x5 cells; a cell is drawn as a `scale` x `scale` quad.

use glam::Vec2;

use super::shapes::push_quad;
use super::vertex::Vertex;

const GLYPH_W: u32 = 3;
const GLYPH_H: u32 = 5;
/// Empty columns between glyphs
const SPACING: u32 = 1;

/// Row bitmaps, most significant of the low 3 bits is the left column
fn glyph(c: char) -> Option<[u8; 5]> {
    Some(match c {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b010, 0b010, 0b010],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        _ => return None,
    })
}

/// Pixel size of `text` at `scale`
pub fn text_size(text: &str, scale: f32) -> Vec2 {
    let n = text.chars().count() as u32;
    if n == 0 {
        return Vec2::ZERO;
    }
    let cells_w = n * GLYPH_W + (n - 1) * SPACING;
    Vec2::new(cells_w as f32 * scale, GLYPH_H as f32 * scale)
}

/// Generate vertices for `text` with its top-left corner at `top_left`
///
/// Characters without a glyph leave a blank cell.
pub fn text(text: &str, top_left: Vec2, scale: f32, color: [f32; 4]) -> Vec<Vertex> {
    let mut vertices = Vec::new();
    for (i, c) in text.chars().enumerate() {
        let Some(rows) = glyph(c) else { continue };
        let origin_x = top_left.x + (i as u32 * (GLYPH_W + SPACING)) as f32 * scale;
        for (row, bits) in rows.iter().enumerate() {
            for col in 0..GLYPH_W {
                if bits & (1 << (GLYPH_W - 1 - col)) != 0 {
                    let min = Vec2::new(origin_x + col as f32 * scale, top_left.y + row as f32 * scale);
                    push_quad(&mut vertices, min, min + Vec2::splat(scale), color);
                }
            }
        }
    }
    vertices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_size() {
        assert_eq!(text_size("", 6.0), Vec2::ZERO);
        assert_eq!(text_size("7", 6.0), Vec2::new(18.0, 30.0));
        assert_eq!(text_size("123", 2.0), Vec2::new(22.0, 10.0));
    }

    #[test]
    fn test_glyph_cells() {
        // "1" lights 8 cells, "8" lights 13
        assert_eq!(text("1", Vec2::ZERO, 1.0, [1.0; 4]).len(), 8 * 6);
        assert_eq!(text("8", Vec2::ZERO, 1.0, [1.0; 4]).len(), 13 * 6);
    }

    #[test]
    fn test_unknown_chars_are_blank() {
        assert!(text("?", Vec2::ZERO, 1.0, [1.0; 4]).is_empty());
        // Still takes up space
        assert_eq!(text_size("?", 1.0).x, 3.0);
    }

    #[test]
    fn test_glyphs_stay_inside_text_box() {
        let size = text_size("9081", 3.0);
        for v in text("9081", Vec2::new(5.0, 5.0), 3.0, [1.0; 4]) {
            assert!(v.position[0] >= 5.0 && v.position[0] <= 5.0 + size.x);
            assert!(v.position[1] >= 5.0 && v.position[1] <= 5.0 + size.y);
        }
    }
}

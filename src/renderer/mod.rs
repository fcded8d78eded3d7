//! Rendering module
//!
//! Drawing goes through the `RenderSink` trait. `render_session` describes a
//! frame (background, score overlay, entities in creation order) and the sink
//! decides what to do with it: batch it into triangles, push it to WebGPU, or
//! just record it.

pub mod batch;
pub mod font;
pub mod pipeline;
pub mod shapes;
pub mod vertex;

use glam::{IVec2, Vec2};

use crate::consts::*;
use crate::sim::{EntityRef, Mask, Rect, Session};
use crate::{rgb8, rgb_hex};

pub use batch::{DrawOp, VertexBatch};
pub use pipeline::{GpuSink, RenderState};
pub use vertex::{Vertex, colors};

/// Destination for a frame's draw calls
pub trait RenderSink {
    type Error;

    /// Start a frame filled with `color`
    fn clear(&mut self, color: [f32; 4]);

    /// Draw the solid pixels of `mask` with its top-left at `top_left`
    fn draw_mask(&mut self, mask: &Mask, top_left: IVec2, color: [f32; 4]);

    /// Draw block-font text with its top-left at `top_left`
    fn draw_text(&mut self, text: &str, top_left: Vec2, scale: f32, color: [f32; 4]);

    /// Draw a rounded outline inside `rect`
    fn draw_rect_outline(&mut self, rect: Rect, width: f32, radius: f32, color: [f32; 4]);

    /// Show the frame
    fn present(&mut self) -> Result<(), Self::Error>;
}

/// Rectangle of the score text, mid-bottom anchored above the bottom edge
pub fn score_text_rect(text: &str, screen: Vec2) -> Rect {
    let size = font::text_size(text, SCORE_GLYPH_SCALE);
    Rect::from_midbottom(
        Vec2::new(screen.x / 2.0, screen.y - SCORE_BOTTOM_MARGIN),
        size,
    )
}

/// Box drawn around the score text
pub fn score_box_rect(text_rect: Rect) -> Rect {
    text_rect
        .inflate(SCORE_BOX_INFLATE.0 as i32, SCORE_BOX_INFLATE.1 as i32)
        .moved(0, SCORE_BOX_SHIFT_Y as i32)
}

fn draw_score<S: RenderSink + ?Sized>(sink: &mut S, score: u64, screen: Vec2, color: [f32; 4]) {
    let text = score.to_string();
    let text_rect = score_text_rect(&text, screen);
    sink.draw_text(
        &text,
        Vec2::new(text_rect.left() as f32, text_rect.top() as f32),
        SCORE_GLYPH_SCALE,
        color,
    );
    sink.draw_rect_outline(
        score_box_rect(text_rect),
        SCORE_BOX_BORDER,
        SCORE_BOX_RADIUS,
        color,
    );
}

fn draw_entity<R, S: RenderSink + ?Sized>(sink: &mut S, session: &Session<R>, entity: EntityRef<'_>) {
    let sprites = &session.sprites;
    match entity {
        EntityRef::Star(star) => {
            let rect = Rect::from_center(star.pos, sprites.star.size());
            sink.draw_mask(&sprites.star, rect.top_left(), colors::STAR);
        }
        EntityRef::Player(player) => {
            sink.draw_mask(&player.mask, player.rect().top_left(), colors::PLAYER);
        }
        EntityRef::Laser(laser) => {
            sink.draw_mask(&laser.mask, laser.rect().top_left(), colors::LASER);
        }
        EntityRef::Meteor(meteor) => {
            sink.draw_mask(&meteor.image, meteor.rect().top_left(), colors::METEOR);
        }
        EntityRef::Explosion(explosion) => {
            let frame = explosion.current_frame();
            let Some(mask) = sprites.explosion.get(frame) else {
                return;
            };
            let t = frame as f32 / explosion.frame_count.max(1) as f32;
            let color = vertex::lerp_color(colors::EXPLOSION_START, colors::EXPLOSION_END, t);
            let rect = Rect::from_center(explosion.pos, mask.size());
            sink.draw_mask(mask, rect.top_left(), color);
        }
    }
}

/// Draw one complete frame of the session and present it
pub fn render_session<R, S: RenderSink + ?Sized>(
    session: &Session<R>,
    sink: &mut S,
) -> Result<(), S::Error> {
    let settings = &session.settings;
    sink.clear(rgb_hex(settings.background));

    let [r, g, b] = settings.score_color;
    draw_score(sink, session.score(), settings.screen_size(), rgb8(r, g, b));

    for entity in session.entities() {
        if !entity.is_marked() {
            draw_entity(sink, session, entity);
        }
    }

    sink.present()
}

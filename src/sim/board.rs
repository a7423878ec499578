/// Board drawing: border box and score line.
///
/// The border is not decoration. Its glyphs are what make the walls block.

use crate::domain::glyph::Glyph;
use crate::domain::playfield::Playfield;
use super::frame::FrameSink;

/// Draw a box with corners at (x, y) and (x2, y2).
pub fn draw_box<F: FrameSink + ?Sized>(frame: &mut F, x: usize, y: usize, x2: usize, y2: usize) {
    frame.write(x, y, Glyph::BOX_TOP_LEFT);
    frame.write(x2, y, Glyph::BOX_TOP_RIGHT);
    frame.write(x, y2, Glyph::BOX_BOTTOM_LEFT);
    frame.write(x2, y2, Glyph::BOX_BOTTOM_RIGHT);
    for cx in x + 1..x2 {
        frame.write(cx, y, Glyph::BOX_TOP);
        frame.write(cx, y2, Glyph::BOX_BOTTOM);
    }
    for cy in y + 1..y2 {
        frame.write(x, cy, Glyph::BOX_LEFT);
        frame.write(x2, cy, Glyph::BOX_RIGHT);
    }
}

pub fn draw_score<F: FrameSink + ?Sized>(frame: &mut F, score: u32) {
    let (lx, ly) = Playfield::SCORE_LABEL;
    let (vx, vy) = Playfield::SCORE_VALUE;
    frame.write_str(lx, ly, "Score:");
    frame.write_str(vx, vy, &format!("{score:<3}"));
}

/// Border plus score line.
pub fn draw_playfield<F: FrameSink + ?Sized>(frame: &mut F, field: &Playfield, score: u32) {
    let b = field.border();
    draw_box(frame, b.left, b.top, b.right, b.bottom);
    draw_score(frame, score);
}

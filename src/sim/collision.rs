/// Collision oracle: classifies a cell by reading the committed frame.
///
/// There is no separate occupancy grid. Whatever glyph was visible after
/// the previous commit decides the outcome, so the board must not be
/// cleared or redrawn between a move and its check.

use crate::domain::glyph::CellClass;
use super::frame::FrameSink;

/// Class of the committed glyph at (x, y). Cells off the grid block.
/// Pure: reads only, keeps no state between calls.
pub fn classify<F: FrameSink + ?Sized>(frame: &F, x: usize, y: usize) -> CellClass {
    if x >= frame.width() || y >= frame.height() {
        return CellClass::Blocking;
    }
    frame.read(x, y).class()
}

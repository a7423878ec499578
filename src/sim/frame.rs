/// Frame sink contract and the in-memory glyph buffer behind it.
///
/// Writes are queued and only become readable after `commit()`. Reads
/// always see the last committed frame. Collision checks depend on this:
/// a mover's own pending writes are invisible to the check made in the
/// same frame.

use crate::domain::glyph::Glyph;
use crate::error::GameError;

pub trait FrameSink {
    fn width(&self) -> usize;
    fn height(&self) -> usize;

    /// Queue a glyph for (x, y). Out-of-range writes are dropped.
    fn write(&mut self, x: usize, y: usize, glyph: Glyph);

    /// Wait for the frame boundary, then make queued writes readable.
    fn commit(&mut self) -> Result<(), GameError>;

    /// Last committed glyph at (x, y). Out of range reads as blank.
    fn read(&self, x: usize, y: usize) -> Glyph;

    /// Blank the whole board at once and drop queued writes.
    fn clear(&mut self);

    fn write_str(&mut self, x: usize, y: usize, s: &str) {
        for (i, ch) in s.chars().enumerate() {
            self.write(x + i, y, Glyph::text(ch));
        }
    }
}

impl<T: FrameSink + ?Sized> FrameSink for &mut T {
    fn width(&self) -> usize { (**self).width() }
    fn height(&self) -> usize { (**self).height() }
    fn write(&mut self, x: usize, y: usize, glyph: Glyph) { (**self).write(x, y, glyph) }
    fn commit(&mut self) -> Result<(), GameError> { (**self).commit() }
    fn read(&self, x: usize, y: usize) -> Glyph { (**self).read(x, y) }
    fn clear(&mut self) { (**self).clear() }
}

/// Committed grid plus a queue of pending writes.
#[derive(Clone, Debug)]
pub struct GlyphBuffer {
    width: usize,
    height: usize,
    committed: Vec<Glyph>,
    pending: Vec<(usize, usize, Glyph)>,
    frames: u64,
}

impl GlyphBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        GlyphBuffer {
            width,
            height,
            committed: vec![Glyph::BLANK; width * height],
            pending: Vec::with_capacity(64),
            frames: 0,
        }
    }

    /// Number of commits since creation.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    #[cfg(test)]
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Apply queued writes without any frame wait.
    pub fn apply_pending(&mut self) {
        for (x, y, g) in self.pending.drain(..) {
            self.committed[y * self.width + x] = g;
        }
        self.frames += 1;
    }

    /// Committed row as glyphs, for rendering.
    pub fn row(&self, y: usize) -> &[Glyph] {
        &self.committed[y * self.width..(y + 1) * self.width]
    }
}

impl FrameSink for GlyphBuffer {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn write(&mut self, x: usize, y: usize, glyph: Glyph) {
        if x < self.width && y < self.height {
            self.pending.push((x, y, glyph));
        }
    }

    fn commit(&mut self) -> Result<(), GameError> {
        self.apply_pending();
        Ok(())
    }

    fn read(&self, x: usize, y: usize) -> Glyph {
        if x < self.width && y < self.height {
            self.committed[y * self.width + x]
        } else {
            Glyph::BLANK
        }
    }

    fn clear(&mut self) {
        self.pending.clear();
        self.committed.fill(Glyph::BLANK);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_are_invisible_until_commit() {
        let mut fb = GlyphBuffer::new(4, 3);
        fb.write(1, 1, Glyph::TOKEN);
        assert_eq!(fb.read(1, 1), Glyph::BLANK);
        assert!(fb.has_pending());
        fb.commit().unwrap();
        assert_eq!(fb.read(1, 1), Glyph::TOKEN);
        assert!(!fb.has_pending());
        assert_eq!(fb.frames(), 1);
    }

    #[test]
    fn later_write_to_same_cell_wins() {
        let mut fb = GlyphBuffer::new(4, 3);
        fb.write(2, 0, Glyph::PLAYER_TRAIL);
        fb.write(2, 0, Glyph::PLAYER_HEAD);
        fb.commit().unwrap();
        assert_eq!(fb.read(2, 0), Glyph::PLAYER_HEAD);
    }

    #[test]
    fn clear_drops_pending_and_committed() {
        let mut fb = GlyphBuffer::new(4, 3);
        fb.write(0, 0, Glyph::BOX_TOP);
        fb.commit().unwrap();
        fb.write(1, 0, Glyph::TOKEN);
        fb.clear();
        fb.commit().unwrap();
        assert_eq!(fb.read(0, 0), Glyph::BLANK);
        assert_eq!(fb.read(1, 0), Glyph::BLANK);
    }

    #[test]
    fn out_of_range_is_ignored() {
        let mut fb = GlyphBuffer::new(2, 2);
        fb.write(5, 5, Glyph::TOKEN);
        assert!(!fb.has_pending());
        assert_eq!(fb.read(5, 5), Glyph::BLANK);
    }

    #[test]
    fn borrowed_sink_writes_through() {
        fn stamp<F: FrameSink>(mut sink: F) {
            sink.write(1, 1, Glyph::TOKEN);
            sink.commit().unwrap();
        }
        let mut fb = GlyphBuffer::new(3, 3);
        stamp(&mut fb);
        assert_eq!(fb.read(1, 1), Glyph::TOKEN);
        assert_eq!(fb.frames(), 1);
    }

    #[test]
    fn write_str_lays_out_text() {
        let mut fb = GlyphBuffer::new(10, 1);
        fb.write_str(2, 0, "Hi!");
        fb.commit().unwrap();
        assert_eq!(fb.read(2, 0), Glyph::text('H'));
        assert_eq!(fb.read(4, 0), Glyph::text('!'));
        assert_eq!(fb.row(0)[3], Glyph::text('i'));
    }
}

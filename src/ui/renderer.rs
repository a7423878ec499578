/// Terminal frame sink: the glyph board drawn with crossterm.
///
/// How it works:
///   1. Writes queue into an in-memory `GlyphBuffer`
///   2. `commit()` sleeps until the next frame deadline (vblank stand-in)
///   3. Pending writes are applied, then every cell is compared with what
///      the terminal currently shows
///   4. Only changed cells are emitted, batched with `queue!` and flushed once
///
/// Each board cell is two terminal columns wide so the grid looks square.

use std::io::{self, BufWriter, Stdout, Write};
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};
use tracing::trace;

use crate::domain::glyph::Glyph;
use crate::error::GameError;
use crate::sim::frame::{FrameSink, GlyphBuffer};

/// Terminal columns per board cell.
const CELL_W: usize = 2;

/// Explicit background for every cell, also used for the initial clear so
/// the gaps between rows match the cells.
const BASE_BG: Color = Color::Rgb { r: 22, g: 22, b: 35 };

// ── Glyph appearance ──

/// Two terminal columns for one glyph.
fn cell_chars(g: Glyph) -> [char; 2] {
    match g {
        Glyph::BLANK => [' ', ' '],
        Glyph::TOKEN => ['◆', ' '],
        Glyph::PLAYER_HEAD => ['█', '█'],
        Glyph::PLAYER_TRAIL => ['▒', '▒'],
        Glyph::BOX_TOP_LEFT => ['╔', '═'],
        Glyph::BOX_TOP_RIGHT => ['═', '╗'],
        Glyph::BOX_BOTTOM_LEFT => ['╚', '═'],
        Glyph::BOX_BOTTOM_RIGHT => ['═', '╝'],
        Glyph::BOX_TOP | Glyph::BOX_BOTTOM => ['═', '═'],
        Glyph::BOX_LEFT => ['║', ' '],
        Glyph::BOX_RIGHT => [' ', '║'],
        g if g.is_text() => [g.0 as char, ' '],
        _ => ['?', ' '],
    }
}

fn cell_color(g: Glyph) -> Color {
    match g {
        Glyph::TOKEN => Color::Rgb { r: 255, g: 200, b: 50 },
        Glyph::PLAYER_HEAD => Color::Rgb { r: 120, g: 255, b: 255 },
        Glyph::PLAYER_TRAIL => Color::Rgb { r: 40, g: 170, b: 220 },
        g if g.is_text() => Color::White,
        _ => Color::Rgb { r: 200, g: 60, b: 200 }, // border
    }
}

// ── TerminalSink ──

pub struct TerminalSink<W: Write> {
    writer: W,
    grid: GlyphBuffer,
    /// What the terminal currently shows; None forces a repaint of that cell.
    shown: Vec<Option<Glyph>>,
    frame: Duration,
    deadline: Instant,
    last_flush: usize,
}

impl TerminalSink<BufWriter<Stdout>> {
    pub fn stdout(width: usize, height: usize, frame: Duration) -> Self {
        TerminalSink::new(BufWriter::with_capacity(16384, io::stdout()), width, height, frame)
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(BASE_BG),
            Clear(ClearType::All)
        )?;
        self.invalidate();
        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }
}

impl<W: Write> TerminalSink<W> {
    pub fn new(writer: W, width: usize, height: usize, frame: Duration) -> Self {
        TerminalSink {
            writer,
            grid: GlyphBuffer::new(width, height),
            shown: vec![None; width * height],
            frame,
            deadline: Instant::now(),
            last_flush: 0,
        }
    }

    /// Forget what the terminal shows; the next commit repaints everything.
    pub fn invalidate(&mut self) {
        self.shown.fill(None);
    }

    /// Cells emitted by the most recent commit.
    #[cfg(test)]
    pub fn last_flush(&self) -> usize {
        self.last_flush
    }

    /// Sleep until the frame deadline. A late caller is not made to catch
    /// up: the next deadline is one frame after now.
    fn wait_for_frame(&mut self) {
        let now = Instant::now();
        if now < self.deadline {
            thread::sleep(self.deadline - now);
        }
        self.deadline = self.deadline.max(now) + self.frame;
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<usize> {
        let width = self.grid.width();
        let mut emitted = 0;
        let mut last_fg: Option<Color> = None;
        // Cursor position right after the last printed cell.
        let mut cursor_at: Option<(usize, usize)> = None;

        for y in 0..self.grid.height() {
            for (x, &g) in self.grid.row(y).iter().enumerate() {
                let idx = y * width + x;
                if self.shown[idx] == Some(g) {
                    continue;
                }
                if emitted == 0 {
                    queue!(self.writer, SetBackgroundColor(BASE_BG))?;
                }
                if cursor_at != Some((x, y)) {
                    queue!(self.writer, MoveTo((x * CELL_W) as u16, y as u16))?;
                }
                let fg = cell_color(g);
                if last_fg != Some(fg) {
                    queue!(self.writer, SetForegroundColor(fg))?;
                    last_fg = Some(fg);
                }
                let [a, b] = cell_chars(g);
                queue!(self.writer, Print(a), Print(b))?;

                self.shown[idx] = Some(g);
                cursor_at = Some((x + 1, y));
                emitted += 1;
            }
        }

        self.writer.flush()?;
        Ok(emitted)
    }
}

impl<W: Write> FrameSink for TerminalSink<W> {
    fn width(&self) -> usize {
        self.grid.width()
    }

    fn height(&self) -> usize {
        self.grid.height()
    }

    fn write(&mut self, x: usize, y: usize, glyph: Glyph) {
        self.grid.write(x, y, glyph);
    }

    fn commit(&mut self) -> Result<(), GameError> {
        self.wait_for_frame();
        self.grid.commit()?;
        self.last_flush = self.flush_diff()?;
        trace!(frame = self.grid.frames(), cells = self.last_flush, "flush");
        Ok(())
    }

    fn read(&self, x: usize, y: usize) -> Glyph {
        self.grid.read(x, y)
    }

    fn clear(&mut self) {
        // The terminal catches up at the next commit through the diff.
        self.grid.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sink() -> TerminalSink<Vec<u8>> {
        TerminalSink::new(Vec::new(), 6, 4, Duration::ZERO)
    }

    fn output(s: &TerminalSink<Vec<u8>>) -> String {
        String::from_utf8_lossy(&s.writer).into_owned()
    }

    #[test]
    fn first_commit_paints_every_cell() {
        let mut s = sink();
        s.commit().unwrap();
        assert_eq!(s.last_flush(), 24);
    }

    #[test]
    fn unchanged_frame_emits_nothing() {
        let mut s = sink();
        s.write(2, 1, Glyph::TOKEN);
        s.commit().unwrap();
        let before = s.writer.len();
        s.commit().unwrap();
        assert_eq!(s.last_flush(), 0);
        assert_eq!(s.writer.len(), before);
    }

    #[test]
    fn only_changed_cells_are_emitted() {
        let mut s = sink();
        s.commit().unwrap();
        s.write(1, 1, Glyph::PLAYER_TRAIL);
        s.write(2, 1, Glyph::PLAYER_HEAD);
        s.commit().unwrap();
        assert_eq!(s.last_flush(), 2);
        let out = output(&s);
        assert!(out.contains("▒▒"));
        assert!(out.contains("██"));
    }

    #[test]
    fn reads_follow_commit_not_write() {
        let mut s = sink();
        s.write(0, 0, Glyph::BOX_TOP);
        assert_eq!(s.read(0, 0), Glyph::BLANK);
        s.commit().unwrap();
        assert_eq!(s.read(0, 0), Glyph::BOX_TOP);
    }

    #[test]
    fn clear_shows_up_at_next_commit() {
        let mut s = sink();
        s.write(3, 2, Glyph::TOKEN);
        s.commit().unwrap();
        s.clear();
        assert_eq!(s.read(3, 2), Glyph::BLANK);
        s.commit().unwrap();
        assert_eq!(s.last_flush(), 1);
    }

    #[test]
    fn invalidate_forces_full_repaint() {
        let mut s = sink();
        s.commit().unwrap();
        s.invalidate();
        s.commit().unwrap();
        assert_eq!(s.last_flush(), 24);
    }

    #[test]
    fn commit_waits_for_frame_deadline() {
        let mut s = TerminalSink::new(Vec::new(), 2, 2, Duration::from_millis(5));
        let start = Instant::now();
        for _ in 0..4 {
            s.commit().unwrap();
        }
        // First commit is immediate, the next three each wait one frame.
        assert!(start.elapsed() >= Duration::from_millis(15));
    }

    #[test]
    fn every_game_glyph_has_a_face() {
        for g in [
            Glyph::TOKEN, Glyph::PLAYER_HEAD, Glyph::PLAYER_TRAIL,
            Glyph::BOX_TOP_LEFT, Glyph::BOX_TOP_RIGHT,
            Glyph::BOX_BOTTOM_LEFT, Glyph::BOX_BOTTOM_RIGHT,
            Glyph::BOX_TOP, Glyph::BOX_BOTTOM, Glyph::BOX_LEFT, Glyph::BOX_RIGHT,
        ] {
            assert_ne!(cell_chars(g), ['?', ' '], "{g:?}");
        }
        assert_eq!(cell_chars(Glyph::text('S')), ['S', ' ']);
    }
}

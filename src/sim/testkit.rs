//! Test fixtures: diagram boards, a scripted controller and a token chaser.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::domain::entity::Direction;
use crate::domain::glyph::{CellClass, Glyph};
use crate::error::GameError;
use super::collision::classify;
use super::controls::ControllerSource;
use super::frame::{FrameSink, GlyphBuffer};

/// Build a committed buffer from a diagram.
/// Legend: '+' corner  '-' horizontal edge  '|' vertical edge
///         '$' token   '.' trail   '@' head   ' ' blank
pub fn board_from(rows: &[&str]) -> GlyphBuffer {
    let h = rows.len();
    let w = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);
    let mut fb = GlyphBuffer::new(w, h);
    for (y, row) in rows.iter().enumerate() {
        for (x, ch) in row.chars().enumerate() {
            let g = match ch {
                '+' => Glyph::BOX_TOP_LEFT,
                '-' => Glyph::BOX_TOP,
                '|' => Glyph::BOX_LEFT,
                '$' => Glyph::TOKEN,
                '.' => Glyph::PLAYER_TRAIL,
                '@' => Glyph::PLAYER_HEAD,
                _ => Glyph::BLANK,
            };
            fb.write(x, y, g);
        }
    }
    fb.apply_pending();
    fb
}

/// Replays a fixed list of polls, then reports no input.
/// Optionally raises abort once `abort_after` polls have been made.
pub struct ScriptedControls {
    script: VecDeque<Option<Direction>>,
    pub polls: usize,
    pub abort_after: Option<usize>,
}

impl ScriptedControls {
    pub fn idle() -> Self {
        ScriptedControls { script: VecDeque::new(), polls: 0, abort_after: None }
    }

    pub fn new(script: Vec<Option<Direction>>) -> Self {
        ScriptedControls { script: script.into(), polls: 0, abort_after: None }
    }

    pub fn aborting_after(polls: usize) -> Self {
        ScriptedControls { abort_after: Some(polls), ..Self::idle() }
    }
}

impl ControllerSource for ScriptedControls {
    fn poll(&mut self) -> Option<Direction> {
        self.polls += 1;
        self.script.pop_front().flatten()
    }

    fn abort_requested(&mut self) -> bool {
        self.abort_after.is_some_and(|n| self.polls >= n)
    }
}

/// Glyph buffer shared between the arena and a controller that reads it.
#[derive(Clone)]
pub struct SharedBoard(Rc<RefCell<GlyphBuffer>>);

impl SharedBoard {
    pub fn new(width: usize, height: usize) -> Self {
        SharedBoard(Rc::new(RefCell::new(GlyphBuffer::new(width, height))))
    }

    /// Copy of the board as it stands now.
    pub fn snapshot(&self) -> GlyphBuffer {
        self.0.borrow().clone()
    }

    fn find(&self, glyph: Glyph) -> Option<(usize, usize)> {
        let fb = self.0.borrow();
        (0..fb.height())
            .flat_map(|y| (0..fb.width()).map(move |x| (x, y)))
            .find(|&(x, y)| fb.read(x, y) == glyph)
    }
}

impl FrameSink for SharedBoard {
    fn width(&self) -> usize { self.0.borrow().width() }
    fn height(&self) -> usize { self.0.borrow().height() }
    fn write(&mut self, x: usize, y: usize, glyph: Glyph) { self.0.borrow_mut().write(x, y, glyph) }
    fn commit(&mut self) -> Result<(), GameError> { self.0.borrow_mut().commit() }
    fn read(&self, x: usize, y: usize) -> Glyph { self.0.borrow().read(x, y) }
    fn clear(&mut self) { self.0.borrow_mut().clear() }
}

/// Greedy controller that steers the head toward the token on the
/// committed board. It never asks for a reversal and never steps onto a
/// blocking cell while another choice exists. On a freshly cleared board
/// its path toward the token never crosses itself.
pub struct Chaser {
    board: SharedBoard,
    heading: Direction,
    last_head: Option<(usize, usize)>,
}

impl Chaser {
    pub fn new(board: SharedBoard) -> Self {
        Chaser { board, heading: Direction::Right, last_head: None }
    }

    fn track_heading(&mut self, head: (usize, usize)) {
        if let Some(prev) = self.last_head {
            let step = (head.0 as isize - prev.0 as isize, head.1 as isize - prev.1 as isize);
            if step != (0, 0) {
                self.heading = Direction::ALL
                    .into_iter()
                    .find(|d| d.delta() == step)
                    .unwrap_or(Direction::Right);
            }
        }
        self.last_head = Some(head);
    }
}

impl ControllerSource for Chaser {
    fn poll(&mut self) -> Option<Direction> {
        let head = self.board.find(Glyph::PLAYER_HEAD)?;
        let token = self.board.find(Glyph::TOKEN)?;
        self.track_heading(head);

        let dist = |(x, y): (usize, usize)| x.abs_diff(token.0) + y.abs_diff(token.1);
        let here = dist(head);
        Direction::ALL
            .into_iter()
            .filter(|&d| d != self.heading.opposite())
            .filter_map(|d| {
                let (dx, dy) = d.delta();
                let next = (head.0.checked_add_signed(dx)?, head.1.checked_add_signed(dy)?);
                if classify(&self.board, next.0, next.1) == CellClass::Blocking {
                    return None;
                }
                let d_next = dist(next);
                // Straight on while it gets closer; otherwise prefer a turn.
                let penalty = match (d == self.heading, d_next < here) {
                    (true, true) => 0,
                    (false, _) => 1,
                    (true, false) => 2,
                };
                Some(((d_next, penalty), d))
            })
            .min_by_key(|&(key, _)| key)
            .map(|(_, d)| d)
            .or(Some(self.heading))
    }
}

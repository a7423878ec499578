/// Fixed board geometry and token spawn sampling.
///
/// ```text
///   x:  0 1 2 ............ 29 30 31
///   y=1      Score: n
///   y=2   ┌──────────────────┐        border (1,2)-(30,26)
///   y=3   │ interior         │        interior (2,3)-(29,25)
///   ...   │   spawn area     │        interior shrunk by the margin
///   y=26  └──────────────────┘
/// ```

use rand::Rng;

pub const COLS: usize = 32;
pub const ROWS: usize = 27;

/// Inclusive cell rectangle.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Rect {
    pub left: usize,
    pub top: usize,
    pub right: usize,
    pub bottom: usize,
}

impl Rect {
    pub fn contains(&self, x: usize, y: usize) -> bool {
        x >= self.left && x <= self.right && y >= self.top && y <= self.bottom
    }

    /// Shrink by `n` on every side. None if nothing is left.
    pub fn shrink(&self, n: usize) -> Option<Rect> {
        let r = Rect {
            left: self.left + n,
            top: self.top + n,
            right: self.right.checked_sub(n)?,
            bottom: self.bottom.checked_sub(n)?,
        };
        if r.left <= r.right && r.top <= r.bottom { Some(r) } else { None }
    }

    #[cfg(test)]
    pub fn cell_count(&self) -> usize {
        (self.right - self.left + 1) * (self.bottom - self.top + 1)
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Playfield {
    border: Rect,
    spawn: Rect,
}

impl Playfield {
    pub const BORDER: Rect = Rect { left: 1, top: 2, right: COLS - 2, bottom: ROWS - 1 };
    pub const SCORE_LABEL: (usize, usize) = (12, 1);
    pub const SCORE_VALUE: (usize, usize) = (18, 1);
    pub const PLAYER_START: (usize, usize) = (5, 5);

    /// Board with the token kept `spawn_margin` cells away from the border.
    /// None when the margin leaves no spawnable cell.
    pub fn new(spawn_margin: usize) -> Option<Self> {
        let interior = Self::BORDER.shrink(1)?;
        let spawn = interior.shrink(spawn_margin)?;
        Some(Playfield { border: Self::BORDER, spawn })
    }

    pub fn border(&self) -> Rect {
        self.border
    }

    #[cfg(test)]
    pub fn interior(&self) -> Rect {
        // BORDER is a constant wider than two cells
        Rect {
            left: self.border.left + 1,
            top: self.border.top + 1,
            right: self.border.right - 1,
            bottom: self.border.bottom - 1,
        }
    }

    #[cfg(test)]
    pub fn spawn_area(&self) -> Rect {
        self.spawn
    }

    pub fn is_spawnable(&self, x: usize, y: usize) -> bool {
        self.spawn.contains(x, y)
    }

    /// Draw a token position uniformly from the spawn area.
    ///
    /// Samples the valid range directly, so it always terminates in one draw.
    /// The current trail is not consulted: a token may land on a trail cell.
    pub fn sample_spawn<R: Rng + ?Sized>(&self, rng: &mut R) -> (usize, usize) {
        let x = rng.random_range(self.spawn.left..=self.spawn.right);
        let y = rng.random_range(self.spawn.top..=self.spawn.bottom);
        debug_assert!(self.is_spawnable(x, y));
        (x, y)
    }
}

impl Default for Playfield {
    fn default() -> Self {
        Playfield {
            border: Self::BORDER,
            spawn: Rect { left: 3, top: 4, right: COLS - 4, bottom: ROWS - 3 },
        }
    }
}

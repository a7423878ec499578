/// Glyph codes written to the frame buffer, and the table that turns a
/// glyph read back from the buffer into a collision class.
///
/// The rendered board is the only occupancy model the game has, so every
/// glyph the board can show must be classified here. Changing a glyph
/// assignment means changing `CLASS_TABLE` in the same commit.

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct Glyph(pub u8);

impl Glyph {
    pub const BLANK: Glyph = Glyph(0x00);
    pub const TOKEN: Glyph = Glyph(0x10);
    pub const PLAYER_HEAD: Glyph = Glyph(0xB1);
    pub const PLAYER_TRAIL: Glyph = Glyph(0x06);

    // Border box pieces
    pub const BOX_TOP_LEFT: Glyph = Glyph(0x87);
    pub const BOX_TOP_RIGHT: Glyph = Glyph(0x8B);
    pub const BOX_BOTTOM_LEFT: Glyph = Glyph(0x8D);
    pub const BOX_BOTTOM_RIGHT: Glyph = Glyph(0x8E);
    pub const BOX_TOP: Glyph = Glyph(0x83);
    pub const BOX_BOTTOM: Glyph = Glyph(0x8C);
    pub const BOX_LEFT: Glyph = Glyph(0x85);
    pub const BOX_RIGHT: Glyph = Glyph(0x8A);

    /// Glyph for a text character. Non-ASCII maps to '?'.
    pub fn text(ch: char) -> Glyph {
        if ch.is_ascii() && !ch.is_ascii_control() {
            Glyph(ch as u8)
        } else {
            Glyph(b'?')
        }
    }

    /// Printable ASCII range used for labels and score digits.
    pub fn is_text(self) -> bool {
        (0x20..0x7F).contains(&self.0)
    }

    pub fn class(self) -> CellClass {
        CLASS_TABLE
            .iter()
            .find(|(g, _)| *g == self)
            .map(|(_, c)| *c)
            .unwrap_or(CellClass::Empty)
    }
}

/// What happens to a mover that steps onto a cell.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CellClass {
    Empty,
    Pickup,
    Blocking,
}

/// Glyph → class. Anything not listed is `Empty`.
/// The player head is deliberately absent: a mover erases its head to trail
/// before stepping, so a head is never found at a destination.
const CLASS_TABLE: &[(Glyph, CellClass)] = &[
    (Glyph::TOKEN, CellClass::Pickup),
    (Glyph::PLAYER_TRAIL, CellClass::Blocking),
    (Glyph::BOX_TOP, CellClass::Blocking),
    (Glyph::BOX_BOTTOM, CellClass::Blocking),
    (Glyph::BOX_LEFT, CellClass::Blocking),
    (Glyph::BOX_RIGHT, CellClass::Blocking),
    (Glyph::BOX_TOP_LEFT, CellClass::Blocking),
    (Glyph::BOX_TOP_RIGHT, CellClass::Blocking),
    (Glyph::BOX_BOTTOM_LEFT, CellClass::Blocking),
    (Glyph::BOX_BOTTOM_RIGHT, CellClass::Blocking),
];

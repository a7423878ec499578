pub mod entity;
pub mod glyph;
pub mod playfield;

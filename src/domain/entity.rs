/// Entities: the player head and the collectible token.
/// Both share one shape; the token simply never moves.

use rand::Rng;

use super::glyph::Glyph;
use super::playfield::Playfield;

const SPAWN_ATTEMPTS: usize = 4;

/// Heading. Ordinals are chosen so that `d ^ 2` is the opposite direction.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[repr(u8)]
pub enum Direction {
    Right = 0,
    Down = 1,
    Left = 2,
    Up = 3,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Right, Direction::Down, Direction::Left, Direction::Up];

    pub fn from_ordinal(n: u8) -> Direction {
        Self::ALL[(n & 3) as usize]
    }

    pub fn ordinal(self) -> u8 {
        self as u8
    }

    pub fn opposite(self) -> Direction {
        Direction::from_ordinal(self.ordinal() ^ 2)
    }

    /// Unit step (dx, dy). y grows downwards.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::Right => (1, 0),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Up => (0, -1),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Role {
    Player,
    Token,
}

#[derive(Clone, Debug)]
pub struct Entity {
    pub x: usize,
    pub y: usize,
    pub dir: Direction,
    pub head_glyph: Glyph,
    pub trail_glyph: Glyph,
    pub is_human: bool,
    // recomputed on every move
    pub collided: bool,
    pub picked_up: bool,
}

impl Entity {
    pub fn new(role: Role) -> Self {
        let (head_glyph, trail_glyph, is_human) = match role {
            Role::Player => (Glyph::PLAYER_HEAD, Glyph::PLAYER_TRAIL, true),
            Role::Token => (Glyph::TOKEN, Glyph::BLANK, false),
        };
        let (x, y) = Playfield::PLAYER_START;
        Entity {
            x, y,
            dir: Direction::Right,
            head_glyph,
            trail_glyph,
            is_human,
            collided: false,
            picked_up: false,
        }
    }

    pub fn clear_flags(&mut self) {
        self.collided = false;
        self.picked_up = false;
    }

    /// Reset to a start cell and heading with flags cleared.
    pub fn reset_at(&mut self, x: usize, y: usize, dir: Direction) {
        self.x = x;
        self.y = y;
        self.dir = dir;
        self.clear_flags();
    }

    /// Take a requested heading unless it is a 180° reversal.
    /// Returns whether the heading was taken; a reversal is dropped silently.
    pub fn apply_direction(&mut self, requested: Direction) -> bool {
        if requested == self.dir.opposite() {
            return false;
        }
        self.dir = requested;
        true
    }

    /// Cell one step ahead, or None if it would leave the coordinate space.
    pub fn ahead(&self) -> Option<(usize, usize)> {
        let (dx, dy) = self.dir.delta();
        Some((self.x.checked_add_signed(dx)?, self.y.checked_add_signed(dy)?))
    }
}

/// The two actors of a round.
#[derive(Clone, Debug)]
pub struct EntityModel {
    pub player: Entity,
    pub token: Entity,
}

impl EntityModel {
    pub fn new() -> Self {
        EntityModel {
            player: Entity::new(Role::Player),
            token: Entity::new(Role::Token),
        }
    }

    /// Player back to the canonical start, heading right.
    pub fn reset_player(&mut self) {
        let (x, y) = Playfield::PLAYER_START;
        self.player.reset_at(x, y, Direction::Right);
    }

    /// Move the token to a fresh spawn cell and clear the round flags.
    ///
    /// A draw on the player's own cell would be overwritten by the trail on
    /// the next move, so it is redrawn a few times. Trail cells are not
    /// avoided.
    pub fn respawn_token<R: Rng + ?Sized>(&mut self, field: &Playfield, rng: &mut R) -> (usize, usize) {
        let mut cell = field.sample_spawn(rng);
        for _ in 1..SPAWN_ATTEMPTS {
            if cell != (self.player.x, self.player.y) {
                break;
            }
            cell = field.sample_spawn(rng);
        }
        let (x, y) = cell;
        self.token.reset_at(x, y, Direction::Right);
        self.player.clear_flags();
        (x, y)
    }
}

impl Default for EntityModel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;

    #[test]
    fn opposite_is_xor_two() {
        for d in Direction::ALL {
            assert_eq!(d.opposite().ordinal(), d.ordinal() ^ 2);
            assert_eq!(d.opposite().opposite(), d);
            let (dx, dy) = d.delta();
            let (ox, oy) = d.opposite().delta();
            assert_eq!((dx + ox, dy + oy), (0, 0));
        }
    }

    #[test]
    fn reversal_is_never_applied() {
        for current in Direction::ALL {
            for requested in Direction::ALL {
                let mut e = Entity::new(Role::Player);
                e.dir = current;
                let taken = e.apply_direction(requested);
                if requested == current.opposite() {
                    assert!(!taken);
                    assert_eq!(e.dir, current);
                } else {
                    assert!(taken);
                    assert_eq!(e.dir, requested);
                }
            }
        }
    }

    #[test]
    fn roles_get_their_glyphs() {
        let m = EntityModel::new();
        assert_eq!(m.player.head_glyph, Glyph::PLAYER_HEAD);
        assert_eq!(m.player.trail_glyph, Glyph::PLAYER_TRAIL);
        assert!(m.player.is_human);
        assert_eq!(m.token.head_glyph, Glyph::TOKEN);
        assert!(!m.token.is_human);
    }

    #[test]
    fn reset_player_restores_start_and_clears_flags() {
        let mut m = EntityModel::new();
        m.player.reset_at(20, 9, Direction::Up);
        m.player.collided = true;
        m.player.picked_up = true;
        m.reset_player();
        assert_eq!((m.player.x, m.player.y), (5, 5));
        assert_eq!(m.player.dir, Direction::Right);
        assert!(!m.player.collided && !m.player.picked_up);
    }

    #[test]
    fn respawn_token_lands_in_spawn_area() {
        let field = Playfield::default();
        let mut rng = ChaCha12Rng::seed_from_u64(7);
        let mut m = EntityModel::new();
        m.player.picked_up = true;
        let (x, y) = m.respawn_token(&field, &mut rng);
        assert_eq!((m.token.x, m.token.y), (x, y));
        assert!(field.is_spawnable(x, y));
        assert!(!m.player.picked_up);
    }

    #[test]
    fn respawn_rarely_lands_on_player() {
        // Six-cell spawn area with the player parked on one of them.
        let field = Playfield::new(11).unwrap();
        let area = field.spawn_area();
        assert_eq!(area.cell_count(), 6);
        let mut m = EntityModel::new();
        m.player.reset_at(area.left, area.top, Direction::Right);
        let mut rng = ChaCha12Rng::seed_from_u64(3);
        let mut on_player = 0;
        for _ in 0..200 {
            let (x, y) = m.respawn_token(&field, &mut rng);
            assert!(field.is_spawnable(x, y));
            if (x, y) == (area.left, area.top) { on_player += 1; }
        }
        assert!(on_player <= 2, "{on_player} spawns on the player");
    }

    #[test]
    fn ahead_stops_at_coordinate_origin() {
        let mut e = Entity::new(Role::Player);
        e.reset_at(0, 4, Direction::Left);
        assert_eq!(e.ahead(), None);
        e.dir = Direction::Down;
        assert_eq!(e.ahead(), Some((0, 5)));
    }
}

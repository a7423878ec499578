/// Movement engine: one cell per call.
///
/// Order per move:
///   1. Trail glyph over the current cell (queued)
///   2. Heading update for human movers (reversal rejected)
///   3. Destination = position + heading
///   4. Classify destination from the committed frame
///   5. Position ← destination, whatever the class
///   6. Head glyph at the new cell (queued)
///
/// A collision is final for the round; the caller decides what happens next.

use tracing::trace;

use crate::domain::entity::{Direction, Entity};
use crate::domain::glyph::CellClass;
use super::collision::classify;
use super::frame::FrameSink;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct MoveOutcome {
    pub collided: bool,
    pub picked_up: bool,
}

pub fn tick<F: FrameSink + ?Sized>(
    frame: &mut F,
    entity: &mut Entity,
    requested: Option<Direction>,
) -> MoveOutcome {
    frame.write(entity.x, entity.y, entity.trail_glyph);

    if entity.is_human {
        if let Some(dir) = requested {
            entity.apply_direction(dir);
        }
    }

    let (nx, ny) = match entity.ahead() {
        Some(cell) => cell,
        None => {
            // Cannot be represented; treat as the wall it would be.
            entity.collided = true;
            entity.picked_up = false;
            frame.write(entity.x, entity.y, entity.head_glyph);
            return MoveOutcome { collided: true, picked_up: false };
        }
    };

    let class = classify(frame, nx, ny);
    entity.picked_up = class == CellClass::Pickup;
    entity.collided = class == CellClass::Blocking;

    entity.x = nx;
    entity.y = ny;
    frame.write(nx, ny, entity.head_glyph);

    trace!(x = nx, y = ny, ?class, "move");
    MoveOutcome { collided: entity.collided, picked_up: entity.picked_up }
}

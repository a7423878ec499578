/// Round controller: one life, from board reset to crash, cap or abort.
///
/// ```text
///   Resetting → Spawning → Running ─┬─ pickup ─→ PickupTransition → Spawning
///                            ↑      │                 (board redrawn, player kept)
///                            └──────┤
///                                   └─ crash / cap / abort ─→ Ending
/// ```
///
/// Running holds for `ticks_per_move` frames, polling input and committing
/// once per frame, then moves once. Because the hold always commits at
/// least once, every collision check reads a frame that already shows the
/// previous move. Abort is only observed inside the hold, between moves.

use rand::Rng;
use tracing::{debug, trace};

use crate::config::RulesConfig;
use crate::domain::entity::{Direction, EntityModel};
use crate::domain::playfield::Playfield;
use crate::error::GameError;
use super::board::draw_playfield;
use super::controls::ControllerSource;
use super::event::{GameEvent, GameListener, RoundOutcome, RoundReport};
use super::frame::FrameSink;
use super::movement;
use super::state::MatchState;

/// Everything the controllers drive: screen, input, randomness, geometry.
pub struct Arena<F, C, R> {
    pub frame: F,
    pub controls: C,
    pub rng: R,
    pub field: Playfield,
}

impl<F: FrameSink, C: ControllerSource, R: Rng> Arena<F, C, R> {
    pub fn new(frame: F, controls: C, rng: R, field: Playfield) -> Self {
        Arena { frame, controls, rng, field }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RoundPhase {
    Resetting,
    Spawning,
    Running,
    PickupTransition,
    Ending(RoundOutcome),
}

pub fn play_round<F, C, R>(
    arena: &mut Arena<F, C, R>,
    entities: &mut EntityModel,
    state: &mut MatchState,
    rules: &RulesConfig,
    listener: &mut dyn GameListener,
) -> Result<RoundReport, GameError>
where
    F: FrameSink,
    C: ControllerSource,
    R: Rng,
{
    let mut phase = RoundPhase::Resetting;
    let mut moves = 0u32;
    state.round_over = false;

    loop {
        trace!(?phase, "round phase");
        phase = match phase {
            RoundPhase::Resetting => {
                arena.frame.clear();
                entities.reset_player();
                draw_playfield(&mut arena.frame, &arena.field, state.score);
                let p = &entities.player;
                arena.frame.write(p.x, p.y, p.head_glyph);
                RoundPhase::Spawning
            }

            RoundPhase::Spawning => {
                let (x, y) = entities.respawn_token(&arena.field, &mut arena.rng);
                arena.frame.write(x, y, entities.token.head_glyph);
                listener.on_event(&GameEvent::TokenSpawned { x, y });
                RoundPhase::Running
            }

            RoundPhase::Running => match hold(arena, entities, state.ticks_per_move)? {
                Hold::Aborted => RoundPhase::Ending(RoundOutcome::Aborted),
                Hold::Move(requested) => {
                    let out = movement::tick(&mut arena.frame, &mut entities.player, requested);
                    moves += 1;
                    if out.picked_up {
                        RoundPhase::PickupTransition
                    } else if out.collided {
                        RoundPhase::Ending(RoundOutcome::Crashed)
                    } else {
                        RoundPhase::Running
                    }
                }
            },

            RoundPhase::PickupTransition => {
                state.record_pickup(rules);
                let p = &entities.player;
                listener.on_event(&GameEvent::TokenPicked {
                    x: p.x,
                    y: p.y,
                    score: state.score,
                    ticks_per_move: state.ticks_per_move,
                });
                debug!(score = state.score, ticks_per_move = state.ticks_per_move, "token picked");

                if entities.player.collided {
                    RoundPhase::Ending(RoundOutcome::Crashed)
                } else if state.cap_reached(rules) {
                    RoundPhase::Ending(RoundOutcome::ScoreCap)
                } else {
                    // Fresh board; the player keeps position and heading.
                    arena.frame.clear();
                    draw_playfield(&mut arena.frame, &arena.field, state.score);
                    let p = &entities.player;
                    arena.frame.write(p.x, p.y, p.head_glyph);
                    RoundPhase::Spawning
                }
            }

            RoundPhase::Ending(outcome) => {
                state.round_over = true;
                match outcome {
                    RoundOutcome::Crashed => {
                        let p = &entities.player;
                        listener.on_event(&GameEvent::Crashed { x: p.x, y: p.y });
                    }
                    RoundOutcome::ScoreCap => {
                        listener.on_event(&GameEvent::ScoreCapReached { score: state.score });
                    }
                    RoundOutcome::Aborted => listener.on_event(&GameEvent::Aborted),
                }
                // Let the final head position show before anything else draws.
                arena.frame.commit()?;
                let report = RoundReport { outcome, score: state.score, moves };
                listener.on_event(&GameEvent::RoundEnded(report));
                return Ok(report);
            }
        };
    }
}

enum Hold {
    Move(Option<Direction>),
    Aborted,
}

/// Hold period before one move: poll and commit once per frame.
/// Latches the last polled direction that is not a reversal of the heading.
fn hold<F, C, R>(arena: &mut Arena<F, C, R>, entities: &EntityModel, frames: u32) -> Result<Hold, GameError>
where
    F: FrameSink,
    C: ControllerSource,
{
    let heading = entities.player.dir;
    let mut latched = None;
    for _ in 0..frames.max(1) {
        if let Some(dir) = arena.controls.poll() {
            if dir != heading.opposite() {
                latched = Some(dir);
            }
        }
        arena.frame.commit()?;
        if arena.controls.abort_requested() {
            return Ok(Hold::Aborted);
        }
    }
    Ok(Hold::Move(latched))
}

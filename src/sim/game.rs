/// Match controller: rounds until the cap is reached, the lives run out,
/// or the player aborts.

use rand::Rng;
use tracing::info;

use crate::config::RulesConfig;
use crate::domain::entity::EntityModel;
use crate::error::GameError;
use super::controls::ControllerSource;
use super::event::{GameEvent, GameListener, MatchReport, MatchResult, RoundOutcome};
use super::frame::FrameSink;
use super::round::{play_round, Arena};
use super::state::MatchState;

/// Who drives the player head.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Seat {
    Human,
    /// Attract-mode demo: no input is taken, the head keeps its heading.
    Demo,
}

pub struct MatchController<F, C, R> {
    pub arena: Arena<F, C, R>,
    pub rules: RulesConfig,
    pub state: MatchState,
    pub entities: EntityModel,
    seat: Seat,
}

impl<F, C, R> MatchController<F, C, R>
where
    F: FrameSink,
    C: ControllerSource,
    R: Rng,
{
    pub fn new(arena: Arena<F, C, R>, rules: RulesConfig, seat: Seat) -> Self {
        let state = MatchState::new(&rules);
        MatchController { arena, rules, state, entities: EntityModel::new(), seat }
    }

    /// Play one match to its end. Blocks for the whole match.
    pub fn run(&mut self, listener: &mut dyn GameListener) -> Result<MatchReport, GameError> {
        self.state.reset(&self.rules);
        self.entities = EntityModel::new();
        self.entities.player.is_human = self.seat == Seat::Human;
        listener.on_event(&GameEvent::MatchStarted);
        info!(seat = ?self.seat, "match started");

        let mut result = MatchResult::Aborted;
        while !self.state.match_over {
            self.state.round += 1;
            listener.on_event(&GameEvent::RoundStarted { round: self.state.round });

            let report = play_round(
                &mut self.arena,
                &mut self.entities,
                &mut self.state,
                &self.rules,
                listener,
            )?;
            info!(round = self.state.round, outcome = ?report.outcome, score = report.score, "round over");

            match report.outcome {
                RoundOutcome::ScoreCap => {
                    result = MatchResult::Won;
                    self.state.match_over = true;
                }
                RoundOutcome::Aborted => {
                    result = MatchResult::Aborted;
                    self.state.match_over = true;
                }
                RoundOutcome::Crashed => {
                    let more = self.state.lose_life();
                    listener.on_event(&GameEvent::LifeLost { lives_left: self.state.lives });
                    if !more {
                        result = MatchResult::Crashed;
                        self.state.match_over = true;
                    }
                }
            }
        }

        let report = MatchReport { result, score: self.state.score, rounds: self.state.round };
        info!(result = ?report.result, score = report.score, "match over");
        listener.on_event(&GameEvent::MatchEnded(report));
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::Direction;
    use crate::domain::glyph::{CellClass, Glyph};
    use crate::domain::playfield::{Playfield, COLS, ROWS};
    use crate::sim::collision::classify;
    use crate::sim::frame::{FrameSink, GlyphBuffer};
    use crate::sim::testkit::{Chaser, ScriptedControls, SharedBoard};
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;

    fn rules(lives: u32, cap: u32) -> RulesConfig {
        RulesConfig {
            start_ticks_per_move: 3,
            min_ticks_per_move: 2,
            score_cap: cap,
            lives,
            spawn_margin: 1,
        }
    }

    fn controller(
        controls: ScriptedControls,
        rules: RulesConfig,
        seat: Seat,
    ) -> MatchController<GlyphBuffer, ScriptedControls, ChaCha12Rng> {
        let arena = Arena::new(
            GlyphBuffer::new(COLS, ROWS),
            controls,
            ChaCha12Rng::seed_from_u64(0xC0FFEE),
            Playfield::default(),
        );
        MatchController::new(arena, rules, seat)
    }

    #[test]
    fn single_life_crash_ends_match() {
        let mut mc = controller(ScriptedControls::idle(), rules(1, 9), Seat::Human);
        let mut events: Vec<GameEvent> = vec![];
        let report = mc.run(&mut events).unwrap();

        assert_eq!(report.result, MatchResult::Crashed);
        assert_eq!(report.rounds, 1);
        assert_eq!(report.score, mc.state.score);
        assert!(mc.state.match_over);
        assert_eq!(events.first(), Some(&GameEvent::MatchStarted));
        assert_eq!(events.last(), Some(&GameEvent::MatchEnded(report)));
    }

    #[test]
    fn extra_lives_replay_rounds_and_keep_score() {
        let mut mc = controller(ScriptedControls::idle(), rules(3, 9), Seat::Human);
        let mut events: Vec<GameEvent> = vec![];
        let report = mc.run(&mut events).unwrap();

        assert_eq!(report.result, MatchResult::Crashed);
        assert_eq!(report.rounds, 3);
        assert_eq!(mc.state.lives, 0);
        let lives: Vec<u32> = events.iter().filter_map(|e| match e {
            GameEvent::LifeLost { lives_left } => Some(*lives_left),
            _ => None,
        }).collect();
        assert_eq!(lives, vec![2, 1, 0]);

        // Score is never reset between rounds of one match.
        let mut last = 0;
        for e in &events {
            if let GameEvent::RoundEnded(r) = e {
                assert!(r.score >= last);
                last = r.score;
            }
        }
    }

    #[test]
    fn abort_ends_match_without_crash() {
        let mut mc = controller(ScriptedControls::aborting_after(5), rules(3, 9), Seat::Human);
        let mut events: Vec<GameEvent> = vec![];
        let report = mc.run(&mut events).unwrap();

        assert_eq!(report.result, MatchResult::Aborted);
        assert_eq!(report.rounds, 1);
        assert_eq!(mc.state.lives, 3);
        assert!(!events.iter().any(|e| matches!(e, GameEvent::LifeLost { .. })));
    }

    #[test]
    fn reaching_the_cap_wins_without_crash() {
        let r = rules(1, 7);
        let board = SharedBoard::new(COLS, ROWS);
        let arena = Arena::new(
            board.clone(),
            Chaser::new(board),
            ChaCha12Rng::seed_from_u64(99),
            Playfield::default(),
        );
        let mut mc = MatchController::new(arena, r.clone(), Seat::Human);
        let mut events: Vec<GameEvent> = vec![];
        let report = mc.run(&mut events).unwrap();

        assert_eq!(report.result, MatchResult::Won, "{events:?}");
        assert_eq!(report.score, 7);
        assert_eq!(report.rounds, 1);
        assert!(!mc.entities.player.collided);
        assert_eq!(mc.state.ticks_per_move, r.min_ticks_per_move);
        assert!(events.contains(&GameEvent::ScoreCapReached { score: 7 }));
        assert!(!events.iter().any(|e| matches!(e, GameEvent::Crashed { .. })));
        let picks = events.iter().filter(|e| matches!(e, GameEvent::TokenPicked { .. })).count();
        assert_eq!(picks, 7);
    }

    #[test]
    fn demo_seat_ignores_input() {
        let script = vec![Some(Direction::Down); 200];
        let mut mc = controller(ScriptedControls::new(script), rules(1, 9), Seat::Demo);
        let report = mc.run(&mut ()).unwrap();
        assert_eq!(report.result, MatchResult::Crashed);
        assert!(!mc.entities.player.is_human);
        // Heading never changed: the head ran straight into the right wall.
        assert_eq!(mc.entities.player.dir, Direction::Right);
        assert_eq!((mc.entities.player.x, mc.entities.player.y), (Playfield::BORDER.right, 5));
    }

    #[test]
    fn crash_leaves_head_on_the_blocking_cell() {
        let mut mc = controller(ScriptedControls::idle(), rules(1, 9), Seat::Human);
        mc.run(&mut ()).unwrap();
        let p = &mc.entities.player;
        assert_eq!(mc.arena.frame.read(p.x, p.y), Glyph::PLAYER_HEAD);
        assert_eq!(classify(&mc.arena.frame, p.x - 1, p.y), CellClass::Blocking);
    }
}

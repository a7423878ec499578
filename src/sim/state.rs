/// MatchState: score, speed and lives carried across rounds of one match.

use crate::config::RulesConfig;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchState {
    pub score: u32,
    /// Frames held per move. Lower is faster.
    pub ticks_per_move: u32,
    pub lives: u32,
    pub round: u32,
    pub round_over: bool,
    pub match_over: bool,
}

impl MatchState {
    pub fn new(rules: &RulesConfig) -> Self {
        MatchState {
            score: 0,
            ticks_per_move: rules.start_ticks_per_move,
            lives: rules.lives,
            round: 0,
            round_over: false,
            match_over: false,
        }
    }

    pub fn reset(&mut self, rules: &RulesConfig) {
        *self = MatchState::new(rules);
    }

    /// Score a token and speed up, never past the floor.
    pub fn record_pickup(&mut self, rules: &RulesConfig) {
        self.score = self.score.saturating_add(1).min(rules.score_cap);
        self.ticks_per_move = self.ticks_per_move.saturating_sub(1).max(rules.min_ticks_per_move);
    }

    pub fn cap_reached(&self, rules: &RulesConfig) -> bool {
        self.score >= rules.score_cap
    }

    /// Spend a life. Returns true if any remain.
    pub fn lose_life(&mut self) -> bool {
        self.lives = self.lives.saturating_sub(1);
        self.lives > 0
    }
}

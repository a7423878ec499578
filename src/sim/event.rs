/// Events emitted by the round and match controllers.
/// The binary consumes these for sound and logging; tests record them.

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RoundOutcome {
    Crashed,
    ScoreCap,
    Aborted,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct RoundReport {
    pub outcome: RoundOutcome,
    pub score: u32,
    pub moves: u32,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MatchResult {
    Won,
    Crashed,
    Aborted,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct MatchReport {
    pub result: MatchResult,
    pub score: u32,
    pub rounds: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    MatchStarted,
    RoundStarted { round: u32 },
    TokenSpawned { x: usize, y: usize },
    TokenPicked { x: usize, y: usize, score: u32, ticks_per_move: u32 },
    Crashed { x: usize, y: usize },
    LifeLost { lives_left: u32 },
    ScoreCapReached { score: u32 },
    Aborted,
    RoundEnded(RoundReport),
    MatchEnded(MatchReport),
}

/// Presentation hook. Called synchronously; nothing flows back to the core.
pub trait GameListener {
    fn on_event(&mut self, event: &GameEvent);
}

impl GameListener for Vec<GameEvent> {
    fn on_event(&mut self, event: &GameEvent) {
        self.push(event.clone());
    }
}

/// Listener that ignores everything.
impl GameListener for () {
    fn on_event(&mut self, _event: &GameEvent) {}
}

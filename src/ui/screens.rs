/// Static screens drawn through the same frame sink as the game board.

use crate::error::GameError;
use crate::sim::board::draw_box;
use crate::sim::event::{MatchReport, MatchResult};
use crate::sim::frame::FrameSink;

/// Frames the final score stays up before returning to the title.
pub const GAME_OVER_HOLD_FRAMES: u32 = 75;

/// Title screen: border box, name, prompt and key help.
/// Queues writes only; the caller commits while it waits for input.
pub fn draw_title<F: FrameSink + ?Sized>(frame: &mut F) {
    let (w, h) = (frame.width(), frame.height());
    frame.clear();
    draw_box(frame, 1, 2, w - 2, h - 1);
    frame.write_str(10, 9, "Trail  Siege");
    frame.write_str(5, 13, "Press any key to start!");
    frame.write_str(4, 17, "Arrows/WASD  steer");
    frame.write_str(4, 18, "Esc          back to title");
    frame.write_str(4, 19, "Q            quit");
    frame.write_str(4, 22, "Don't cross your own trail.");
}

/// Game-over sequence: boxes close in on the center one per frame, then
/// the result and final score are held for `GAME_OVER_HOLD_FRAMES`.
///
/// `interrupt` is checked once per held frame; returning true skips the
/// rest of the hold.
pub fn play_game_over<F, I>(frame: &mut F, report: &MatchReport, mut interrupt: I) -> Result<(), GameError>
where
    F: FrameSink + ?Sized,
    I: FnMut() -> bool,
{
    let (w, h) = (frame.width(), frame.height());
    frame.clear();
    frame.commit()?;

    for i in 0..closing_boxes(h) {
        draw_box(frame, i, i, w - 1 - i, h - 1 - i);
        frame.commit()?;
    }

    let headline = match report.result {
        MatchResult::Won => "You Win!",
        MatchResult::Crashed | MatchResult::Aborted => "Game Over",
    };
    let mid = h / 2;
    frame.write_str(11, mid - 1, headline);
    frame.write_str(11, mid + 1, "Score:");
    frame.write_str(18, mid + 1, &report.score.to_string());
    frame.commit()?;

    for _ in 0..GAME_OVER_HOLD_FRAMES {
        if interrupt() {
            break;
        }
        frame.commit()?;
    }
    Ok(())
}

/// Number of nested boxes that fit before the text rows in the middle.
fn closing_boxes(height: usize) -> usize {
    (height / 2).saturating_sub(3)
}

/// Entry point: title screen, matches, game-over screen, repeat.

mod config;
mod domain;
mod error;
mod sim;
mod ui;

use std::fs::File;
use std::sync::Mutex;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, trace};
use tracing_subscriber::EnvFilter;

use config::GameConfig;
use domain::playfield::{COLS, ROWS};
use error::GameError;
use sim::event::{GameEvent, GameListener, MatchReport, MatchResult};
use sim::frame::FrameSink;
use sim::game::{MatchController, Seat};
use sim::round::Arena;
use ui::controls::{AbortOn, LiveControls};
use ui::renderer::TerminalSink;
use ui::screens::{draw_title, play_game_over};
use ui::sound::{self, cue_for, AudioSink, Cue};

type Screen = TerminalSink<std::io::BufWriter<std::io::Stdout>>;

fn main() {
    init_tracing();
    let config = GameConfig::load();

    let mut screen = TerminalSink::stdout(COLS, ROWS, config.frame);
    if let Err(e) = screen.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let mut controls = LiveControls::new(&config.gamepad);
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let mut audio = sound::open(config.sound);

    let mut session = Session {
        screen: &mut screen,
        controls: &mut controls,
        rng: &mut rng,
        audio: audio.as_mut(),
        config: &config,
        last_score: 0,
    };
    let result = session.run();
    let last_score = session.last_score;
    audio.stop();

    if let Err(e) = screen.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }
    if let Err(e) = result {
        eprintln!("Game error: {e}");
    }

    println!();
    println!("Thanks for playing Trail Siege!");
    println!("Final Score: {last_score}");
}

/// Log to the file named by `TRAILSIEGE_LOG` (filter from `RUST_LOG`,
/// default info); otherwise only warnings, on stderr.
fn init_tracing() {
    if let Some(path) = std::env::var_os("TRAILSIEGE_LOG") {
        match File::create(&path) {
            Ok(file) => {
                let filter = EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new("info"));
                let _ = tracing_subscriber::fmt()
                    .with_env_filter(filter)
                    .with_writer(Mutex::new(file))
                    .with_ansi(false)
                    .try_init();
                return;
            }
            Err(e) => eprintln!("cannot open log file {}: {e}", path.to_string_lossy()),
        }
    }
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("warn"))
        .with_writer(std::io::stderr)
        .try_init();
}

// ── Session: title → match → game over ──

enum TitleChoice {
    Start,
    Demo,
    Quit,
}

struct Session<'a> {
    screen: &'a mut Screen,
    controls: &'a mut LiveControls,
    rng: &'a mut StdRng,
    audio: &'a mut dyn AudioSink,
    config: &'a GameConfig,
    last_score: u32,
}

impl Session<'_> {
    fn run(&mut self) -> Result<(), GameError> {
        loop {
            match self.title()? {
                TitleChoice::Quit => return Ok(()),
                TitleChoice::Start => {}
                TitleChoice::Demo => {
                    let demo = self.play_match(Seat::Demo)?;
                    if self.controls.quit_requested() {
                        return Ok(());
                    }
                    // Only a key press ends the demo early; that starts a real match.
                    if demo.result != MatchResult::Aborted {
                        continue;
                    }
                }
            }

            let report = self.play_match(Seat::Human)?;
            self.last_score = report.score;
            if self.controls.quit_requested() {
                return Ok(());
            }
            if report.result != MatchResult::Aborted {
                let controls = &mut *self.controls;
                play_game_over(&mut *self.screen, &report, || {
                    controls.refresh();
                    controls.quit_requested()
                })?;
                if self.controls.quit_requested() {
                    return Ok(());
                }
            }
        }
    }

    /// Show the title and wait for a start key, a quit key, or idle timeout.
    fn title(&mut self) -> Result<TitleChoice, GameError> {
        draw_title(&mut *self.screen);
        let shown = Instant::now();
        let idle = self.config.attract_idle;
        loop {
            self.screen.commit()?;
            self.controls.refresh();
            if self.controls.leave_pressed() {
                return Ok(TitleChoice::Quit);
            }
            if self.controls.start_pressed() {
                return Ok(TitleChoice::Start);
            }
            if idle.is_some_and(|d| shown.elapsed() >= d) {
                info!("title idle; starting demo");
                return Ok(TitleChoice::Demo);
            }
        }
    }

    fn play_match(&mut self, seat: Seat) -> Result<MatchReport, GameError> {
        let field = self.config.rules.playfield()?;
        self.controls.reset_signals();
        self.controls.set_abort_on(match seat {
            Seat::Human => AbortOn::Cancel,
            Seat::Demo => AbortOn::AnyKey,
        });

        let arena = Arena::new(&mut *self.screen, &mut *self.controls, &mut *self.rng, field);
        let mut mc = MatchController::new(arena, self.config.rules.clone(), seat);
        let mut presenter = Presenter {
            audio: &mut *self.audio,
            muted: seat == Seat::Demo,
        };
        let started = Instant::now();
        let report = mc.run(&mut presenter)?;
        debug!(elapsed = ?started.elapsed(), "match finished");
        Ok(report)
    }
}

// ── Presenter: game events → audio and log ──

struct Presenter<'a> {
    audio: &'a mut dyn AudioSink,
    muted: bool,
}

impl GameListener for Presenter<'_> {
    fn on_event(&mut self, event: &GameEvent) {
        trace!(?event, "game event");
        if self.muted {
            return;
        }
        match cue_for(event) {
            Some(Cue::Play(track)) => self.audio.play_track(track),
            Some(Cue::Stop) => self.audio.stop(),
            None => {}
        }
    }
}

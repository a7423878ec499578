/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to defaults if the file is missing, unreadable, or
/// describes rules the game cannot run with.

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use tracing::{info, warn};

use crate::domain::playfield::Playfield;
use crate::error::GameError;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub frame: Duration,
    pub rules: RulesConfig,
    pub gamepad: GamepadConfig,
    pub seed: Option<u64>,
    pub attract_idle: Option<Duration>,
    pub sound: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RulesConfig {
    pub start_ticks_per_move: u32,
    pub min_ticks_per_move: u32, // speed floor; must stay >= 1 so every move sees a commit
    pub score_cap: u32,
    pub lives: u32,
    pub spawn_margin: usize,
}

#[derive(Clone, Debug)]
pub struct GamepadConfig {
    pub confirm: Vec<String>,
    pub cancel: Vec<String>,
}

impl RulesConfig {
    /// Check the rules and build the matching playfield.
    pub fn playfield(&self) -> Result<Playfield, GameError> {
        if self.min_ticks_per_move == 0 {
            return Err(GameError::Rules("min_ticks_per_move must be at least 1".into()));
        }
        if self.start_ticks_per_move < self.min_ticks_per_move {
            return Err(GameError::Rules(format!(
                "start_ticks_per_move {} is below min_ticks_per_move {}",
                self.start_ticks_per_move, self.min_ticks_per_move,
            )));
        }
        if self.score_cap == 0 {
            return Err(GameError::Rules("score_cap must be at least 1".into()));
        }
        if self.lives == 0 {
            return Err(GameError::Rules("lives must be at least 1".into()));
        }
        Playfield::new(self.spawn_margin).ok_or_else(|| {
            GameError::Rules(format!("spawn_margin {} leaves no spawn cell", self.spawn_margin))
        })
    }
}

impl Default for RulesConfig {
    fn default() -> Self {
        RulesConfig {
            start_ticks_per_move: default_start_ticks(),
            min_ticks_per_move: default_min_ticks(),
            score_cap: default_score_cap(),
            lives: default_lives(),
            spawn_margin: default_spawn_margin(),
        }
    }
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    timing: TomlTiming,
    #[serde(default)]
    rules: TomlRules,
    #[serde(default)]
    gamepad: TomlGamepad,
    #[serde(default)]
    general: TomlGeneral,
}

#[derive(Deserialize, Debug)]
struct TomlTiming {
    #[serde(default = "default_frame_ms")]
    frame_ms: u64,
}

#[derive(Deserialize, Debug)]
struct TomlRules {
    #[serde(default = "default_start_ticks")]
    start_ticks_per_move: u32,
    #[serde(default = "default_min_ticks")]
    min_ticks_per_move: u32,
    #[serde(default = "default_score_cap")]
    score_cap: u32,
    #[serde(default = "default_lives")]
    lives: u32,
    #[serde(default = "default_spawn_margin")]
    spawn_margin: usize,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_confirm")]
    confirm: Vec<String>,
    #[serde(default = "default_cancel")]
    cancel: Vec<String>,
}

#[derive(Deserialize, Debug)]
struct TomlGeneral {
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default = "default_attract_idle")]
    attract_idle_secs: u64,
    #[serde(default = "default_sound")]
    sound: bool,
}

// ── Defaults ──

fn default_frame_ms() -> u64 { 16 }       // ~60 Hz vblank
fn default_start_ticks() -> u32 { 13 }
fn default_min_ticks() -> u32 { 2 }
fn default_score_cap() -> u32 { 9 }
fn default_lives() -> u32 { 1 }
fn default_spawn_margin() -> usize { 1 }
fn default_attract_idle() -> u64 { 10 }   // 0 = no attract mode
fn default_sound() -> bool { true }

fn default_confirm() -> Vec<String> { vec!["Start".into(), "A".into()] }
fn default_cancel() -> Vec<String> { vec!["Select".into()] }

impl Default for TomlTiming {
    fn default() -> Self {
        TomlTiming { frame_ms: default_frame_ms() }
    }
}

impl Default for TomlRules {
    fn default() -> Self {
        TomlRules {
            start_ticks_per_move: default_start_ticks(),
            min_ticks_per_move: default_min_ticks(),
            score_cap: default_score_cap(),
            lives: default_lives(),
            spawn_margin: default_spawn_margin(),
        }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad {
            confirm: default_confirm(),
            cancel: default_cancel(),
        }
    }
}

impl Default for TomlGeneral {
    fn default() -> Self {
        TomlGeneral {
            seed: None,
            attract_idle_secs: default_attract_idle(),
            sound: default_sound(),
        }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let search_dirs = candidate_dirs();
        for dir in &search_dirs {
            let path = dir.join("config.toml");
            if !path.exists() {
                continue;
            }
            match std::fs::read_to_string(&path) {
                Ok(text) => match GameConfig::from_toml_str(&text) {
                    Ok(cfg) => {
                        info!(path = %path.display(), "loaded config");
                        return cfg;
                    }
                    Err(e) => {
                        warn!("{}: {e}; using default settings", path.display());
                        return GameConfig::default();
                    }
                },
                Err(e) => warn!("could not read {}: {e}", path.display()),
            }
        }
        GameConfig::default()
    }

    /// Parse and validate a config document.
    pub fn from_toml_str(text: &str) -> Result<Self, GameError> {
        let toml_cfg: TomlConfig = toml::from_str(text)?;
        let cfg = GameConfig::from(toml_cfg);
        cfg.rules.playfield()?;
        Ok(cfg)
    }
}

impl From<TomlConfig> for GameConfig {
    fn from(t: TomlConfig) -> Self {
        GameConfig {
            frame: Duration::from_millis(t.timing.frame_ms.max(1)),
            rules: RulesConfig {
                start_ticks_per_move: t.rules.start_ticks_per_move,
                min_ticks_per_move: t.rules.min_ticks_per_move,
                score_cap: t.rules.score_cap,
                lives: t.rules.lives,
                spawn_margin: t.rules.spawn_margin,
            },
            gamepad: GamepadConfig {
                confirm: t.gamepad.confirm,
                cancel: t.gamepad.cancel,
            },
            seed: t.general.seed,
            attract_idle: match t.general.attract_idle_secs {
                0 => None,
                s => Some(Duration::from_secs(s)),
            },
            sound: t.general.sound,
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig::from(TomlConfig::default())
    }
}

/// Candidate directories to search: exe dir + CWD + data dirs (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    // 1. Directory of the running executable
    if let Ok(exe) = std::env::current_exe() {
        // Resolve symlinks so an installed link still finds the real binary's dir.
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    // 2. Current working directory
    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    // 3. XDG data home (~/.local/share/trailsiege)
    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share/trailsiege");
        if xdg.is_dir() && !dirs.iter().any(|d| d == &xdg) {
            dirs.push(xdg);
        }
    }

    // 4. System data directory
    let sys = PathBuf::from("/usr/share/trailsiege");
    if sys.is_dir() && !dirs.iter().any(|d| d == &sys) {
        dirs.push(sys);
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

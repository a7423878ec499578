/// Error type shared by the frame sink, config loader and binary.
///
/// Game events (crash, pickup, abort) are not errors and never pass through here.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GameError {
    #[error("terminal I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse error: {0}")]
    Config(#[from] toml::de::Error),
    #[error("invalid rules: {0}")]
    Rules(String),
}

/// Crate-wide error type.
///
/// Nothing in the simulation itself can fail; only the edges that touch the
/// filesystem (leaderboard store, config file) produce errors, and the game
/// degrades gracefully on all of them.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config file {}: {source}", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("leaderboard entry rejected: {0}")]
    Leaderboard(String),
}

pub type Result<T> = std::result::Result<T, GameError>;

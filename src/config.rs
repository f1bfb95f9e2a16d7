/// Runtime configuration loaded from `asteroids.toml`.
///
/// Every field has a compiled default, so the file is optional and may
/// override any subset of keys:
///
/// ```toml
/// width = 1024.0
/// height = 768.0
/// leaderboard_path = "scores.txt"
/// ```

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::entities::Bounds;
use crate::error::{GameError, Result};

pub const DEFAULT_CONFIG_PATH: &str = "asteroids.toml";

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Play-area width in world units.
    pub width: f32,
    /// Play-area height in world units.
    pub height: f32,
    /// Asteroids present at the start of every game.
    pub initial_asteroids: usize,
    /// Seconds between extra asteroid spawns.
    pub spawn_interval: f32,
    pub leaderboard_path: PathBuf,
    pub log_file: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            initial_asteroids: 10,
            spawn_interval: 3.0,
            leaderboard_path: PathBuf::from("leaderboard.txt"),
            log_file: PathBuf::from("asteroids.log"),
        }
    }
}

impl GameConfig {
    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.width, self.height)
    }

    pub fn from_toml(text: &str, path: &Path) -> Result<Self> {
        toml::from_str(text).map_err(|source| GameError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Read `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(text) => Self::from_toml(&text, path),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }
}

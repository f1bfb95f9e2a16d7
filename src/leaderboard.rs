/// Top-ten leaderboard and its plain-text persistence.
///
/// File format: one entry per line, `<name> <score>`. The name is everything
/// before the last space, so three-character names that contain spaces
/// survive a save/load cycle.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::entities::{LEADERBOARD_SIZE, NAME_LENGTH};
use crate::error::{GameError, Result};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub name: String,
    pub score: u32,
}

impl LeaderboardEntry {
    pub fn new(name: impl Into<String>, score: u32) -> Self {
        Self {
            name: name.into(),
            score,
        }
    }
}

/// Where leaderboard entries live between runs.
pub trait ScoreStore {
    fn load(&self) -> Result<Vec<LeaderboardEntry>>;
    fn save(&mut self, entries: &[LeaderboardEntry]) -> Result<()>;
}

/// Entries sorted by descending score, never more than [`LEADERBOARD_SIZE`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Leaderboard {
    entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from entries in any order; they are sorted and truncated.
    pub fn from_entries(mut entries: Vec<LeaderboardEntry>) -> Self {
        sort_and_truncate(&mut entries);
        Self { entries }
    }

    /// Load from `store`. Any failure is logged and yields an empty board.
    pub fn load_from(store: &dyn ScoreStore) -> Self {
        match store.load() {
            Ok(entries) => Self::from_entries(entries),
            Err(e) => {
                warn!("could not read leaderboard, starting empty: {}", e);
                Self::new()
            }
        }
    }

    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert a finished game. Ties keep the older entry first.
    pub fn record(&mut self, name: &str, score: u32) -> Result<()> {
        let len = name.chars().count();
        if len != NAME_LENGTH {
            return Err(GameError::Leaderboard(format!(
                "name {:?} has {} characters, expected {}",
                name, len, NAME_LENGTH
            )));
        }
        self.entries.push(LeaderboardEntry::new(name, score));
        sort_and_truncate(&mut self.entries);
        Ok(())
    }
}

fn sort_and_truncate(entries: &mut Vec<LeaderboardEntry>) {
    // stable: equal scores keep insertion order
    entries.sort_by(|a, b| b.score.cmp(&a.score));
    entries.truncate(LEADERBOARD_SIZE);
}

/// Parse leaderboard text. Parsing stops silently at the first malformed
/// line; everything before it is kept.
pub fn parse_entries(text: &str) -> Vec<LeaderboardEntry> {
    let mut entries = Vec::new();
    for (line_no, line) in text.lines().enumerate() {
        match parse_line(line) {
            Some(entry) => entries.push(entry),
            None => {
                debug!("leaderboard line {} is malformed, ignoring the rest", line_no + 1);
                break;
            }
        }
    }
    entries
}

fn parse_line(line: &str) -> Option<LeaderboardEntry> {
    let (name, score) = line.rsplit_once(' ')?;
    if name.is_empty() {
        return None;
    }
    let score = score.trim_end_matches('\r').parse::<u32>().ok()?;
    Some(LeaderboardEntry::new(name, score))
}

pub fn format_entries(entries: &[LeaderboardEntry]) -> String {
    entries
        .iter()
        .map(|e| format!("{} {}\n", e.name, e.score))
        .collect()
}

// ── Stores ────────────────────────────────────────────────────────────────────

/// Leaderboard kept in a text file, rewritten in full on every save.
#[derive(Clone, Debug)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScoreStore for FileStore {
    fn load(&self) -> Result<Vec<LeaderboardEntry>> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(parse_entries(&text)),
            // No file yet just means nobody has played.
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&mut self, entries: &[LeaderboardEntry]) -> Result<()> {
        fs::write(&self.path, format_entries(entries))?;
        Ok(())
    }
}

/// Store that never touches the disk.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    pub entries: Vec<LeaderboardEntry>,
    pub saves: usize,
}

impl ScoreStore for MemoryStore {
    fn load(&self) -> Result<Vec<LeaderboardEntry>> {
        Ok(self.entries.clone())
    }

    fn save(&mut self, entries: &[LeaderboardEntry]) -> Result<()> {
        self.entries = entries.to_vec();
        self.saves += 1;
        Ok(())
    }
}

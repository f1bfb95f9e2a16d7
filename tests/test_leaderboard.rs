use std::fs;

use asteroids_game::entities::LEADERBOARD_SIZE;
use asteroids_game::error::{GameError, Result};
use asteroids_game::leaderboard::*;

fn entry(name: &str, score: u32) -> LeaderboardEntry {
    LeaderboardEntry::new(name, score)
}

struct BrokenStore;

impl ScoreStore for BrokenStore {
    fn load(&self) -> Result<Vec<LeaderboardEntry>> {
        Err(GameError::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        )))
    }

    fn save(&mut self, _entries: &[LeaderboardEntry]) -> Result<()> {
        Err(GameError::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        )))
    }
}

// ── Leaderboard ───────────────────────────────────────────────────────────────

#[test]
fn record_keeps_descending_order() {
    let mut board = Leaderboard::new();
    board.record("AAA", 100).unwrap();
    board.record("BBB", 300).unwrap();
    board.record("CCC", 200).unwrap();
    let scores: Vec<u32> = board.entries().iter().map(|e| e.score).collect();
    assert_eq!(scores, vec![300, 200, 100]);
}

#[test]
fn record_truncates_to_ten() {
    let mut board = Leaderboard::new();
    for i in 0..15 {
        board.record("ZZZ", i * 10).unwrap();
    }
    assert_eq!(board.len(), LEADERBOARD_SIZE);
    assert_eq!(board.entries()[0].score, 140);
    assert_eq!(board.entries()[9].score, 50);
}

#[test]
fn low_score_falls_off_a_full_board() {
    let entries: Vec<_> = (1..=10).map(|i| entry("TOP", i * 1000)).collect();
    let mut board = Leaderboard::from_entries(entries);
    board.record("LOW", 5).unwrap();
    assert_eq!(board.len(), 10);
    assert!(board.entries().iter().all(|e| e.name != "LOW"));
}

#[test]
fn ties_keep_the_earlier_entry_first() {
    let mut board = Leaderboard::new();
    board.record("OLD", 500).unwrap();
    board.record("NEW", 500).unwrap();
    assert_eq!(board.entries()[0].name, "OLD");
    assert_eq!(board.entries()[1].name, "NEW");
}

#[test]
fn record_rejects_wrong_name_length() {
    let mut board = Leaderboard::new();
    assert!(matches!(board.record("AB", 10), Err(GameError::Leaderboard(_))));
    assert!(matches!(board.record("ABCD", 10), Err(GameError::Leaderboard(_))));
    assert!(board.is_empty());
}

#[test]
fn from_entries_sorts_and_truncates() {
    let entries: Vec<_> = (0..12).map(|i| entry("XYZ", i)).collect();
    let board = Leaderboard::from_entries(entries);
    assert_eq!(board.len(), 10);
    assert_eq!(board.entries()[0].score, 11);
    assert!(board.entries().windows(2).all(|w| w[0].score >= w[1].score));
}

#[test]
fn load_from_broken_store_starts_empty() {
    let board = Leaderboard::load_from(&BrokenStore);
    assert!(board.is_empty());
}

// ── text format ───────────────────────────────────────────────────────────────

#[test]
fn format_is_one_pair_per_line() {
    let text = format_entries(&[entry("ABC", 300), entry("A1 ", 100)]);
    assert_eq!(text, "ABC 300\nA1  100\n");
}

#[test]
fn parse_stops_at_first_malformed_line() {
    let text = "ABC 300\nDEF 200\nthis is not a score\nGHI 100\n";
    assert_eq!(parse_entries(text), vec![entry("ABC", 300), entry("DEF", 200)]);
}

#[test]
fn parse_empty_text() {
    assert!(parse_entries("").is_empty());
}

#[test]
fn text_round_trip_preserves_order_and_names() {
    let entries = vec![entry("A1 ", 900), entry(" Z ", 400), entry("QQQ", 0)];
    assert_eq!(parse_entries(&format_entries(&entries)), entries);
}

// ── FileStore ─────────────────────────────────────────────────────────────────

#[test]
fn missing_file_is_an_empty_leaderboard() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path().join("leaderboard.txt"));
    assert!(store.load().unwrap().is_empty());
}

#[test]
fn file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = FileStore::new(dir.path().join("leaderboard.txt"));
    let entries = vec![entry("BOB", 500), entry("A1 ", 300), entry("EVE", 50)];
    store.save(&entries).unwrap();
    assert_eq!(store.load().unwrap(), entries);
}

#[test]
fn save_rewrites_the_whole_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("leaderboard.txt");
    let mut store = FileStore::new(&path);
    store.save(&[entry("AAA", 1), entry("BBB", 2)]).unwrap();
    store.save(&[entry("CCC", 3)]).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "CCC 3\n");
}

#[test]
fn unreadable_path_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    // a directory cannot be read as a file
    let store = FileStore::new(dir.path());
    assert!(store.load().is_err());
    assert_eq!(store.path(), dir.path());
}

#[test]
fn memory_store_counts_saves() {
    let mut store = MemoryStore::default();
    store.save(&[entry("ABC", 1)]).unwrap();
    store.save(&[entry("ABC", 1), entry("DEF", 0)]).unwrap();
    assert_eq!(store.saves, 2);
    assert_eq!(store.load().unwrap().len(), 2);
}

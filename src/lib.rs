pub mod asteroid;
pub mod config;
pub mod entities;
pub mod error;
pub mod game;
pub mod input;
pub mod laser;
pub mod leaderboard;
pub mod render;
pub mod ship;

pub use error::{GameError, Result};

/// Shared game data types — geometry, game status and tuning constants.
///
/// Everything here is plain data; behaviour lives in `ship`, `asteroid`,
/// `laser` and `game`.

use glam::Vec2;

// ── Ship tuning ───────────────────────────────────────────────────────────────

pub const SHIP_MAX_HP: u32 = 3;
/// Minimum time between two shots, in seconds.
pub const RATE_OF_FIRE: f64 = 0.4;
/// Radians per second.
pub const TURN_SPEED: f32 = 3.0;
/// World units per second squared.
pub const ACCELERATION: f32 = 150.0;
pub const INVINCIBILITY_DURATION: f64 = 2.0;
pub const SHIMMER_DURATION: f64 = 1.0;
pub const FLASH_INTERVAL: f64 = 0.1;
pub const SHIP_HALF_EXTENT: f32 = 15.0;

// ── Asteroids & lasers ────────────────────────────────────────────────────────

pub const LARGE_ASTEROID_HALF_EXTENT: f32 = 32.0;
pub const SMALL_ASTEROID_HALF_EXTENT: f32 = 16.0;
pub const LASER_SPEED: f32 = 500.0;
pub const LASER_HALF_EXTENT: f32 = 2.0;

// ── Game flow ─────────────────────────────────────────────────────────────────

pub const SCORE_PER_HIT: u32 = 100;
pub const NAME_LENGTH: usize = 3;
/// Text input is ignored for this long after entering name entry.
pub const NAME_INPUT_DELAY: f64 = 0.2;
pub const LEADERBOARD_SIZE: usize = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    GameOver,
    NameInput,
    Leaderboard,
}

/// The play area. Ships and asteroids wrap around it, lasers are culled when
/// they leave it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= 0.0 && point.x <= self.width && point.y >= 0.0 && point.y <= self.height
    }

    /// Toroidal wrap: leaving through one edge re-enters through the opposite one.
    pub fn wrap(&self, point: Vec2) -> Vec2 {
        Vec2::new(
            wrap_axis(point.x, self.width),
            wrap_axis(point.y, self.height),
        )
    }
}

fn wrap_axis(value: f32, extent: f32) -> f32 {
    if extent <= 0.0 {
        return value;
    }
    let wrapped = value.rem_euclid(extent);
    // rem_euclid can round up to `extent` for tiny negative inputs
    if wrapped >= extent {
        0.0
    } else {
        wrapped
    }
}

/// Axis-aligned rectangle used for every collision test.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn centered(center: Vec2, half_extent: f32) -> Self {
        let half = Vec2::new(half_extent, half_extent);
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }
}

/// Movement and weapon intents, toggled by key-down / key-up events.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KeyStatus {
    pub thrust: bool,
    pub left: bool,
    pub right: bool,
    pub fire: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_moves_point_to_opposite_edge() {
        let b = Bounds::new(100.0, 50.0);
        assert_eq!(b.wrap(Vec2::new(101.0, -1.0)), Vec2::new(1.0, 49.0));
        assert_eq!(b.wrap(Vec2::new(30.0, 20.0)), Vec2::new(30.0, 20.0));
    }

    #[test]
    fn wrap_never_returns_extent() {
        let b = Bounds::new(100.0, 50.0);
        let p = b.wrap(Vec2::new(-1e-9, -1e-9));
        assert!(p.x < 100.0 && p.y < 50.0);
    }

    #[test]
    fn touching_rects_do_not_intersect() {
        let a = Rect::centered(Vec2::new(0.0, 0.0), 1.0);
        let b = Rect::centered(Vec2::new(2.0, 0.0), 1.0);
        let c = Rect::centered(Vec2::new(1.5, 0.5), 1.0);
        assert!(!a.intersects(&b));
        assert!(a.intersects(&c));
        assert!(c.intersects(&a));
    }
}

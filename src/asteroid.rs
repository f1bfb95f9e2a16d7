/// The asteroid field: spawning, drifting, hit tests and splitting.
///
/// Randomness always comes through an injected `Rng` so callers (and tests)
/// control determinism.

use std::f32::consts::TAU;

use glam::Vec2;
use log::debug;
use rand::Rng;

use crate::entities::{
    Bounds, Rect, LARGE_ASTEROID_HALF_EXTENT, SMALL_ASTEROID_HALF_EXTENT,
};
use crate::render::{Renderable, Visual};

const MIN_SPEED: f32 = 20.0;
const MAX_SPEED: f32 = 80.0;
/// Radians per second, either direction.
const MAX_SPIN: f32 = 1.5;
/// Fragments leave at this angle (radians) either side of the parent's heading.
const SPLIT_ANGLE_MIN: f32 = 0.35;
const SPLIT_ANGLE_MAX: f32 = 0.87;
const SPLIT_SPEEDUP_MIN: f32 = 1.0;
const SPLIT_SPEEDUP_MAX: f32 = 1.5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AsteroidSize {
    Large,
    /// Terminal tier; destroyed outright when hit.
    Small,
}

impl AsteroidSize {
    pub fn half_extent(self) -> f32 {
        match self {
            AsteroidSize::Large => LARGE_ASTEROID_HALF_EXTENT,
            AsteroidSize::Small => SMALL_ASTEROID_HALF_EXTENT,
        }
    }

    pub fn split_into(self) -> Option<AsteroidSize> {
        match self {
            AsteroidSize::Large => Some(AsteroidSize::Small),
            AsteroidSize::Small => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Asteroid {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Current rotation in radians.
    pub rotation: f32,
    /// Radians per second.
    pub spin: f32,
    pub size: AsteroidSize,
}

impl Asteroid {
    pub fn new(position: Vec2, velocity: Vec2, size: AsteroidSize) -> Self {
        Self {
            position,
            velocity,
            rotation: 0.0,
            spin: 0.0,
            size,
        }
    }

    pub fn is_small(&self) -> bool {
        self.size == AsteroidSize::Small
    }

    pub fn bounds(&self) -> Rect {
        Rect::centered(self.position, self.size.half_extent())
    }

    pub fn is_hit_by_laser(&self, laser_bounds: &Rect) -> bool {
        self.bounds().intersects(laser_bounds)
    }

    pub fn update(&mut self, dt: f32, bounds: &Bounds) {
        self.position = bounds.wrap(self.position + self.velocity * dt);
        self.rotation = (self.rotation + self.spin * dt).rem_euclid(TAU);
    }
}

impl Renderable for Asteroid {
    fn visual(&self) -> Option<Visual> {
        Some(Visual::Asteroid {
            position: self.position,
            rotation: self.rotation,
            small: self.is_small(),
        })
    }
}

fn random_velocity(rng: &mut impl Rng) -> Vec2 {
    // Speed is drawn from a range that excludes zero, so no asteroid is ever
    // spawned at rest.
    let angle = rng.gen_range(0.0..TAU);
    let speed = rng.gen_range(MIN_SPEED..MAX_SPEED);
    Vec2::new(angle.cos(), angle.sin()) * speed
}

fn rotate(v: Vec2, angle: f32) -> Vec2 {
    let (sin, cos) = angle.sin_cos();
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// Append `count` large asteroids at random positions inside `bounds`.
pub fn initialize_asteroids(
    asteroids: &mut Vec<Asteroid>,
    bounds: &Bounds,
    count: usize,
    rng: &mut impl Rng,
) {
    for _ in 0..count {
        let position = Vec2::new(
            rng.gen_range(0.0..bounds.width.max(f32::EPSILON)),
            rng.gen_range(0.0..bounds.height.max(f32::EPSILON)),
        );
        let mut asteroid = Asteroid::new(position, random_velocity(rng), AsteroidSize::Large);
        asteroid.rotation = rng.gen_range(0.0..TAU);
        asteroid.spin = rng.gen_range(-MAX_SPIN..MAX_SPIN);
        asteroids.push(asteroid);
    }
    debug!("spawned {} asteroid(s), field now {}", count, asteroids.len());
}

/// Advance every asteroid by `dt`, wrapping at the play-area edges.
pub fn update_asteroids(asteroids: &mut [Asteroid], dt: f32, bounds: &Bounds) {
    for asteroid in asteroids.iter_mut() {
        asteroid.update(dt, bounds);
    }
}

/// Fragments produced by destroying `asteroid`: two of the next tier down for
/// a large one, none for a small one.
///
/// Each fragment's velocity is the parent's rotated away from its heading
/// (one to each side) and sped up a little, so the pair always diverges.
pub fn break_apart(asteroid: &Asteroid, rng: &mut impl Rng) -> Vec<Asteroid> {
    let Some(child_size) = asteroid.size.split_into() else {
        return Vec::new();
    };

    // A parent at rest still has to throw its fragments apart.
    let base = if asteroid.velocity.length_squared() > f32::EPSILON {
        asteroid.velocity
    } else {
        random_velocity(rng)
    };

    [1.0_f32, -1.0]
        .iter()
        .map(|side| {
            let angle = side * rng.gen_range(SPLIT_ANGLE_MIN..SPLIT_ANGLE_MAX);
            let speedup = rng.gen_range(SPLIT_SPEEDUP_MIN..SPLIT_SPEEDUP_MAX);
            let mut child =
                Asteroid::new(asteroid.position, rotate(base, angle) * speedup, child_size);
            child.rotation = asteroid.rotation;
            child.spin = -asteroid.spin + side * rng.gen_range(0.0..MAX_SPIN);
            child
        })
        .collect()
}

/// Rebuild the field after a collision scan: every asteroid whose index is in
/// `hit` is replaced in place by its fragments, everything else is kept in
/// order.
pub fn resolve_hits(asteroids: &mut Vec<Asteroid>, hit: &[bool], rng: &mut impl Rng) {
    if !hit.iter().any(|&h| h) {
        return;
    }
    let previous = std::mem::take(asteroids);
    for (i, asteroid) in previous.into_iter().enumerate() {
        if hit.get(i).copied().unwrap_or(false) {
            asteroids.extend(break_apart(&asteroid, rng));
        } else {
            asteroids.push(asteroid);
        }
    }
}

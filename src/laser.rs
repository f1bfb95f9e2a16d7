use glam::Vec2;

use crate::entities::{Bounds, Rect, LASER_HALF_EXTENT, LASER_SPEED};
use crate::render::{Renderable, Visual};

/// A projectile fired by the ship. Travels in a straight line at a fixed
/// speed and never wraps.
#[derive(Clone, Debug, PartialEq)]
pub struct Laser {
    pub position: Vec2,
    pub velocity: Vec2,
}

impl Laser {
    /// `direction` is expected to be a unit vector.
    pub fn new(position: Vec2, direction: Vec2) -> Self {
        Self {
            position,
            velocity: direction * LASER_SPEED,
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.position += self.velocity * dt;
    }

    pub fn is_outside(&self, bounds: &Bounds) -> bool {
        !bounds.contains(self.position)
    }

    pub fn bounds(&self) -> Rect {
        Rect::centered(self.position, LASER_HALF_EXTENT)
    }
}

impl Renderable for Laser {
    fn visual(&self) -> Option<Visual> {
        Some(Visual::Laser {
            position: self.position,
        })
    }
}

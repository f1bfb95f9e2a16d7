/// The player's ship: movement, weapon cooldown, hit points and the
/// post-hit invincibility window.
///
/// All timing is expressed against the game clock (`now`, in seconds) that
/// the controller samples once per frame.

use glam::Vec2;

use crate::asteroid::Asteroid;
use crate::entities::{
    Bounds, KeyStatus, Rect, ACCELERATION, FLASH_INTERVAL, INVINCIBILITY_DURATION, RATE_OF_FIRE,
    SHIMMER_DURATION, SHIP_HALF_EXTENT, SHIP_MAX_HP, TURN_SPEED,
};
use crate::input::{InputEvent, Key};
use crate::laser::Laser;
use crate::render::{Renderable, Visual};

/// Ships start pointing "up" the screen.
fn initial_heading() -> Vec2 {
    Vec2::new(0.0, -1.0)
}

#[derive(Clone, Debug)]
pub struct Ship {
    pub position: Vec2,
    /// Unit vector.
    pub heading: Vec2,
    /// Scalar speed along `heading`.
    pub velocity: f32,
    pub keys: KeyStatus,
    hp: u32,
    invincible: bool,
    invincible_since: f64,
    last_flash: f64,
    flash_visible: bool,
    /// `None` until the first shot, so the very first fire is never blocked.
    last_shot: Option<f64>,
}

impl Ship {
    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            heading: initial_heading(),
            velocity: 0.0,
            keys: KeyStatus::default(),
            hp: SHIP_MAX_HP,
            invincible: false,
            invincible_since: 0.0,
            last_flash: 0.0,
            flash_visible: true,
            last_shot: None,
        }
    }

    /// Toggle intent flags from discrete key events. Other events are ignored.
    pub fn handle_input(&mut self, event: &InputEvent) {
        let (key, pressed) = match *event {
            InputEvent::KeyDown(key) => (key, true),
            InputEvent::KeyUp(key) => (key, false),
            _ => return,
        };
        match key {
            Key::Left => self.keys.left = pressed,
            Key::Right => self.keys.right = pressed,
            Key::Up => self.keys.thrust = pressed,
            Key::Space => self.keys.fire = pressed,
            _ => {}
        }
    }

    /// Integrate motion over `dt` and fire if the weapon is ready. New lasers
    /// are appended to `lasers`.
    pub fn update(&mut self, lasers: &mut Vec<Laser>, dt: f32, now: f64, bounds: &Bounds) {
        let mut turn = 0.0_f32;
        if self.keys.left {
            turn -= TURN_SPEED * dt;
        }
        if self.keys.right {
            turn += TURN_SPEED * dt;
        }
        if turn != 0.0 {
            let (sin, cos) = turn.sin_cos();
            let h = self.heading;
            self.heading = Vec2::new(h.x * cos - h.y * sin, h.x * sin + h.y * cos).normalize();
        }

        if self.keys.thrust {
            self.velocity += ACCELERATION * dt;
        }

        self.position = bounds.wrap(self.position + self.heading * self.velocity * dt);

        if self.keys.fire && self.weapon_ready(now) {
            lasers.push(Laser::new(self.nose_position(), self.heading));
            self.last_shot = Some(now);
        }
    }

    fn weapon_ready(&self, now: f64) -> bool {
        self.last_shot
            .map(|t| now - t >= RATE_OF_FIRE)
            .unwrap_or(true)
    }

    pub fn nose_position(&self) -> Vec2 {
        self.position + self.heading * SHIP_HALF_EXTENT
    }

    pub fn bounds(&self) -> Rect {
        Rect::centered(self.position, SHIP_HALF_EXTENT)
    }

    pub fn check_collision(&self, asteroid: &Asteroid) -> bool {
        self.bounds().intersects(&asteroid.bounds())
    }

    /// Lose one hit point and start the invincibility window. Absorbed
    /// without effect while already invincible or dead.
    pub fn take_damage(&mut self, now: f64) {
        if self.hp > 0 && !self.invincible {
            self.hp -= 1;
            self.invincible = true;
            self.invincible_since = now;
            self.last_flash = now;
        }
    }

    pub fn update_invincibility(&mut self, now: f64) {
        if !self.invincible {
            return;
        }
        let elapsed = now - self.invincible_since;
        if elapsed >= INVINCIBILITY_DURATION {
            self.invincible = false;
            self.flash_visible = true;
        } else if elapsed < SHIMMER_DURATION && now - self.last_flash >= FLASH_INTERVAL {
            self.flash_visible = !self.flash_visible;
            self.last_flash = now;
        } else if elapsed >= SHIMMER_DURATION {
            // grace period: still immune, no more flashing
            self.flash_visible = true;
        }
    }

    pub fn reset_health(&mut self) {
        self.hp = SHIP_MAX_HP;
        self.invincible = false;
        self.flash_visible = true;
    }

    /// Put the ship back at `position` at rest, facing up, with no held keys.
    /// Health is left alone; see [`Ship::reset_health`].
    pub fn reset(&mut self, position: Vec2) {
        self.position = position;
        self.heading = initial_heading();
        self.velocity = 0.0;
        self.keys = KeyStatus::default();
        self.last_shot = None;
    }

    pub fn hp(&self) -> u32 {
        self.hp
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    pub fn is_invincible(&self) -> bool {
        self.invincible
    }

    pub fn can_take_damage(&self) -> bool {
        !self.invincible
    }

    pub fn should_draw(&self) -> bool {
        !self.invincible || self.flash_visible
    }
}

impl Renderable for Ship {
    fn visual(&self) -> Option<Visual> {
        if !self.is_alive() || !self.should_draw() {
            return None;
        }
        Some(Visual::Ship {
            position: self.position,
            heading: self.heading,
        })
    }
}

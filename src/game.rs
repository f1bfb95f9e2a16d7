/// Game controller: owns every entity and runs the per-frame loop and the
/// PLAYING → GAME_OVER → NAME_INPUT → LEADERBOARD state machine.
///
/// Time is a single game clock advanced once per frame by the measured
/// delta, so every timer (weapon cooldown, invincibility, name-entry delay)
/// is reproducible in tests without sleeping. All randomness comes through an
/// injected `Rng`.

use log::{debug, info, warn};
use rand::Rng;

use crate::asteroid::{self, Asteroid};
use crate::config::GameConfig;
use crate::entities::{Bounds, GameStatus, NAME_INPUT_DELAY, NAME_LENGTH, SCORE_PER_HIT};
use crate::input::{InputEvent, Key};
use crate::laser::Laser;
use crate::leaderboard::{Leaderboard, ScoreStore};
use crate::render::{Renderable, Renderer, Visual};
use crate::ship::Ship;

pub struct Game<S: ScoreStore> {
    pub status: GameStatus,
    pub score: u32,
    pub ship: Ship,
    pub asteroids: Vec<Asteroid>,
    pub lasers: Vec<Laser>,
    pub player_name: String,
    leaderboard: Leaderboard,
    store: S,
    bounds: Bounds,
    initial_asteroids: usize,
    spawn_interval: f32,
    spawn_timer: f32,
    /// Seconds since the game was created.
    clock: f64,
    name_input_opens_at: f64,
    quit_requested: bool,
}

/// Characters allowed in a leaderboard name.
pub fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == ' '
}

impl<S: ScoreStore> Game<S> {
    /// Load the leaderboard from `store` and set up the first round.
    pub fn new(config: &GameConfig, store: S, rng: &mut impl Rng) -> Self {
        let bounds = config.bounds();
        let leaderboard = Leaderboard::load_from(&store);
        info!("leaderboard loaded with {} entries", leaderboard.len());

        let mut asteroids = Vec::new();
        asteroid::initialize_asteroids(&mut asteroids, &bounds, config.initial_asteroids, rng);

        Self {
            status: GameStatus::Playing,
            score: 0,
            ship: Ship::new(bounds.center()),
            asteroids,
            lasers: Vec::new(),
            player_name: String::new(),
            leaderboard,
            store,
            bounds,
            initial_asteroids: config.initial_asteroids,
            spawn_interval: config.spawn_interval,
            spawn_timer: 0.0,
            clock: 0.0,
            name_input_opens_at: 0.0,
            quit_requested: false,
        }
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn clock(&self) -> f64 {
        self.clock
    }

    pub fn leaderboard(&self) -> &Leaderboard {
        &self.leaderboard
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    // ── Frame ─────────────────────────────────────────────────────────────────

    /// Run one frame: advance the clock by `dt`, dispatch `events` to the
    /// active state's handler, then simulate if still playing.
    pub fn frame<I>(&mut self, events: I, dt: f32, rng: &mut impl Rng)
    where
        I: IntoIterator<Item = InputEvent>,
    {
        self.clock += f64::from(dt);
        for event in events {
            self.handle_event(&event, rng);
        }
        if self.status == GameStatus::Playing {
            self.simulate(dt, rng);
        }
    }

    /// Drain the renderer's event queue, run a frame and draw it.
    pub fn run_frame<R: Renderer>(&mut self, renderer: &mut R, dt: f32, rng: &mut impl Rng) {
        let events: Vec<InputEvent> = std::iter::from_fn(|| renderer.poll_event()).collect();
        self.frame(events, dt, rng);
        if self.quit_requested && !renderer.is_closed() {
            renderer.request_close();
        }
        renderer.begin_frame();
        self.render(renderer);
        renderer.end_frame();
    }

    pub fn handle_event(&mut self, event: &InputEvent, rng: &mut impl Rng) {
        if matches!(event, InputEvent::Close | InputEvent::KeyDown(Key::Escape)) {
            info!("quit requested");
            self.quit_requested = true;
            return;
        }
        match self.status {
            GameStatus::Playing => self.ship.handle_input(event),
            GameStatus::GameOver => self.handle_game_over_input(event),
            GameStatus::NameInput => self.handle_name_input(event),
            GameStatus::Leaderboard => self.handle_leaderboard_input(event, rng),
        }
    }

    fn simulate(&mut self, dt: f32, rng: &mut impl Rng) {
        let bounds = self.bounds;

        self.ship.update(&mut self.lasers, dt, self.clock, &bounds);
        self.ship.update_invincibility(self.clock);

        // Ship ↔ asteroids
        let mut hit = vec![false; self.asteroids.len()];
        for (i, asteroid) in self.asteroids.iter().enumerate() {
            if self.ship.check_collision(asteroid) && self.ship.can_take_damage() {
                self.ship.take_damage(self.clock);
                info!("player hit, HP remaining: {}", self.ship.hp());
                hit[i] = true;
                if !self.ship.is_alive() {
                    break;
                }
            }
        }
        asteroid::resolve_hits(&mut self.asteroids, &hit, rng);

        if !self.ship.is_alive() {
            info!("game over, final score {}", self.score);
            self.status = GameStatus::GameOver;
            return;
        }

        self.spawn_timer += dt;
        if self.spawn_timer >= self.spawn_interval {
            asteroid::initialize_asteroids(&mut self.asteroids, &bounds, 1, rng);
            self.spawn_timer = 0.0;
        }

        asteroid::update_asteroids(&mut self.asteroids, dt, &bounds);
        for laser in self.lasers.iter_mut() {
            laser.update(dt);
        }

        // Lasers ↔ asteroids: each asteroid takes at most one laser per frame
        // and each laser destroys at most one asteroid.
        let mut hit = vec![false; self.asteroids.len()];
        let mut consumed = vec![false; self.lasers.len()];
        for (i, asteroid) in self.asteroids.iter().enumerate() {
            let struck = (0..self.lasers.len())
                .find(|&j| !consumed[j] && asteroid.is_hit_by_laser(&self.lasers[j].bounds()));
            if let Some(j) = struck {
                hit[i] = true;
                consumed[j] = true;
                self.score = self.score.saturating_add(SCORE_PER_HIT);
                debug!("asteroid {} destroyed by laser {}, score {}", i, j, self.score);
            }
        }
        asteroid::resolve_hits(&mut self.asteroids, &hit, rng);
        let mut index = 0;
        self.lasers.retain(|_| {
            let keep = !consumed[index];
            index += 1;
            keep
        });

        self.lasers.retain(|laser| !laser.is_outside(&bounds));
    }

    // ── State handlers ────────────────────────────────────────────────────────

    fn handle_game_over_input(&mut self, event: &InputEvent) {
        if *event == InputEvent::KeyDown(Key::Space) {
            self.status = GameStatus::NameInput;
            self.player_name.clear();
            self.name_input_opens_at = self.clock + NAME_INPUT_DELAY;
            debug!("name entry opens at t={:.2}", self.name_input_opens_at);
        }
    }

    fn handle_name_input(&mut self, event: &InputEvent) {
        match *event {
            InputEvent::Text(c) if self.clock > self.name_input_opens_at => {
                if self.player_name.chars().count() < NAME_LENGTH && is_name_char(c) {
                    self.player_name.push(c);
                }
            }
            InputEvent::KeyDown(Key::Backspace) => {
                self.player_name.pop();
            }
            InputEvent::KeyDown(Key::Enter)
                if self.player_name.chars().count() == NAME_LENGTH =>
            {
                self.save_score();
                self.status = GameStatus::Leaderboard;
            }
            _ => {}
        }
    }

    fn handle_leaderboard_input(&mut self, event: &InputEvent, rng: &mut impl Rng) {
        if let InputEvent::KeyDown(key) = event {
            if key.is_letter('r') {
                self.reset(rng);
            } else if key.is_letter('q') {
                info!("quit from leaderboard");
                self.quit_requested = true;
            }
        }
    }

    /// Record the finished game and persist the board. A failed write is
    /// logged; the in-memory board is still updated.
    pub fn save_score(&mut self) {
        if let Err(e) = self.leaderboard.record(&self.player_name, self.score) {
            warn!("{}", e);
            return;
        }
        info!("saved score {} for {:?}", self.score, self.player_name);
        if let Err(e) = self.store.save(self.leaderboard.entries()) {
            warn!("could not write leaderboard: {}", e);
        }
    }

    /// Start a fresh round.
    pub fn reset(&mut self, rng: &mut impl Rng) {
        self.score = 0;
        self.status = GameStatus::Playing;
        self.player_name.clear();

        self.ship.reset(self.bounds.center());
        self.ship.reset_health();

        self.asteroids.clear();
        self.lasers.clear();
        asteroid::initialize_asteroids(&mut self.asteroids, &self.bounds, self.initial_asteroids, rng);

        self.spawn_timer = 0.0;
        info!("new game started");
    }

    // ── Rendering ─────────────────────────────────────────────────────────────

    pub fn render<R: Renderer + ?Sized>(&self, renderer: &mut R) {
        match self.status {
            GameStatus::Playing => {
                for asteroid in &self.asteroids {
                    draw(renderer, asteroid);
                }
                draw(renderer, &self.ship);
                for laser in &self.lasers {
                    draw(renderer, laser);
                }
                renderer.draw(&Visual::Hud {
                    score: self.score,
                    hp: self.ship.hp(),
                });
            }
            GameStatus::GameOver => renderer.draw(&Visual::GameOver { score: self.score }),
            GameStatus::NameInput => renderer.draw(&Visual::NameInput {
                name: self.player_name.clone(),
            }),
            GameStatus::Leaderboard => renderer.draw(&Visual::Leaderboard {
                entries: self.leaderboard.entries().to_vec(),
            }),
        }
    }
}

fn draw<R: Renderer + ?Sized>(renderer: &mut R, item: &dyn Renderable) {
    if let Some(visual) = item.visual() {
        renderer.draw(&visual);
    }
}

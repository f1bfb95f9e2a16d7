/// Terminal backend — all crossterm I/O lives here.
///
/// `TerminalRenderer` implements the game's `Renderer` trait: it scales world
/// coordinates onto the character grid, draws each `Visual`, and turns raw
/// crossterm events into the game's `InputEvent`s.

use std::collections::{HashMap, VecDeque};
use std::io::Write;
use std::sync::mpsc::{self, TryRecvError};

use crossterm::{
    cursor,
    event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    style::{self, Color, Print},
    terminal, QueueableCommand,
};
use glam::Vec2;
use log::{error, warn};

use asteroids_game::entities::{Bounds, NAME_LENGTH, SHIP_MAX_HP};
use asteroids_game::input::{InputEvent, Key};
use asteroids_game::leaderboard::LeaderboardEntry;
use asteroids_game::render::{Renderer, Visual};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_HP: Color = Color::Red;
const C_SHIP: Color = Color::White;
const C_ASTEROID_LARGE: Color = Color::Grey;
const C_ASTEROID_SMALL: Color = Color::DarkYellow;
const C_LASER: Color = Color::Cyan;
const C_HINT: Color = Color::DarkGrey;

/// A key counts as held if it was seen within this many frames. Classic
/// terminals never report key releases, only OS auto-repeat presses (≥ 15 Hz),
/// which a 4-frame window at ~30 FPS bridges once repeating has started. The
/// initial repeat delay (typically 250-600 ms) is longer than the window, so a
/// freshly held key still produces one spurious `KeyUp` followed by a new
/// `KeyDown` when the repeats begin.
const HOLD_WINDOW: u64 = 4;

/// Ship glyphs indexed by heading octant, starting east and turning clockwise
/// (screen y points down).
const SHIP_GLYPHS: [&str; 8] = ["→", "↘", "↓", "↙", "←", "↖", "↑", "↗"];
const LARGE_ASTEROID_GLYPHS: [&str; 4] = ["◴", "◷", "◶", "◵"];
const SMALL_ASTEROID_GLYPH: &str = "•";
const LASER_GLYPH: &str = "∙";

pub struct TerminalRenderer<W: Write> {
    out: W,
    rx: mpsc::Receiver<Event>,
    world: Bounds,
    width: u16,
    height: u16,
    keyboard_enhanced: bool,
    /// Each held key → the frame it was last pressed or repeated.
    key_frame: HashMap<Key, u64>,
    pending: VecDeque<InputEvent>,
    drained: bool,
    frame: u64,
    closed: bool,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(
        out: W,
        rx: mpsc::Receiver<Event>,
        world: Bounds,
        (width, height): (u16, u16),
        keyboard_enhanced: bool,
    ) -> Self {
        Self {
            out,
            rx,
            world,
            width,
            height,
            keyboard_enhanced,
            key_frame: HashMap::new(),
            pending: VecDeque::new(),
            drained: false,
            frame: 0,
            closed: false,
        }
    }

    /// Remember the first I/O failure and shut the loop down; a terminal we
    /// cannot write to is not worth continuing with.
    fn check(&mut self, result: std::io::Result<()>) {
        if let Err(e) = result {
            error!("terminal write failed: {}", e);
            self.closed = true;
        }
    }

    // ── Input ─────────────────────────────────────────────────────────────────

    fn drain_events(&mut self) {
        loop {
            match self.rx.try_recv() {
                Ok(event) => self.translate(event),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    warn!("input reader stopped");
                    self.pending.push_back(InputEvent::Close);
                    break;
                }
            }
        }

        if !self.keyboard_enhanced {
            let frame = self.frame;
            let expired: Vec<Key> = self
                .key_frame
                .iter()
                .filter(|(_, last)| frame.saturating_sub(**last) > HOLD_WINDOW)
                .map(|(key, _)| *key)
                .collect();
            for key in expired {
                self.key_frame.remove(&key);
                self.pending.push_back(InputEvent::KeyUp(key));
            }
        }
    }

    fn translate(&mut self, event: Event) {
        match event {
            Event::Key(KeyEvent {
                code,
                kind,
                modifiers,
                ..
            }) => {
                if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
                    self.pending.push_back(InputEvent::Close);
                    return;
                }
                let Some(key) = map_key(code) else {
                    return;
                };
                match kind {
                    KeyEventKind::Press | KeyEventKind::Repeat => {
                        self.key_frame.insert(key, self.frame);
                        self.pending.push_back(InputEvent::KeyDown(key));
                        if let KeyCode::Char(c) = code {
                            if !c.is_control() {
                                self.pending.push_back(InputEvent::Text(c));
                            }
                        }
                    }
                    KeyEventKind::Release => {
                        self.key_frame.remove(&key);
                        self.pending.push_back(InputEvent::KeyUp(key));
                    }
                }
            }
            Event::Resize(width, height) => {
                self.width = width;
                self.height = height;
            }
            _ => {}
        }
    }

    // ── Geometry ──────────────────────────────────────────────────────────────

    /// World position → terminal cell inside the border.
    fn to_cell(&self, p: Vec2) -> (u16, u16) {
        let cols = self.width.saturating_sub(2).max(1) as f32;
        let rows = self.height.saturating_sub(4).max(1) as f32;
        let x = (p.x / self.world.width * cols).clamp(0.0, cols - 1.0);
        let y = (p.y / self.world.height * rows).clamp(0.0, rows - 1.0);
        (1 + x as u16, 2 + y as u16)
    }

    fn centered_lines(&mut self, lines: &[(String, Color)]) -> std::io::Result<()> {
        let cx = self.width / 2;
        let start_row = (self.height / 2).saturating_sub(lines.len() as u16 / 2);
        for (i, (msg, color)) in lines.iter().enumerate() {
            let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
            self.out.queue(cursor::MoveTo(col, start_row + i as u16))?;
            self.out.queue(style::SetForegroundColor(*color))?;
            self.out.queue(Print(msg))?;
        }
        Ok(())
    }

    // ── Visuals ───────────────────────────────────────────────────────────────

    fn draw_visual(&mut self, visual: &Visual) -> std::io::Result<()> {
        match visual {
            Visual::Ship { position, heading } => {
                let (x, y) = self.to_cell(*position);
                self.glyph(x, y, C_SHIP, ship_glyph(*heading))
            }
            Visual::Asteroid {
                position,
                rotation,
                small,
            } => {
                let (x, y) = self.to_cell(*position);
                if *small {
                    self.glyph(x, y, C_ASTEROID_SMALL, SMALL_ASTEROID_GLYPH)
                } else {
                    self.glyph(x, y, C_ASTEROID_LARGE, asteroid_glyph(*rotation))
                }
            }
            Visual::Laser { position } => {
                let (x, y) = self.to_cell(*position);
                self.glyph(x, y, C_LASER, LASER_GLYPH)
            }
            Visual::Hud { score, hp } => self.draw_hud(*score, *hp),
            Visual::GameOver { score } => self.draw_game_over(*score),
            Visual::NameInput { name } => self.draw_name_input(name),
            Visual::Leaderboard { entries } => self.draw_leaderboard(entries),
        }
    }

    fn glyph(&mut self, x: u16, y: u16, color: Color, glyph: &str) -> std::io::Result<()> {
        self.out.queue(cursor::MoveTo(x, y))?;
        self.out.queue(style::SetForegroundColor(color))?;
        self.out.queue(Print(glyph))?;
        Ok(())
    }

    fn draw_border(&mut self) -> std::io::Result<()> {
        let w = self.width as usize;
        let h = self.height;

        self.out.queue(style::SetForegroundColor(C_BORDER))?;

        self.out.queue(cursor::MoveTo(0, 1))?;
        self.out
            .queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

        self.out.queue(cursor::MoveTo(0, h.saturating_sub(2)))?;
        self.out
            .queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

        for row in 2..h.saturating_sub(2) {
            self.out.queue(cursor::MoveTo(0, row))?;
            self.out.queue(Print("│"))?;
            self.out.queue(cursor::MoveTo(self.width.saturating_sub(1), row))?;
            self.out.queue(Print("│"))?;
        }
        Ok(())
    }

    fn draw_hud(&mut self, score: u32, hp: u32) -> std::io::Result<()> {
        self.out.queue(cursor::MoveTo(1, 0))?;
        self.out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
        self.out.queue(Print(format!("SCORE: {:>8}", score)))?;

        let lost = SHIP_MAX_HP.saturating_sub(hp) as usize;
        let hp_text = format!("HP: {}{}", "♥".repeat(hp as usize), "♡".repeat(lost));
        let rx = self
            .width
            .saturating_sub(hp_text.chars().count() as u16 + 1);
        self.out.queue(cursor::MoveTo(rx, 0))?;
        self.out.queue(style::SetForegroundColor(C_HUD_HP))?;
        self.out.queue(Print(&hp_text))?;

        self.out.queue(cursor::MoveTo(1, self.height.saturating_sub(1)))?;
        self.out.queue(style::SetForegroundColor(C_HINT))?;
        self.out
            .queue(Print("← → / A D : Turn   ↑ / W : Thrust   SPACE : Fire   ESC : Quit"))?;
        Ok(())
    }

    fn draw_game_over(&mut self, score: u32) -> std::io::Result<()> {
        let lines = [
            ("╔══════════════════╗".to_string(), Color::Red),
            ("║    GAME  OVER    ║".to_string(), Color::Red),
            ("╚══════════════════╝".to_string(), Color::Red),
            (format!("Final Score: {}", score), Color::Yellow),
            ("Press SPACE to continue".to_string(), Color::White),
        ];
        self.centered_lines(&lines)
    }

    fn draw_name_input(&mut self, name: &str) -> std::io::Result<()> {
        let missing = NAME_LENGTH.saturating_sub(name.chars().count());
        let lines = [
            (format!("Enter name: {}{}", name, "_".repeat(missing)), Color::White),
            (String::new(), Color::White),
            ("ENTER : Save   BACKSPACE : Delete".to_string(), C_HINT),
        ];
        self.centered_lines(&lines)
    }

    fn draw_leaderboard(&mut self, entries: &[LeaderboardEntry]) -> std::io::Result<()> {
        let mut lines = vec![
            ("LEADERBOARD".to_string(), Color::Cyan),
            (String::new(), Color::White),
        ];
        for (i, entry) in entries.iter().enumerate() {
            lines.push((
                format!("{:>2}. {} - {:>7}", i + 1, entry.name, entry.score),
                Color::White,
            ));
        }
        lines.push((String::new(), Color::White));
        lines.push(("Press R to restart, Q to quit".to_string(), C_HINT));
        self.centered_lines(&lines)
    }
}

fn map_key(code: KeyCode) -> Option<Key> {
    let key = match code {
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Key::Left,
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Key::Right,
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Key::Up,
        KeyCode::Char(' ') => Key::Space,
        KeyCode::Enter => Key::Enter,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Esc => Key::Escape,
        KeyCode::Char(c) => Key::Char(c),
        _ => return None,
    };
    Some(key)
}

fn ship_glyph(heading: Vec2) -> &'static str {
    let octant = (heading.y.atan2(heading.x) / std::f32::consts::FRAC_PI_4).round() as i32;
    SHIP_GLYPHS[octant.rem_euclid(8) as usize]
}

fn asteroid_glyph(rotation: f32) -> &'static str {
    let quarter = (rotation / std::f32::consts::FRAC_PI_2).floor() as i32;
    LARGE_ASTEROID_GLYPHS[quarter.rem_euclid(4) as usize]
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn begin_frame(&mut self) {
        self.frame += 1;
        self.drained = false;
        let result = self
            .out
            .queue(terminal::Clear(terminal::ClearType::All))
            .map(|_| ());
        self.check(result);
    }

    fn end_frame(&mut self) {
        let result = self.draw_border().and_then(|_| {
            // Park cursor in a harmless spot and flush
            self.out.queue(style::ResetColor)?;
            self.out
                .queue(cursor::MoveTo(0, self.height.saturating_sub(1)))?;
            self.out.flush()
        });
        self.check(result);
    }

    fn draw(&mut self, visual: &Visual) {
        let result = self.draw_visual(visual);
        self.check(result);
    }

    fn window_size(&self) -> Bounds {
        self.world
    }

    fn is_closed(&self) -> bool {
        self.closed
    }

    fn request_close(&mut self) {
        self.closed = true;
    }

    fn poll_event(&mut self) -> Option<InputEvent> {
        if !self.drained {
            self.drained = true;
            self.drain_events();
        }
        self.pending.pop_front()
    }
}

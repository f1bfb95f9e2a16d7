/// Rendering collaborator interface.
///
/// The core never touches the screen. Each frame it hands the renderer a
/// list of [`Visual`] descriptions; the renderer also owns the event queue and
/// the window lifecycle.

use glam::Vec2;

use crate::entities::Bounds;
use crate::input::InputEvent;
use crate::leaderboard::LeaderboardEntry;

#[derive(Clone, Debug, PartialEq)]
pub enum Visual {
    Ship {
        position: Vec2,
        heading: Vec2,
    },
    Asteroid {
        position: Vec2,
        rotation: f32,
        small: bool,
    },
    Laser {
        position: Vec2,
    },
    Hud {
        score: u32,
        hp: u32,
    },
    GameOver {
        score: u32,
    },
    NameInput {
        name: String,
    },
    Leaderboard {
        entries: Vec<LeaderboardEntry>,
    },
}

/// Anything that can describe itself to a renderer. `None` means "draw
/// nothing this frame" (e.g. a flashing ship in its off phase).
pub trait Renderable {
    fn visual(&self) -> Option<Visual>;
}

pub trait Renderer {
    fn begin_frame(&mut self);
    fn end_frame(&mut self);
    fn draw(&mut self, visual: &Visual);
    /// Size of the play area in world units.
    fn window_size(&self) -> Bounds;
    fn is_closed(&self) -> bool;
    fn request_close(&mut self);
    fn poll_event(&mut self) -> Option<InputEvent>;
}

/// Backend-independent input events.
///
/// The game only ever sees these; the terminal backend translates crossterm
/// events into them.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    /// Thrust.
    Up,
    Space,
    Enter,
    Backspace,
    Escape,
    Char(char),
}

impl Key {
    /// Case-insensitive match against a letter key.
    pub fn is_letter(&self, letter: char) -> bool {
        matches!(self, Key::Char(c) if c.eq_ignore_ascii_case(&letter))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    KeyDown(Key),
    KeyUp(Key),
    /// A character typed by the player, delivered alongside the `KeyDown`.
    Text(char),
    /// The window (or terminal) asked to close.
    Close,
}

//! Key mapping from terminal events to game keys.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Keys the game listens to. `A` and `B` only matter to the cheat sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    A,
    B,
}

/// Map a terminal key event to a game key.
pub fn map_key(key: KeyEvent) -> Option<Key> {
    match key.code {
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('H') => Some(Key::Left),
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('L') => Some(Key::Right),
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('J') => Some(Key::Down),
        KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('K') => Some(Key::Up),
        KeyCode::Char('a') | KeyCode::Char('A') => Some(Key::A),
        KeyCode::Char('b') | KeyCode::Char('B') => Some(Key::B),
        _ => None,
    }
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc)
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

/// Check if key asks for a new game.
pub fn is_restart(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('r') | KeyCode::Char('R'))
}

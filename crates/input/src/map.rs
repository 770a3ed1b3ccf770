//! Key mapping from terminal events to logical keys.

use crate::types::Key;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Map keyboard input to a logical key.
pub fn map_key(key: KeyEvent) -> Option<Key> {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Some(Key::Quit);
    }

    match key.code {
        // Movement
        KeyCode::Left | KeyCode::Char('h' | 'H' | 'a' | 'A') => Some(Key::Left),
        KeyCode::Right | KeyCode::Char('l' | 'L' | 'd' | 'D') => Some(Key::Right),
        KeyCode::Down | KeyCode::Char('j' | 'J' | 's' | 'S') => Some(Key::Down),

        // Rotation
        KeyCode::Up | KeyCode::Char('k' | 'K' | 'w' | 'W') => Some(Key::Up),

        // Actions
        KeyCode::Char(' ') => Some(Key::Space),
        KeyCode::Char('p' | 'P') => Some(Key::Pause),
        KeyCode::Char('r' | 'R') => Some(Key::Restart),
        KeyCode::Char('q' | 'Q') | KeyCode::Esc => Some(Key::Quit),

        _ => None,
    }
}

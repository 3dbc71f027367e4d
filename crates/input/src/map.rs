//! Key bindings from terminal events to game actions.

use crate::types::GameAction;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Keys that auto-repeat while held
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeldKey {
    Left,
    Right,
    Down,
}

impl HeldKey {
    pub fn action(self) -> GameAction {
        match self {
            HeldKey::Left => GameAction::MoveLeft,
            HeldKey::Right => GameAction::MoveRight,
            HeldKey::Down => GameAction::SoftDrop,
        }
    }
}

/// Arrow keys, vi keys (h/j/l) and WASD (a/s/d) all move.
pub fn held_key(code: KeyCode) -> Option<HeldKey> {
    let code = match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    };
    match code {
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('a') => Some(HeldKey::Left),
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('d') => Some(HeldKey::Right),
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('s') => Some(HeldKey::Down),
        _ => None,
    }
}

/// Map keyboard input to a game action.
pub fn handle_key_event(key: KeyEvent) -> Option<GameAction> {
    if let Some(held) = held_key(key.code) {
        return Some(held.action());
    }
    match key.code {
        KeyCode::Up | KeyCode::Char(' ') => Some(GameAction::RotateCw),
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'k' | 'w' | 'x' => Some(GameAction::RotateCw),
            'p' => Some(GameAction::Pause),
            'r' | 'n' => Some(GameAction::Restart),
            _ => None,
        },
        KeyCode::Enter => Some(GameAction::Restart),
        _ => None,
    }
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc)
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

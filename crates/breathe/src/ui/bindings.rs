//! Keyboard bindings and input handling.
//!
//! Centralizes all keyboard shortcuts and key mapping logic.

use nannou::prelude::*;

/// Actions that can be triggered by key presses
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // App-level
    Quit,
    ShowHelp,
    HideHelp,

    // Session
    ToggleSession,
    SpeedUp,
    SpeedDown,
    NextPattern,
    PrevPattern,
    ToggleMute,

    ToggleDebugViz,
}

/// Parse a key into an action
pub fn parse_key(key: Key, help_visible: bool) -> Option<Action> {
    // Global quit key
    if key == Key::Q {
        return Some(Action::Quit);
    }

    if key == Key::H {
        return Some(Action::ShowHelp);
    }

    if help_visible && key == Key::Escape {
        return Some(Action::HideHelp);
    }

    match key {
        Key::Space => Some(Action::ToggleSession),
        Key::Up => Some(Action::SpeedUp),
        Key::Down => Some(Action::SpeedDown),
        Key::Tab | Key::Right => Some(Action::NextPattern),
        Key::Left => Some(Action::PrevPattern),
        Key::M => Some(Action::ToggleMute),
        Key::D => Some(Action::ToggleDebugViz),
        _ => None,
    }
}

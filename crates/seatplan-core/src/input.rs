//! Pointer and keyboard events fed to the interaction state machine.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    /// Shift, ctrl or meta: adds to or removes from the selection on click.
    pub fn toggles_selection(&self) -> bool {
        self.shift || self.ctrl || self.meta
    }

    /// Ctrl or meta: turns the wheel into zoom.
    pub fn zooms(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Pointer event in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down {
        position: Point,
        button: MouseButton,
        modifiers: Modifiers,
    },
    Up {
        position: Point,
        button: MouseButton,
    },
    Move {
        position: Point,
    },
    Scroll {
        position: Point,
        delta: Vec2,
        modifiers: Modifiers,
    },
}

impl PointerEvent {
    pub fn position(&self) -> Point {
        match *self {
            PointerEvent::Down { position, .. }
            | PointerEvent::Up { position, .. }
            | PointerEvent::Move { position }
            | PointerEvent::Scroll { position, .. } => position,
        }
    }
}

/// Keys the engine reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Escape,
    /// Delete or Backspace.
    Delete,
    /// The rotate shortcut, `R`.
    Rotate,
}

impl Key {
    /// Map a key name as reported by the windowing layer.
    pub fn from_name(name: &str) -> Option<Key> {
        match name {
            "Escape" | "Esc" => Some(Key::Escape),
            "Delete" | "Backspace" => Some(Key::Delete),
            "r" | "R" => Some(Key::Rotate),
            _ => None,
        }
    }
}

/// Keyboard event type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyEvent {
    Pressed(Key),
    Released(Key),
}

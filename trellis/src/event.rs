//! Input event types delivered by the host to the element tree.
//!
//! The host translates platform events into these plain values and hands
//! them to [`crate::View`]; from there they travel down through composites
//! and proxies with a [`crate::Context`] describing where each element sits.

use crate::primitives::Point;

/// Which physical mouse button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ButtonKind {
    #[default]
    Left,
    Middle,
    Right,
}

/// A mouse button transition (press or release) at a position.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MouseButton {
    /// True on press, false on release.
    pub down: bool,
    pub click_count: u32,
    pub kind: ButtonKind,
    pub modifiers: Modifiers,
    pub pos: Point,
}

impl MouseButton {
    /// Left-button press at `pos`.
    pub fn press(pos: Point) -> Self {
        Self {
            down: true,
            click_count: 1,
            pos,
            ..Default::default()
        }
    }

    /// Left-button release at `pos`.
    pub fn release(pos: Point) -> Self {
        Self {
            down: false,
            click_count: 1,
            pos,
            ..Default::default()
        }
    }

    /// Same button state at a new position (for drags).
    pub fn at(self, pos: Point) -> Self {
        Self { pos, ..self }
    }

    pub fn with_modifiers(self, modifiers: Modifiers) -> Self {
        Self { modifiers, ..self }
    }
}

/// Keyboard modifier keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool, // Command on macOS, Windows key on Windows
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub const SHIFT: Self = Self {
        shift: true,
        ctrl: false,
        alt: false,
        meta: false,
    };

    /// Check if the command key is pressed (Ctrl on non-Mac, Meta on Mac).
    #[cfg(target_os = "macos")]
    pub fn command(&self) -> bool {
        self.meta
    }

    #[cfg(not(target_os = "macos"))]
    pub fn command(&self) -> bool {
        self.ctrl
    }

    /// Check if any modifier is pressed.
    pub fn any(&self) -> bool {
        self.shift || self.ctrl || self.alt || self.meta
    }
}

/// Named keys (non-character keys).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedKey {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Home,
    End,
    PageUp,
    PageDown,
    Backspace,
    Delete,
    Enter,
    Tab,
    Escape,
    Space,
}

/// A keyboard key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    /// A named (special) key.
    Named(NamedKey),

    /// A character key.
    Character(char),
}

/// Key transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyAction {
    #[default]
    Press,
    Repeat,
    Release,
}

/// A key event routed through the focus chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyInfo {
    pub key: Key,
    pub action: KeyAction,
    pub modifiers: Modifiers,
}

impl KeyInfo {
    pub fn press(key: NamedKey) -> Self {
        Self {
            key: Key::Named(key),
            action: KeyAction::Press,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn with_modifiers(self, modifiers: Modifiers) -> Self {
        Self { modifiers, ..self }
    }

    /// Whether this is a press or auto-repeat of `key`.
    pub fn is_pressed(&self, key: NamedKey) -> bool {
        self.key == Key::Named(key) && self.action != KeyAction::Release
    }
}

/// Text input (a composed code point), routed only to the focused element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextInfo {
    pub codepoint: char,
    pub modifiers: Modifiers,
}

/// Hover state passed to `cursor`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorTracking {
    Entering,
    Hovering,
    Leaving,
}

/// Keyboard focus transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusRequest {
    Begin,
    End,
}

/// Mouse cursor shapes an element may ask the host for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorKind {
    #[default]
    Arrow,
    IBeam,
    CrossHair,
    Hand,
    HResize,
    VResize,
}

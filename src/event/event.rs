//! Event types delivered through environments.
//!
//! Events are typed values; each one also renders to a slash-separated path
//! (most general segment first) so it can be routed through a
//! [`Dispatch`](crate::dispatch::Dispatch) trie.

use crate::layout::{Point, Rect};
use bitflags::bitflags;
use std::fmt::{self, Write};

/// Keyboard keys that do not type a character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// Up arrow.
    Up,
    /// Down arrow.
    Down,
    /// Escape key.
    Escape,
    /// Space bar.
    Space,
    /// Backspace key.
    Backspace,
    /// Delete key.
    Delete,
    /// Insert key.
    Insert,
    /// Enter/Return key.
    Enter,
    /// Tab key.
    Tab,
    /// Home key.
    Home,
    /// End key.
    End,
    /// Page Up.
    PageUp,
    /// Page Down.
    PageDown,
    /// Shift key.
    Shift,
    /// Control key.
    Ctrl,
    /// Alt/Option key.
    Alt,
    /// Function key (F1-F12).
    F(u8),
    /// A character key, for press/release tracking.
    Char(char),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Up => "up",
            Self::Down => "down",
            Self::Escape => "escape",
            Self::Space => "space",
            Self::Backspace => "backspace",
            Self::Delete => "delete",
            Self::Insert => "insert",
            Self::Enter => "enter",
            Self::Tab => "tab",
            Self::Home => "home",
            Self::End => "end",
            Self::PageUp => "pageup",
            Self::PageDown => "pagedown",
            Self::Shift => "shift",
            Self::Ctrl => "ctrl",
            Self::Alt => "alt",
            Self::F(n) => return write!(f, "f{n}"),
            Self::Char(c) => return write!(f, "{}", u32::from(*c)),
        };
        f.write_str(name)
    }
}

/// Mouse button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Left mouse button.
    Left,
    /// Right mouse button.
    Right,
    /// Middle mouse button.
    Middle,
}

impl fmt::Display for MouseButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Middle => "middle",
        })
    }
}

bitflags! {
    /// Modifier keys held during a key event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        /// Shift key held.
        const SHIFT   = 0b0001;
        /// Control key held.
        const CONTROL = 0b0010;
        /// Alt/Option key held.
        const ALT     = 0b0100;
        /// Super/Command/Windows key held.
        const SUPER   = 0b1000;
    }
}

/// One occurrence in an environment.
///
/// An environment always delivers a [`Event::Resize`] first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The drawable area of the environment changed.
    Resize(Rect),

    /// The user asked to close the window.
    WindowClose,

    /// The window content needs repainting (e.g. after being restored).
    WindowRefresh,

    /// The pointer moved.
    MouseMove(Point),

    /// A mouse button was pressed.
    MouseDown {
        /// Pointer position.
        at: Point,
        /// Button pressed.
        button: MouseButton,
    },

    /// A mouse button was released.
    MouseUp {
        /// Pointer position.
        at: Point,
        /// Button released.
        button: MouseButton,
    },

    /// The wheel (or trackpad) scrolled.
    MouseScroll {
        /// Pointer position.
        at: Point,
        /// Amount scrolled along each axis (positive y = up).
        delta: Point,
    },

    /// A character was typed.
    KeyType(char),

    /// A key was pressed.
    KeyDown {
        /// The key.
        key: Key,
        /// Modifiers held.
        modifiers: Modifiers,
    },

    /// A key was released.
    KeyUp {
        /// The key.
        key: Key,
        /// Modifiers held.
        modifiers: Modifiers,
    },

    /// A held key repeated.
    KeyRepeat {
        /// The key.
        key: Key,
        /// Modifiers held.
        modifiers: Modifiers,
    },
}

impl Event {
    /// The rectangle of a resize event.
    pub const fn resize_rect(&self) -> Option<Rect> {
        match self {
            Self::Resize(r) => Some(*r),
            _ => None,
        }
    }

    /// Whether this is a resize event.
    pub const fn is_resize(&self) -> bool {
        matches!(self, Self::Resize(_))
    }

    /// The slash-separated routing path of the event.
    ///
    /// ```text
    /// resize/0/0/640/480
    /// mo/down/421/89/left
    /// kb/type/98
    /// ```
    pub fn path(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resize(r) => write!(f, "resize/{}/{}/{}/{}", r.x, r.y, r.right(), r.bottom()),
            Self::WindowClose => f.write_str("wi/close"),
            Self::WindowRefresh => f.write_str("wi/refresh"),
            Self::MouseMove(p) => write!(f, "mo/move/{}/{}", p.x, p.y),
            Self::MouseDown { at, button } => write!(f, "mo/down/{}/{}/{button}", at.x, at.y),
            Self::MouseUp { at, button } => write!(f, "mo/up/{}/{}/{button}", at.x, at.y),
            Self::MouseScroll { delta, .. } => write!(f, "mo/scroll/{}/{}", delta.x, delta.y),
            Self::KeyType(c) => write!(f, "kb/type/{}", u32::from(*c)),
            Self::KeyDown { key, .. } => write!(f, "kb/down/{key}"),
            Self::KeyUp { key, .. } => write!(f, "kb/up/{key}"),
            Self::KeyRepeat { key, .. } => write!(f, "kb/repeat/{key}"),
        }
    }
}

/// Join values into a slash-separated path.
pub fn join_path<I, T>(parts: I) -> String
where
    I: IntoIterator<Item = T>,
    T: fmt::Display,
{
    let mut out = String::new();
    for (i, part) in parts.into_iter().enumerate() {
        if i > 0 {
            out.push('/');
        }
        let _ = write!(out, "{part}");
    }
    out
}

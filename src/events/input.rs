//! Input payloads and events.
//!
//! The platform layer turns device events into [`RawInput`] values. The
//! [`InputDispatcher`](crate::resources::input::InputDispatcher) maps those
//! through its bindings to an abstract `(input_id, InputData)` pair, wrapped
//! in an [`InputEvent`], which is what states and listeners see.

use std::fmt;
use std::str::FromStr;

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::math::Vec2;

pub const MOUSE_BUTTON_1: u8 = 1;
pub const MOUSE_BUTTON_2: u8 = 2;
pub const MOUSE_BUTTON_3: u8 = 3;

pub const MOUSE_MOTION_UP: (i32, i32) = (0, -1);
pub const MOUSE_MOTION_RIGHT: (i32, i32) = (1, 0);
pub const MOUSE_MOTION_DOWN: (i32, i32) = (0, 1);
pub const MOUSE_MOTION_LEFT: (i32, i32) = (-1, 0);

pub const MOUSE_WHEEL_UP: (i32, i32) = (0, -1);
pub const MOUSE_WHEEL_RIGHT: (i32, i32) = (1, 0);
pub const MOUSE_WHEEL_DOWN: (i32, i32) = (0, 1);
pub const MOUSE_WHEEL_LEFT: (i32, i32) = (-1, 0);

/// Modifier bit flags carried by keyboard events.
pub mod modifiers {
    pub const NONE: u16 = 0;
    pub const SHIFT: u16 = 1;
    pub const CTRL: u16 = 1 << 1;
    pub const ALT: u16 = 1 << 2;
}

/// Physical keys that can be bound to an input id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Space,
    Return,
    Escape,
    Tab,
    Backspace,
    Delete,
    Home,
    End,
    PageUp,
    PageDown,
    LShift,
    RShift,
    LCtrl,
    RCtrl,
    LAlt,
    RAlt,
    /// Digit key `0`..=`9`.
    Num(u8),
    /// Letter key, always lowercase.
    Char(char),
    /// Function key `F1`..=`F15`.
    F(u8),
}

const NAMED_KEYS: [(&str, Key); 20] = [
    ("left", Key::Left),
    ("right", Key::Right),
    ("up", Key::Up),
    ("down", Key::Down),
    ("space", Key::Space),
    ("return", Key::Return),
    ("escape", Key::Escape),
    ("tab", Key::Tab),
    ("backspace", Key::Backspace),
    ("delete", Key::Delete),
    ("home", Key::Home),
    ("end", Key::End),
    ("pageup", Key::PageUp),
    ("pagedown", Key::PageDown),
    ("lshift", Key::LShift),
    ("rshift", Key::RShift),
    ("lctrl", Key::LCtrl),
    ("rctrl", Key::RCtrl),
    ("lalt", Key::LAlt),
    ("ralt", Key::RAlt),
];

impl FromStr for Key {
    type Err = Error;

    /// Parse a config-file key name: `left`, `return`/`enter`, `escape`/`esc`,
    /// a single letter or digit, or `f1`..`f15`. Case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        let alias = match name.as_str() {
            "enter" => "return",
            "esc" => "escape",
            other => other,
        };
        if let Some((_, key)) = NAMED_KEYS.iter().find(|(n, _)| *n == alias) {
            return Ok(*key);
        }

        let mut chars = alias.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if c.is_ascii_lowercase() {
                return Ok(Key::Char(c));
            }
            if let Some(d) = c.to_digit(10) {
                return Ok(Key::Num(d as u8));
            }
        }

        if let Some(n) = alias.strip_prefix('f').and_then(|n| n.parse::<u8>().ok()) {
            if (1..=15).contains(&n) {
                return Ok(Key::F(n));
            }
        }

        Err(Error::InvalidArgument(format!("unknown key name '{s}'")))
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Num(d) => write!(f, "{d}"),
            Key::Char(c) => write!(f, "{c}"),
            Key::F(n) => write!(f, "f{n}"),
            named => {
                let name = NAMED_KEYS
                    .iter()
                    .find(|(_, k)| k == named)
                    .map(|(n, _)| *n)
                    .unwrap_or("?");
                f.write_str(name)
            }
        }
    }
}

/// Device event as reported by the platform layer.
#[derive(Debug, Clone, PartialEq)]
pub enum RawInput {
    KeyDown {
        key: Key,
        modifiers: u16,
        unicode: Option<char>,
    },
    KeyUp {
        key: Key,
        modifiers: u16,
        unicode: Option<char>,
    },
    MouseButtonDown {
        button: u8,
        position: Vec2,
    },
    MouseButtonUp {
        button: u8,
        position: Vec2,
    },
    MouseWheel {
        x: i32,
        y: i32,
        flipped: bool,
    },
    MouseMotion {
        position: Vec2,
        rel: (i32, i32),
        buttons: [bool; 3],
    },
}

impl RawInput {
    /// Plain key press without modifiers.
    pub fn key_down(key: Key) -> Self {
        RawInput::KeyDown {
            key,
            modifiers: modifiers::NONE,
            unicode: None,
        }
    }

    /// Plain key release without modifiers.
    pub fn key_up(key: Key) -> Self {
        RawInput::KeyUp {
            key,
            modifiers: modifiers::NONE,
            unicode: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyboardData {
    pub pressed: bool,
    pub released: bool,
    pub modifiers: u16,
    pub unicode: Option<char>,
}

impl KeyboardData {
    pub fn press(unicode: Option<char>) -> Self {
        KeyboardData {
            pressed: true,
            released: false,
            modifiers: modifiers::NONE,
            unicode,
        }
    }

    pub fn release(unicode: Option<char>) -> Self {
        KeyboardData {
            pressed: false,
            released: true,
            modifiers: modifiers::NONE,
            unicode,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MouseClickData {
    pub pressed: bool,
    pub released: bool,
    pub button: u8,
    pub position: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MouseWheelData {
    pub flipped: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MouseMotionData {
    pub position: Vec2,
    pub buttons: [bool; 3],
}

/// Payload delivered with an input id.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputData {
    Keyboard(KeyboardData),
    MouseClick(MouseClickData),
    MouseWheel(MouseWheelData),
    MouseMotion(MouseMotionData),
}

impl InputData {
    /// True for key presses and mouse button presses.
    pub fn is_pressed(&self) -> bool {
        match self {
            InputData::Keyboard(k) => k.pressed,
            InputData::MouseClick(m) => m.pressed,
            _ => false,
        }
    }

    /// True for key releases and mouse button releases.
    pub fn is_released(&self) -> bool {
        match self {
            InputData::Keyboard(k) => k.released,
            InputData::MouseClick(m) => m.released,
            _ => false,
        }
    }
}

/// A bound input, triggered after listeners and the active state saw it.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct InputEvent {
    pub input_id: String,
    pub data: InputData,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_from_str_named_and_aliases() {
        assert_eq!("left".parse::<Key>(), Ok(Key::Left));
        assert_eq!("Enter".parse::<Key>(), Ok(Key::Return));
        assert_eq!("ESC".parse::<Key>(), Ok(Key::Escape));
        assert_eq!(" pageup ".parse::<Key>(), Ok(Key::PageUp));
    }

    #[test]
    fn test_key_from_str_chars_digits_and_function_keys() {
        assert_eq!("p".parse::<Key>(), Ok(Key::Char('p')));
        assert_eq!("P".parse::<Key>(), Ok(Key::Char('p')));
        assert_eq!("7".parse::<Key>(), Ok(Key::Num(7)));
        assert_eq!("f12".parse::<Key>(), Ok(Key::F(12)));
        assert!("f16".parse::<Key>().is_err());
        assert!("hyper".parse::<Key>().is_err());
    }

    #[test]
    fn test_key_display_round_trips() {
        for key in [Key::Up, Key::Char('x'), Key::Num(3), Key::F(5), Key::RAlt] {
            assert_eq!(key.to_string().parse::<Key>(), Ok(key));
        }
    }

    #[test]
    fn test_pressed_released_helpers() {
        assert!(InputData::Keyboard(KeyboardData::press(None)).is_pressed());
        assert!(InputData::Keyboard(KeyboardData::release(None)).is_released());
        assert!(!InputData::MouseWheel(MouseWheelData { flipped: false }).is_pressed());
    }
}

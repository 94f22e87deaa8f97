use std::str::FromStr;

use thiserror::Error;
use winit::keyboard::KeyCode;

/// Holding this key while dragging pans the selection instead of resizing it.
pub const PAN_KEY: KeyCode = KeyCode::Space;

/// A key given by name on the command line, e.g. `Escape`, `q`, `F4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyName(KeyCode);

impl KeyName {
    pub fn code(&self) -> KeyCode {
        self.0
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown key name '{0}'")]
pub struct UnknownKey(pub String);

const LETTERS: [KeyCode; 26] = [
    KeyCode::KeyA,
    KeyCode::KeyB,
    KeyCode::KeyC,
    KeyCode::KeyD,
    KeyCode::KeyE,
    KeyCode::KeyF,
    KeyCode::KeyG,
    KeyCode::KeyH,
    KeyCode::KeyI,
    KeyCode::KeyJ,
    KeyCode::KeyK,
    KeyCode::KeyL,
    KeyCode::KeyM,
    KeyCode::KeyN,
    KeyCode::KeyO,
    KeyCode::KeyP,
    KeyCode::KeyQ,
    KeyCode::KeyR,
    KeyCode::KeyS,
    KeyCode::KeyT,
    KeyCode::KeyU,
    KeyCode::KeyV,
    KeyCode::KeyW,
    KeyCode::KeyX,
    KeyCode::KeyY,
    KeyCode::KeyZ,
];

const DIGITS: [KeyCode; 10] = [
    KeyCode::Digit0,
    KeyCode::Digit1,
    KeyCode::Digit2,
    KeyCode::Digit3,
    KeyCode::Digit4,
    KeyCode::Digit5,
    KeyCode::Digit6,
    KeyCode::Digit7,
    KeyCode::Digit8,
    KeyCode::Digit9,
];

const FUNCTION_KEYS: [KeyCode; 24] = [
    KeyCode::F1,
    KeyCode::F2,
    KeyCode::F3,
    KeyCode::F4,
    KeyCode::F5,
    KeyCode::F6,
    KeyCode::F7,
    KeyCode::F8,
    KeyCode::F9,
    KeyCode::F10,
    KeyCode::F11,
    KeyCode::F12,
    KeyCode::F13,
    KeyCode::F14,
    KeyCode::F15,
    KeyCode::F16,
    KeyCode::F17,
    KeyCode::F18,
    KeyCode::F19,
    KeyCode::F20,
    KeyCode::F21,
    KeyCode::F22,
    KeyCode::F23,
    KeyCode::F24,
];

impl FromStr for KeyName {
    type Err = UnknownKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        let named = match name.as_str() {
            "escape" | "esc" => Some(KeyCode::Escape),
            "space" => Some(KeyCode::Space),
            "enter" | "return" => Some(KeyCode::Enter),
            "tab" => Some(KeyCode::Tab),
            "backspace" | "back" => Some(KeyCode::Backspace),
            "delete" | "del" => Some(KeyCode::Delete),
            "insert" => Some(KeyCode::Insert),
            "home" => Some(KeyCode::Home),
            "end" => Some(KeyCode::End),
            "pageup" | "prior" => Some(KeyCode::PageUp),
            "pagedown" | "next" => Some(KeyCode::PageDown),
            "left" => Some(KeyCode::ArrowLeft),
            "right" => Some(KeyCode::ArrowRight),
            "up" => Some(KeyCode::ArrowUp),
            "down" => Some(KeyCode::ArrowDown),
            _ => None,
        };
        named
            .or_else(|| indexed_key(&name))
            .map(KeyName)
            .ok_or_else(|| UnknownKey(s.to_string()))
    }
}

// Single letters, digits (also as `d0`..`d9`) and `f1`..`f24`.
fn indexed_key(name: &str) -> Option<KeyCode> {
    let bytes = name.as_bytes();
    match bytes {
        [c @ b'a'..=b'z'] => Some(LETTERS[(c - b'a') as usize]),
        [c @ b'0'..=b'9'] | [b'd', c @ b'0'..=b'9'] => Some(DIGITS[(c - b'0') as usize]),
        [b'f', rest @ ..] if !rest.is_empty() => {
            let n: usize = name[1..].parse().ok()?;
            FUNCTION_KEYS.get(n.checked_sub(1)?).copied()
        }
        _ => None,
    }
}

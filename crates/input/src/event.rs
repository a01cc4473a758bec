use std::str::FromStr;

/// Keys the demo reacts to. Hosts map their native key codes onto these and
/// drop everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    W,
    A,
    S,
    D,
    Q,
    R,
    Space,
    Escape,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown key `{0}`")]
pub struct KeyParseError(pub String);

impl FromStr for Key {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "w" => Ok(Key::W),
            "a" => Ok(Key::A),
            "s" => Ok(Key::S),
            "d" => Ok(Key::D),
            "q" => Ok(Key::Q),
            "r" => Ok(Key::R),
            "space" | " " => Ok(Key::Space),
            "escape" | "esc" => Ok(Key::Escape),
            _ => Err(KeyParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Platform-independent input events.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    KeyDown(Key),
    KeyUp(Key),
    /// Raw pointer motion since the previous event.
    MouseMove { dx: f32, dy: f32 },
    MouseButton { button: MouseButton, pressed: bool },
    FocusLost,
    PointerLockChanged { locked: bool },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_parse_is_case_insensitive() {
        assert_eq!("W".parse::<Key>(), Ok(Key::W));
        assert_eq!("Space".parse::<Key>(), Ok(Key::Space));
        assert_eq!(" ".parse::<Key>(), Ok(Key::Space));
    }

    #[test]
    fn key_parse_rejects_unknown() {
        let err = "F13".parse::<Key>().unwrap_err();
        assert_eq!(err.to_string(), "unknown key `F13`");
    }
}

//! Translation from winit device events to simulation input events.

use blockrange_input::{InputEvent, Key, MouseButton};
use winit::event::{ElementState, MouseButton as WinitButton};
use winit::keyboard::KeyCode;

pub fn map_key(code: KeyCode) -> Option<Key> {
    Some(match code {
        KeyCode::KeyW => Key::W,
        KeyCode::KeyA => Key::A,
        KeyCode::KeyS => Key::S,
        KeyCode::KeyD => Key::D,
        KeyCode::KeyQ => Key::Q,
        KeyCode::KeyR => Key::R,
        KeyCode::Space => Key::Space,
        KeyCode::Escape => Key::Escape,
        _ => return None,
    })
}

pub fn map_button(button: WinitButton) -> Option<MouseButton> {
    match button {
        WinitButton::Left => Some(MouseButton::Left),
        WinitButton::Right => Some(MouseButton::Right),
        WinitButton::Middle => Some(MouseButton::Middle),
        _ => None,
    }
}

pub fn key_event(code: KeyCode, state: ElementState) -> Option<InputEvent> {
    let key = map_key(code)?;
    Some(match state {
        ElementState::Pressed => InputEvent::KeyDown(key),
        ElementState::Released => InputEvent::KeyUp(key),
    })
}

pub fn button_event(button: WinitButton, state: ElementState) -> Option<InputEvent> {
    Some(InputEvent::MouseButton {
        button: map_button(button)?,
        pressed: state.is_pressed(),
    })
}

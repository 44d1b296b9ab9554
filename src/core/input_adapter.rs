use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{Key, KeyCode, NamedKey, PhysicalKey};

use super::input::{InputEvent, PointerButton};

/// Pixels per wheel "line", matching what browsers report for line scrolling
pub const LINE_HEIGHT_PX: f32 = 100.0;

/// Adapter that turns winit window events into [`InputEvent`]s
#[derive(Debug, Clone, Default)]
pub struct WinitInput {
    /// Last cursor position (relative to window)
    cursor: Option<(f32, f32)>,
}

impl WinitInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cursor(&self) -> Option<(f32, f32)> {
        self.cursor
    }

    /// Translate a window event. Events the controller has no use for yield `None`.
    pub fn translate(&mut self, event: &WindowEvent) -> Option<InputEvent> {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                Some(self.move_to(position.x as f32, position.y as f32))
            }
            WindowEvent::CursorLeft { .. } => {
                self.leave();
                None
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let button = pointer_button(*button);
                match state {
                    ElementState::Pressed => self.press(button),
                    ElementState::Released => Some(InputEvent::PointerUp { button }),
                }
            }
            WindowEvent::MouseWheel { delta, .. } => Some(InputEvent::Wheel {
                delta_y: wheel_delta(*delta),
            }),
            WindowEvent::KeyboardInput { event, .. } => {
                let key = key_for(&event.physical_key, &event.logical_key)?;
                match event.state {
                    ElementState::Pressed => Some(InputEvent::KeyDown { key }),
                    ElementState::Released => Some(InputEvent::KeyUp { key }),
                }
            }
            _ => None,
        }
    }

    fn move_to(&mut self, x: f32, y: f32) -> InputEvent {
        self.cursor = Some((x, y));
        InputEvent::PointerMove { x, y }
    }

    fn leave(&mut self) {
        self.cursor = None;
    }

    /// A press with no known cursor position is dropped rather than starting a drag
    fn press(&self, button: PointerButton) -> Option<InputEvent> {
        let (x, y) = self.cursor?;
        Some(InputEvent::PointerDown { button, x, y })
    }
}

/// Map winit MouseButton to PointerButton
pub fn pointer_button(button: MouseButton) -> PointerButton {
    match button {
        MouseButton::Left => PointerButton::Primary,
        MouseButton::Right => PointerButton::Secondary,
        MouseButton::Middle => PointerButton::Middle,
        MouseButton::Back => PointerButton::Other(3),
        MouseButton::Forward => PointerButton::Other(4),
        MouseButton::Other(code) => PointerButton::Other(code),
    }
}

/// Browser-style vertical delta: positive scrolls down
pub fn wheel_delta(delta: MouseScrollDelta) -> f32 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => -y * LINE_HEIGHT_PX,
        MouseScrollDelta::PixelDelta(position) => -position.y as f32,
    }
}

/// Key name for a keyboard event, taken from the physical key so that
/// modifiers never change it: Shift+W is still `"w"`, and its release
/// matches its press. Unidentified physical keys fall back to the logical key.
pub fn key_for(physical: &PhysicalKey, logical: &Key) -> Option<String> {
    match physical {
        PhysicalKey::Code(code) => Some(code_name(*code)),
        PhysicalKey::Unidentified(_) => key_name(logical),
    }
}

/// Unshifted browser `KeyboardEvent.key` spelling for a key code
pub fn code_name(code: KeyCode) -> String {
    match code {
        KeyCode::Space => " ".to_string(),
        KeyCode::ShiftLeft | KeyCode::ShiftRight => "Shift".to_string(),
        KeyCode::ControlLeft | KeyCode::ControlRight => "Control".to_string(),
        KeyCode::AltLeft | KeyCode::AltRight => "Alt".to_string(),
        KeyCode::SuperLeft | KeyCode::SuperRight => "Meta".to_string(),
        code => {
            let name = format!("{code:?}");
            if let Some(letter) = name.strip_prefix("Key") {
                letter.to_lowercase()
            } else if let Some(digit) = name.strip_prefix("Digit") {
                digit.to_string()
            } else {
                name
            }
        }
    }
}

/// Browser `KeyboardEvent.key` spelling for a winit logical key
pub fn key_name(key: &Key) -> Option<String> {
    match key {
        Key::Character(text) => Some(text.to_string()),
        Key::Named(NamedKey::Space) => Some(" ".to_string()),
        Key::Named(named) => Some(format!("{named:?}")),
        Key::Unidentified(_) | Key::Dead(_) => None,
    }
}

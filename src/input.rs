//! Per-frame input buffer.
//!
//! Winit delivers input as a stream of events between redraws. [`InputState`] folds them into
//! what the camera controller needs each frame: which keys are held, the cursor positions
//! reported since the last frame, the accumulated scroll and whether the window should close.
//!
//! The cursor is grabbed while the scene runs, so window cursor positions stop at the window
//! border. Raw mouse motion is therefore integrated into an unbounded virtual cursor instead.

use std::collections::HashSet;

use winit::{
    event::{DeviceEvent, ElementState, MouseScrollDelta, WindowEvent},
    keyboard::{KeyCode, PhysicalKey},
};

/// Pixel scroll deltas (touchpads) are converted to wheel lines with this factor.
const PIXELS_PER_LINE: f64 = 20.0;

/// Keys the scene reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    W,
    A,
    S,
    D,
    Q,
    E,
    P,
    Escape,
}

impl Key {
    pub fn from_key_code(code: KeyCode) -> Option<Self> {
        match code {
            KeyCode::KeyW => Some(Key::W),
            KeyCode::KeyA => Some(Key::A),
            KeyCode::KeyS => Some(Key::S),
            KeyCode::KeyD => Some(Key::D),
            KeyCode::KeyQ => Some(Key::Q),
            KeyCode::KeyE => Some(Key::E),
            KeyCode::KeyP => Some(Key::P),
            KeyCode::Escape => Some(Key::Escape),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
pub struct InputState {
    down: HashSet<Key>,
    cursor_samples: Vec<(f64, f64)>,
    virtual_cursor: (f64, f64),
    scroll: f32,
    close_requested: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, key: Key) {
        self.down.insert(key);
    }

    pub fn release(&mut self, key: Key) {
        self.down.remove(&key);
    }

    pub fn is_down(&self, key: Key) -> bool {
        self.down.contains(&key)
    }

    /// Record an absolute cursor position in window coordinates.
    pub fn push_cursor(&mut self, x: f64, y: f64) {
        self.cursor_samples.push((x, y));
    }

    /// Record relative mouse motion as a new position of the virtual cursor.
    pub fn push_motion(&mut self, dx: f64, dy: f64) {
        self.virtual_cursor.0 += dx;
        self.virtual_cursor.1 += dy;
        let (x, y) = self.virtual_cursor;
        self.push_cursor(x, y);
    }

    /// Record a vertical scroll in wheel lines, positive away from the user.
    pub fn push_scroll(&mut self, lines: f32) {
        self.scroll += lines;
    }

    pub fn request_close(&mut self) {
        self.close_requested = true;
    }

    /// True once the window was asked to close or Escape is held.
    pub fn should_close(&self) -> bool {
        self.close_requested || self.is_down(Key::Escape)
    }

    /// Drains the cursor positions reported since the last call, oldest first.
    pub fn take_cursor_samples(&mut self) -> Vec<(f64, f64)> {
        std::mem::take(&mut self.cursor_samples)
    }

    /// Drains the scroll accumulated since the last call.
    pub fn take_scroll(&mut self) -> f32 {
        std::mem::take(&mut self.scroll)
    }

    /// Folds a winit window event into the buffer. Returns whether the event was used.
    pub fn handle_window_event(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                let PhysicalKey::Code(code) = event.physical_key else {
                    return false;
                };
                let Some(key) = Key::from_key_code(code) else {
                    return false;
                };
                match event.state {
                    ElementState::Pressed => self.press(key),
                    ElementState::Released => self.release(key),
                }
                true
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(position) => (position.y / PIXELS_PER_LINE) as f32,
                };
                self.push_scroll(lines);
                true
            }
            WindowEvent::MouseInput { state, button, .. } => {
                log::debug!(
                    "{:?} mouse button {}",
                    button,
                    if state.is_pressed() { "pressed" } else { "released" }
                );
                true
            }
            WindowEvent::CloseRequested => {
                self.request_close();
                true
            }
            _ => false,
        }
    }

    /// Folds raw mouse motion into the virtual cursor. Returns whether the event was used.
    pub fn handle_device_event(&mut self, event: &DeviceEvent) -> bool {
        match event {
            DeviceEvent::MouseMotion { delta: (dx, dy) } => {
                self.push_motion(*dx, *dy);
                true
            }
            _ => false,
        }
    }
}

//! Pointer input channel.

use super::Input;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Pointer event in screen coordinates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PointerEvent {
    Down { position: Point, button: MouseButton },
    Up { position: Point, button: MouseButton },
    Move { position: Point },
}

/// Tracks the pointer across a gesture.
#[derive(Debug, Clone, Default)]
pub struct MouseInput {
    /// Current pointer position in screen coordinates.
    pub pointer_position: Point,
    /// Where the primary button went down, while it is held.
    drag_start: Option<Point>,
}

impl Input for MouseInput {
    const NAME: &'static str = "mouse";
}

impl MouseInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a pointer event.
    pub fn handle_pointer_event(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Down { position, button } => {
                self.pointer_position = position;
                if button == MouseButton::Left && self.drag_start.is_none() {
                    self.drag_start = Some(position);
                }
            }
            PointerEvent::Up { position, button } => {
                self.pointer_position = position;
                if button == MouseButton::Left {
                    self.drag_start = None;
                }
            }
            PointerEvent::Move { position } => {
                self.pointer_position = position;
            }
        }
    }

    /// Position of the primary button press, if it is still held.
    pub fn down_position(&self) -> Option<Point> {
        self.drag_start
    }
}

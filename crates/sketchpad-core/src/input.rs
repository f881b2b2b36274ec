//! Input events and pointer state for mouse/touch/keyboard handling.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};
use winit::keyboard::KeyCode;

// Use web_time for WASM compatibility
#[cfg(target_arch = "wasm32")]
use web_time::{Duration, Instant};
#[cfg(not(target_arch = "wasm32"))]
use std::time::{Duration, Instant};

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

    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        ..Modifiers::NONE
    };

    pub const CTRL: Modifiers = Modifiers {
        ctrl: true,
        ..Modifiers::NONE
    };

    /// Ctrl on most platforms, Cmd on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Raw input delivered by the host window, positions in screen pixels.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    PointerDown {
        position: Point,
        button: MouseButton,
        modifiers: Modifiers,
    },
    PointerMove {
        position: Point,
        modifiers: Modifiers,
    },
    PointerUp {
        position: Point,
        button: MouseButton,
        modifiers: Modifiers,
    },
    /// The pointer left the canvas surface.
    PointerLeave,
    /// Wheel or trackpad scroll. A pinch gesture arrives with `ctrl` set.
    Wheel {
        position: Point,
        delta: Vec2,
        modifiers: Modifiers,
    },
    /// Physical key transition. `text` carries the produced characters, if any.
    Key {
        code: KeyCode,
        pressed: bool,
        modifiers: Modifiers,
        text: Option<String>,
    },
    /// The text editor surface lost focus.
    Blur,
}

impl InputEvent {
    pub fn pointer_down(position: Point) -> Self {
        InputEvent::PointerDown {
            position,
            button: MouseButton::Left,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn pointer_move(position: Point) -> Self {
        InputEvent::PointerMove {
            position,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn pointer_up(position: Point) -> Self {
        InputEvent::PointerUp {
            position,
            button: MouseButton::Left,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn key_down(code: KeyCode, modifiers: Modifiers) -> Self {
        InputEvent::Key {
            code,
            pressed: true,
            modifiers,
            text: None,
        }
    }

    pub fn key_up(code: KeyCode) -> Self {
        InputEvent::Key {
            code,
            pressed: false,
            modifiers: Modifiers::NONE,
            text: None,
        }
    }

    /// Key press producing `text`, as delivered while typing.
    pub fn typed(code: KeyCode, text: &str) -> Self {
        InputEvent::Key {
            code,
            pressed: true,
            modifiers: Modifiers::NONE,
            text: Some(text.to_string()),
        }
    }
}

/// Tracks pointer position and detects double clicks.
#[derive(Debug, Clone)]
pub struct InputState {
    /// Current pointer position in screen coordinates.
    pub pointer_position: Point,
    /// Previous pointer position for delta calculations.
    pub previous_pointer_position: Point,
    /// Current modifier keys state.
    pub modifiers: Modifiers,
    /// Whether the primary button is held.
    pub is_dragging: bool,
    double_click_time: Duration,
    double_click_distance: f64,
    /// Last click time for double-click detection.
    last_click_time: Option<Instant>,
    /// Last click position for double-click detection.
    last_click_position: Option<Point>,
}

impl Default for InputState {
    fn default() -> Self {
        Self::new(Duration::from_millis(500), 5.0)
    }
}

impl InputState {
    /// Create a new input state with the given double-click window.
    pub fn new(double_click_time: Duration, double_click_distance: f64) -> Self {
        Self {
            pointer_position: Point::ZERO,
            previous_pointer_position: Point::ZERO,
            modifiers: Modifiers::default(),
            is_dragging: false,
            double_click_time,
            double_click_distance,
            last_click_time: None,
            last_click_position: None,
        }
    }

    /// Record a primary-button press. Returns true if it completes a double click.
    pub fn press(&mut self, position: Point) -> bool {
        self.press_at(position, Instant::now())
    }

    /// Record a press at an explicit time.
    pub fn press_at(&mut self, position: Point, now: Instant) -> bool {
        self.move_to(position);
        self.is_dragging = true;
        if let (Some(last_time), Some(last_pos)) = (self.last_click_time, self.last_click_position) {
            let elapsed = now.duration_since(last_time);
            if elapsed < self.double_click_time && position.distance(last_pos) < self.double_click_distance {
                // Reset so a triple click is not a second double click
                self.last_click_time = None;
                self.last_click_position = None;
                return true;
            }
        }
        self.last_click_time = Some(now);
        self.last_click_position = Some(position);
        false
    }

    pub fn release(&mut self, position: Point) {
        self.move_to(position);
        self.is_dragging = false;
    }

    pub fn move_to(&mut self, position: Point) {
        self.previous_pointer_position = self.pointer_position;
        self.pointer_position = position;
    }

    /// Get the pointer movement delta since the previous event.
    pub fn pointer_delta(&self) -> Vec2 {
        self.pointer_position - self.previous_pointer_position
    }
}

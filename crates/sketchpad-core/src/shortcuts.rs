//! Keyboard shortcut table and documentation.
//!
//! Shortcuts are keyed by physical key codes so they stay in place on
//! non-QWERTY layouts.

use crate::input::Modifiers;
use crate::tools::ToolKind;
use winit::keyboard::KeyCode;

/// Action bound to a shortcut.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    SelectTool(ToolKind),
    DeleteSelected,
    SelectAll,
    Copy,
    Paste,
    Duplicate,
    BringToFront,
    SendToBack,
    ZoomIn,
    ZoomOut,
    ResetZoom,
    /// Cancel the active gesture, or clear the selection when idle.
    Cancel,
}

/// Map a key press to a command.
pub fn resolve(code: KeyCode, modifiers: Modifiers) -> Option<Command> {
    if modifiers.command() {
        return match code {
            KeyCode::KeyA => Some(Command::SelectAll),
            KeyCode::KeyC => Some(Command::Copy),
            KeyCode::KeyV => Some(Command::Paste),
            KeyCode::KeyD => Some(Command::Duplicate),
            KeyCode::BracketRight => Some(Command::BringToFront),
            KeyCode::BracketLeft => Some(Command::SendToBack),
            KeyCode::Equal | KeyCode::NumpadAdd => Some(Command::ZoomIn),
            KeyCode::Minus | KeyCode::NumpadSubtract => Some(Command::ZoomOut),
            KeyCode::Digit0 | KeyCode::Numpad0 => Some(Command::ResetZoom),
            _ => None,
        };
    }
    if modifiers.alt {
        return None;
    }
    match code {
        KeyCode::KeyV => Some(Command::SelectTool(ToolKind::Select)),
        KeyCode::KeyH => Some(Command::SelectTool(ToolKind::Hand)),
        KeyCode::KeyR => Some(Command::SelectTool(ToolKind::Rectangle)),
        KeyCode::KeyE => Some(Command::SelectTool(ToolKind::Ellipse)),
        KeyCode::KeyL => Some(Command::SelectTool(ToolKind::Line)),
        KeyCode::KeyA => Some(Command::SelectTool(ToolKind::Arrow)),
        KeyCode::Delete | KeyCode::Backspace => Some(Command::DeleteSelected),
        KeyCode::Escape => Some(Command::Cancel),
        _ => None,
    }
}

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    pub ctrl: bool,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(key: &'static str, ctrl: bool, description: &'static str) -> Self {
        Self {
            key,
            ctrl,
            description,
        }
    }

    /// Format the shortcut for display (e.g., "Ctrl+A").
    pub fn format(&self) -> String {
        if self.ctrl {
            format!("Ctrl+{}", self.key)
        } else {
            self.key.to_string()
        }
    }
}

/// Registry of all keyboard shortcuts, for the host's help panel.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts.
    pub fn all() -> Vec<Shortcut> {
        vec![
            Shortcut::new("V", false, "Select tool"),
            Shortcut::new("H", false, "Hand tool"),
            Shortcut::new("R", false, "Rectangle tool"),
            Shortcut::new("E", false, "Ellipse tool"),
            Shortcut::new("L", false, "Line tool"),
            Shortcut::new("A", false, "Arrow tool"),
            Shortcut::new("Space", false, "Hold to pan"),
            Shortcut::new("Delete", false, "Delete selected shapes"),
            Shortcut::new("Backspace", false, "Delete selected shapes"),
            Shortcut::new("Escape", false, "Cancel current action"),
            Shortcut::new("A", true, "Select all shapes"),
            Shortcut::new("C", true, "Copy shapes"),
            Shortcut::new("V", true, "Paste shapes"),
            Shortcut::new("D", true, "Duplicate shapes"),
            Shortcut::new("]", true, "Bring to front"),
            Shortcut::new("[", true, "Send to back"),
            Shortcut::new("=", true, "Zoom in"),
            Shortcut::new("-", true, "Zoom out"),
            Shortcut::new("0", true, "Reset zoom"),
        ]
    }
}

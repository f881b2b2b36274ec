//! Sketchpad Core Library
//!
//! Platform-agnostic model and interaction logic for the sketchpad canvas:
//! shapes, the scene store, viewport math, selection handles, the text-edit
//! overlay and the pointer/keyboard state machine that ties them together.

pub mod camera;
pub mod config;
pub mod controller;
pub mod input;
pub mod scene;
pub mod selection;
pub mod shapes;
pub mod shortcuts;
pub mod storage;
pub mod text_edit;
pub mod theme;
pub mod tools;

pub use camera::{Viewport, document_to_screen, screen_to_document};
pub use config::CanvasConfig;
pub use controller::{InteractionController, InteractionMode, SelectionRect};
pub use input::{InputEvent, InputState, Modifiers, MouseButton};
pub use scene::{Preferences, Scene, SceneChange, ToolbarState};
pub use selection::{Handle, HandleKind, MultiMoveState, TransformState, get_handles};
pub use shapes::{Shape, ShapeId, ShapeKind, ShapeStyle, ShapeUpdate};
pub use shortcuts::{Command, ShortcutRegistry};
pub use storage::{MemoryStorage, PREFERENCES_KEY, PreferencesSync, Storage, StorageError};
pub use text_edit::{OverlayPlacement, TextEditOverlay, TextEditResult, TextKey};
pub use theme::Theme;
pub use tools::{DrawingState, ToolKind};

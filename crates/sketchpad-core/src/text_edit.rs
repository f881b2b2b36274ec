//! In-place text editor positioned over a shape.
//!
//! The overlay lives in screen space. Its placement is derived from the
//! shape's document-space center and must be re-projected whenever the
//! viewport changes.

use crate::camera::{Viewport, document_to_screen};
use crate::shapes::{Shape, ShapeId, TextAlign};
use kurbo::{Point, Size};

/// Keyboard key for text editing.
#[derive(Debug, Clone, PartialEq)]
pub enum TextKey {
    Character(String),
    Backspace,
    Delete,
    Enter,
    Left,
    Right,
    Home,
    End,
    Escape,
}

/// Result of handling a text editing event.
#[derive(Debug, Clone, PartialEq)]
pub enum TextEditResult {
    /// Event was handled, editing continues.
    Handled,
    /// Editing finished; the value to store as the shape's text.
    Commit(Option<String>),
    /// Editing abandoned; the shape keeps its previous text.
    Cancel,
}

/// Screen-space placement of the editor surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayPlacement {
    /// Screen point the editor is centered on.
    pub center: Point,
    /// Editor width in screen pixels.
    pub width: f64,
    /// Font size in screen pixels.
    pub font_size: f64,
    /// Rotation in degrees, copied from the shape.
    pub rotation: f64,
    pub align: TextAlign,
}

impl OverlayPlacement {
    /// Compute the placement for `shape` under `viewport`.
    ///
    /// Lines and arrows use `label_width` since their box can be degenerate.
    pub fn project(shape: &Shape, viewport: &Viewport, view_size: Size, label_width: f64) -> Self {
        let width = if shape.is_linear() {
            label_width
        } else {
            shape.width * viewport.zoom
        };
        Self {
            center: document_to_screen(shape.center(), viewport, view_size),
            width,
            font_size: shape.font.font_size * viewport.zoom,
            rotation: if shape.is_linear() { 0.0 } else { shape.rotation },
            align: shape.font.text_align,
        }
    }
}

/// Text editing session for one shape.
#[derive(Debug, Clone)]
pub struct TextEditOverlay {
    pub shape_id: ShapeId,
    draft: String,
    /// Caret position as a char index into `draft`.
    caret: usize,
    placement: OverlayPlacement,
    label_width: f64,
}

impl TextEditOverlay {
    /// Open the editor on `shape` with its current text, caret at the end.
    pub fn begin(shape: &Shape, viewport: &Viewport, view_size: Size, label_width: f64) -> Self {
        let draft = shape.text.clone().unwrap_or_default();
        let caret = draft.chars().count();
        Self {
            shape_id: shape.id,
            draft,
            caret,
            placement: OverlayPlacement::project(shape, viewport, view_size, label_width),
            label_width,
        }
    }

    /// Recompute placement after a viewport or shape change.
    pub fn reproject(&mut self, shape: &Shape, viewport: &Viewport, view_size: Size) {
        self.placement = OverlayPlacement::project(shape, viewport, view_size, self.label_width);
    }

    pub fn placement(&self) -> &OverlayPlacement {
        &self.placement
    }

    pub fn text(&self) -> &str {
        &self.draft
    }

    pub fn caret(&self) -> usize {
        self.caret
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.draft
            .char_indices()
            .nth(char_index)
            .map(|(i, _)| i)
            .unwrap_or(self.draft.len())
    }

    fn committed(&self) -> TextEditResult {
        if self.draft.is_empty() {
            TextEditResult::Commit(None)
        } else {
            TextEditResult::Commit(Some(self.draft.clone()))
        }
    }

    /// Handle a key. Enter commits unless Shift is held, which inserts a newline.
    pub fn handle_key(&mut self, key: TextKey, shift: bool) -> TextEditResult {
        let len = self.draft.chars().count();
        match key {
            TextKey::Character(s) => {
                let at = self.byte_index(self.caret);
                self.draft.insert_str(at, &s);
                self.caret += s.chars().count();
            }
            TextKey::Enter if shift => {
                let at = self.byte_index(self.caret);
                self.draft.insert(at, '\n');
                self.caret += 1;
            }
            TextKey::Enter => return self.committed(),
            TextKey::Escape => return TextEditResult::Cancel,
            TextKey::Backspace => {
                if self.caret > 0 {
                    let at = self.byte_index(self.caret - 1);
                    self.draft.remove(at);
                    self.caret -= 1;
                }
            }
            TextKey::Delete => {
                if self.caret < len {
                    let at = self.byte_index(self.caret);
                    self.draft.remove(at);
                }
            }
            TextKey::Left => self.caret = self.caret.saturating_sub(1),
            TextKey::Right => self.caret = (self.caret + 1).min(len),
            TextKey::Home => self.caret = 0,
            TextKey::End => self.caret = len,
        }
        TextEditResult::Handled
    }

    /// Focus left the editor: commit.
    pub fn blur(&self) -> TextEditResult {
        self.committed()
    }
}

//! Sketchpad Render Library
//!
//! Turns a scene into hand-drawn strokes. [`SketchRenderer`] builds a
//! backend-neutral [`Frame`]; the optional Vello backend encodes it for the GPU.

pub mod decorations;
pub mod display;
mod renderer;
pub mod rough;

#[cfg(feature = "vello-renderer")]
mod vello_impl;

pub use display::{DrawCommand, Frame, ShapeDrawing};
pub use renderer::{
    CacheStats, RenderContext, RenderError, RenderOptions, RenderResult, Renderer, SketchRenderer,
};
pub use rough::{RoughGenerator, RoughOptions, seed_from_id};

#[cfg(feature = "vello-renderer")]
pub use vello_impl::VelloRenderer;

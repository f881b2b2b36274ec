//! Light/dark theme and the default colors each one implies.

use crate::shapes::SerializableColor;
use serde::{Deserialize, Serialize};

/// Canvas color theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Stroke color new shapes get under this theme.
    pub const fn default_foreground(self) -> SerializableColor {
        match self {
            Theme::Light => SerializableColor::rgb(0x1e, 0x1e, 0x1e),
            Theme::Dark => SerializableColor::rgb(0xe3, 0xe3, 0xe3),
        }
    }

    /// Canvas background color.
    pub const fn background(self) -> SerializableColor {
        match self {
            Theme::Light => SerializableColor::rgb(0xff, 0xff, 0xff),
            Theme::Dark => SerializableColor::rgb(0x12, 0x12, 0x12),
        }
    }

    /// Color used for selection outlines, handles and the marquee.
    pub const fn selection(self) -> SerializableColor {
        match self {
            Theme::Light => SerializableColor::rgb(0x3b, 0x82, 0xf6),
            Theme::Dark => SerializableColor::rgb(0x60, 0xa5, 0xfa),
        }
    }

    /// The other theme.
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

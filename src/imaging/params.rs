//! Parameter types for codec operations.
//!
//! These describe *what* the codec should do, never *how*. The
//! [`backend`](super::backend) turns them into pixel work, which keeps the
//! layout code independent of the `image` crate and lets tests swap in a mock.
//!
//! ## Types
//!
//! - [`Quality`]: Lossy encoding quality (1–100, default 90). Clamped on construction.
//! - [`OutputFormat`]: Encoder chosen from the output file extension.
//! - [`Rotation`]: Quarter/half-turn correction read from orientation metadata.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(90)
    }
}

/// Encoders the collage can be written with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Lossy, honours [`Quality`].
    Jpeg,
    /// Lossless, ignores [`Quality`].
    Png,
}

impl OutputFormat {
    /// Pick the encoder from a path's extension (case-insensitive).
    ///
    /// Returns `None` for extensions without a compiled-in encoder.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
        }
    }

    /// Largest width or height the encoder accepts.
    ///
    /// JPEG stores dimensions in 16 bits; PNG in 31.
    pub fn max_dimension(self) -> u32 {
        match self {
            Self::Jpeg => u32::from(u16::MAX),
            Self::Png => i32::MAX as u32,
        }
    }
}

/// Orientation correction to apply after decoding.
///
/// Only pure rotations are honoured. Mirrored orientations and anything
/// unrecognised map to [`Rotation::None`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rotation {
    #[default]
    None,
    /// Turn 90° clockwise (EXIF 6).
    Clockwise90,
    /// Turn 180° (EXIF 3).
    Half,
    /// Turn 90° counter-clockwise (EXIF 8).
    CounterClockwise90,
}

impl Rotation {
    /// Map a raw EXIF `Orientation` tag value.
    pub fn from_exif(code: u16) -> Self {
        match code {
            3 => Self::Half,
            6 => Self::Clockwise90,
            8 => Self::CounterClockwise90,
            _ => Self::None,
        }
    }

    /// Whether applying this rotation swaps width and height.
    pub fn swaps_axes(self) -> bool {
        matches!(self, Self::Clockwise90 | Self::CounterClockwise90)
    }
}

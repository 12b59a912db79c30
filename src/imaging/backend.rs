//! Codec backend trait and shared types.
//!
//! The [`ImageBackend`] trait is the seam between the collage layout and the
//! codec library: decode a source picture, read its orientation metadata,
//! and encode the finished canvas. Everything between those three calls is
//! plain pixel-buffer work on [`RgbImage`].
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend): pure Rust, statically
//! linked, built on the `image` crate.

use super::params::{OutputFormat, Quality, Rotation};
use image::RgbImage;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Decode failed: {0}")]
    Decode(String),
    #[error("Orientation metadata unreadable: {0}")]
    Metadata(String),
    #[error("Encode failed: {0}")]
    Encode(String),
}

/// Trait for codec backends.
///
/// Implementations must be `Sync`: normalization calls [`decode`](Self::decode)
/// and [`read_orientation`](Self::read_orientation) from rayon workers.
pub trait ImageBackend: Sync {
    /// Decode a picture into an 8-bit RGB buffer, exactly as stored (no
    /// orientation applied).
    fn decode(&self, path: &Path) -> Result<RgbImage, BackendError>;

    /// Read the rotation the picture's metadata asks for.
    ///
    /// Absent metadata is `Ok(Rotation::None)`. Malformed metadata is an
    /// error the caller is expected to degrade to no rotation.
    fn read_orientation(&self, path: &Path) -> Result<Rotation, BackendError>;

    /// Decode and read orientation together.
    ///
    /// The outer error is a decode failure; the inner one is unreadable
    /// metadata, which never prevents the pixels from being returned.
    /// Backends that can do both from one open file should override this.
    fn decode_with_orientation(
        &self,
        path: &Path,
    ) -> Result<(RgbImage, Result<Rotation, BackendError>), BackendError> {
        let pixels = self.decode(path)?;
        Ok((pixels, self.read_orientation(path)))
    }

    /// Encode a canvas into the bytes of an image file.
    fn encode(
        &self,
        image: &RgbImage,
        format: OutputFormat,
        quality: Quality,
    ) -> Result<Vec<u8>, BackendError>;
}

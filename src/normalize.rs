//! Frame normalization.
//!
//! Turns one [`SourcePicture`] into a [`NormalizedFrame`]: decode, apply the
//! orientation recorded in the picture's metadata, and rescale to the run's
//! frame width with Lanczos3, keeping the aspect ratio.
//!
//! ## Failure policy
//!
//! - A picture that cannot be decoded becomes a [`NormalizeError`] naming the
//!   picture. The batch driver collects those and carries on.
//! - Unreadable orientation metadata is not an error: the picture is used
//!   as stored.
//!
//! ## Parallel Processing
//!
//! [`normalize_all`] fans pictures out over the global rayon pool. Each
//! picture is independent, so one failure never affects its siblings.

use crate::imaging::{BackendError, ImageBackend, Rotation, scaled_height};
use crate::types::{NormalizedFrame, SourcePicture};
use image::RgbImage;
use image::imageops::{self, FilterType};
use rayon::prelude::*;
use std::path::PathBuf;
use thiserror::Error;

/// A picture that could not be turned into a frame.
#[derive(Error, Debug)]
#[error("{}: {source}", .path.display())]
pub struct NormalizeError {
    pub path: PathBuf,
    #[source]
    pub source: BackendError,
}

/// Outcome of normalizing a batch of pictures.
#[derive(Debug, Default)]
pub struct NormalizedBatch {
    pub frames: Vec<NormalizedFrame>,
    pub skipped: Vec<NormalizeError>,
}

/// Normalize a single picture.
pub fn normalize(
    backend: &impl ImageBackend,
    picture: &SourcePicture,
    target_width: u32,
    auto_rotate: bool,
) -> Result<NormalizedFrame, NormalizeError> {
    let path = picture.path();
    let into_error = |source| NormalizeError {
        path: path.to_path_buf(),
        source,
    };

    let pixels = if auto_rotate {
        let (pixels, rotation) = backend.decode_with_orientation(path).map_err(into_error)?;
        let rotation = rotation.unwrap_or_else(|err| {
            tracing::debug!(picture = %picture, error = %err, "ignoring orientation metadata");
            Rotation::None
        });
        apply_rotation(pixels, rotation)
    } else {
        backend.decode(path).map_err(into_error)?
    };

    Ok(NormalizedFrame::new(
        path,
        resize_to_width(pixels, target_width),
    ))
}

/// Normalize every picture in parallel.
///
/// `on_done` is called from worker threads as each picture finishes, with
/// the picture's index in `pictures`. Frames come back in input order.
pub fn normalize_all<B, F>(
    backend: &B,
    pictures: &[SourcePicture],
    target_width: u32,
    auto_rotate: bool,
    on_done: F,
) -> NormalizedBatch
where
    B: ImageBackend,
    F: Fn(usize, &Result<NormalizedFrame, NormalizeError>) + Sync,
{
    let results: Vec<Result<NormalizedFrame, NormalizeError>> = pictures
        .par_iter()
        .enumerate()
        .map(|(index, picture)| {
            let result = normalize(backend, picture, target_width, auto_rotate);
            on_done(index, &result);
            result
        })
        .collect();

    let mut batch = NormalizedBatch::default();
    for result in results {
        match result {
            Ok(frame) => batch.frames.push(frame),
            Err(err) => {
                tracing::warn!(error = %err, "skipping picture");
                batch.skipped.push(err);
            }
        }
    }
    batch
}

/// Rotate a buffer by a quarter or half turn. Quarter turns swap the axes.
pub fn apply_rotation(pixels: RgbImage, rotation: Rotation) -> RgbImage {
    match rotation {
        Rotation::None => pixels,
        Rotation::Clockwise90 => imageops::rotate90(&pixels),
        Rotation::Half => imageops::rotate180(&pixels),
        Rotation::CounterClockwise90 => imageops::rotate270(&pixels),
    }
}

/// Rescale to `target_width`, height `floor(h * target_width / w)`.
///
/// A buffer already at the target width is returned untouched, so
/// normalizing a frame twice never drifts.
pub fn resize_to_width(pixels: RgbImage, target_width: u32) -> RgbImage {
    if pixels.width() == target_width {
        return pixels;
    }
    let height = scaled_height(pixels.dimensions(), target_width);
    imageops::resize(&pixels, target_width, height, FilterType::Lanczos3)
}

//! Pure Rust codec backend on the `image` crate.
//!
//! Everything is statically linked into the binary.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG) | `image::ImageReader` with content sniffing |
//! | Orientation | `image::ImageDecoder::orientation` (EXIF `0x0112`) |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` at the configured quality |
//! | Encode → PNG | `image::codecs::png::PngEncoder` |

use super::backend::{BackendError, ImageBackend};
use super::params::{OutputFormat, Quality, Rotation};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::metadata::Orientation;
use image::{
    DynamicImage, ExtendedColorType, ImageDecoder, ImageEncoder, ImageFormat, ImageReader,
    RgbImage,
};
use std::path::Path;
use std::sync::LazyLock;

/// Extensions a picture may carry to be picked up by discovery.
const PICTURE_CANDIDATES: &[(&str, ImageFormat)] = &[
    ("jpg", ImageFormat::Jpeg),
    ("jpeg", ImageFormat::Jpeg),
    ("png", ImageFormat::Png),
];

static SUPPORTED_EXTENSIONS: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    PICTURE_CANDIDATES
        .iter()
        .filter(|(_, fmt)| fmt.reading_enabled())
        .map(|(ext, _)| *ext)
        .collect()
});

/// Returns the picture extensions that have working decoders compiled in.
pub fn supported_input_extensions() -> &'static [&'static str] {
    &SUPPORTED_EXTENSIONS
}

/// Pure Rust backend using the `image` crate.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn open_reader(path: &Path) -> Result<ImageReader<std::io::BufReader<std::fs::File>>, BackendError> {
    // Sniff the content rather than trusting the extension: phones happily
    // save PNG screenshots as `.jpg`.
    Ok(ImageReader::open(path)?.with_guessed_format()?)
}

fn rotation_from_orientation(orientation: Orientation) -> Rotation {
    match orientation {
        Orientation::Rotate90 => Rotation::Clockwise90,
        Orientation::Rotate180 => Rotation::Half,
        Orientation::Rotate270 => Rotation::CounterClockwise90,
        _ => Rotation::None,
    }
}

/// Reject empty buffers and convert to RGB8.
fn into_rgb(img: DynamicImage, path: &Path) -> Result<RgbImage, BackendError> {
    if img.width() == 0 || img.height() == 0 {
        return Err(BackendError::Decode(format!(
            "{}: empty image ({}x{})",
            path.display(),
            img.width(),
            img.height()
        )));
    }
    Ok(img.to_rgb8())
}

fn decode_error(path: &Path, e: image::ImageError) -> BackendError {
    BackendError::Decode(format!("{}: {}", path.display(), e))
}

fn metadata_error(path: &Path, e: image::ImageError) -> BackendError {
    BackendError::Metadata(format!("{}: {}", path.display(), e))
}

impl ImageBackend for RustBackend {
    fn decode(&self, path: &Path) -> Result<RgbImage, BackendError> {
        let img = open_reader(path)?
            .decode()
            .map_err(|e| decode_error(path, e))?;
        into_rgb(img, path)
    }

    fn read_orientation(&self, path: &Path) -> Result<Rotation, BackendError> {
        let mut decoder = open_reader(path)?
            .into_decoder()
            .map_err(|e| metadata_error(path, e))?;
        let orientation = decoder
            .orientation()
            .map_err(|e| metadata_error(path, e))?;
        Ok(rotation_from_orientation(orientation))
    }

    /// One open, one header parse: the orientation is read off the decoder
    /// before it is consumed for pixels.
    fn decode_with_orientation(
        &self,
        path: &Path,
    ) -> Result<(RgbImage, Result<Rotation, BackendError>), BackendError> {
        let mut decoder = open_reader(path)?
            .into_decoder()
            .map_err(|e| decode_error(path, e))?;
        let rotation = decoder
            .orientation()
            .map(rotation_from_orientation)
            .map_err(|e| metadata_error(path, e));
        let img = DynamicImage::from_decoder(decoder).map_err(|e| decode_error(path, e))?;
        Ok((into_rgb(img, path)?, rotation))
    }

    fn encode(
        &self,
        image: &RgbImage,
        format: OutputFormat,
        quality: Quality,
    ) -> Result<Vec<u8>, BackendError> {
        let mut bytes = Vec::new();
        let (width, height) = image.dimensions();
        let result = match format {
            OutputFormat::Jpeg => {
                JpegEncoder::new_with_quality(&mut bytes, quality.value() as u8).write_image(
                    image.as_raw(),
                    width,
                    height,
                    ExtendedColorType::Rgb8,
                )
            }
            OutputFormat::Png => PngEncoder::new(&mut bytes).write_image(
                image.as_raw(),
                width,
                height,
                ExtendedColorType::Rgb8,
            ),
        };
        result.map_err(|e| {
            BackendError::Encode(format!(
                "{width}x{height} {}: {e}",
                format.extension().to_uppercase()
            ))
        })?;
        Ok(bytes)
    }
}

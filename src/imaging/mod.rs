//! Codec access and dimension math, pure Rust.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image::ImageReader` (JPEG, PNG) |
//! | **Orientation** | `image::ImageDecoder::orientation` |
//! | **Encode** | JPEG at configured quality, or lossless PNG |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Quality, output format, rotation
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]

pub mod backend;
mod calculations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, ImageBackend};
pub use calculations::{crop_split, scaled_height, square_column_count};
pub use params::{OutputFormat, Quality, Rotation};
pub use rust_backend::{RustBackend, supported_input_extensions};

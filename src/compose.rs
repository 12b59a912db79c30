//! Collage composition.
//!
//! Columns sit side by side, column `i` starting at `x = i * frame_width`.
//! Inside a column, frames stack from the top with no gaps. The canvas
//! starts black and frames are copied in opaquely (no blending).
//!
//! ```text
//!  x=0      x=w      x=2w
//!  ┌────────┬────────┬────────┐ y=0
//!  │ frame  │ frame  │ frame  │
//!  ├────────┤        ├────────┤
//!  │ frame  ├────────┤ frame  │
//!  │        │ frame  ├────────┤
//!  ├────────┤        │ frame  │
//!  │ frame  ├────────┴────────┤ ← min height (crop line)
//!  └────────┘  black          │
//! ```

use crate::types::Column;
use image::RgbImage;
use image::imageops;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ComposeError {
    #[error("{columns} columns of {frame_width}px do not fit on one canvas")]
    TooWide { columns: usize, frame_width: u32 },
}

/// Where one frame lands on the canvas.
///
/// Offsets are `u64` so they can be computed for any column count; only
/// layouts whose [`canvas_size`] fits are ever painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub column: usize,
    /// Index of the frame within its column.
    pub row: usize,
    pub x: u64,
    pub y: u64,
    pub width: u32,
    pub height: u32,
}

/// Compute every frame's rectangle, column by column, top to bottom.
pub fn placements(columns: &[Column], frame_width: u32) -> Vec<Placement> {
    let mut placed = Vec::new();
    for (column_index, column) in columns.iter().enumerate() {
        let x = u64::try_from(column_index)
            .unwrap_or(u64::MAX)
            .saturating_mul(u64::from(frame_width));
        let mut y = 0u64;
        for (row, frame) in column.frames().iter().enumerate() {
            placed.push(Placement {
                column: column_index,
                row,
                x,
                y,
                width: frame.width(),
                height: frame.height(),
            });
            y += u64::from(frame.height());
        }
    }
    placed
}

/// Canvas size before any trimming: all columns wide, tallest column high.
///
/// `None` when the width does not fit in a `u32`.
pub fn canvas_size(columns: &[Column], frame_width: u32) -> Option<(u32, u32)> {
    let width = u32::try_from(columns.len())
        .ok()?
        .checked_mul(frame_width)?;
    let height = columns.iter().map(Column::height).max().unwrap_or(0);
    Some((width, height))
}

/// Paint the collage.
///
/// The canvas is allocated at the tallest column's height. With
/// `crop_to_min_height`, it is then truncated to `min_height` rows (a plain
/// rectangular cut, never a resample). A `min_height` at or above the canvas
/// height leaves it as is.
#[tracing::instrument(skip(columns))]
pub fn compose(
    columns: &[Column],
    frame_width: u32,
    crop_to_min_height: bool,
    min_height: u32,
) -> Result<RgbImage, ComposeError> {
    let (width, height) = canvas_size(columns, frame_width).ok_or(ComposeError::TooWide {
        columns: columns.len(),
        frame_width,
    })?;
    let mut canvas = RgbImage::new(width, height);

    for placement in placements(columns, frame_width) {
        let frame = &columns[placement.column].frames()[placement.row];
        // Both offsets are inside a u32 canvas here.
        imageops::replace(
            &mut canvas,
            &frame.pixels,
            i64::try_from(placement.x).unwrap_or(i64::MAX),
            i64::try_from(placement.y).unwrap_or(i64::MAX),
        );
    }

    if crop_to_min_height && min_height < height {
        return Ok(imageops::crop_imm(&canvas, 0, 0, width, min_height).to_image());
    }
    Ok(canvas)
}

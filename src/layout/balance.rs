//! Column balancing by proportional cropping.
//!
//! Every column taller than the shortest one (by more than a pixel) sheds
//! its excess evenly across its frames: each frame loses
//! `floor(excess / frame_count)` rows, split between top and bottom. Integer
//! division leaves a column at most `frame_count - 1` rows above the target;
//! that residual is accepted and later trimmed off by the canvas crop.

use crate::imaging::crop_split;
use crate::types::{Column, NormalizedFrame};
use image::imageops;

/// Columns after balancing, with the height they were balanced toward.
#[derive(Debug, Clone, PartialEq)]
pub struct Balanced {
    pub columns: Vec<Column>,
    /// Shortest non-empty column height before cropping.
    pub min_height: u32,
}

/// Crop frames so every column converges on the shortest column's height.
///
/// Empty columns take no part: they neither define the target height nor
/// get cropped. Frame order and widths are unchanged.
#[tracing::instrument(skip_all, fields(columns = columns.len()))]
pub fn balance(columns: Vec<Column>) -> Balanced {
    let min_height = columns
        .iter()
        .filter(|c| !c.is_empty())
        .map(Column::height)
        .min()
        .unwrap_or(0);

    let columns = columns
        .into_iter()
        .map(|column| {
            if column.is_empty() || column.height() <= min_height + 1 {
                return column;
            }
            let excess = column.height() - min_height;
            let per_frame = excess / column.len() as u32;
            tracing::debug!(
                height = column.height(),
                excess,
                per_frame,
                "cropping column"
            );
            if per_frame == 0 {
                return column;
            }
            let frames = column
                .into_frames()
                .into_iter()
                .map(|frame| crop_frame(frame, per_frame))
                .collect();
            Column::from_frames(frames)
        })
        .collect();

    Balanced {
        columns,
        min_height,
    }
}

/// Remove `rows` rows from a frame, `floor(rows / 2)` from the top and the
/// rest from the bottom.
///
/// Clamped so at least one row always survives.
pub fn crop_frame(frame: NormalizedFrame, rows: u32) -> NormalizedFrame {
    let (width, height) = frame.pixels.dimensions();
    let (top, bottom) = crop_split(rows);
    let top = top.min(height.saturating_sub(1));
    let bottom = bottom.min(height.saturating_sub(1) - top);
    let kept = height - top - bottom;
    if kept == height {
        return frame;
    }
    let pixels = imageops::crop_imm(&frame.pixels, 0, top, width, kept).to_image();
    NormalizedFrame {
        source: frame.source,
        pixels,
    }
}

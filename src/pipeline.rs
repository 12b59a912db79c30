//! End-to-end collage run.
//!
//! ```text
//! validate → discover → shuffle/subset → normalize (parallel)
//!          → pack → balance → compose → encode → write
//! ```
//!
//! Every stage after normalization is sequential over the full set. All
//! shuffles draw from one [`StdRng`], seeded from the config when a seed is
//! given, so a seeded run over the same folders produces the same collage.
//!
//! ## Failure policy
//!
//! | Failure | Effect |
//! |---|---|
//! | Invalid config (including a zero column count) | abort before discovery |
//! | Missing input directory | abort |
//! | Nothing discovered, or every picture failed | abort, nothing written |
//! | One picture fails to decode | skipped, reported, run continues |
//! | Encoding or writing the collage fails | abort, no partial file left |
//!
//! ## Progress
//!
//! Callers may pass a channel sender; [`PipelineEvent`]s are sent as stages
//! complete. Normalization events arrive from worker threads in completion
//! order.

use crate::compose::{ComposeError, canvas_size, compose};
use crate::config::{CollageConfig, ConfigError};
use crate::imaging::{BackendError, ImageBackend, OutputFormat, Quality};
use crate::layout::{Balanced, balance, column_count, pack};
use crate::normalize::normalize_all;
use crate::scan::{ScanError, discover};
use crate::types::Column;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::io::Write;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("Discovery failed: {0}")]
    Scan(#[from] ScanError),
    #[error("No usable pictures ({discovered} discovered, {failed} failed to decode)")]
    EmptyInput { discovered: usize, failed: usize },
    #[error("Failed to compose collage: {0}")]
    Compose(#[from] ComposeError),
    #[error("Collage would be {width}x{height}, over the {limit}px limit of {format:?} output")]
    CanvasTooLarge {
        width: u32,
        height: u32,
        limit: u32,
        format: OutputFormat,
    },
    #[error("Failed to encode collage: {0}")]
    Encode(#[source] BackendError),
    #[error("Failed to write collage: {0}")]
    Io(#[from] std::io::Error),
}

/// Progress notifications sent while a run is underway.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineEvent {
    /// Discovery finished; `selected` pictures will be normalized.
    Discovered { found: usize, selected: usize },
    /// A picture became a frame. `position` is 1-based among the selected.
    Normalized {
        position: usize,
        source: PathBuf,
        width: u32,
        height: u32,
    },
    /// A picture was dropped from the run.
    Skipped {
        position: usize,
        source: PathBuf,
        reason: String,
    },
    /// Frames are packed; heights are column totals in canvas order.
    LayoutDecided { columns: usize, heights: Vec<u32> },
    /// Columns were cropped toward `min_height`.
    Balanced { min_height: u32, heights: Vec<u32> },
    /// The collage is on disk.
    Written {
        path: PathBuf,
        width: u32,
        height: u32,
    },
}

/// A picture left out of the collage, and why.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedPicture {
    pub path: PathBuf,
    pub reason: String,
}

/// Summary of a finished run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub discovered: usize,
    /// Pictures handed to normalization (after the subset cap).
    pub selected: usize,
    /// Frames that made it onto the canvas.
    pub used: usize,
    pub skipped: Vec<SkippedPicture>,
    pub columns: usize,
    /// Column totals straight after packing.
    pub packed_heights: Vec<u32>,
    /// Column totals after balancing. Same as `packed_heights` when
    /// cropping is disabled.
    pub final_heights: Vec<u32>,
    /// Shortest non-empty column after packing.
    pub min_height: u32,
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub output_path: PathBuf,
}

/// What `check` found: the config is valid and this many pictures would be used.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckReport {
    pub discovered: usize,
    pub selected: usize,
}

fn emit(events: &Option<Sender<PipelineEvent>>, event: PipelineEvent) {
    if let Some(tx) = events {
        // A dropped receiver only means nobody is listening.
        tx.send(event).ok();
    }
}

fn heights(columns: &[Column]) -> Vec<u32> {
    columns.iter().map(Column::height).collect()
}

/// Validate the config and report the output encoder and column override.
fn prepare(config: &CollageConfig) -> Result<(OutputFormat, Option<NonZeroUsize>), PipelineError> {
    config.validate()?;
    let format = config.output_format().ok_or_else(|| {
        ConfigError::Validation(format!(
            "unsupported output extension: {}",
            config.output_path.display()
        ))
    })?;
    let columns = match config.num_columns {
        Some(n) => Some(NonZeroUsize::new(n).ok_or(ConfigError::InvalidColumnCount(n))?),
        None => None,
    };
    Ok((format, columns))
}

fn selected_count(discovered: usize, config: &CollageConfig) -> usize {
    config
        .subset_size
        .map_or(discovered, |cap| cap.min(discovered))
}

/// Validate and discover without decoding anything.
pub fn check(folders: &[PathBuf], config: &CollageConfig) -> Result<CheckReport, PipelineError> {
    prepare(config)?;
    let discovered = discover(folders)?.len();
    Ok(CheckReport {
        discovered,
        selected: selected_count(discovered, config),
    })
}

/// Build the collage from every picture below `folders` and write it to
/// `config.output_path`.
#[tracing::instrument(skip_all, fields(output = %config.output_path.display()))]
pub fn run(
    backend: &impl ImageBackend,
    folders: &[PathBuf],
    config: &CollageConfig,
    events: Option<Sender<PipelineEvent>>,
) -> Result<RunReport, PipelineError> {
    let (format, requested_columns) = prepare(config)?;

    let mut pictures = discover(folders)?;
    let discovered = pictures.len();
    if discovered == 0 {
        return Err(PipelineError::EmptyInput {
            discovered: 0,
            failed: 0,
        });
    }

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    pictures.shuffle(&mut rng);
    pictures.truncate(selected_count(discovered, config));
    emit(
        &events,
        PipelineEvent::Discovered {
            found: discovered,
            selected: pictures.len(),
        },
    );

    let batch = normalize_all(
        backend,
        &pictures,
        config.target_width,
        config.auto_rotate,
        |index, result| {
            let event = match result {
                Ok(frame) => PipelineEvent::Normalized {
                    position: index + 1,
                    source: frame.source.clone(),
                    width: frame.width(),
                    height: frame.height(),
                },
                Err(err) => PipelineEvent::Skipped {
                    position: index + 1,
                    source: err.path.clone(),
                    reason: err.source.to_string(),
                },
            };
            emit(&events, event);
        },
    );

    let skipped: Vec<SkippedPicture> = batch
        .skipped
        .iter()
        .map(|err| SkippedPicture {
            path: err.path.clone(),
            reason: err.source.to_string(),
        })
        .collect();
    if batch.frames.is_empty() {
        return Err(PipelineError::EmptyInput {
            discovered,
            failed: skipped.len(),
        });
    }
    let used = batch.frames.len();

    let num_columns = column_count(&batch.frames, config.target_width, requested_columns);
    let columns = pack(batch.frames, num_columns, &mut rng);
    let packed_heights = heights(&columns);
    tracing::info!(columns = num_columns.get(), ?packed_heights, "layout decided");
    emit(
        &events,
        PipelineEvent::LayoutDecided {
            columns: num_columns.get(),
            heights: packed_heights.clone(),
        },
    );

    let Balanced {
        columns,
        min_height,
    } = if config.crop_to_equal_height {
        let balanced = balance(columns);
        emit(
            &events,
            PipelineEvent::Balanced {
                min_height: balanced.min_height,
                heights: heights(&balanced.columns),
            },
        );
        balanced
    } else {
        let min_height = packed_heights
            .iter()
            .copied()
            .filter(|&h| h > 0)
            .min()
            .unwrap_or(0);
        Balanced {
            columns,
            min_height,
        }
    };

    let final_heights = heights(&columns);
    check_canvas_fits(&columns, config, min_height, format)?;
    let canvas = compose(
        &columns,
        config.target_width,
        config.crop_to_equal_height,
        min_height,
    )?;

    let bytes = backend
        .encode(&canvas, format, Quality::new(config.quality))
        .map_err(PipelineError::Encode)?;
    write_atomically(&config.output_path, &bytes)?;
    tracing::info!(
        width = canvas.width(),
        height = canvas.height(),
        "collage written"
    );
    emit(
        &events,
        PipelineEvent::Written {
            path: config.output_path.clone(),
            width: canvas.width(),
            height: canvas.height(),
        },
    );

    Ok(RunReport {
        discovered,
        selected: pictures.len(),
        used,
        skipped,
        columns: num_columns.get(),
        packed_heights,
        final_heights,
        min_height,
        canvas_width: canvas.width(),
        canvas_height: canvas.height(),
        output_path: config.output_path.clone(),
    })
}

/// Refuse a layout the encoder would reject, before the canvas is allocated.
fn check_canvas_fits(
    columns: &[Column],
    config: &CollageConfig,
    min_height: u32,
    format: OutputFormat,
) -> Result<(), PipelineError> {
    let (width, tallest) =
        canvas_size(columns, config.target_width).ok_or(ComposeError::TooWide {
            columns: columns.len(),
            frame_width: config.target_width,
        })?;
    let height = if config.crop_to_equal_height {
        tallest.min(min_height)
    } else {
        tallest
    };
    let limit = format.max_dimension();
    if width > limit || height > limit {
        return Err(PipelineError::CanvasTooLarge {
            width,
            height,
            limit,
            format,
        });
    }
    Ok(())
}

/// Write `bytes` to a temporary file next to `path`, then rename it over
/// `path`. Readers see either the old file or the complete new one.
pub fn write_atomically(path: &Path, bytes: &[u8]) -> Result<(), std::io::Error> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;
    let mut file = tempfile::Builder::new()
        .prefix(".bigfusion-")
        .suffix(".part")
        .tempfile_in(dir)?;
    file.write_all(bytes)?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|err| err.error)?;
    Ok(())
}

//! Collage configuration module.
//!
//! Handles loading, validating, and merging the optional `bigfusion.toml`.
//! Stock defaults are the base layer; a user file overrides any subset of
//! keys; command-line flags override the file.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! target_width = 300            # Width of every frame, in pixels
//! output_path = "bigfusion.jpg" # .jpg/.jpeg (lossy) or .png (lossless)
//! # subset_size = 500           # Cap on pictures used (random sample)
//! # num_columns = 6             # Skip the square-canvas heuristic
//! crop_to_equal_height = true   # Trim columns to the shortest one
//! auto_rotate = true            # Honour EXIF orientation
//! # seed = 42                   # Reproducible shuffles
//! quality = 90                  # JPEG quality (1-100)
//!
//! [processing]
//! max_processes = 4             # Max parallel decoders (omit for auto = CPU cores)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::OutputFormat;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
    #[error("Invalid column count {0}: at least one column is required")]
    InvalidColumnCount(usize),
}

/// Collage configuration.
///
/// All fields have sensible defaults. User config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CollageConfig {
    /// Width every frame is rescaled to, in pixels.
    pub target_width: u32,
    /// Where the encoded collage is written. The extension picks the encoder.
    pub output_path: PathBuf,
    /// Use at most this many pictures, sampled at random after discovery.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subset_size: Option<usize>,
    /// Explicit column count. When absent, a roughly square canvas is targeted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_columns: Option<usize>,
    /// Crop frames so every column ends at the shortest column's height.
    pub crop_to_equal_height: bool,
    /// Apply the rotation recorded in orientation metadata.
    pub auto_rotate: bool,
    /// Seed for every shuffle in the run. Absent means a fresh random layout.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// JPEG encoding quality (1-100). Ignored for PNG output.
    pub quality: u32,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl Default for CollageConfig {
    fn default() -> Self {
        Self {
            target_width: 300,
            output_path: PathBuf::from("bigfusion.jpg"),
            subset_size: None,
            num_columns: None,
            crop_to_equal_height: true,
            auto_rotate: true,
            seed: None,
            quality: 90,
            processing: ProcessingConfig::default(),
        }
    }
}

impl CollageConfig {
    /// Validate config values are within acceptable ranges.
    ///
    /// Runs before any discovery or decoding, so a bad column count or output
    /// extension never costs a decode pass.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.target_width == 0 {
            return Err(ConfigError::Validation(
                "target_width must be at least 1".into(),
            ));
        }
        if self.num_columns == Some(0) {
            return Err(ConfigError::InvalidColumnCount(0));
        }
        if self.subset_size == Some(0) {
            return Err(ConfigError::Validation(
                "subset_size must be at least 1".into(),
            ));
        }
        if !(1..=100).contains(&self.quality) {
            return Err(ConfigError::Validation("quality must be 1-100".into()));
        }
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }
        let Some(format) = self.output_format() else {
            return Err(ConfigError::Validation(format!(
                "output_path must end in .jpg, .jpeg or .png: {}",
                self.output_path.display()
            )));
        };
        self.validate_canvas_width(format)
    }

    /// The canvas is `columns * target_width` wide; it must fit the encoder.
    /// Only an explicit column count fixes the width ahead of decoding.
    fn validate_canvas_width(&self, format: OutputFormat) -> Result<(), ConfigError> {
        let limit = u64::from(format.max_dimension());
        let columns = self.num_columns.unwrap_or(1);
        let width = u64::try_from(columns)
            .ok()
            .and_then(|c| c.checked_mul(u64::from(self.target_width)));
        if width.is_none_or(|w| w > limit) {
            return Err(ConfigError::Validation(format!(
                "{} columns of {}px exceed the {}px {} width limit",
                columns,
                self.target_width,
                limit,
                format.extension().to_uppercase()
            )));
        }
        Ok(())
    }

    /// Encoder implied by `output_path`.
    pub fn output_format(&self) -> Option<OutputFormat> {
        OutputFormat::from_path(&self.output_path)
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel decode workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_processes.map(|n| n.min(cores)).unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(CollageConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config must serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Read a config file as a raw TOML value.
pub fn load_raw_config(path: &Path) -> Result<toml::Value, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<CollageConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: CollageConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load the collage config.
///
/// With no file, the stock defaults are returned. With a file, its values
/// are merged on top of the defaults, unknown keys are rejected, and the
/// result is validated. A named file that does not exist is an error.
pub fn load_config(path: Option<&Path>) -> Result<CollageConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = path.map(load_raw_config).transpose()?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `bigfusion.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Bigfusion Configuration
# =======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Command-line flags override this file.
# Unknown keys will cause an error.

# Width every picture is rescaled to, in pixels. Heights follow the
# picture's aspect ratio.
target_width = 300

# Output file. The extension picks the encoder:
#   .jpg / .jpeg -> JPEG at `quality`
#   .png         -> lossless PNG (large!)
output_path = "bigfusion.jpg"

# Use at most this many pictures, sampled at random from everything found.
# subset_size = 500

# Number of columns. When omitted, enough columns are used to make the
# collage roughly square.
# num_columns = 6

# Crop frames so every column ends at the height of the shortest one.
# With `false`, the canvas is as tall as the tallest column and shorter
# columns end early on a black background.
crop_to_equal_height = true

# Rotate pictures according to their EXIF orientation tag.
auto_rotate = true

# Seed for picture sampling and layout shuffles. Set it to reproduce a
# collage exactly; omit it for a fresh arrangement on every run.
# seed = 42

# JPEG encoding quality (1 = worst, 100 = best).
quality = 90

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel decode workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}

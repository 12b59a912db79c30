//! Shared types passed between pipeline stages.
//!
//! Discovery produces [`SourcePicture`]s, normalization turns each one into a
//! [`NormalizedFrame`], and the packer groups frames into [`Column`]s that the
//! balancer and composer work on.

use image::RgbImage;
use std::fmt;
use std::path::{Path, PathBuf};

/// One undecoded picture found on disk.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SourcePicture {
    path: PathBuf,
}

impl SourcePicture {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl fmt::Display for SourcePicture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

/// A decoded, orientation-corrected picture rescaled to the run's frame width.
///
/// Every frame produced in one run has the same width.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedFrame {
    /// Where the frame came from, for reporting.
    pub source: PathBuf,
    pub pixels: RgbImage,
}

impl NormalizedFrame {
    pub fn new(source: impl Into<PathBuf>, pixels: RgbImage) -> Self {
        Self {
            source: source.into(),
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }
}

/// A vertical stack of frames sharing one horizontal slot of the collage.
///
/// The total height is cached and kept in sync by every mutation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Column {
    frames: Vec<NormalizedFrame>,
    height: u32,
}

impl Column {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_frames(frames: Vec<NormalizedFrame>) -> Self {
        let height = frames.iter().map(NormalizedFrame::height).sum();
        Self { frames, height }
    }

    pub fn push(&mut self, frame: NormalizedFrame) {
        self.height += frame.height();
        self.frames.push(frame);
    }

    /// Sum of member frame heights.
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn frames(&self) -> &[NormalizedFrame] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn into_frames(self) -> Vec<NormalizedFrame> {
        self.frames
    }

    /// Reorder frames in place. Height is order-independent.
    pub fn shuffle<R: rand::Rng + ?Sized>(&mut self, rng: &mut R) {
        use rand::seq::SliceRandom;
        self.frames.shuffle(rng);
    }
}

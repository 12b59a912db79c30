//! # Bigfusion
//!
//! Packs every photograph below a set of folders into one large collage of
//! equal-width columns. Pictures are rescaled to a common width, dealt into
//! columns so the column heights come out close, then trimmed so the canvas
//! ends flush.
//!
//! # Architecture: One Batch Pipeline
//!
//! ```text
//! 1. Discover   folders     →  SourcePicture list   (names only, nothing decoded)
//! 2. Normalize  pictures    →  NormalizedFrame list (decode, orient, rescale; parallel)
//! 3. Pack       frames      →  columns              (greedy shortest-column, shuffled)
//! 4. Balance    columns     →  columns              (crop frames toward the shortest)
//! 5. Compose    columns     →  RGB canvas           (opaque blit on black)
//! 6. Write      canvas      →  collage file         (encode, atomic rename)
//! ```
//!
//! Only normalization is parallel. Everything after it needs the complete
//! frame set, so it runs on the calling thread.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | Optional TOML config over stock defaults, validation, `gen-config` output |
//! | [`scan`] | Walks the input folders for `.jpg`/`.jpeg`/`.png` files |
//! | [`types`] | `SourcePicture`, `NormalizedFrame`, `Column` |
//! | [`imaging`] | Codec seam (`ImageBackend`), the `image`-crate backend, dimension math |
//! | [`normalize`] | Per-picture decode, orientation fix and rescale; the parallel batch driver |
//! | [`layout`] | Column count, greedy packing, balancing by cropping |
//! | [`compose`] | Places frames on the canvas and trims it |
//! | [`pipeline`] | Runs every stage, reports progress events, writes the file |
//! | [`output`] | CLI output formatting for events and the run summary |
//!
//! # Design Decisions
//!
//! ## Approximate Balancing
//!
//! A tall column sheds `floor(excess / frames)` rows from each of its frames.
//! The leftover (fewer rows than the column has frames) disappears when the
//! canvas is cut to the shortest column, so no second pass is needed and no
//! frame is cropped more than its share.
//!
//! ## One Seedable Generator
//!
//! The subset sample, the column order and the order inside each column all
//! come from a single generator created per run. Setting `seed` makes a run
//! reproducible; without it every run lays the pictures out differently.
//!
//! ## Skip, Don't Abort
//!
//! A picture that fails to decode is reported and left out. A run only fails
//! when nothing usable is left, when the config is invalid, or when the
//! collage itself cannot be encoded or written.

pub mod compose;
pub mod config;
pub mod imaging;
pub mod layout;
pub mod normalize;
pub mod output;
pub mod pipeline;
pub mod scan;
pub mod types;

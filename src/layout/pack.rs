//! Greedy column packing (longest-first, shortest-column-wins).
//!
//! Frames are taken tallest first and each one goes to the column with the
//! smallest running height, lowest index on ties. This is the LPT heuristic
//! from scheduling: the finished columns differ by at most the height of the
//! tallest frame.
//!
//! Afterwards the column order and the order inside each column are shuffled
//! with the run's generator. The shuffles move frames around visually but
//! never change any column's total height.

use crate::imaging::square_column_count;
use crate::types::{Column, NormalizedFrame};
use rand::Rng;
use rand::seq::SliceRandom;
use std::cmp::Reverse;
use std::num::NonZeroUsize;

/// Resolve how many columns to use.
///
/// An explicit request is used verbatim. Otherwise the count is chosen so the
/// finished canvas is roughly square.
pub fn column_count(
    frames: &[NormalizedFrame],
    frame_width: u32,
    requested: Option<NonZeroUsize>,
) -> NonZeroUsize {
    requested.unwrap_or_else(|| {
        let total: u64 = frames.iter().map(|f| u64::from(f.height())).sum();
        let count = square_column_count(frames.len(), total, frame_width);
        NonZeroUsize::new(count).unwrap_or(NonZeroUsize::MIN)
    })
}

/// Deterministic part of packing: sort tallest first, then append each
/// frame to the currently shortest column.
pub fn assign_columns(mut frames: Vec<NormalizedFrame>, num_columns: NonZeroUsize) -> Vec<Column> {
    // Stable sort: equal heights keep arrival order.
    frames.sort_by_key(|f| Reverse(f.height()));

    let mut columns: Vec<Column> = (0..num_columns.get()).map(|_| Column::new()).collect();
    for frame in frames {
        // min_by_key returns the first minimum, i.e. the lowest index.
        let target = columns
            .iter()
            .enumerate()
            .min_by_key(|(_, column)| column.height())
            .map(|(index, _)| index)
            .unwrap_or(0);
        columns[target].push(frame);
    }
    columns
}

/// Shuffle column order, then the frame order within every column.
pub fn shuffle_columns<R: Rng + ?Sized>(columns: &mut [Column], rng: &mut R) {
    columns.shuffle(rng);
    for column in columns.iter_mut() {
        column.shuffle(rng);
    }
}

/// Pack frames into exactly `num_columns` columns.
///
/// Columns may be empty when there are fewer frames than columns.
#[tracing::instrument(skip_all, fields(frames = frames.len(), columns = num_columns.get()))]
pub fn pack<R: Rng + ?Sized>(
    frames: Vec<NormalizedFrame>,
    num_columns: NonZeroUsize,
    rng: &mut R,
) -> Vec<Column> {
    let mut columns = assign_columns(frames, num_columns);
    shuffle_columns(&mut columns, rng);
    columns
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn frames(heights: &[u32]) -> Vec<NormalizedFrame> {
        heights
            .iter()
            .enumerate()
            .map(|(i, &h)| NormalizedFrame::new(format!("{i}.jpg"), RgbImage::new(300, h)))
            .collect()
    }

    fn heights(columns: &[Column]) -> Vec<u32> {
        columns.iter().map(Column::height).collect()
    }

    fn sorted(mut values: Vec<u32>) -> Vec<u32> {
        values.sort_unstable();
        values
    }

    fn cols(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    // =========================================================================
    // column_count
    // =========================================================================

    #[test]
    fn explicit_column_count_is_verbatim() {
        let f = frames(&[100; 5]);
        assert_eq!(column_count(&f, 300, Some(cols(2))).get(), 2);
        assert_eq!(column_count(&f, 300, Some(cols(40))).get(), 40);
    }

    #[test]
    fn automatic_column_count_targets_square() {
        // 100 frames of 200px at width 300 → 8 columns
        let f = frames(&[200; 100]);
        assert_eq!(column_count(&f, 300, None).get(), 8);
    }

    #[test]
    fn automatic_column_count_at_least_one() {
        let f = frames(&[10]);
        assert_eq!(column_count(&f, 300, None).get(), 1);
    }

    // =========================================================================
    // assign_columns
    // =========================================================================

    #[test]
    fn equal_frames_fill_lowest_index_first() {
        // Scenario A: 5 x 100px into 2 columns
        let columns = assign_columns(frames(&[100; 5]), cols(2));
        assert_eq!(heights(&columns), vec![300, 200]);
        assert_eq!(columns[0].len(), 3);
        assert_eq!(columns[1].len(), 2);
    }

    #[test]
    fn tallest_frames_are_placed_first() {
        let columns = assign_columns(frames(&[50, 400, 100, 300]), cols(2));
        // 400 → c0, 300 → c1, 100 → c1 (300 < 400), 50 → c0 (400 = 400, lowest index)
        assert_eq!(heights(&columns), vec![450, 400]);
        let first: Vec<u32> = columns[0].frames().iter().map(|f| f.height()).collect();
        assert_eq!(first, vec![400, 50]);
    }

    #[test]
    fn ties_keep_arrival_order() {
        let columns = assign_columns(frames(&[100, 100, 100]), cols(1));
        let sources: Vec<String> = columns[0]
            .frames()
            .iter()
            .map(|f| f.source.to_string_lossy().to_string())
            .collect();
        assert_eq!(sources, vec!["0.jpg", "1.jpg", "2.jpg"]);
    }

    #[test]
    fn more_columns_than_frames_leaves_empty_columns() {
        let columns = assign_columns(frames(&[120, 80]), cols(4));
        assert_eq!(columns.len(), 4);
        assert_eq!(heights(&columns), vec![120, 80, 0, 0]);
    }

    #[test]
    fn every_frame_lands_in_exactly_one_column() {
        let input = frames(&[13, 400, 222, 87, 87, 301, 5, 150]);
        let columns = assign_columns(input, cols(3));
        let total: usize = columns.iter().map(Column::len).sum();
        assert_eq!(total, 8);
        assert_eq!(
            heights(&columns).iter().sum::<u32>(),
            13 + 400 + 222 + 87 + 87 + 301 + 5 + 150
        );
    }

    #[test]
    fn spread_bounded_by_tallest_frame() {
        let mut rng = StdRng::seed_from_u64(0xC0FFEE);
        for round in 0..200 {
            let n = rng.random_range(1..60);
            let k = rng.random_range(1..9);
            let hs: Vec<u32> = (0..n).map(|_| rng.random_range(1..900)).collect();
            let tallest = *hs.iter().max().unwrap();

            let columns = assign_columns(frames(&hs), cols(k));
            let totals = heights(&columns);
            let spread = totals.iter().max().unwrap() - totals.iter().min().unwrap();
            assert!(
                spread <= tallest,
                "round {round}: spread {spread} > tallest {tallest} for {hs:?} in {k} columns"
            );
        }
    }

    // =========================================================================
    // pack (with shuffles)
    // =========================================================================

    #[test]
    fn shuffles_never_change_column_totals() {
        let hs = [320, 90, 410, 200, 200, 75, 640, 333, 128, 256];
        let expected = sorted(heights(&assign_columns(frames(&hs), cols(3))));

        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let packed = pack(frames(&hs), cols(3), &mut rng);
            assert_eq!(sorted(heights(&packed)), expected, "seed {seed}");
        }
    }

    #[test]
    fn scenario_a_totals() {
        let mut rng = StdRng::seed_from_u64(1);
        let packed = pack(frames(&[100; 5]), cols(2), &mut rng);
        assert_eq!(sorted(heights(&packed)), vec![200, 300]);
        let mut sizes: Vec<usize> = packed.iter().map(Column::len).collect();
        sizes.sort_unstable();
        assert_eq!(sizes, vec![2, 3]);
    }

    #[test]
    fn same_seed_same_layout() {
        let hs = [320, 90, 410, 200, 200, 75, 640, 333, 128, 256];
        let layout = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            pack(frames(&hs), cols(4), &mut rng)
                .iter()
                .map(|c| {
                    c.frames()
                        .iter()
                        .map(|f| f.source.to_string_lossy().to_string())
                        .collect::<Vec<_>>()
                })
                .collect::<Vec<_>>()
        };
        assert_eq!(layout(42), layout(42));
    }
}

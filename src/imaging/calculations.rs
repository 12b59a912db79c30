//! Pure calculation functions for frame and canvas dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

/// Height of a frame rescaled to `target_width`, preserving aspect ratio.
///
/// Computed as `floor(height * target_width / width)` in integer arithmetic,
/// so the result never drifts from the exact ratio by more than the
/// truncation itself. Clamped to at least one row.
///
/// # Examples
/// ```
/// # use bigfusion::imaging::scaled_height;
/// assert_eq!(scaled_height((4000, 3000), 300), 225);
/// assert_eq!(scaled_height((3000, 4000), 300), 400);
/// ```
pub fn scaled_height(original: (u32, u32), target_width: u32) -> u32 {
    let (width, height) = original;
    if width == 0 {
        return 1;
    }
    let h = u64::from(height) * u64::from(target_width) / u64::from(width);
    h.clamp(1, u64::from(u32::MAX)) as u32
}

/// Number of columns that makes the finished canvas roughly square.
///
/// `side = sqrt(frame_count * avg_height * frame_width)`, then
/// `columns = max(1, floor(side / frame_width))`.
///
/// # Examples
/// ```
/// # use bigfusion::imaging::square_column_count;
/// // 100 frames of 300x200 → side ≈ 2449px → 8 columns
/// assert_eq!(square_column_count(100, 20_000, 300), 8);
/// ```
pub fn square_column_count(frame_count: usize, total_height: u64, frame_width: u32) -> usize {
    if frame_count == 0 || frame_width == 0 {
        return 1;
    }
    let avg_height = total_height as f64 / frame_count as f64;
    let side = (frame_count as f64 * avg_height * f64::from(frame_width)).sqrt();
    let columns = (side / f64::from(frame_width)).floor() as usize;
    columns.max(1)
}

/// Rows to remove from the top and bottom of one frame.
///
/// The top gets `floor(crop / 2)`, the bottom the remainder.
///
/// # Examples
/// ```
/// # use bigfusion::imaging::crop_split;
/// assert_eq!(crop_split(33), (16, 17));
/// assert_eq!(crop_split(10), (5, 5));
/// ```
pub fn crop_split(crop: u32) -> (u32, u32) {
    let top = crop / 2;
    (top, crop - top)
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // scaled_height tests
    // =========================================================================

    #[test]
    fn landscape_scales_down() {
        // 4000x3000 → 300 wide: 3000 * 300 / 4000 = 225
        assert_eq!(scaled_height((4000, 3000), 300), 225);
    }

    #[test]
    fn portrait_scales_down() {
        assert_eq!(scaled_height((3000, 4000), 300), 400);
    }

    #[test]
    fn small_source_scales_up() {
        // 150x100 → 300 wide doubles the height
        assert_eq!(scaled_height((150, 100), 300), 200);
    }

    #[test]
    fn height_truncates_toward_zero() {
        // 1000 * 300 / 1024 = 292.96875
        assert_eq!(scaled_height((1024, 1000), 300), 292);
    }

    #[test]
    fn same_width_keeps_height() {
        assert_eq!(scaled_height((300, 417), 300), 417);
    }

    #[test]
    fn extreme_panorama_keeps_one_row() {
        assert_eq!(scaled_height((100_000, 10), 300), 1);
    }

    #[test]
    fn zero_width_source_is_clamped() {
        assert_eq!(scaled_height((0, 100), 300), 1);
    }

    #[test]
    fn scaled_height_matches_floor_formula() {
        for (w, h) in [(640, 480), (1920, 1080), (333, 777), (4032, 3024), (7, 13)] {
            let expected = (h as u64 * 300 / w as u64).max(1) as u32;
            assert_eq!(scaled_height((w, h), 300), expected, "{w}x{h}");
        }
    }

    // =========================================================================
    // square_column_count tests
    // =========================================================================

    #[test]
    fn square_count_for_uniform_frames() {
        // 100 frames, avg 200, width 300: sqrt(100*200*300) = 2449.49 → 8
        assert_eq!(square_column_count(100, 20_000, 300), 8);
    }

    #[test]
    fn square_count_never_below_one() {
        assert_eq!(square_column_count(1, 10, 300), 1);
        assert_eq!(square_column_count(0, 0, 300), 1);
    }

    #[test]
    fn square_count_for_scenario_a() {
        // 5 x 100px at width 300: sqrt(5*100*300) = 387.3 → 1
        assert_eq!(square_column_count(5, 500, 300), 1);
    }

    #[test]
    fn square_count_grows_with_tall_frames() {
        let short = square_column_count(50, 50 * 100, 300);
        let tall = square_column_count(50, 50 * 900, 300);
        assert!(tall > short);
    }

    // =========================================================================
    // crop_split tests
    // =========================================================================

    #[test]
    fn even_crop_is_symmetric() {
        assert_eq!(crop_split(10), (5, 5));
    }

    #[test]
    fn odd_crop_gives_bottom_the_extra_row() {
        assert_eq!(crop_split(33), (16, 17));
        assert_eq!(crop_split(1), (0, 1));
    }

    #[test]
    fn zero_crop() {
        assert_eq!(crop_split(0), (0, 0));
    }
}

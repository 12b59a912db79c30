//! CLI output formatting for the collage run.
//!
//! # Display Contract
//!
//! Every picture is shown by its 1-based position among the selected
//! pictures plus its file name; the full path follows on an indented
//! `Source:` line. Stage milestones (discovery, layout, balancing, write)
//! are single unindented lines.
//!
//! # Output Format
//!
//! ## Build
//!
//! ```text
//! Found 124 pictures, using 50
//!     001 IMG_0412.jpg → 300x225
//!     002 IMG_0413.jpg skipped
//!         Source: photos/2019/IMG_0413.jpg
//!         Reason: Decode error: unexpected EOF
//! Layout: 4 columns [2871, 2904, 2866, 2893]
//! Balanced to 2866px [2866, 2869, 2866, 2867]
//! Wrote collage.jpg (1200x2866)
//! ```
//!
//! ## Summary
//!
//! ```text
//! Collage: collage.jpg
//!     Canvas: 1200x2866
//!     Pictures: 49 of 50 selected (124 discovered)
//!     Columns: 4
//!     Skipped:
//!         photos/2019/IMG_0413.jpg: Decode error: unexpected EOF
//! ```
//!
//! # Architecture
//!
//! Each display has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout (stderr for
//! errors). Format functions are pure: no I/O, no side effects.

use crate::pipeline::{CheckReport, PipelineEvent, RunReport};
use std::path::Path;

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn height_list(heights: &[u32]) -> String {
    let items: Vec<String> = heights.iter().map(|h| h.to_string()).collect();
    format!("[{}]", items.join(", "))
}

fn plural(count: usize, word: &str) -> String {
    if count == 1 {
        format!("{count} {word}")
    } else {
        format!("{count} {word}s")
    }
}

// ============================================================================
// Build progress
// ============================================================================

/// Format a single pipeline event as display lines.
pub fn format_event(event: &PipelineEvent) -> Vec<String> {
    match event {
        PipelineEvent::Discovered { found, selected } => {
            if found == selected {
                vec![format!("Found {}", plural(*found, "picture"))]
            } else {
                vec![format!(
                    "Found {}, using {}",
                    plural(*found, "picture"),
                    selected
                )]
            }
        }
        PipelineEvent::Normalized {
            position,
            source,
            width,
            height,
        } => vec![format!(
            "{}{} {} \u{2192} {}x{}",
            indent(1),
            format_index(*position),
            file_name(source),
            width,
            height
        )],
        PipelineEvent::Skipped {
            position,
            source,
            reason,
        } => vec![
            format!(
                "{}{} {} skipped",
                indent(1),
                format_index(*position),
                file_name(source)
            ),
            format!("{}Source: {}", indent(2), source.display()),
            format!("{}Reason: {}", indent(2), reason),
        ],
        PipelineEvent::LayoutDecided { columns, heights } => vec![format!(
            "Layout: {} {}",
            plural(*columns, "column"),
            height_list(heights)
        )],
        PipelineEvent::Balanced {
            min_height,
            heights,
        } => vec![format!(
            "Balanced to {}px {}",
            min_height,
            height_list(heights)
        )],
        PipelineEvent::Written {
            path,
            width,
            height,
        } => vec![format!("Wrote {} ({}x{})", path.display(), width, height)],
    }
}

// ============================================================================
// Run summary
// ============================================================================

/// Format the report of a finished run.
pub fn format_run_summary(report: &RunReport) -> Vec<String> {
    let mut lines = vec![
        format!("Collage: {}", report.output_path.display()),
        format!(
            "{}Canvas: {}x{}",
            indent(1),
            report.canvas_width,
            report.canvas_height
        ),
        format!(
            "{}Pictures: {} of {} selected ({} discovered)",
            indent(1),
            report.used,
            report.selected,
            report.discovered
        ),
        format!("{}Columns: {}", indent(1), report.columns),
    ];
    if !report.skipped.is_empty() {
        lines.push(format!("{}Skipped:", indent(1)));
        for skipped in &report.skipped {
            lines.push(format!(
                "{}{}: {}",
                indent(2),
                skipped.path.display(),
                skipped.reason
            ));
        }
    }
    lines
}

/// Print the run summary to stdout.
pub fn print_run_summary(report: &RunReport) {
    for line in format_run_summary(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Check
// ============================================================================

/// Format `check` results: what a build would pick up.
pub fn format_check_output(report: &CheckReport, folders: &[impl AsRef<Path>]) -> Vec<String> {
    let mut lines = vec!["Folders".to_string()];
    for folder in folders {
        lines.push(format!("{}{}", indent(1), folder.as_ref().display()));
    }
    if report.discovered == report.selected {
        lines.push(format!("Pictures: {}", report.discovered));
    } else {
        lines.push(format!(
            "Pictures: {} ({} after subset)",
            report.discovered, report.selected
        ));
    }
    lines
}

/// Print `check` results to stdout.
pub fn print_check_output(report: &CheckReport, folders: &[impl AsRef<Path>]) {
    for line in format_check_output(report, folders) {
        println!("{}", line);
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Format a fatal error for the terminal: its message, never its `Debug` form.
///
/// Wrapping errors already carry their cause in the message, so the source
/// chain is not walked again.
pub fn format_error(err: &dyn std::error::Error) -> Vec<String> {
    vec![format!("Error: {err}")]
}

/// Print a fatal error to stderr.
pub fn print_error(err: &dyn std::error::Error) {
    for line in format_error(err) {
        eprintln!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigError;
    use crate::pipeline::{PipelineError, SkippedPicture};
    use std::path::PathBuf;

    fn report() -> RunReport {
        RunReport {
            discovered: 12,
            selected: 10,
            used: 9,
            skipped: vec![],
            columns: 3,
            packed_heights: vec![900, 880, 870],
            final_heights: vec![871, 871, 870],
            min_height: 870,
            canvas_width: 900,
            canvas_height: 870,
            output_path: PathBuf::from("out/collage.jpg"),
        }
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    #[test]
    fn format_index_pads_to_three() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(1234), "1234");
    }

    #[test]
    fn indent_levels() {
        assert_eq!(indent(0), "");
        assert_eq!(indent(2), "        ");
    }

    #[test]
    fn plural_forms() {
        assert_eq!(plural(1, "column"), "1 column");
        assert_eq!(plural(0, "picture"), "0 pictures");
        assert_eq!(plural(7, "picture"), "7 pictures");
    }

    #[test]
    fn height_list_brackets() {
        assert_eq!(height_list(&[]), "[]");
        assert_eq!(height_list(&[300, 200]), "[300, 200]");
    }

    // =========================================================================
    // Event formatting
    // =========================================================================

    #[test]
    fn discovered_all_used() {
        let lines = format_event(&PipelineEvent::Discovered {
            found: 5,
            selected: 5,
        });
        assert_eq!(lines, vec!["Found 5 pictures"]);
    }

    #[test]
    fn discovered_with_subset() {
        let lines = format_event(&PipelineEvent::Discovered {
            found: 124,
            selected: 50,
        });
        assert_eq!(lines, vec!["Found 124 pictures, using 50"]);
    }

    #[test]
    fn normalized_line() {
        let lines = format_event(&PipelineEvent::Normalized {
            position: 1,
            source: PathBuf::from("photos/2019/IMG_0412.jpg"),
            width: 300,
            height: 225,
        });
        assert_eq!(lines, vec!["    001 IMG_0412.jpg \u{2192} 300x225"]);
    }

    #[test]
    fn skipped_lines_name_the_picture() {
        let lines = format_event(&PipelineEvent::Skipped {
            position: 2,
            source: PathBuf::from("photos/2019/IMG_0413.jpg"),
            reason: "Decode error: unexpected EOF".to_string(),
        });
        assert_eq!(lines[0], "    002 IMG_0413.jpg skipped");
        assert_eq!(lines[1], "        Source: photos/2019/IMG_0413.jpg");
        assert_eq!(lines[2], "        Reason: Decode error: unexpected EOF");
    }

    #[test]
    fn layout_and_balance_lines() {
        let layout = format_event(&PipelineEvent::LayoutDecided {
            columns: 2,
            heights: vec![300, 200],
        });
        assert_eq!(layout, vec!["Layout: 2 columns [300, 200]"]);

        let balanced = format_event(&PipelineEvent::Balanced {
            min_height: 200,
            heights: vec![201, 200],
        });
        assert_eq!(balanced, vec!["Balanced to 200px [201, 200]"]);
    }

    #[test]
    fn written_line() {
        let lines = format_event(&PipelineEvent::Written {
            path: PathBuf::from("bigfusion.jpg"),
            width: 600,
            height: 200,
        });
        assert_eq!(lines, vec!["Wrote bigfusion.jpg (600x200)"]);
    }

    // =========================================================================
    // Summary formatting
    // =========================================================================

    #[test]
    fn summary_without_skips() {
        let lines = format_run_summary(&report());
        assert_eq!(
            lines,
            vec![
                "Collage: out/collage.jpg",
                "    Canvas: 900x870",
                "    Pictures: 9 of 10 selected (12 discovered)",
                "    Columns: 3",
            ]
        );
    }

    #[test]
    fn summary_lists_skipped_pictures() {
        let mut report = report();
        report.skipped.push(SkippedPicture {
            path: PathBuf::from("photos/bad.jpg"),
            reason: "Decode error: not a JPEG".to_string(),
        });
        let lines = format_run_summary(&report);
        assert_eq!(lines[4], "    Skipped:");
        assert_eq!(lines[5], "        photos/bad.jpg: Decode error: not a JPEG");
    }

    // =========================================================================
    // Check formatting
    // =========================================================================

    #[test]
    fn check_output_lists_folders() {
        let report = CheckReport {
            discovered: 8,
            selected: 8,
        };
        let lines = format_check_output(&report, &[PathBuf::from("a"), PathBuf::from("b")]);
        assert_eq!(lines, vec!["Folders", "    a", "    b", "Pictures: 8"]);
    }

    #[test]
    fn check_output_mentions_subset() {
        let report = CheckReport {
            discovered: 80,
            selected: 20,
        };
        let lines = format_check_output(&report, &[PathBuf::from("a")]);
        assert_eq!(lines[2], "Pictures: 80 (20 after subset)");
    }

    // =========================================================================
    // Errors
    // =========================================================================

    #[test]
    fn error_shows_message_not_debug() {
        let err = PipelineError::Config(ConfigError::InvalidColumnCount(0));
        assert_eq!(
            format_error(&err),
            vec![
                "Error: Invalid configuration: Invalid column count 0: at least one column is required"
            ]
        );
    }

    #[test]
    fn error_message_names_empty_input_counts() {
        let err = PipelineError::EmptyInput {
            discovered: 3,
            failed: 3,
        };
        let lines = format_error(&err);
        assert_eq!(lines.len(), 1);
        assert!(!lines[0].contains("EmptyInput"));
        assert_eq!(
            lines[0],
            "Error: No usable pictures (3 discovered, 3 failed to decode)"
        );
    }
}

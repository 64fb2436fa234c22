//! Pre-remux sanity checks.
//!
//! Provides [`validate_session`], which compares the chosen title and range
//! against what the title scan found and returns a [`ValidationReport`].
//! The report is advisory: ffmpeg gets the final word, so nothing here stops
//! a remux.
//!
//! # Example
//!
//! ```
//! use dvdoll::{DiscMetadata, Selection, TitleMetadata, validate_session};
//!
//! let disc = DiscMetadata {
//!     titles: vec![TitleMetadata { number: 1, duration: "1:30:00".into(), chapters: 12 }],
//! };
//! let report = validate_session(
//!     1,
//!     &Selection::Chapters { start: 3, end: 20 },
//!     "movie.mkv".as_ref(),
//!     false,
//!     &disc,
//! );
//! assert!(report.info.is_empty());
//! assert_eq!(report.warnings.len(), 1);
//! ```

use std::path::Path;

use crate::metadata::DiscMetadata;
use crate::selection::{Selection, parse_timecode};

/// Notices produced by the pre-remux checks.
///
/// The session prints `info` lines in gray and `warnings` in yellow before
/// starting ffmpeg.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// Informational notices (not problems).
    pub info: Vec<String>,
    /// Issues that will probably make the remux fail or surprise the user.
    pub warnings: Vec<String>,
}

/// Check a title and selection against the scanned disc and the output path.
pub fn validate_session(
    title: u32,
    selection: &Selection,
    output: &Path,
    overwrite: bool,
    disc: &DiscMetadata,
) -> ValidationReport {
    let mut report = ValidationReport::default();

    // ── Title ──────────────────────────────────────────────────────
    let scanned = disc.title(title);
    if scanned.is_none() && !disc.is_empty() {
        report.warnings.push(format!(
            "Title {title} was not found (disc lists {} title(s))",
            disc.titles.len()
        ));
    }

    // ── Range ──────────────────────────────────────────────────────
    match selection {
        Selection::Chapters { start, end } => {
            if end < start {
                report.warnings.push(format!(
                    "Last chapter ({end}) comes before first chapter ({start})"
                ));
            }
            if let Some(scanned) = scanned.filter(|scanned| scanned.chapters > 0) {
                if (*end as usize) > scanned.chapters {
                    report.warnings.push(format!(
                        "Last chapter ({end}) exceeds the {} chapter(s) of title {title}",
                        scanned.chapters
                    ));
                }
            }
        }
        Selection::TimeRange { start, end } => {
            let bounds = end
                .as_deref()
                .and_then(|end| Some((parse_timecode(start)?, parse_timecode(end)?)));
            if let (Some((start_at, end_at)), Some(end)) = (bounds, end) {
                if end_at <= start_at {
                    report.warnings.push(format!(
                        "End time ({end}) is not after start time ({start})"
                    ));
                }
            }
            if end.is_none() {
                report.info.push(format!("Remuxing from {start} to the end of the title"));
            }
        }
    }

    // ── Output ─────────────────────────────────────────────────────
    if output.exists() {
        if overwrite {
            report
                .info
                .push(format!("{} will be overwritten", output.display()));
        } else {
            report.warnings.push(format!(
                "{} already exists (use --overwrite to replace it)",
                output.display()
            ));
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::{ValidationReport, validate_session};
    use crate::metadata::{DiscMetadata, TitleMetadata};
    use crate::selection::Selection;

    fn disc() -> DiscMetadata {
        DiscMetadata {
            titles: vec![
                TitleMetadata {
                    number: 1,
                    duration: "1:40:00.000000".to_string(),
                    chapters: 20,
                },
                TitleMetadata {
                    number: 2,
                    duration: "0:03:00.000000".to_string(),
                    chapters: 0,
                },
            ],
        }
    }

    fn missing_output() -> &'static Path {
        Path::new("dvdoll-validation-test-does-not-exist.mkv")
    }

    #[test]
    fn clean_chapter_selection_has_no_issues() {
        let report = validate_session(
            1,
            &Selection::Chapters { start: 1, end: 20 },
            missing_output(),
            false,
            &disc(),
        );
        assert_eq!(report, ValidationReport::default());
    }

    #[test]
    fn unknown_title_and_reversed_chapters_warn() {
        let report = validate_session(
            5,
            &Selection::Chapters { start: 4, end: 2 },
            missing_output(),
            false,
            &disc(),
        );
        assert!(report.info.is_empty());
        assert_eq!(report.warnings.len(), 2);
        assert!(report.warnings[0].contains("Title 5 was not found"));
        assert!(report.warnings[1].contains("comes before"));
    }

    #[test]
    fn chapter_overflow_ignored_when_count_unknown() {
        let report = validate_session(
            2,
            &Selection::Chapters { start: 1, end: 9 },
            missing_output(),
            false,
            &disc(),
        );
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn reversed_time_range_warns() {
        let report = validate_session(
            1,
            &Selection::TimeRange {
                start: "00:10:00".to_string(),
                end: Some("00:05:00".to_string()),
            },
            missing_output(),
            false,
            &disc(),
        );
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].starts_with("End time (00:05:00)"));
    }

    #[test]
    fn open_time_range_is_informational() {
        let report = validate_session(
            1,
            &Selection::TimeRange {
                start: "00:00:00".to_string(),
                end: None,
            },
            missing_output(),
            false,
            &disc(),
        );
        assert!(report.warnings.is_empty());
        assert_eq!(
            report.info,
            vec!["Remuxing from 00:00:00 to the end of the title".to_string()]
        );
    }

    #[test]
    fn existing_output_with_overwrite_is_informational() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("movie.mkv");
        std::fs::write(&output, b"").unwrap();

        let report = validate_session(
            1,
            &Selection::Chapters { start: 1, end: 2 },
            &output,
            true,
            &disc(),
        );
        assert!(report.warnings.is_empty());
        assert_eq!(report.info.len(), 1);
        assert!(report.info[0].ends_with("will be overwritten"));

        let report = validate_session(
            1,
            &Selection::Chapters { start: 1, end: 2 },
            &output,
            false,
            &disc(),
        );
        assert!(report.info.is_empty());
        assert!(report.warnings[0].contains("already exists"));
    }
}

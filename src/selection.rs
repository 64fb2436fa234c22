//! Chapter and time-range selection.
//!
//! A remux covers either a chapter range or a time range of one title. The
//! "first chapter" answer decides which: `0`, or anything containing a `:`,
//! switches to a time range. Time values are handed to ffmpeg as typed; only
//! a few keywords are normalized.
//!
//! # Example
//!
//! ```
//! use dvdoll::{Selection, normalize_end_time, normalize_start_time};
//!
//! let selection = Selection::TimeRange {
//!     start: normalize_start_time("start"),
//!     end: normalize_end_time("end"),
//! };
//! assert_eq!(selection.arguments(), vec!["-ss", "00:00:00"]);
//! ```

use std::time::Duration;

/// Start time used when the user asks for the beginning of the title.
pub const TITLE_START: &str = "00:00:00";

/// Which part of a title to remux.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// An inclusive chapter range.
    Chapters {
        /// First chapter, counted from 1.
        start: u32,
        /// Last chapter, counted from 1.
        end: u32,
    },
    /// A time range, passed to ffmpeg as `-ss` / `-to`.
    TimeRange {
        /// Start position.
        start: String,
        /// End position. `None` runs to the end of the title.
        end: Option<String>,
    },
}

impl Selection {
    /// The ffmpeg input options for this selection.
    pub fn arguments(&self) -> Vec<String> {
        match self {
            Selection::Chapters { start, end } => vec![
                "-chapter_start".to_string(),
                start.to_string(),
                "-chapter_end".to_string(),
                end.to_string(),
            ],
            Selection::TimeRange { start, end } => {
                let mut args = vec!["-ss".to_string(), start.clone()];
                if let Some(end) = end {
                    args.push("-to".to_string());
                    args.push(end.clone());
                }
                args
            }
        }
    }

    /// Returns `true` for a time-range selection.
    pub fn is_time_range(&self) -> bool {
        matches!(self, Selection::TimeRange { .. })
    }
}

/// Whether a "first chapter" answer selects a time range instead.
pub fn uses_time_range(chapter_start: &str) -> bool {
    chapter_start == "0" || chapter_start.contains(':')
}

/// Map the "beginning of title" keywords onto [`TITLE_START`].
///
/// Blank input, `0`, `first`, and `start` (case-insensitive) all mean the
/// start of the title; anything else is returned untouched.
pub fn normalize_start_time(input: &str) -> String {
    match input.trim().to_lowercase().as_str() {
        "" | "0" | "first" | "start" => TITLE_START.to_string(),
        _ => input.to_string(),
    }
}

/// Map the "end of title" keywords onto `None`.
///
/// Blank input, `last`, and `end` (case-insensitive) mean "no `-to`";
/// anything else is returned untouched.
pub fn normalize_end_time(input: &str) -> Option<String> {
    match input.trim().to_lowercase().as_str() {
        "" | "last" | "end" => None,
        _ => Some(input.to_string()),
    }
}

/// Parse `SS[.fff]`, `MM:SS[.fff]`, or `HH:MM:SS[.fff]` into a [`Duration`].
///
/// Returns `None` for anything else, including ffprobe's `N/A`.
pub fn parse_timecode(value: &str) -> Option<Duration> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    let parts: Vec<&str> = trimmed.split(':').collect();
    let (hours, minutes, seconds) = match parts.as_slice() {
        [seconds] => (0_u64, 0_u64, *seconds),
        [minutes, seconds] => (0, minutes.parse().ok()?, *seconds),
        [hours, minutes, seconds] => (hours.parse().ok()?, minutes.parse().ok()?, *seconds),
        _ => return None,
    };

    let seconds = seconds.parse::<f64>().ok()?;
    if !seconds.is_finite() || seconds < 0.0 {
        return None;
    }
    let total = (hours as f64 * 3600.0) + (minutes as f64 * 60.0) + seconds;
    Some(Duration::from_secs_f64(total))
}

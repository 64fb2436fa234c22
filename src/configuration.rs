//! Session parameters.
//!
//! [`SessionOptions`] is filled from command-line flags, completed
//! interactively, consumed once to build the remux, and then
//! [`reset`](SessionOptions::reset) when the user processes another file.
//!
//! # Example
//!
//! ```
//! use dvdoll::SessionOptions;
//!
//! let mut options = SessionOptions::new()
//!     .with_input("/media/dvd")
//!     .with_title(2)
//!     .with_non_interactive(true);
//! options.reset();
//! assert!(options.input.is_none());
//! assert!(options.non_interactive);
//! ```

use std::path::{Component, Path, PathBuf};

/// Output name used when the user gives none.
pub const DEFAULT_OUTPUT_STEM: &str = "output";

/// Extension every output file carries.
pub const MATROSKA_EXTENSION: &str = ".mkv";

/// Parameters for one remux, plus the flags that outlive it.
///
/// `None` (or zero, for the numeric fields) means "not given yet"; the
/// session prompts for it unless `non_interactive` is set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionOptions {
    /// DVD directory or ISO image, exactly as typed.
    pub input: Option<String>,
    /// Title number. Kept signed so a negative flag is reported by the
    /// session instead of being rejected while parsing arguments.
    pub title: Option<i64>,
    /// First chapter, or `0` / a `HH:MM:SS` time to select a time range.
    pub chapter_start: Option<String>,
    /// Last chapter, signed like `title`.
    pub chapter_end: Option<i64>,
    /// Start time (`-ss`).
    pub start_time: Option<String>,
    /// End time (`-to`).
    pub end_time: Option<String>,
    /// Output file name; `.mkv` is appended when missing.
    pub output: Option<String>,
    /// Only list titles and stop.
    pub list_only: bool,
    /// Print the title list as JSON (with `list_only`).
    pub json: bool,
    /// Never prompt; fail on missing values.
    pub non_interactive: bool,
    /// Let ffmpeg replace an existing output file.
    pub overwrite: bool,
}

impl SessionOptions {
    /// Create empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the input path.
    #[must_use]
    pub fn with_input(mut self, input: impl Into<String>) -> Self {
        self.input = Some(input.into());
        self
    }

    /// Set the title number.
    #[must_use]
    pub fn with_title(mut self, title: i64) -> Self {
        self.title = Some(title);
        self
    }

    /// Set the first chapter (or time-range marker).
    #[must_use]
    pub fn with_chapter_start(mut self, chapter_start: impl Into<String>) -> Self {
        self.chapter_start = Some(chapter_start.into());
        self
    }

    /// Set the last chapter.
    #[must_use]
    pub fn with_chapter_end(mut self, chapter_end: i64) -> Self {
        self.chapter_end = Some(chapter_end);
        self
    }

    /// Set the start time.
    #[must_use]
    pub fn with_start_time(mut self, start_time: impl Into<String>) -> Self {
        self.start_time = Some(start_time.into());
        self
    }

    /// Set the end time.
    #[must_use]
    pub fn with_end_time(mut self, end_time: impl Into<String>) -> Self {
        self.end_time = Some(end_time.into());
        self
    }

    /// Set the output file name.
    #[must_use]
    pub fn with_output(mut self, output: impl Into<String>) -> Self {
        self.output = Some(output.into());
        self
    }

    /// Only list titles.
    #[must_use]
    pub fn with_list_only(mut self, list_only: bool) -> Self {
        self.list_only = list_only;
        self
    }

    /// Print the title list as JSON (only meaningful with `list_only`).
    #[must_use]
    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    /// Disable prompts.
    #[must_use]
    pub fn with_non_interactive(mut self, non_interactive: bool) -> Self {
        self.non_interactive = non_interactive;
        self
    }

    /// Allow replacing an existing output.
    #[must_use]
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Forget everything specific to the file just processed.
    ///
    /// `non_interactive`, `overwrite`, and `json` are session-wide and kept.
    pub fn reset(&mut self) {
        *self = Self {
            non_interactive: self.non_interactive,
            overwrite: self.overwrite,
            json: self.json,
            ..Self::default()
        };
    }
}

/// Final output file name: `output` when blank, `.mkv` appended unless the
/// name already ends with it (case-insensitive).
pub fn output_file_name(raw: Option<&str>) -> String {
    let name = match raw {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => DEFAULT_OUTPUT_STEM.to_string(),
    };
    if name.to_lowercase().ends_with(MATROSKA_EXTENSION) {
        name
    } else {
        format!("{name}{MATROSKA_EXTENSION}")
    }
}

/// Strip surrounding double quotes (as pasted from a file manager) and clean
/// the path lexically.
///
/// Repeated separators and `.` components are dropped and `..` cancels the
/// preceding normal component. The filesystem is never consulted.
pub fn clean_input_path(raw: &str) -> PathBuf {
    let unquoted = raw.trim_matches('"');
    if unquoted.is_empty() {
        return PathBuf::from(".");
    }

    let mut cleaned = PathBuf::new();
    let mut depth = 0_usize;
    for component in Path::new(unquoted).components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir if depth > 0 => {
                cleaned.pop();
                depth -= 1;
            }
            Component::ParentDir => {
                if !cleaned.has_root() {
                    cleaned.push("..");
                }
            }
            Component::Normal(part) => {
                cleaned.push(part);
                depth += 1;
            }
            Component::RootDir | Component::Prefix(_) => cleaned.push(component.as_os_str()),
        }
    }

    if cleaned.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        cleaned
    }
}

/// Parse a title or chapter number; zero and garbage both yield `None`.
pub fn parse_positive(value: &str) -> Option<u32> {
    value.trim().parse::<i64>().ok().and_then(positive_number)
}

/// Narrow a title or chapter flag; zero, negatives, and values past `u32`
/// yield `None`.
pub fn positive_number(value: i64) -> Option<u32> {
    u32::try_from(value).ok().filter(|number| *number > 0)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::{
        SessionOptions, clean_input_path, output_file_name, parse_positive, positive_number,
    };

    #[test]
    fn output_names() {
        assert_eq!(output_file_name(None), "output.mkv");
        assert_eq!(output_file_name(Some("")), "output.mkv");
        assert_eq!(output_file_name(Some("movie")), "movie.mkv");
        assert_eq!(output_file_name(Some("Movie.MKV")), "Movie.MKV");
        assert_eq!(output_file_name(Some("movie.mp4")), "movie.mp4.mkv");
    }

    #[test]
    fn input_paths_are_unquoted_and_cleaned() {
        assert_eq!(clean_input_path("\"/media/dvd/\""), PathBuf::from("/media/dvd"));
        assert_eq!(
            clean_input_path("/media//dvd/./VIDEO_TS/.."),
            PathBuf::from("/media/dvd")
        );
        assert_eq!(clean_input_path("../disc.iso"), PathBuf::from("../disc.iso"));
        assert_eq!(clean_input_path("a/../.."), PathBuf::from(".."));
        assert_eq!(clean_input_path("/.."), PathBuf::from("/"));
        assert_eq!(clean_input_path("./"), PathBuf::from("."));
    }

    #[test]
    fn positive_numbers() {
        assert_eq!(parse_positive(" 3 "), Some(3));
        assert_eq!(parse_positive("0"), None);
        assert_eq!(parse_positive("-2"), None);
        assert_eq!(parse_positive("three"), None);
        assert_eq!(parse_positive("4294967296"), None);
    }

    #[test]
    fn signed_flags_narrow_to_positive() {
        assert_eq!(positive_number(7), Some(7));
        assert_eq!(positive_number(0), None);
        assert_eq!(positive_number(-3), None);
        assert_eq!(positive_number(i64::from(u32::MAX) + 1), None);
    }

    #[test]
    fn reset_keeps_session_flags() {
        let mut options = SessionOptions::new()
            .with_input("disc.iso")
            .with_title(1)
            .with_chapter_start("1")
            .with_chapter_end(3)
            .with_start_time("0")
            .with_end_time("end")
            .with_output("out")
            .with_list_only(true)
            .with_non_interactive(true)
            .with_overwrite(true);
        options.reset();
        assert_eq!(
            options,
            SessionOptions::new()
                .with_non_interactive(true)
                .with_overwrite(true)
        );
    }
}

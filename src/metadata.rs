//! Disc metadata types.
//!
//! [`DiscMetadata`] is what [`TitleProbe::list_titles`](crate::TitleProbe::list_titles)
//! returns: one [`TitleMetadata`] per title that answered a duration probe.
//! It renders either as the human-readable title list or as JSON.

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde_json::{Value, json};

use crate::selection::parse_timecode;

/// Duration shown for titles whose length ffprobe reports as `N/A`.
pub const UNKNOWN_DURATION: &str = "00:00:00";

/// Metadata for one DVD title.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct TitleMetadata {
    /// Title number, counted from 1.
    pub number: u32,
    /// Sexagesimal duration as printed by ffprobe (e.g. `"1:02:03.040000"`).
    pub duration: String,
    /// Number of chapters; zero when the chapter probe failed.
    pub chapters: usize,
}

impl TitleMetadata {
    /// The duration in seconds, if it parses.
    pub fn duration_seconds(&self) -> Option<f64> {
        parse_timecode(&self.duration).map(|duration| duration.as_secs_f64())
    }

    fn to_json(&self) -> Value {
        json!({
            "title": self.number,
            "chapters": self.chapters,
            "duration": self.duration,
            "duration_seconds": self.duration_seconds(),
        })
    }
}

impl Display for TitleMetadata {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "Title {} - Chapters: {:02} ({})",
            self.number, self.chapters, self.duration
        )
    }
}

/// Every title found on a disc, in title order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[must_use]
pub struct DiscMetadata {
    /// Titles that answered the duration probe.
    pub titles: Vec<TitleMetadata>,
}

impl DiscMetadata {
    /// Look up a title by number.
    pub fn title(&self, number: u32) -> Option<&TitleMetadata> {
        self.titles.iter().find(|title| title.number == number)
    }

    /// Returns `true` if no title was found.
    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }

    /// The title list as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`DvdollError::JsonError`](crate::DvdollError::JsonError) if
    /// serialization fails.
    pub fn to_json_string(&self) -> Result<String, crate::DvdollError> {
        let payload: Vec<Value> = self.titles.iter().map(TitleMetadata::to_json).collect();
        Ok(serde_json::to_string_pretty(&payload)?)
    }
}

/// Renders the indented title lines; the `Title list:` heading is printed by
/// the session so it can be coloured.
impl Display for DiscMetadata {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        if self.titles.is_empty() {
            return writeln!(f, "  No titles found.");
        }
        for title in &self.titles {
            writeln!(f, "  {title}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{DiscMetadata, TitleMetadata};

    fn title(number: u32, duration: &str, chapters: usize) -> TitleMetadata {
        TitleMetadata {
            number,
            duration: duration.to_string(),
            chapters,
        }
    }

    #[test]
    fn title_line_pads_chapter_count() {
        let line = title(3, "1:02:03.000000", 7).to_string();
        assert_eq!(line, "Title 3 - Chapters: 07 (1:02:03.000000)");
    }

    #[test]
    fn empty_disc_renders_placeholder() {
        assert_eq!(DiscMetadata::default().to_string(), "  No titles found.\n");
    }

    #[test]
    fn json_includes_seconds() {
        let disc = DiscMetadata {
            titles: vec![title(1, "0:01:30.000000", 2), title(2, "garbage", 0)],
        };
        let parsed: serde_json::Value =
            serde_json::from_str(&disc.to_json_string().unwrap()).unwrap();
        assert_eq!(parsed[0]["title"], 1);
        assert_eq!(parsed[0]["duration_seconds"], 90.0);
        assert!(parsed[1]["duration_seconds"].is_null());
    }

    #[test]
    fn lookup_by_number() {
        let disc = DiscMetadata {
            titles: vec![title(1, "0:00:10", 1), title(2, "0:00:20", 4)],
        };
        assert_eq!(disc.title(2).map(|t| t.chapters), Some(4));
        assert!(disc.title(9).is_none());
    }
}

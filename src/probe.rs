//! DVD title probing through `ffprobe`.
//!
//! [`TitleProbe`] opens the input with ffmpeg's `dvdvideo` demuxer for one
//! title at a time and reads single values back in ffprobe's bare
//! `default=noprint_wrappers=1:nokey=1` or `csv=p=0` output formats.
//!
//! # Example
//!
//! ```no_run
//! use dvdoll::{NoOpProgress, SystemRunner, TitleProbe, Toolchain};
//!
//! let toolchain = Toolchain::default();
//! let probe = TitleProbe::new(&SystemRunner, &toolchain);
//!
//! let disc = probe.list_titles("movie.iso".as_ref(), &NoOpProgress);
//! print!("{disc}");
//!
//! let codec = probe.audio_codec("movie.iso".as_ref(), 1)?;
//! println!("title 1 audio: {codec}");
//! # Ok::<(), dvdoll::DvdollError>(())
//! ```

use std::path::Path;
use std::time::Instant;

use log::{debug, info};

use crate::error::DvdollError;
use crate::ffmpeg::{CommandRunner, Toolchain};
use crate::metadata::{DiscMetadata, TitleMetadata, UNKNOWN_DURATION};
use crate::progress::{OperationType, ProgressCallback, ProgressInfo};

/// Highest title number a DVD can carry.
pub const MAX_TITLES: u32 = 99;

/// Arguments that select one title of a DVD for ffmpeg/ffprobe.
///
/// Shared by the probe calls and the remux call.
pub fn dvdvideo_input_arguments(title: u32) -> Vec<String> {
    vec![
        "-f".to_string(),
        "dvdvideo".to_string(),
        "-preindex".to_string(),
        "True".to_string(),
        "-title".to_string(),
        title.to_string(),
    ]
}

/// Reads title, chapter, and audio information from a DVD.
pub struct TitleProbe<'a, R: CommandRunner + ?Sized> {
    runner: &'a R,
    toolchain: &'a Toolchain,
}

impl<'a, R: CommandRunner + ?Sized> TitleProbe<'a, R> {
    /// Create a probe that runs `toolchain.ffprobe` through `runner`.
    pub fn new(runner: &'a R, toolchain: &'a Toolchain) -> Self {
        Self { runner, toolchain }
    }

    fn query(&self, input: &Path, title: u32, entries: &[&str]) -> Result<String, DvdollError> {
        let mut args: Vec<String> = vec!["-v".into(), "error".into(), "-hide_banner".into()];
        args.extend(dvdvideo_input_arguments(title));
        args.extend(entries.iter().map(|entry| entry.to_string()));
        args.push(input.to_string_lossy().into_owned());

        let output = self.runner.capture(&self.toolchain.ffprobe, &args)?;
        Ok(output.trim().to_string())
    }

    /// The title's duration in ffprobe's sexagesimal form.
    ///
    /// An empty string means ffprobe found nothing for this title.
    ///
    /// # Errors
    ///
    /// Fails if ffprobe cannot be run or rejects the title.
    pub fn duration(&self, input: &Path, title: u32) -> Result<String, DvdollError> {
        self.query(
            input,
            title,
            &[
                "-show_entries",
                "format=duration",
                "-sexagesimal",
                "-of",
                "default=noprint_wrappers=1:nokey=1",
            ],
        )
    }

    /// Number of chapters in the title.
    ///
    /// # Errors
    ///
    /// Fails if ffprobe cannot be run or rejects the title.
    pub fn chapter_count(&self, input: &Path, title: u32) -> Result<usize, DvdollError> {
        let output = self.query(
            input,
            title,
            &[
                "-show_chapters",
                "-show_entries",
                "chapter=index",
                "-of",
                "csv=p=0",
            ],
        )?;

        if output.is_empty() {
            return Ok(0);
        }
        Ok(output.lines().count())
    }

    /// Enumerate titles 1..=99, stopping at the first one that does not
    /// answer.
    ///
    /// Titles whose duration is `N/A` are listed as [`UNKNOWN_DURATION`]; a
    /// failed chapter probe lists the title with zero chapters.
    pub fn list_titles(&self, input: &Path, progress: &dyn ProgressCallback) -> DiscMetadata {
        let started = Instant::now();
        let mut disc = DiscMetadata::default();
        let snapshot = |title: u32, found: usize| ProgressInfo {
            operation: OperationType::TitleScan,
            title,
            found,
            elapsed: started.elapsed(),
        };

        for number in 1..=MAX_TITLES {
            progress.on_progress(&snapshot(number, disc.titles.len()));

            let duration = match self.duration(input, number) {
                Ok(duration) if !duration.is_empty() => duration,
                Ok(_) => {
                    debug!("title {number}: empty duration, stopping scan");
                    break;
                }
                Err(error) => {
                    debug!("title {number}: {error}, stopping scan");
                    break;
                }
            };
            let duration = if duration.eq_ignore_ascii_case("N/A") {
                UNKNOWN_DURATION.to_string()
            } else {
                duration
            };

            let chapters = self.chapter_count(input, number).unwrap_or_else(|error| {
                debug!("title {number}: chapter probe failed: {error}");
                0
            });

            disc.titles.push(TitleMetadata {
                number,
                duration,
                chapters,
            });
        }

        progress.on_finish(&snapshot(disc.titles.len() as u32, disc.titles.len()));
        info!("found {} title(s) on {}", disc.titles.len(), input.display());
        disc
    }

    /// Codec name of the title's first audio stream (e.g. `"ac3"`,
    /// `"pcm_dvd"`).
    ///
    /// # Errors
    ///
    /// Returns [`DvdollError::NoAudioCodec`] when ffprobe prints nothing, or
    /// the runner's error if ffprobe fails.
    pub fn audio_codec(&self, input: &Path, title: u32) -> Result<String, DvdollError> {
        let codec = self.query(
            input,
            title,
            &[
                "-select_streams",
                "a:0",
                "-show_entries",
                "stream=codec_name",
                "-of",
                "default=noprint_wrappers=1:nokey=1",
            ],
        )?;

        if codec.is_empty() {
            return Err(DvdollError::NoAudioCodec);
        }
        Ok(codec)
    }
}

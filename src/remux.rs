//! DVD title remuxing.
//!
//! This module provides [`Remuxer`], which composes and runs the single
//! `ffmpeg` call that copies one DVD title (or part of it) into a Matroska
//! file. Video and subtitle streams are always copied; audio follows the
//! chosen [`AudioStrategy`].
//!
//! # Example
//!
//! ```no_run
//! use dvdoll::{AudioStrategy, Remuxer, Selection, SystemRunner, Toolchain};
//!
//! Remuxer::new("/media/dvd", 1, "movie.mkv")
//!     .selection(Selection::Chapters { start: 1, end: 12 })
//!     .audio(AudioStrategy::for_codec("ac3"))
//!     .run(&SystemRunner, &Toolchain::default())?;
//! # Ok::<(), dvdoll::DvdollError>(())
//! ```

use std::path::{Path, PathBuf};

use log::info;

use crate::audio::AudioStrategy;
use crate::error::DvdollError;
use crate::ffmpeg::{CommandRunner, FfmpegLogLevel, Toolchain};
use crate::probe::dvdvideo_input_arguments;
use crate::selection::{Selection, TITLE_START};

/// Builder for the remux invocation.
///
/// Defaults: the whole title from its start, audio copied, ffmpeg left to
/// ask before overwriting an existing output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Remuxer {
    input: PathBuf,
    title: u32,
    output: String,
    selection: Selection,
    audio: AudioStrategy,
    overwrite: bool,
    non_interactive: bool,
    log_level: Option<FfmpegLogLevel>,
}

impl Remuxer {
    /// Remux `title` of `input` into `output`.
    pub fn new<P: AsRef<Path>>(input: P, title: u32, output: impl Into<String>) -> Self {
        Self {
            input: input.as_ref().to_path_buf(),
            title,
            output: output.into(),
            selection: Selection::TimeRange {
                start: TITLE_START.to_string(),
                end: None,
            },
            audio: AudioStrategy::Copy,
            overwrite: false,
            non_interactive: false,
            log_level: None,
        }
    }

    /// Restrict the remux to a chapter or time range.
    #[must_use]
    pub fn selection(mut self, selection: Selection) -> Self {
        self.selection = selection;
        self
    }

    /// Choose how audio streams are written.
    #[must_use]
    pub fn audio(mut self, audio: AudioStrategy) -> Self {
        self.audio = audio;
        self
    }

    /// Replace an existing output file without asking (`-y`).
    #[must_use]
    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Refuse to overwrite instead of asking (`-n`) unless
    /// [`overwrite`](Remuxer::overwrite) is set.
    #[must_use]
    pub fn non_interactive(mut self, non_interactive: bool) -> Self {
        self.non_interactive = non_interactive;
        self
    }

    /// Pass `-v <level>` to ffmpeg.
    #[must_use]
    pub fn log_level(mut self, level: Option<FfmpegLogLevel>) -> Self {
        self.log_level = level;
        self
    }

    /// The output file name.
    pub fn output(&self) -> &str {
        &self.output
    }

    /// The complete ffmpeg argument list, without the program name.
    pub fn arguments(&self) -> Vec<String> {
        let mut args = vec!["-hide_banner".to_string()];
        if let Some(level) = self.log_level {
            args.push("-v".to_string());
            args.push(level.as_arg().to_string());
        }
        if self.overwrite {
            args.push("-y".to_string());
        } else if self.non_interactive {
            args.push("-n".to_string());
        }

        args.extend(dvdvideo_input_arguments(self.title));
        args.extend(self.selection.arguments());
        args.push("-i".to_string());
        args.push(self.input.to_string_lossy().into_owned());
        args.extend(
            ["-map", "0", "-c", "copy"]
                .iter()
                .map(|arg| arg.to_string()),
        );
        args.extend(self.audio.arguments());
        args.push(self.output.clone());
        args
    }

    /// Run ffmpeg attached to the terminal.
    ///
    /// # Errors
    ///
    /// Returns [`DvdollError::Spawn`] if ffmpeg cannot be started, or
    /// [`DvdollError::ToolFailed`] if it exits unsuccessfully.
    pub fn run<R: CommandRunner + ?Sized>(
        &self,
        runner: &R,
        toolchain: &Toolchain,
    ) -> Result<(), DvdollError> {
        info!(
            "remuxing title {} of {} into {} (audio: {})",
            self.title,
            self.input.display(),
            self.output,
            self.audio
        );
        runner.run(&toolchain.ffmpeg, &self.arguments())
    }
}

//! The interactive remux session.
//!
//! [`Session`] walks the user from an input path to a finished Matroska
//! file: it lists the disc's titles, collects the title and range (from
//! flags where given, from prompts otherwise), detects the audio codec,
//! and runs ffmpeg. Unless running non-interactively it then offers to
//! start over with another file.
//!
//! # Example
//!
//! ```no_run
//! use dvdoll::{NoOpProgress, Session, SessionOptions, SystemRunner, TerminalConsole, Toolchain};
//!
//! let options = SessionOptions::new().with_input("/media/dvd");
//! let mut session = Session::new(SystemRunner, TerminalConsole::new(), Toolchain::default());
//! session.run(options, &NoOpProgress)?;
//! # Ok::<(), dvdoll::DvdollError>(())
//! ```

use std::io::Write;
use std::path::Path;

use colored::Colorize;
use log::{debug, info};

use crate::audio::AudioStrategy;
use crate::configuration::{
    SessionOptions, clean_input_path, output_file_name, parse_positive, positive_number,
};
use crate::console::{Console, print_header, prompt, prompt_continue};
use crate::error::DvdollError;
use crate::ffmpeg::{CommandRunner, Toolchain};
use crate::metadata::DiscMetadata;
use crate::probe::TitleProbe;
use crate::progress::ProgressCallback;
use crate::remux::Remuxer;
use crate::selection::{Selection, normalize_end_time, normalize_start_time, uses_time_range};
use crate::validation::validate_session;

/// How a single pass through the session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pass {
    /// Titles were listed and nothing else was requested.
    Listed,
    /// A remux completed.
    Remuxed,
}

/// Drives one or more remuxes through a [`CommandRunner`] and a [`Console`].
pub struct Session<R: CommandRunner, C: Console> {
    runner: R,
    console: C,
    toolchain: Toolchain,
}

impl<R: CommandRunner, C: Console> Session<R, C> {
    /// Create a session.
    pub fn new(runner: R, console: C, toolchain: Toolchain) -> Self {
        Self {
            runner,
            console,
            toolchain,
        }
    }

    /// The console, e.g. to inspect a scripted transcript.
    pub fn console(&self) -> &C {
        &self.console
    }

    /// The runner, e.g. to inspect recorded invocations.
    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Run the session until the user is done.
    ///
    /// Prints the header, checks the toolchain, then processes files until
    /// listing mode, non-interactive mode, or the user stops it.
    ///
    /// # Errors
    ///
    /// Any missing or invalid value, missing program, or failed subprocess
    /// ends the session with the corresponding [`DvdollError`].
    pub fn run(
        &mut self,
        mut options: SessionOptions,
        progress: &dyn ProgressCallback,
    ) -> Result<(), DvdollError> {
        // JSON listings go to pipes; keep the banner out of them.
        if !(options.list_only && options.json) {
            print_header(&mut self.console)?;
        }
        self.toolchain.ensure_available(&self.runner)?;

        loop {
            if self.process(&mut options, progress)? == Pass::Listed {
                return Ok(());
            }
            if !prompt_continue(&mut self.console, options.non_interactive)? {
                return Ok(());
            }

            self.console.clear_screen()?;
            print_header(&mut self.console)?;
            options.reset();
        }
    }

    /// One pass: input, title list, parameters, audio detection, remux.
    fn process(
        &mut self,
        options: &mut SessionOptions,
        progress: &dyn ProgressCallback,
    ) -> Result<Pass, DvdollError> {
        let non_interactive = options.non_interactive;

        let raw_input = match options.input.take().filter(|input| !input.is_empty()) {
            Some(input) => input,
            None => prompt(&mut self.console, "Input", non_interactive)?,
        };
        if raw_input.is_empty() {
            return Err(DvdollError::MissingValue("Input path"));
        }
        let input = clean_input_path(&raw_input);
        options.input = Some(input.to_string_lossy().into_owned());

        let disc = TitleProbe::new(&self.runner, &self.toolchain).list_titles(&input, progress);
        if options.list_only && options.json {
            writeln!(self.console, "{}", disc.to_json_string()?)?;
            return Ok(Pass::Listed);
        }
        self.print_title_list(&disc)?;
        if options.list_only {
            return Ok(Pass::Listed);
        }

        let title = self.resolve_title(options)?;
        let selection = self.resolve_selection(options)?;

        let output = match options.output.clone().filter(|output| !output.is_empty()) {
            Some(output) => output,
            None => prompt(&mut self.console, "Output filename", non_interactive)?,
        };
        let output = output_file_name(Some(&output));
        options.output = Some(output.clone());

        let report = validate_session(
            title,
            &selection,
            Path::new(&output),
            options.overwrite,
            &disc,
        );
        for notice in &report.info {
            info!("{notice}");
            writeln!(self.console, "{} {}", "info:".bright_black(), notice.bright_black())?;
        }
        for warning in &report.warnings {
            debug!("validation: {warning}");
            writeln!(self.console, "{} {}", "warning:".yellow().bold(), warning.yellow())?;
        }

        let audio = self.detect_audio(&input, title)?;

        writeln!(self.console)?;
        writeln!(self.console, "Remuxing file...")?;
        Remuxer::new(&input, title, output)
            .selection(selection)
            .audio(audio)
            .overwrite(options.overwrite)
            .non_interactive(non_interactive)
            .log_level(self.toolchain.log_level)
            .run(&self.runner, &self.toolchain)?;
        writeln!(self.console, "Process finished.")?;
        info!("finished title {title} of {}", input.display());

        Ok(Pass::Remuxed)
    }

    fn print_title_list(&mut self, disc: &DiscMetadata) -> Result<(), DvdollError> {
        writeln!(self.console)?;
        writeln!(self.console, "{}", "Title list:".yellow())?;
        write!(self.console, "{disc}")?;
        writeln!(self.console)?;
        Ok(())
    }

    fn resolve_title(&mut self, options: &mut SessionOptions) -> Result<u32, DvdollError> {
        let title = match options.title.filter(|title| *title != 0) {
            Some(title) => positive_number(title),
            None => {
                let answer = prompt(&mut self.console, "Title number", options.non_interactive)?;
                if answer.is_empty() {
                    return Err(DvdollError::MissingValue("Title number"));
                }
                parse_positive(&answer)
            }
        };
        let title = title.ok_or(DvdollError::NotPositive("Title number"))?;
        options.title = Some(title.into());
        Ok(title)
    }

    fn resolve_selection(
        &mut self,
        options: &mut SessionOptions,
    ) -> Result<Selection, DvdollError> {
        let non_interactive = options.non_interactive;

        let chapter_start = match options.chapter_start.clone().filter(|value| !value.is_empty()) {
            Some(value) => value,
            None => {
                let answer = prompt(&mut self.console, "First chapter", non_interactive)?;
                if answer.is_empty() {
                    return Err(DvdollError::MissingValue("First chapter"));
                }
                answer
            }
        };
        options.chapter_start = Some(chapter_start.clone());

        if uses_time_range(&chapter_start) {
            let start = match options.start_time.clone().filter(|value| !value.is_empty()) {
                Some(value) => value,
                None if chapter_start == "0" => {
                    prompt(&mut self.console, "Start time (-ss)", non_interactive)?
                }
                None => chapter_start,
            };
            let start = normalize_start_time(&start);
            options.start_time = Some(start.clone());

            let end = match options.end_time.clone().filter(|value| !value.is_empty()) {
                Some(value) => value,
                None => prompt(&mut self.console, "End time (-to)", non_interactive)?,
            };
            let end = normalize_end_time(&end);
            options.end_time = end.clone();

            return Ok(Selection::TimeRange { start, end });
        }

        let start =
            parse_positive(&chapter_start).ok_or(DvdollError::NotPositive("First chapter"))?;

        let end = match options.chapter_end.filter(|chapter| *chapter != 0) {
            Some(chapter) => positive_number(chapter),
            None => {
                let answer = prompt(&mut self.console, "Last chapter", non_interactive)?;
                if answer.is_empty() {
                    return Err(DvdollError::MissingValue("Last chapter"));
                }
                parse_positive(&answer)
            }
        };
        let end = end.ok_or(DvdollError::NotPositive("Last chapter"))?;
        options.chapter_end = Some(end.into());

        Ok(Selection::Chapters { start, end })
    }

    fn detect_audio(
        &mut self,
        input: &Path,
        title: u32,
    ) -> Result<AudioStrategy, DvdollError> {
        writeln!(self.console)?;
        writeln!(self.console, "Analyzing audio codec...")?;
        let codec = TitleProbe::new(&self.runner, &self.toolchain).audio_codec(input, title)?;
        writeln!(self.console, "Detected audio codec: {codec}")?;

        let strategy = AudioStrategy::for_codec(&codec);
        info!("audio codec {codec}: {strategy}");
        Ok(strategy)
    }
}

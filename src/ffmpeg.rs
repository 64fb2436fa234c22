//! External toolchain access.
//!
//! `dvdoll` never touches media data itself: every probe goes through
//! `ffprobe` and the remux itself is a single `ffmpeg` invocation. This module
//! names those programs ([`Toolchain`]), checks that they can be found, maps
//! the remux verbosity onto ffmpeg's `-v` option ([`FfmpegLogLevel`]), and
//! defines the [`CommandRunner`] seam through which every subprocess is
//! started.
//!
//! # Example
//!
//! ```no_run
//! use dvdoll::{CommandRunner, SystemRunner, Toolchain};
//!
//! let toolchain = Toolchain::default();
//! toolchain.ensure_available(&SystemRunner)?;
//!
//! let version = SystemRunner.capture(&toolchain.ffmpeg, &["-version".to_string()])?;
//! println!("{}", version.lines().next().unwrap_or_default());
//! # Ok::<(), dvdoll::DvdollError>(())
//! ```

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::str::FromStr;

use log::debug;

use crate::error::DvdollError;

/// Environment variable overriding the `ffprobe` program.
pub const FFPROBE_ENV: &str = "DVDOLL_FFPROBE";

/// Environment variable overriding the `ffmpeg` program.
pub const FFMPEG_ENV: &str = "DVDOLL_FFMPEG";

/// FFmpeg log verbosity, passed to the remux call as `-v <level>`.
///
/// # Ordering (most verbose → most quiet)
///
/// `Trace` > `Debug` > `Verbose` > `Info` > `Warning` > `Error` > `Fatal` > `Panic` > `Quiet`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FfmpegLogLevel {
    /// Print no output at all.
    Quiet,
    /// Only log conditions the process cannot recover from.
    Panic,
    /// Only log unrecoverable errors.
    Fatal,
    /// Log recoverable errors.
    Error,
    /// Log warnings.
    Warning,
    /// Log informational messages (ffmpeg's default).
    Info,
    /// Log verbose informational messages.
    Verbose,
    /// Log debugging messages.
    Debug,
    /// Extremely verbose tracing output.
    Trace,
}

impl FfmpegLogLevel {
    /// The value ffmpeg expects after `-v`.
    pub fn as_arg(self) -> &'static str {
        match self {
            FfmpegLogLevel::Quiet => "quiet",
            FfmpegLogLevel::Panic => "panic",
            FfmpegLogLevel::Fatal => "fatal",
            FfmpegLogLevel::Error => "error",
            FfmpegLogLevel::Warning => "warning",
            FfmpegLogLevel::Info => "info",
            FfmpegLogLevel::Verbose => "verbose",
            FfmpegLogLevel::Debug => "debug",
            FfmpegLogLevel::Trace => "trace",
        }
    }
}

impl FromStr for FfmpegLogLevel {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "quiet" => Ok(FfmpegLogLevel::Quiet),
            "panic" => Ok(FfmpegLogLevel::Panic),
            "fatal" => Ok(FfmpegLogLevel::Fatal),
            "error" => Ok(FfmpegLogLevel::Error),
            "warning" | "warn" => Ok(FfmpegLogLevel::Warning),
            "info" => Ok(FfmpegLogLevel::Info),
            "verbose" => Ok(FfmpegLogLevel::Verbose),
            "debug" => Ok(FfmpegLogLevel::Debug),
            "trace" => Ok(FfmpegLogLevel::Trace),
            _ => Err(format!("unsupported ffmpeg log level: {value}")),
        }
    }
}

impl Display for FfmpegLogLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_arg())
    }
}

/// The pair of external programs a session drives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    /// Program used for probing titles, chapters, and audio codecs.
    pub ffprobe: String,
    /// Program used for the remux.
    pub ffmpeg: String,
    /// Verbosity for the remux call. `None` leaves ffmpeg at its default.
    pub log_level: Option<FfmpegLogLevel>,
}

impl Default for Toolchain {
    fn default() -> Self {
        Self {
            ffprobe: "ffprobe".to_string(),
            ffmpeg: "ffmpeg".to_string(),
            log_level: None,
        }
    }
}

impl Toolchain {
    /// Use a different `ffprobe` program.
    #[must_use]
    pub fn with_ffprobe(mut self, program: impl Into<String>) -> Self {
        self.ffprobe = program.into();
        self
    }

    /// Use a different `ffmpeg` program.
    #[must_use]
    pub fn with_ffmpeg(mut self, program: impl Into<String>) -> Self {
        self.ffmpeg = program.into();
        self
    }

    /// Set the `-v` level for the remux call.
    #[must_use]
    pub fn with_log_level(mut self, level: FfmpegLogLevel) -> Self {
        self.log_level = Some(level);
        self
    }

    /// Check that `ffprobe` and then `ffmpeg` can be resolved.
    ///
    /// # Errors
    ///
    /// Returns [`DvdollError::ToolNotFound`] naming the first program that
    /// cannot be found.
    pub fn ensure_available<R: CommandRunner + ?Sized>(
        &self,
        runner: &R,
    ) -> Result<(), DvdollError> {
        for program in [&self.ffprobe, &self.ffmpeg] {
            let resolved = runner.locate(program)?;
            debug!("{program} resolved to {}", resolved.display());
        }
        Ok(())
    }
}

/// Starts external programs on behalf of the probe and remux steps.
///
/// The production implementation is [`SystemRunner`]. Tests substitute a
/// scripted runner so session flows can be exercised without a DVD.
pub trait CommandRunner {
    /// Resolve `program` the way the OS would when starting it.
    ///
    /// # Errors
    ///
    /// Returns [`DvdollError::ToolNotFound`] if it cannot be found.
    fn locate(&self, program: &str) -> Result<PathBuf, DvdollError> {
        which::which(program).map_err(|_| DvdollError::ToolNotFound(program.to_string()))
    }

    /// Run `program` and return its standard output.
    ///
    /// # Errors
    ///
    /// Fails if the program cannot be started or exits unsuccessfully.
    fn capture(&self, program: &str, args: &[String]) -> Result<String, DvdollError>;

    /// Run `program` attached to the current terminal.
    ///
    /// # Errors
    ///
    /// Fails if the program cannot be started or exits unsuccessfully.
    fn run(&self, program: &str, args: &[String]) -> Result<(), DvdollError>;
}

/// [`CommandRunner`] backed by [`std::process::Command`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn capture(&self, program: &str, args: &[String]) -> Result<String, DvdollError> {
        debug!("capturing: {}", command_line(program, args));
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| DvdollError::Spawn {
                program: program.to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(DvdollError::ToolFailed {
                program: program.to_string(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn run(&self, program: &str, args: &[String]) -> Result<(), DvdollError> {
        debug!("running: {}", command_line(program, args));
        let status = Command::new(program)
            .args(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|source| DvdollError::Spawn {
                program: program.to_string(),
                source,
            })?;

        if !status.success() {
            return Err(DvdollError::ToolFailed {
                program: program.to_string(),
                status,
                stderr: String::new(),
            });
        }
        Ok(())
    }
}

/// Render a program and its arguments for diagnostics, quoting arguments
/// that contain whitespace.
pub fn command_line(program: &str, args: &[String]) -> String {
    let mut line = program.to_string();
    for arg in args {
        line.push(' ');
        if arg.is_empty() || arg.contains(char::is_whitespace) {
            line.push('"');
            line.push_str(arg);
            line.push('"');
        } else {
            line.push_str(arg);
        }
    }
    line
}

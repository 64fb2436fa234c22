//! # dvdoll
//!
//! Remux DVD titles into Matroska files with ffmpeg.
//!
//! `dvdoll` is a thin, interactive layer over ffmpeg's `dvdvideo` demuxer. It
//! lists the titles on a disc directory or ISO image, lets the user pick a
//! title and a chapter or time range, and copies that part of the title into
//! an `.mkv` file. Video and subtitles are always stream-copied; PCM audio is
//! transcoded to FLAC, any other audio codec is copied.
//!
//! ## Quick Start
//!
//! ### List Titles
//!
//! ```no_run
//! use dvdoll::{NoOpProgress, SystemRunner, TitleProbe, Toolchain};
//!
//! let toolchain = Toolchain::default();
//! let disc = TitleProbe::new(&SystemRunner, &toolchain)
//!     .list_titles("movie.iso".as_ref(), &NoOpProgress);
//! print!("{disc}");
//! ```
//!
//! ### Remux a Chapter Range
//!
//! ```no_run
//! use dvdoll::{AudioStrategy, Remuxer, Selection, SystemRunner, TitleProbe, Toolchain};
//!
//! let toolchain = Toolchain::default();
//! let codec = TitleProbe::new(&SystemRunner, &toolchain).audio_codec("movie.iso".as_ref(), 1)?;
//!
//! Remuxer::new("movie.iso", 1, "movie.mkv")
//!     .selection(Selection::Chapters { start: 1, end: 4 })
//!     .audio(AudioStrategy::for_codec(&codec))
//!     .run(&SystemRunner, &toolchain)?;
//! # Ok::<(), dvdoll::DvdollError>(())
//! ```
//!
//! ### Interactive Session
//!
//! ```no_run
//! use dvdoll::{NoOpProgress, Session, SessionOptions, SystemRunner, TerminalConsole, Toolchain};
//!
//! let mut session = Session::new(SystemRunner, TerminalConsole::new(), Toolchain::default());
//! session.run(SessionOptions::new(), &NoOpProgress)?;
//! # Ok::<(), dvdoll::DvdollError>(())
//! ```
//!
//! ## Requirements
//!
//! `ffprobe` and `ffmpeg` (built with the `dvdvideo` demuxer, FFmpeg 7.0 or
//! later) must be on `PATH`, or named through `DVDOLL_FFPROBE` /
//! `DVDOLL_FFMPEG`.

pub mod audio;
pub mod configuration;
pub mod console;
pub mod error;
pub mod ffmpeg;
pub mod metadata;
pub mod probe;
pub mod progress;
pub mod remux;
pub mod selection;
pub mod session;
pub mod validation;

pub use audio::AudioStrategy;
pub use configuration::{SessionOptions, clean_input_path, output_file_name};
pub use console::{Console, ContinueKey, TerminalConsole};
pub use error::DvdollError;
pub use ffmpeg::{CommandRunner, FfmpegLogLevel, SystemRunner, Toolchain};
pub use metadata::{DiscMetadata, TitleMetadata};
pub use probe::TitleProbe;
pub use progress::{NoOpProgress, OperationType, ProgressCallback, ProgressInfo};
pub use remux::Remuxer;
pub use selection::{Selection, normalize_end_time, normalize_start_time};
pub use session::Session;
pub use validation::{ValidationReport, validate_session};

//! Progress reporting for title scanning.
//!
//! Listing a disc means one or two `ffprobe` runs per title, and each run
//! pre-indexes the title, so a full scan can take a while. A
//! [`ProgressCallback`] passed to
//! [`TitleProbe::list_titles`](crate::TitleProbe::list_titles) is told about
//! every title as it is probed.
//!
//! # Example
//!
//! ```no_run
//! use dvdoll::{ProgressCallback, ProgressInfo, SystemRunner, TitleProbe, Toolchain};
//!
//! struct PrintProgress;
//!
//! impl ProgressCallback for PrintProgress {
//!     fn on_progress(&self, info: &ProgressInfo) {
//!         eprintln!("probing title {} ({} found)", info.title, info.found);
//!     }
//! }
//!
//! let toolchain = Toolchain::default();
//! let probe = TitleProbe::new(&SystemRunner, &toolchain);
//! let disc = probe.list_titles("movie.iso".as_ref(), &PrintProgress);
//! ```

use std::time::Duration;

/// The kind of probe currently running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum OperationType {
    /// Enumerating titles and their chapter counts.
    TitleScan,
}

/// A snapshot of scan progress.
#[derive(Debug, Clone)]
pub struct ProgressInfo {
    /// What kind of work is being performed.
    pub operation: OperationType,
    /// Title currently being probed.
    pub title: u32,
    /// Titles found so far.
    pub found: usize,
    /// Wall-clock time elapsed since the operation started.
    pub elapsed: Duration,
}

/// Trait for receiving progress updates while probing.
///
/// Progress callbacks are infallible: they observe but cannot halt the scan.
pub trait ProgressCallback {
    /// Called before each title is probed.
    fn on_progress(&self, info: &ProgressInfo);

    /// Called once the operation has completed.
    fn on_finish(&self, _info: &ProgressInfo) {}
}

/// A no-op implementation that discards all progress notifications.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpProgress;

impl ProgressCallback for NoOpProgress {
    fn on_progress(&self, _info: &ProgressInfo) {}
}

//! Audio handling for the remux.
//!
//! Matroska carries DVD audio as-is with one exception: raw LPCM tracks are
//! large and poorly supported by players, so they are transcoded to FLAC at
//! maximum compression. Everything else (AC-3, DTS, MPEG audio) is copied.

use std::fmt::{Display, Formatter, Result as FmtResult};

/// FLAC compression level used for PCM tracks.
pub const FLAC_COMPRESSION_LEVEL: u8 = 8;

/// What to do with the audio streams during the remux.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AudioStrategy {
    /// Copy the audio streams unchanged.
    #[default]
    Copy,
    /// Transcode the audio streams to FLAC.
    Flac {
        /// FLAC compression level (0-12).
        compression_level: u8,
    },
}

impl AudioStrategy {
    /// Pick the strategy for a codec name reported by ffprobe.
    ///
    /// Any PCM variant (`pcm_dvd`, `pcm_s16be`, ...) is transcoded.
    pub fn for_codec(codec: &str) -> Self {
        if codec.to_lowercase().contains("pcm") {
            AudioStrategy::Flac {
                compression_level: FLAC_COMPRESSION_LEVEL,
            }
        } else {
            AudioStrategy::Copy
        }
    }

    /// The ffmpeg output options for this strategy.
    pub fn arguments(&self) -> Vec<String> {
        match self {
            AudioStrategy::Copy => vec!["-c:a".to_string(), "copy".to_string()],
            AudioStrategy::Flac { compression_level } => vec![
                "-c:a".to_string(),
                "flac".to_string(),
                "-compression_level:a".to_string(),
                compression_level.to_string(),
            ],
        }
    }
}

impl Display for AudioStrategy {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            AudioStrategy::Copy => f.write_str("copy"),
            AudioStrategy::Flac { compression_level } => {
                write!(f, "flac (level {compression_level})")
            }
        }
    }
}

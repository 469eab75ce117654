//! How much FFmpeg itself prints while decoding.
//!
//! FFmpeg writes its own diagnostics to stderr, apart from the `log` records
//! this crate emits. Seeking thousands of times through a long video makes
//! those diagnostics noisy, so the command line keeps them at `error`.
//!
//! ```no_run
//! use funscript_frames::{FfmpegLogLevel, set_ffmpeg_log_level};
//!
//! set_ffmpeg_log_level("quiet".parse().unwrap_or(FfmpegLogLevel::Error));
//! ```

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use ffmpeg_next::util::log::Level;

/// Verbosity of FFmpeg's stderr output, most quiet first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FfmpegLogLevel {
    /// Nothing at all.
    Quiet,
    /// Decoding errors only.
    #[default]
    Error,
    /// Errors and warnings, FFmpeg's own default.
    Warning,
    /// Stream and codec details as they are opened.
    Info,
    /// Everything FFmpeg reports.
    Debug,
}

impl FfmpegLogLevel {
    /// Every level with its command-line name.
    pub const ALL: [FfmpegLogLevel; 5] = [
        FfmpegLogLevel::Quiet,
        FfmpegLogLevel::Error,
        FfmpegLogLevel::Warning,
        FfmpegLogLevel::Info,
        FfmpegLogLevel::Debug,
    ];

    /// Lowercase name accepted by [`FromStr`].
    pub const fn name(self) -> &'static str {
        match self {
            FfmpegLogLevel::Quiet => "quiet",
            FfmpegLogLevel::Error => "error",
            FfmpegLogLevel::Warning => "warning",
            FfmpegLogLevel::Info => "info",
            FfmpegLogLevel::Debug => "debug",
        }
    }
}

impl From<FfmpegLogLevel> for Level {
    fn from(level: FfmpegLogLevel) -> Self {
        match level {
            FfmpegLogLevel::Quiet => Level::Quiet,
            FfmpegLogLevel::Error => Level::Error,
            FfmpegLogLevel::Warning => Level::Warning,
            FfmpegLogLevel::Info => Level::Info,
            FfmpegLogLevel::Debug => Level::Debug,
        }
    }
}

impl Display for FfmpegLogLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.name())
    }
}

impl FromStr for FfmpegLogLevel {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let wanted = value.trim().to_ascii_lowercase();
        if wanted == "warn" {
            return Ok(FfmpegLogLevel::Warning);
        }
        FfmpegLogLevel::ALL
            .into_iter()
            .find(|level| level.name() == wanted)
            .ok_or_else(|| {
                format!(
                    "unknown FFmpeg log level `{value}`, expected quiet, error, warning, info or debug"
                )
            })
    }
}

/// Apply `level` to FFmpeg's global logger. `log` records are unaffected.
pub fn set_ffmpeg_log_level(level: FfmpegLogLevel) {
    ffmpeg_next::util::log::set_level(level.into());
}

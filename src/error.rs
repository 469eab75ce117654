//! Error types for `funscript-frames`.
//!
//! All fallible operations return [`FunscriptError`]. Variants carry the
//! paths, frame numbers and upstream messages needed to diagnose a failure
//! without extra logging at the call site.

use std::{io::Error as IoError, path::PathBuf};

use ffmpeg_next::Error as FfmpegError;
use image::ImageError;
use serde_json::Error as JsonError;
use thiserror::Error;

/// The unified error type for all `funscript-frames` operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FunscriptError {
    /// The funscript file paired with a video does not exist.
    #[error(
        "Funscript file not found for {video}: expected {expected} (the track must share the video's name and folder)"
    )]
    MissingTrackFile {
        /// The video that was requested.
        video: PathBuf,
        /// Where the paired track file was looked for.
        expected: PathBuf,
    },

    /// The track document is malformed or lacks required fields.
    #[error("Invalid funscript document{}: {reason}", describe_path(.path))]
    FormatError {
        /// The file being read, when known.
        path: Option<PathBuf>,
        /// What was wrong with the document.
        reason: String,
    },

    /// The track contains no actions.
    #[error("Funscript track contains no actions")]
    EmptyTrack,

    /// The video could not be opened.
    #[error("Failed to open video file at {path}: {reason}")]
    FileOpen {
        /// Path that was passed to [`crate::MediaFile::open`].
        path: PathBuf,
        /// Underlying reason the open failed.
        reason: String,
    },

    /// The file does not contain a video stream.
    #[error("No video stream found in file")]
    NoVideoStream,

    /// The video reports no usable average frame rate.
    #[error("Invalid average frame rate: {0}")]
    InvalidFrameRate(f64),

    /// The decoder could not seek to or read a requested frame.
    #[error("Failed to decode video frame: {0}")]
    DecodeError(String),

    /// A mapped frame index lies at or beyond the end of the video.
    #[error("Frame {frame_number} is out of range (video has {total_frames} frames)")]
    FrameOutOfRange {
        /// The frame number that was requested.
        frame_number: u64,
        /// The total number of frames in the video.
        total_frames: u64,
    },

    /// The extrapolation fill percentage is outside `0..=100`.
    #[error("Fill percentage must be between 0 and 100, got {0}")]
    InvalidFillPercentage(f64),

    /// The requested decoder backend is not available in this build.
    #[error("Decoder backend '{0}' is not available in this build")]
    BackendUnavailable(String),

    /// The configuration file could not be read or parsed.
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigError {
        /// Configuration file path.
        path: PathBuf,
        /// What went wrong.
        reason: String,
    },

    /// An error originating from the FFmpeg libraries.
    #[error("FFmpeg error: {0}")]
    FfmpegError(String),

    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    IoError(#[from] IoError),

    /// An error from the `image` crate while resizing or encoding.
    #[error("Image processing error: {0}")]
    ImageError(#[from] ImageError),

    /// A JSON (de)serialization error outside of track parsing.
    #[error("JSON error: {0}")]
    JsonError(#[from] JsonError),
}

impl FunscriptError {
    /// Returns `true` for failures of the video backend to produce a frame.
    ///
    /// These abort the current video only; outputs of videos that already
    /// finished are left in place.
    pub fn is_decode_failure(&self) -> bool {
        matches!(
            self,
            FunscriptError::DecodeError(_)
                | FunscriptError::FrameOutOfRange { .. }
                | FunscriptError::FfmpegError(_)
        )
    }

    pub(crate) fn format(path: Option<PathBuf>, reason: impl Into<String>) -> Self {
        FunscriptError::FormatError {
            path,
            reason: reason.into(),
        }
    }
}

fn describe_path(path: &Option<PathBuf>) -> String {
    match path {
        Some(path) => format!(" {}", path.display()),
        None => String::new(),
    }
}

impl From<FfmpegError> for FunscriptError {
    fn from(error: FfmpegError) -> Self {
        FunscriptError::FfmpegError(error.to_string())
    }
}

//! The video collaborator.
//!
//! Frame extraction and VR classification only need three things from a
//! video: its average frame rate, its frame count, and a decoded frame for a
//! given index. [`VideoSource`] captures exactly that, so the core logic
//! runs the same against the FFmpeg-backed [`MediaFile`](crate::MediaFile)
//! and against in-memory sources.

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use image::DynamicImage;
use serde::{Deserialize, Serialize};

use crate::{error::FunscriptError, metadata::VideoMetadata};

/// A seekable, singly-owned source of decoded video frames.
///
/// Every [`frame`](VideoSource::frame) call performs its own seek; callers
/// make no assumption about the decoder position between calls. Only one
/// read may be outstanding at a time, which `&mut self` enforces.
pub trait VideoSource {
    /// Cached metadata of the video stream.
    fn metadata(&self) -> &VideoMetadata;

    /// Decode the frame at `frame_number` (0-indexed) as an RGB image.
    ///
    /// # Errors
    ///
    /// Returns [`FunscriptError::FrameOutOfRange`] for an index at or beyond
    /// [`frame_count`](VideoSource::frame_count) and
    /// [`FunscriptError::DecodeError`] if the frame cannot be read.
    fn frame(&mut self, frame_number: u64) -> Result<DynamicImage, FunscriptError>;

    /// Average frames per second.
    fn average_fps(&self) -> f64 {
        self.metadata().frames_per_second
    }

    /// Total number of frames.
    fn frame_count(&self) -> u64 {
        self.metadata().frame_count
    }
}

impl<V: VideoSource + ?Sized> VideoSource for &mut V {
    fn metadata(&self) -> &VideoMetadata {
        (**self).metadata()
    }

    fn frame(&mut self, frame_number: u64) -> Result<DynamicImage, FunscriptError> {
        (**self).frame(frame_number)
    }
}

/// Which decoder implementation opens videos.
///
/// Only the CPU decoder ships with this crate; selecting
/// [`Gpu`](DecoderBackend::Gpu) fails with
/// [`FunscriptError::BackendUnavailable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecoderBackend {
    /// Software decoding through FFmpeg.
    #[default]
    Cpu,
    /// Hardware decoding. Requires a specially built decoder.
    Gpu,
}

impl DecoderBackend {
    /// Fail unless this backend can be used in this build.
    pub fn ensure_available(self) -> Result<(), FunscriptError> {
        match self {
            DecoderBackend::Cpu => Ok(()),
            DecoderBackend::Gpu => Err(FunscriptError::BackendUnavailable(self.to_string())),
        }
    }
}

impl Display for DecoderBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            DecoderBackend::Cpu => write!(f, "cpu"),
            DecoderBackend::Gpu => write!(f, "gpu"),
        }
    }
}

impl FromStr for DecoderBackend {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "cpu" | "software" => Ok(DecoderBackend::Cpu),
            "gpu" | "cuda" => Ok(DecoderBackend::Gpu),
            _ => Err(format!("unknown decoder backend: {value} (expected cpu or gpu)")),
        }
    }
}

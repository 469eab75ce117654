//! Video metadata.
//!
//! [`VideoMetadata`] is read once when a video is opened and cached for the
//! lifetime of the [`MediaFile`](crate::MediaFile).

/// Metadata for the video stream frames are extracted from.
///
/// # Example
///
/// ```no_run
/// use funscript_frames::{MediaFile, VideoSource};
///
/// let video = MediaFile::open("input.mp4").unwrap();
/// let metadata = video.metadata();
/// println!("{}x{} @ {:.2} fps", metadata.width, metadata.height, metadata.frames_per_second);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct VideoMetadata {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Average frames per second.
    pub frames_per_second: f64,
    /// Total number of frames. Taken from the container when it records a
    /// count, otherwise estimated from duration and frame rate.
    pub frame_count: u64,
    /// Codec name (e.g. `"h264"`, `"hevc"`, `"vp9"`).
    pub codec: String,
}

impl VideoMetadata {
    /// Duration of the video in milliseconds, derived from frame count and
    /// rate.
    pub fn duration_ms(&self) -> f64 {
        if self.frames_per_second > 0.0 {
            self.frame_count as f64 / self.frames_per_second * 1000.0
        } else {
            0.0
        }
    }
}

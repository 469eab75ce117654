//! Timestamp to frame-index mapping.

use crate::error::FunscriptError;

/// Convert an average frame rate in frames per second to frames per
/// millisecond.
///
/// # Errors
///
/// Returns [`FunscriptError::InvalidFrameRate`] if `frames_per_second` is
/// not a positive finite number.
pub fn frames_per_millisecond(frames_per_second: f64) -> Result<f64, FunscriptError> {
    if frames_per_second.is_finite() && frames_per_second > 0.0 {
        Ok(frames_per_second / 1000.0)
    } else {
        Err(FunscriptError::InvalidFrameRate(frames_per_second))
    }
}

/// Frame index nearest to `at_ms`: `round(at_ms * fps_ms)`.
///
/// Exact halves round to the even frame. No bounds checking; see
/// [`FrameIndexMapper::checked`].
///
/// ```
/// use funscript_frames::to_frame_index;
///
/// assert_eq!(to_frame_index(0, 0.03), 0);
/// assert_eq!(to_frame_index(1000, 0.03), 30);
/// assert_eq!(to_frame_index(1020, 0.03), 31); // 30.6 rounds up
/// assert_eq!(to_frame_index(100, 0.025), 2); // 2.5 rounds to even
/// ```
pub fn to_frame_index(at_ms: u64, frames_per_millisecond: f64) -> u64 {
    (at_ms as f64 * frames_per_millisecond).round_ties_even() as u64
}

/// Maps action timestamps onto one video's frame timeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameIndexMapper {
    frames_per_millisecond: f64,
    frame_count: u64,
}

impl FrameIndexMapper {
    /// Create a mapper for a video with the given average rate and length.
    ///
    /// # Errors
    ///
    /// Returns [`FunscriptError::InvalidFrameRate`] for a non-positive rate.
    pub fn new(frames_per_second: f64, frame_count: u64) -> Result<Self, FunscriptError> {
        Ok(Self {
            frames_per_millisecond: frames_per_millisecond(frames_per_second)?,
            frame_count,
        })
    }

    /// Frames per millisecond of the mapped video.
    pub fn frames_per_millisecond(&self) -> f64 {
        self.frames_per_millisecond
    }

    /// Total frames of the mapped video.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Frame index for `at_ms`, without bounds checking.
    pub fn map(&self, at_ms: u64) -> u64 {
        to_frame_index(at_ms, self.frames_per_millisecond)
    }

    /// Frame index for `at_ms`, which must fall inside the video.
    ///
    /// # Errors
    ///
    /// Returns [`FunscriptError::FrameOutOfRange`] when the index is at or
    /// beyond the frame count. Indices are never clamped.
    pub fn checked(&self, at_ms: u64) -> Result<u64, FunscriptError> {
        let frame_number = self.map(at_ms);
        if frame_number >= self.frame_count {
            return Err(FunscriptError::FrameOutOfRange {
                frame_number,
                total_frames: self.frame_count,
            });
        }
        Ok(frame_number)
    }
}

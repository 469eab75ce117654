//! Side-by-side (VR) video detection.
//!
//! A side-by-side stereo video shows two near-identical views, one per eye.
//! Re-encoding each half of a frame and comparing the encoded sizes is a
//! cheap proxy for that similarity: identical content compresses to nearly
//! the same number of bytes.

use std::{fs, path::Path};

use crate::{
    error::FunscriptError,
    image_ops::{save_jpeg, split_vertical},
    video::VideoSource,
};

/// Similarity above which a video counts as side-by-side VR.
pub const DEFAULT_VR_THRESHOLD: f64 = 0.92;

/// Outcome of probing one video.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VrClassification {
    /// Encoded size of the left half in bytes.
    pub left_bytes: u64,
    /// Encoded size of the right half in bytes.
    pub right_bytes: u64,
    /// Smaller size divided by the larger, in `0.0..=1.0`.
    pub similarity: f64,
    /// Whether the video is treated as side-by-side VR.
    pub is_vr: bool,
}

/// Classify from the encoded half sizes with the default threshold.
///
/// ```
/// use funscript_frames::classify_sizes;
///
/// assert!(classify_sizes(1000, 960).is_vr);
/// assert!(!classify_sizes(1000, 800).is_vr);
/// ```
pub fn classify_sizes(left_bytes: u64, right_bytes: u64) -> VrClassification {
    VideoClassifier::default().classify_sizes(left_bytes, right_bytes)
}

/// Decides whether a video is side-by-side VR.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VideoClassifier {
    threshold: f64,
}

impl Default for VideoClassifier {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_VR_THRESHOLD,
        }
    }
}

impl VideoClassifier {
    /// Create a classifier with a custom similarity threshold.
    pub fn with_threshold(threshold: f64) -> Self {
        Self { threshold }
    }

    /// The similarity a video must exceed to count as VR.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Classify from the encoded sizes of the two halves.
    ///
    /// Two empty halves are identical and classify as VR.
    pub fn classify_sizes(&self, left_bytes: u64, right_bytes: u64) -> VrClassification {
        let larger = left_bytes.max(right_bytes);
        let smaller = left_bytes.min(right_bytes);
        let similarity = if larger == 0 {
            1.0
        } else {
            smaller as f64 / larger as f64
        };
        VrClassification {
            left_bytes,
            right_bytes,
            similarity,
            is_vr: similarity > self.threshold,
        }
    }

    /// Classify `video` from the frame at its temporal midpoint.
    ///
    /// Each half is written as a JPEG into a scratch directory unique to this
    /// call; the directory is removed when the call returns, on success and
    /// on error alike.
    ///
    /// # Errors
    ///
    /// Returns decoding errors from the video, or I/O and encoding errors
    /// from the half-frame files.
    pub fn classify(&self, video: &mut dyn VideoSource) -> Result<VrClassification, FunscriptError> {
        let frame_count = video.frame_count();
        let middle = frame_count / 2;
        if frame_count == 0 {
            return Err(FunscriptError::FrameOutOfRange {
                frame_number: middle,
                total_frames: frame_count,
            });
        }

        let frame = video.frame(middle)?;
        let (left, right) = split_vertical(&frame);

        let scratch = tempfile::Builder::new()
            .prefix("funscript-vr-check-")
            .tempdir()?;
        let left_bytes = write_half(&left, &scratch.path().join("left.jpg"))?;
        let right_bytes = write_half(&right, &scratch.path().join("right.jpg"))?;
        scratch.close()?;

        let classification = self.classify_sizes(left_bytes, right_bytes);
        log::debug!(
            "VR check at frame {middle}: left={}B right={}B similarity={:.2}% -> {}",
            classification.left_bytes,
            classification.right_bytes,
            classification.similarity * 100.0,
            if classification.is_vr { "VR" } else { "2D" },
        );
        Ok(classification)
    }
}

fn write_half(image: &image::DynamicImage, path: &Path) -> Result<u64, FunscriptError> {
    save_jpeg(image, path)?;
    Ok(fs::metadata(path)?.len())
}

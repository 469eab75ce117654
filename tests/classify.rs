//! Side-by-side VR classification tests.

mod common;

use std::{collections::HashSet, ffi::OsString, fs};

use common::SyntheticVideo;
use funscript_frames::{
    FunscriptError, VideoClassifier, VideoMetadata, VideoSource, classify_sizes,
};
use image::{DynamicImage, RgbImage};

#[test]
fn similar_halves_are_vr() {
    let classification = classify_sizes(1000, 960);
    assert!(classification.is_vr);
    assert_eq!(classification.similarity, 0.96);
}

#[test]
fn dissimilar_halves_are_flat() {
    assert!(!classify_sizes(1000, 800).is_vr);
    assert!(!classify_sizes(800, 1000).is_vr);
}

#[test]
fn threshold_is_exclusive() {
    assert!(!classify_sizes(1000, 920).is_vr);
    assert!(classify_sizes(1000, 921).is_vr);
}

#[test]
fn empty_halves_count_as_identical() {
    assert!(classify_sizes(0, 0).is_vr);
    assert!(!classify_sizes(0, 500).is_vr);
}

#[test]
fn custom_threshold() {
    let classifier = VideoClassifier::with_threshold(0.75);
    assert_eq!(classifier.threshold(), 0.75);
    assert!(classifier.classify_sizes(1000, 800).is_vr);
}

/// A video whose halves are too wide for the JPEG encoder, so writing the
/// first half fails after the scratch directory exists.
struct OversizedVideo {
    metadata: VideoMetadata,
}

impl OversizedVideo {
    fn new() -> Self {
        Self {
            metadata: VideoMetadata {
                width: 131_072,
                height: 1,
                frames_per_second: 30.0,
                frame_count: 10,
                codec: "synthetic".to_string(),
            },
        }
    }
}

impl VideoSource for OversizedVideo {
    fn metadata(&self) -> &VideoMetadata {
        &self.metadata
    }

    fn frame(&mut self, _frame_number: u64) -> Result<DynamicImage, FunscriptError> {
        Ok(DynamicImage::ImageRgb8(RgbImage::new(
            self.metadata.width,
            self.metadata.height,
        )))
    }
}

fn scratch_directories() -> HashSet<OsString> {
    fs::read_dir(std::env::temp_dir())
        .map(|entries| {
            entries
                .filter_map(Result::ok)
                .map(|entry| entry.file_name())
                .filter(|name| name.to_string_lossy().starts_with("funscript-vr-check-"))
                .collect()
        })
        .unwrap_or_default()
}

// The only test in this file that decodes, so no other test creates scratch
// directories while it checks for leftovers.
#[test]
fn classify_synthetic_videos_and_clean_up() {
    let before = scratch_directories();
    let classifier = VideoClassifier::default();

    let mut stereo = SyntheticVideo::side_by_side(30.0, 120);
    let classification = classifier.classify(&mut stereo).unwrap();
    assert!(classification.is_vr, "{classification:?}");
    assert_eq!(stereo.requested, vec![60]);

    let mut flat = SyntheticVideo::flat(30.0, 121);
    let classification = classifier.classify(&mut flat).unwrap();
    assert!(!classification.is_vr, "{classification:?}");
    assert_eq!(flat.requested, vec![60]);

    let mut empty = SyntheticVideo::flat(30.0, 0);
    assert!(matches!(
        classifier.classify(&mut empty),
        Err(FunscriptError::FrameOutOfRange { .. })
    ));

    // Encoding fails once the directory holds a partial file.
    let result = classifier.classify(&mut OversizedVideo::new());
    assert!(
        matches!(result, Err(FunscriptError::ImageError(_))),
        "Expected ImageError, got {result:?}",
    );

    let leftovers: Vec<_> = scratch_directories().difference(&before).cloned().collect();
    assert!(leftovers.is_empty(), "Scratch directories left behind: {leftovers:?}");
}

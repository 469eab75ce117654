//! Shared helpers for integration tests.
//!
//! [`SyntheticVideo`] stands in for a decoded video file: frames are
//! generated in memory, so extraction and classification can be tested
//! without FFmpeg fixtures.

#![allow(dead_code)]

use std::{
    fs,
    path::{Path, PathBuf},
};

use funscript_frames::{FunscriptError, VideoMetadata, VideoSource};
use image::{DynamicImage, Rgb, RgbImage};

pub fn sample_video_path() -> &'static str {
    "tests/fixtures/sample_video.mp4"
}

/// In-memory video with a noisy pattern on the left half of every frame.
///
/// A side-by-side video repeats the left half on the right; a flat video
/// fills the right half with a single color.
pub struct SyntheticVideo {
    metadata: VideoMetadata,
    side_by_side: bool,
    /// Every frame index that was decoded, in request order.
    pub requested: Vec<u64>,
}

impl SyntheticVideo {
    pub fn flat(frames_per_second: f64, frame_count: u64) -> Self {
        Self::new(frames_per_second, frame_count, false)
    }

    pub fn side_by_side(frames_per_second: f64, frame_count: u64) -> Self {
        Self::new(frames_per_second, frame_count, true)
    }

    fn new(frames_per_second: f64, frame_count: u64, side_by_side: bool) -> Self {
        Self {
            metadata: VideoMetadata {
                width: 128,
                height: 64,
                frames_per_second,
                frame_count,
                codec: "synthetic".to_string(),
            },
            side_by_side,
            requested: Vec::new(),
        }
    }
}

impl VideoSource for SyntheticVideo {
    fn metadata(&self) -> &VideoMetadata {
        &self.metadata
    }

    fn frame(&mut self, frame_number: u64) -> Result<DynamicImage, FunscriptError> {
        if frame_number >= self.metadata.frame_count {
            return Err(FunscriptError::FrameOutOfRange {
                frame_number,
                total_frames: self.metadata.frame_count,
            });
        }
        self.requested.push(frame_number);

        let (width, height) = (self.metadata.width, self.metadata.height);
        let half = width / 2;
        let seed = frame_number as u32;
        let side_by_side = self.side_by_side;
        let image = RgbImage::from_fn(width, height, |x, y| {
            if x < half {
                noise(x, y, seed)
            } else if side_by_side {
                noise(x - half, y, seed)
            } else {
                Rgb([128, 128, 128])
            }
        });
        Ok(DynamicImage::ImageRgb8(image))
    }
}

fn noise(x: u32, y: u32, seed: u32) -> Rgb<u8> {
    let mut value = x.wrapping_mul(0x9E37_79B1) ^ y.wrapping_mul(0x85EB_CA77) ^ seed;
    value ^= value >> 15;
    value = value.wrapping_mul(0x2C1B_3C6D);
    value ^= value >> 12;
    let [r, g, b, _] = value.to_le_bytes();
    Rgb([r, g, b])
}

/// Write `json` as the funscript paired with `dir/<video_name>` and return
/// the video path. The video file itself is not created.
pub fn write_track(dir: &Path, video_name: &str, json: &str) -> PathBuf {
    let video_path = dir.join(video_name);
    fs::write(video_path.with_extension("funscript"), json).expect("Failed to write track");
    video_path
}

/// Relative paths of all files under `dir`, sorted.
pub fn list_files(dir: &Path) -> Vec<String> {
    let mut files = Vec::new();
    collect_files(dir, dir, &mut files);
    files.sort();
    files
}

fn collect_files(root: &Path, dir: &Path, files: &mut Vec<String>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries {
        let path = entry.expect("Failed to read directory entry").path();
        if path.is_dir() {
            collect_files(root, &path, files);
        } else {
            let relative = path.strip_prefix(root).expect("Path outside root");
            files.push(relative.to_string_lossy().replace('\\', "/"));
        }
    }
}

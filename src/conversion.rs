//! Frame timing and pixel layout helpers for the FFmpeg-backed source.

use ffmpeg_next::{Rational, frame::Video as VideoFrame};

/// FFmpeg's container-level seek unit (`AV_TIME_BASE`).
const MICROSECONDS_PER_SECOND: f64 = 1_000_000.0;

/// Bytes per pixel of `Pixel::RGB24`.
const RGB_BYTES: usize = 3;

/// Translates between a stream's presentation timestamps and frame numbers.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FrameClock {
    time_base: Rational,
    frames_per_second: f64,
}

impl FrameClock {
    pub(crate) fn new(time_base: Rational, frames_per_second: f64) -> Self {
        Self {
            time_base,
            frames_per_second,
        }
    }

    /// Frame number nearest to `pts`. Timestamps before the stream start
    /// count as frame 0; exact halves go to the even frame.
    pub(crate) fn frame_at(&self, pts: i64) -> u64 {
        let seconds = (pts as f64 * f64::from(self.time_base)).max(0.0);
        (seconds * self.frames_per_second).round_ties_even() as u64
    }

    /// Container seek target for `frame_number`, in microseconds.
    pub(crate) fn seek_target(&self, frame_number: u64) -> i64 {
        let seconds = frame_number as f64 / self.frames_per_second;
        (seconds * MICROSECONDS_PER_SECOND) as i64
    }
}

/// Pack the first plane of an RGB24 frame into `width * 3` bytes per row,
/// dropping any row padding FFmpeg added.
pub(crate) fn packed_rgb(frame: &VideoFrame, width: u32, height: u32) -> Vec<u8> {
    let row_bytes = width as usize * RGB_BYTES;
    let stride = frame.stride(0);
    pack_rows(frame.data(0), stride, row_bytes, height as usize)
}

fn pack_rows(plane: &[u8], stride: usize, row_bytes: usize, rows: usize) -> Vec<u8> {
    if stride == row_bytes {
        return plane[..row_bytes * rows].to_vec();
    }
    plane
        .chunks(stride)
        .take(rows)
        .flat_map(|row| &row[..row_bytes])
        .copied()
        .collect()
}

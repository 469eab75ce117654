//! FFmpeg-backed [`VideoSource`].
//!
//! [`MediaFile`] opens a video with FFmpeg, caches metadata of its best video
//! stream, and decodes single frames on demand. Every frame request builds a
//! fresh decoder, seeks to the nearest keyframe before the target and
//! decodes forward until the target frame is reached.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    path::{Path, PathBuf},
    time::Duration,
};

use ffmpeg_next::{
    codec::context::Context as CodecContext,
    format::{Pixel, context::Input},
    frame::Video as VideoFrame,
    media::Type,
    software::scaling::{Context as ScalingContext, Flags as ScalingFlags},
};
use image::{DynamicImage, RgbImage};

use crate::{
    conversion::{FrameClock, packed_rgb},
    error::FunscriptError,
    metadata::VideoMetadata,
    video::{DecoderBackend, VideoSource},
};

/// An opened video file.
///
/// # Example
///
/// ```no_run
/// use funscript_frames::{MediaFile, VideoSource};
///
/// let mut video = MediaFile::open("input.mp4")?;
/// let middle = video.frame_count() / 2;
/// video.frame(middle)?.save("middle.png")?;
/// # Ok::<(), funscript_frames::FunscriptError>(())
/// ```
pub struct MediaFile {
    input_context: Input,
    metadata: VideoMetadata,
    video_stream_index: usize,
    file_path: PathBuf,
}

impl Debug for MediaFile {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("MediaFile")
            .field("metadata", &self.metadata)
            .field("video_stream_index", &self.video_stream_index)
            .field("file_path", &self.file_path)
            .finish_non_exhaustive()
    }
}

impl MediaFile {
    /// Open a video with the CPU decoder.
    ///
    /// # Errors
    ///
    /// Returns [`FunscriptError::FileOpen`] if the file cannot be opened or
    /// its video codec cannot be set up, and
    /// [`FunscriptError::NoVideoStream`] if it has no video stream.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, FunscriptError> {
        Self::open_with_backend(path, DecoderBackend::Cpu)
    }

    /// Open a video with the given decoder backend.
    ///
    /// # Errors
    ///
    /// Returns [`FunscriptError::BackendUnavailable`] for a backend this
    /// build cannot provide, or any error from [`open`](MediaFile::open).
    pub fn open_with_backend<P: AsRef<Path>>(
        path: P,
        backend: DecoderBackend,
    ) -> Result<Self, FunscriptError> {
        backend.ensure_available()?;
        if backend == DecoderBackend::Cpu {
            log::warn!("Decoding on the CPU; GPU decoding needs a specially built decoder backend");
        }

        let path = path.as_ref();
        let file_path = path.to_path_buf();

        log::debug!("Opening video file: {}", file_path.display());

        ffmpeg_next::init().map_err(|error| FunscriptError::FileOpen {
            path: file_path.clone(),
            reason: format!("FFmpeg initialisation failed: {error}"),
        })?;

        let input_context =
            ffmpeg_next::format::input(&path).map_err(|error| FunscriptError::FileOpen {
                path: file_path.clone(),
                reason: error.to_string(),
            })?;

        let stream = input_context
            .streams()
            .best(Type::Video)
            .ok_or(FunscriptError::NoVideoStream)?;
        let video_stream_index = stream.index();

        let decoder_context = CodecContext::from_parameters(stream.parameters()).map_err(
            |error| FunscriptError::FileOpen {
                path: file_path.clone(),
                reason: format!("Failed to read video codec parameters: {error}"),
            },
        )?;
        let video_decoder =
            decoder_context
                .decoder()
                .video()
                .map_err(|error| FunscriptError::FileOpen {
                    path: file_path.clone(),
                    reason: format!("Failed to create video decoder: {error}"),
                })?;

        let frame_rate = stream.avg_frame_rate();
        let frames_per_second = if frame_rate.denominator() != 0 && frame_rate.numerator() > 0 {
            frame_rate.numerator() as f64 / frame_rate.denominator() as f64
        } else {
            let rate = stream.rate();
            if rate.denominator() != 0 {
                rate.numerator() as f64 / rate.denominator() as f64
            } else {
                0.0
            }
        };

        let duration_microseconds = input_context.duration();
        let duration = if duration_microseconds > 0 {
            Duration::from_micros(duration_microseconds as u64)
        } else {
            Duration::ZERO
        };

        let frame_count = if stream.frames() > 0 {
            stream.frames() as u64
        } else if frames_per_second > 0.0 {
            (duration.as_secs_f64() * frames_per_second) as u64
        } else {
            0
        };

        let codec = video_decoder
            .codec()
            .map(|codec| codec.name().to_string())
            .unwrap_or_else(|| "unknown".to_string());

        let metadata = VideoMetadata {
            width: video_decoder.width(),
            height: video_decoder.height(),
            frames_per_second,
            frame_count,
            codec,
        };

        log::info!(
            "Opened video file: {} ({}x{}, {:.2} fps, codec={}, {} frames)",
            file_path.display(),
            metadata.width,
            metadata.height,
            metadata.frames_per_second,
            metadata.codec,
            metadata.frame_count,
        );

        Ok(Self {
            input_context,
            metadata,
            video_stream_index,
            file_path,
        })
    }

    /// Path the video was opened from.
    pub fn path(&self) -> &Path {
        &self.file_path
    }
}

impl VideoSource for MediaFile {
    fn metadata(&self) -> &VideoMetadata {
        &self.metadata
    }

    fn frame(&mut self, frame_number: u64) -> Result<DynamicImage, FunscriptError> {
        let total_frames = self.metadata.frame_count;
        let frames_per_second = self.metadata.frames_per_second;
        let width = self.metadata.width;
        let height = self.metadata.height;

        if frame_number >= total_frames {
            return Err(FunscriptError::FrameOutOfRange {
                frame_number,
                total_frames,
            });
        }

        let stream = self
            .input_context
            .stream(self.video_stream_index)
            .ok_or(FunscriptError::NoVideoStream)?;
        let clock = FrameClock::new(stream.time_base(), frames_per_second);
        let decoder_context = CodecContext::from_parameters(stream.parameters())?;
        let mut decoder = decoder_context.decoder().video()?;

        let mut scaler = ScalingContext::get(
            decoder.format(),
            decoder.width(),
            decoder.height(),
            Pixel::RGB24,
            width,
            height,
            ScalingFlags::BILINEAR,
        )?;

        let seek_timestamp = clock.seek_target(frame_number);
        self.input_context
            .seek(seek_timestamp, ..seek_timestamp)
            .map_err(|error| {
                FunscriptError::DecodeError(format!(
                    "Failed to seek to frame {frame_number} in {}: {error}",
                    self.file_path.display()
                ))
            })?;

        let mut decoded_frame = VideoFrame::empty();
        let mut rgb_frame = VideoFrame::empty();

        for (stream, packet) in self.input_context.packets() {
            if stream.index() != self.video_stream_index {
                continue;
            }

            decoder.send_packet(&packet)?;

            while decoder.receive_frame(&mut decoded_frame).is_ok() {
                let pts = decoded_frame.pts().unwrap_or(0);
                let current_frame_number = clock.frame_at(pts);

                // A seek can land past frames that only exist as B-frame
                // references; the first frame at or after the target wins.
                if current_frame_number >= frame_number {
                    scaler.run(&decoded_frame, &mut rgb_frame)?;
                    return convert_frame_to_image(&rgb_frame, width, height);
                }
            }
        }

        decoder.send_eof()?;
        while decoder.receive_frame(&mut decoded_frame).is_ok() {
            let pts = decoded_frame.pts().unwrap_or(0);
            let current_frame_number = clock.frame_at(pts);

            if current_frame_number >= frame_number {
                scaler.run(&decoded_frame, &mut rgb_frame)?;
                return convert_frame_to_image(&rgb_frame, width, height);
            }
        }

        Err(FunscriptError::DecodeError(format!(
            "Could not locate frame {frame_number} in {}",
            self.file_path.display()
        )))
    }
}

fn convert_frame_to_image(
    rgb_frame: &VideoFrame,
    width: u32,
    height: u32,
) -> Result<DynamicImage, FunscriptError> {
    let buffer = packed_rgb(rgb_frame, width, height);
    let rgb_image = RgbImage::from_raw(width, height, buffer).ok_or_else(|| {
        FunscriptError::DecodeError(
            "Failed to construct RGB image from decoded frame data".to_string(),
        )
    })?;
    Ok(DynamicImage::ImageRgb8(rgb_image))
}

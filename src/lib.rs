//! # funscript-frames
//!
//! Extract still frames from videos at the timestamps of their paired
//! funscript tracks, and densify those tracks to the video's frame rate.
//!
//! A funscript is a JSON file next to a video (`clip.mp4` pairs with
//! `clip.funscript`) holding a list of timed actions, each with a position
//! between 0 and 100. Frame extraction writes one JPEG per action into a
//! folder named after its position, producing a labelled image set.
//! Extrapolation writes a copy of the track with interpolated actions
//! inserted between existing ones.
//!
//! Decoding is powered by FFmpeg via the
//! [`ffmpeg-next`](https://crates.io/crates/ffmpeg-next) crate.
//!
//! ## Quick Start
//!
//! ### Extract Frames for a Video
//!
//! ```no_run
//! use funscript_frames::{ExtractOptions, FrameExtractor, RunOptions, extract_video_frames};
//!
//! let options = RunOptions {
//!     extract: ExtractOptions::new().with_output_width(400),
//!     ..RunOptions::default()
//! };
//! let mut extractor = FrameExtractor::new(options.extract.clone());
//! let summary = extract_video_frames(&mut extractor, "clip.mp4".as_ref(), &options)?;
//! println!("{} images saved", summary.saved);
//! # Ok::<(), funscript_frames::FunscriptError>(())
//! ```
//!
//! ### Extrapolate a Track
//!
//! ```
//! use funscript_frames::{Action, ActionTrack, FillRatio};
//!
//! let track = ActionTrack::new(vec![Action::new(0, 0), Action::new(1000, 100)], Default::default());
//! let (dense, report) = track.extrapolated(0.03, FillRatio::FULL)?;
//! assert_eq!(dense.len(), 31);
//! assert_eq!(report.added(), 29);
//! # Ok::<(), funscript_frames::FunscriptError>(())
//! ```
//!
//! ## Features
//!
//! - **Track handling**: load and save funscript files, keeping unknown
//!   top-level keys intact
//! - **Deduplication**: collapse consecutive actions with the same position
//! - **Extrapolation**: fill frame gaps with linearly interpolated actions
//! - **Frame extraction**: one resized JPEG per action, grouped by position
//! - **VR detection**: side-by-side videos are recognised and only the left
//!   eye is saved
//! - **Bulk runs**: collect images of many videos under one folder
//! - **Progress**: callbacks with throughput and time estimates
//!
//! ## Requirements
//!
//! FFmpeg development libraries must be installed on your system.

pub mod action;
pub mod classify;
pub mod configuration;
mod conversion;
pub mod dedup;
pub mod error;
pub mod extract;
pub mod extrapolate;
pub mod ffmpeg;
pub mod image_ops;
pub mod mapping;
pub mod media;
pub mod metadata;
pub mod pipeline;
pub mod progress;
pub mod track;
pub mod video;

pub use action::Action;
pub use classify::{DEFAULT_VR_THRESHOLD, VideoClassifier, VrClassification, classify_sizes};
pub use configuration::{
    ActionMode, ExtractOptions, ExtrapolateOptions, NumberingMode, RunOptions, Settings,
};
pub use dedup::{DedupReport, dedupe};
pub use error::FunscriptError;
pub use extract::{ExtractionSummary, FrameExtractor, FrameGrabRequest, SaveOutcome};
pub use extrapolate::{ExtrapolationReport, FillRatio, extrapolate};
pub use ffmpeg::{FfmpegLogLevel, set_ffmpeg_log_level};
pub use mapping::{FrameIndexMapper, frames_per_millisecond, to_frame_index};
pub use media::MediaFile;
pub use metadata::VideoMetadata;
pub use pipeline::{
    ExtrapolationSummary, RunSummary, VideoOutcome, extract_video_frames, extrapolate_track,
    extrapolate_video_track, plan_video_frames, run,
};
pub use progress::{ProgressCallback, ProgressInfo};
pub use track::{ActionTrack, extrapolated_track_path_for, track_path_for};
pub use video::{DecoderBackend, VideoSource};

//! Per-video operations and the bulk runner.
//!
//! Each video is handled start to finish before the next one is opened: its
//! paired track is loaded, the video is opened, the selected action runs and
//! the decoder is dropped. The first fatal error stops the run; outputs of
//! videos that already finished, and images written before the failure, are
//! left in place.

use std::path::{Path, PathBuf};

use crate::{
    configuration::{ActionMode, ExtrapolateOptions, RunOptions},
    dedup::DedupReport,
    error::FunscriptError,
    extract::{BULK_FOLDER, ExtractionSummary, FrameExtractor, FrameGrabRequest, output_directory},
    extrapolate::ExtrapolationReport,
    mapping::frames_per_millisecond,
    media::MediaFile,
    track::{ActionTrack, extrapolated_track_path_for},
    video::{DecoderBackend, VideoSource},
};

/// Result of extrapolating one video's track.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtrapolationSummary {
    /// Where the extrapolated track was written.
    pub output_path: PathBuf,
    /// Source and final action counts.
    pub report: ExtrapolationReport,
    /// Deduplication counts, when duplicates were removed first.
    pub deduplication: Option<DedupReport>,
}

/// Outcome of one video in a run.
#[derive(Debug, Clone, PartialEq)]
pub enum VideoOutcome {
    /// Images were extracted.
    Extracted(ExtractionSummary),
    /// An extrapolated track was written.
    Extrapolated(ExtrapolationSummary),
}

/// Per-video outcomes of a run, in input order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    /// One entry per finished video.
    pub videos: Vec<(PathBuf, VideoOutcome)>,
}

impl RunSummary {
    /// Total images written across all videos.
    pub fn images_saved(&self) -> u64 {
        self.videos
            .iter()
            .map(|(_, outcome)| match outcome {
                VideoOutcome::Extracted(summary) => summary.saved,
                VideoOutcome::Extrapolated(_) => 0,
            })
            .sum()
    }
}

/// Folder name under `output/` for `video_path`: the video's file name, or
/// `bulk` when all videos share one folder.
pub fn folder_name_for(video_path: &Path, bulk: bool) -> String {
    if bulk {
        return BULK_FOLDER.to_string();
    }
    video_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| BULK_FOLDER.to_string())
}

/// Directory images of `video_path` go to.
///
/// Rooted at `output_root` when given, otherwise at the video's folder.
pub fn target_directory_for(video_path: &Path, options: &RunOptions) -> PathBuf {
    let root = match &options.output_root {
        Some(root) => root.clone(),
        None => video_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default(),
    };
    output_directory(&root, &folder_name_for(video_path, options.bulk))
}

/// Extract frames for one video using `extractor`.
///
/// # Errors
///
/// Returns [`FunscriptError::MissingTrackFile`] when the paired track is
/// missing, open errors for the video, and any extraction error.
pub fn extract_video_frames(
    extractor: &mut FrameExtractor,
    video_path: &Path,
    options: &RunOptions,
) -> Result<ExtractionSummary, FunscriptError> {
    let track = ActionTrack::load_for_video(video_path)?;
    let mut video = MediaFile::open_with_backend(video_path, options.decoder)?;
    let target_dir = target_directory_for(video_path, options);

    log::info!(
        "Extracting frames from {} into {}",
        video_path.display(),
        target_dir.display(),
    );
    extractor.extract(&track, &mut video, &target_dir)
}

/// Plan the frame grabs for one video without decoding or writing.
pub fn plan_video_frames(
    video_path: &Path,
    options: &RunOptions,
) -> Result<Vec<FrameGrabRequest>, FunscriptError> {
    let track = ActionTrack::load_for_video(video_path)?;
    let video = MediaFile::open_with_backend(video_path, options.decoder)?;
    let target_dir = target_directory_for(video_path, options);
    FrameExtractor::new(options.extract.clone()).plan(
        &track,
        video.average_fps(),
        video.frame_count(),
        &target_dir,
    )
}

/// Extrapolate a track against a video's frame rate and write the result.
///
/// The source track is never modified; the output goes to
/// `output_path`, replacing any earlier file.
pub fn extrapolate_track(
    track: &ActionTrack,
    video: &dyn VideoSource,
    options: &ExtrapolateOptions,
    output_path: &Path,
) -> Result<ExtrapolationSummary, FunscriptError> {
    let fps_ms = frames_per_millisecond(video.average_fps())?;

    let (source, deduplication) = if options.remove_duplicates() {
        let (deduplicated, report) = track.deduplicated()?;
        log::debug!(
            "{} actions found of which {} are unique ({}%)",
            report.before,
            report.after,
            report.percentage(),
        );
        (deduplicated, Some(report))
    } else {
        (track.clone(), None)
    };

    let (extrapolated, report) = source.extrapolated(fps_ms, options.fill())?;
    extrapolated.save(output_path)?;

    log::info!(
        "Extrapolated {} source actions to {} ({:.2}% increase, fill {}%) -> {}",
        report.source,
        report.total,
        report.percent_increase(),
        options.fill().percentage(),
        output_path.display(),
    );

    Ok(ExtrapolationSummary {
        output_path: output_path.to_path_buf(),
        report,
        deduplication,
    })
}

/// Extrapolate the track paired with `video_path` into
/// `<stem>_extrapolated.funscript` next to the video.
pub fn extrapolate_video_track(
    video_path: &Path,
    options: &ExtrapolateOptions,
    backend: DecoderBackend,
) -> Result<ExtrapolationSummary, FunscriptError> {
    let track = ActionTrack::load_for_video(video_path)?;
    let video = MediaFile::open_with_backend(video_path, backend)?;
    extrapolate_track(
        &track,
        &video,
        options,
        &extrapolated_track_path_for(video_path),
    )
}

/// Run the selected action over every video, one after another.
///
/// # Errors
///
/// Stops at the first failing video and returns its error.
pub fn run(videos: &[PathBuf], options: &RunOptions) -> Result<RunSummary, FunscriptError> {
    options.decoder.ensure_available()?;

    let mut extractor = FrameExtractor::new(options.extract.clone());
    let mut summary = RunSummary::default();

    for (index, video_path) in videos.iter().enumerate() {
        log::info!(
            "[{}/{}] {} {}",
            index + 1,
            videos.len(),
            options.mode,
            video_path.display(),
        );

        let outcome = match options.mode {
            ActionMode::ExtractFrames => VideoOutcome::Extracted(extract_video_frames(
                &mut extractor,
                video_path,
                options,
            )?),
            ActionMode::ExtrapolateFrames => VideoOutcome::Extrapolated(
                extrapolate_video_track(video_path, &options.extrapolate, options.decoder)?,
            ),
        };
        summary.videos.push((video_path.clone(), outcome));
    }

    Ok(summary)
}

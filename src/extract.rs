//! Frame extraction driven by a funscript track.
//!
//! For every action the extractor maps the timestamp to a frame index,
//! decodes that frame, resizes it and writes it as a JPEG into a folder
//! named after the action's position:
//!
//! ```text
//! <root>/output/<video file name | bulk>/<pos>/<N>.jpg
//! ```
//!
//! Side-by-side VR videos are detected once per video and only the left eye
//! is saved, unless `force_save` asks for whole frames.

use std::{
    collections::HashMap,
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use crate::{
    action::Action,
    classify::{VideoClassifier, VrClassification},
    configuration::{ExtractOptions, NumberingMode},
    dedup::{DedupReport, dedupe},
    error::FunscriptError,
    image_ops::{resize_to_width, save_jpeg, split_vertical},
    mapping::FrameIndexMapper,
    progress::ProgressTracker,
    track::ActionTrack,
    video::VideoSource,
};

/// Name of the directory all images are written under.
pub const OUTPUT_DIRECTORY: &str = "output";

/// Folder name shared by every video of a bulk run.
pub const BULK_FOLDER: &str = "bulk";

/// Extension of written images.
pub const IMAGE_EXTENSION: &str = "jpg";

/// `<root>/output/<folder_name>`.
pub fn output_directory(root: &Path, folder_name: &str) -> PathBuf {
    root.join(OUTPUT_DIRECTORY).join(folder_name)
}

/// Folder holding the images of one position.
pub fn position_directory(target_dir: &Path, position: i64) -> PathBuf {
    target_dir.join(position.to_string())
}

/// Number of `.jpg` files in `dir`. A missing directory holds none.
pub fn count_images(dir: &Path) -> Result<u64, FunscriptError> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(error) if error.kind() == ErrorKind::NotFound => return Ok(0),
        Err(error) => return Err(error.into()),
    };

    let mut count = 0;
    for entry in entries {
        let path = entry?.path();
        let is_image = path
            .extension()
            .is_some_and(|extension| extension.eq_ignore_ascii_case(IMAGE_EXTENSION));
        if is_image && path.is_file() {
            count += 1;
        }
    }
    Ok(count)
}

/// One planned frame grab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameGrabRequest {
    /// Frame to decode.
    pub frame_index: u64,
    /// Timestamp of the action, in milliseconds.
    pub at: u64,
    /// Position folder the image belongs to.
    pub position: i64,
    /// Where the image is written.
    pub output_path: PathBuf,
}

/// What happened to one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The image was written.
    Saved,
    /// The image already existed and overwriting is disabled.
    SkippedExisting,
}

/// Result of extracting one video.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionSummary {
    /// Actions processed, skipped ones included.
    pub processed: u64,
    /// Images written.
    pub saved: u64,
    /// Images skipped because they already existed.
    pub skipped: u64,
    /// Number of position folders prepared.
    pub positions: usize,
    /// Deduplication counts, when duplicates were removed.
    pub deduplication: Option<DedupReport>,
    /// VR classification, unless whole frames were forced.
    pub classification: Option<VrClassification>,
}

/// Writes one image per track action.
///
/// A single extractor should be reused for every video of a bulk run: in
/// [`NumberingMode::Sequential`] it remembers how many images each folder
/// received from earlier videos, so later videos continue the numbering.
#[derive(Debug)]
pub struct FrameExtractor {
    options: ExtractOptions,
    classifier: VideoClassifier,
    assigned: HashMap<PathBuf, u64>,
}

impl FrameExtractor {
    /// Create an extractor with the default VR classifier.
    pub fn new(options: ExtractOptions) -> Self {
        Self {
            options,
            classifier: VideoClassifier::default(),
            assigned: HashMap::new(),
        }
    }

    /// Replace the VR classifier.
    #[must_use]
    pub fn with_classifier(mut self, classifier: VideoClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// The options this extractor runs with.
    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Plan the frame grabs for `track` without decoding or writing.
    ///
    /// # Errors
    ///
    /// Returns [`FunscriptError::EmptyTrack`] for a track without actions
    /// and [`FunscriptError::InvalidFrameRate`] for a non-positive rate.
    pub fn plan(
        &self,
        track: &ActionTrack,
        frames_per_second: f64,
        frame_count: u64,
        target_dir: &Path,
    ) -> Result<Vec<FrameGrabRequest>, FunscriptError> {
        track.ensure_not_empty()?;
        let mapper = FrameIndexMapper::new(frames_per_second, frame_count)?;
        let (actions, _) = self.select_actions(track);
        let mut counters = self.initial_counters();
        self.plan_actions(&actions, &mapper, target_dir, &mut counters)
    }

    /// Extract one image per action of `track` from `video` into
    /// `target_dir` (usually from [`output_directory`]).
    ///
    /// Position folders are created up front for every distinct position.
    /// Images that already exist are skipped unless overwriting is enabled.
    ///
    /// # Errors
    ///
    /// Fails on the first decode, I/O or encoding error. Images written
    /// before the failure stay on disk.
    pub fn extract(
        &mut self,
        track: &ActionTrack,
        video: &mut dyn VideoSource,
        target_dir: &Path,
    ) -> Result<ExtractionSummary, FunscriptError> {
        track.ensure_not_empty()?;

        let positions = track.distinct_positions();
        for position in &positions {
            fs::create_dir_all(position_directory(target_dir, *position))?;
        }
        log::debug!(
            "Prepared {} position folders under {}",
            positions.len(),
            target_dir.display(),
        );

        let (actions, deduplication) = self.select_actions(track);
        let mapper = FrameIndexMapper::new(video.average_fps(), video.frame_count())?;
        let mut counters = self.initial_counters();
        let requests = self.plan_actions(&actions, &mapper, target_dir, &mut counters)?;

        let classification = if self.options.force_save() {
            None
        } else {
            Some(self.classifier.classify(video)?)
        };
        let keep_left_half = classification.is_some_and(|found| found.is_vr);
        if keep_left_half {
            log::info!("Side-by-side VR video detected; saving the left half of each frame");
        }

        let mut tracker = ProgressTracker::new(self.options.progress(), requests.len() as u64);
        let mut saved = 0;
        let mut skipped = 0;

        for request in &requests {
            mapper.checked(request.at)?;
            let outcome = self.grab(video, request, keep_left_half)?;
            match outcome {
                SaveOutcome::Saved => saved += 1,
                SaveOutcome::SkippedExisting => skipped += 1,
            }
            tracker.advance(
                outcome == SaveOutcome::Saved,
                request.frame_index,
                request.at,
            );
        }
        tracker.finish();

        if self.options.numbering() == NumberingMode::Sequential {
            self.assigned = counters;
        }

        log::info!(
            "Finished {}: {} images saved, {} skipped, {} actions processed",
            target_dir.display(),
            saved,
            skipped,
            requests.len(),
        );

        Ok(ExtractionSummary {
            processed: requests.len() as u64,
            saved,
            skipped,
            positions: positions.len(),
            deduplication,
            classification,
        })
    }

    fn select_actions(&self, track: &ActionTrack) -> (Vec<Action>, Option<DedupReport>) {
        if !self.options.remove_duplicates() {
            return (track.actions.clone(), None);
        }
        let actions = dedupe(&track.actions);
        let report = DedupReport {
            before: track.actions.len(),
            after: actions.len(),
        };
        log::debug!(
            "{} actions found in the funscript file of which {} are unique ({}%)",
            report.before,
            report.after,
            report.percentage(),
        );
        (actions, Some(report))
    }

    fn initial_counters(&self) -> HashMap<PathBuf, u64> {
        match self.options.numbering() {
            NumberingMode::Sequential => self.assigned.clone(),
            NumberingMode::Append => HashMap::new(),
        }
    }

    fn plan_actions(
        &self,
        actions: &[Action],
        mapper: &FrameIndexMapper,
        target_dir: &Path,
        counters: &mut HashMap<PathBuf, u64>,
    ) -> Result<Vec<FrameGrabRequest>, FunscriptError> {
        let mut requests = Vec::with_capacity(actions.len());
        for action in actions {
            let folder = position_directory(target_dir, action.pos);
            let start = match self.options.numbering() {
                NumberingMode::Append if !counters.contains_key(&folder) => {
                    count_images(&folder)?
                }
                _ => 0,
            };
            let counter = counters.entry(folder.clone()).or_insert(start);
            *counter += 1;
            let output_path = folder.join(format!("{}.{IMAGE_EXTENSION}", *counter));

            requests.push(FrameGrabRequest {
                frame_index: mapper.map(action.at),
                at: action.at,
                position: action.pos,
                output_path,
            });
        }
        Ok(requests)
    }

    fn grab(
        &self,
        video: &mut dyn VideoSource,
        request: &FrameGrabRequest,
        keep_left_half: bool,
    ) -> Result<SaveOutcome, FunscriptError> {
        if request.output_path.exists() && !self.options.overwrite() {
            return Ok(SaveOutcome::SkippedExisting);
        }

        let frame = video.frame(request.frame_index)?;
        let resized = resize_to_width(&frame, self.options.output_width());
        let image = if keep_left_half {
            split_vertical(&resized).0
        } else {
            resized
        };
        save_jpeg(&image, &request.output_path)?;
        Ok(SaveOutcome::Saved)
    }
}

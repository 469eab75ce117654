//! Run configuration.
//!
//! [`ExtractOptions`] and [`ExtrapolateOptions`] are builders threaded
//! through the two actions. [`Settings`] is the serializable form read from
//! an optional JSON configuration file; the command line layers its flags on
//! top and turns the result into [`RunOptions`].
//!
//! # Example
//!
//! ```
//! use funscript_frames::{ActionMode, Settings};
//!
//! let settings = Settings::from_json_str(
//!     r#"{"mode": "extrapolate_frames", "fill_percentage": 50}"#,
//! )?;
//! assert_eq!(settings.mode, ActionMode::ExtrapolateFrames);
//! let options = settings.run_options()?;
//! assert_eq!(options.extrapolate.fill().percentage(), 50.0);
//! # Ok::<(), funscript_frames::FunscriptError>(())
//! ```

use std::{
    fmt::{Debug, Display, Formatter, Result as FmtResult},
    fs,
    path::{Path, PathBuf},
    str::FromStr,
    sync::Arc,
};

use serde::{Deserialize, Serialize};

use crate::{
    error::FunscriptError,
    extrapolate::FillRatio,
    progress::{NoOpProgress, ProgressCallback},
    video::DecoderBackend,
};

/// Default width of written images in pixels.
pub const DEFAULT_OUTPUT_WIDTH: u32 = 600;

/// How written images are numbered inside a position folder.
///
/// The two requirements on numbering pull against each other. Continuing
/// after the images already in a folder means a rerun never writes over
/// earlier output, but it also means a rerun with overwriting off still
/// saves every image again under new names. Skipping files that already
/// exist only makes reruns save nothing when they address the same names.
/// [`Sequential`](Self::Sequential) gives the rerun guarantee and is the
/// default; [`Append`](Self::Append) gives the continue-after-existing
/// behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NumberingMode {
    /// The k-th image for a position in this run is `k.jpg`, offset by the
    /// images earlier videos of the same run placed in the folder. Reruns
    /// address the same files, so they are skipped unless overwriting.
    #[default]
    Sequential,
    /// Continue after the number of `.jpg` files already in the folder.
    /// Reruns always add new files.
    Append,
}

/// Settings for frame extraction.
#[derive(Clone)]
pub struct ExtractOptions {
    output_width: u32,
    remove_duplicates: bool,
    overwrite: bool,
    force_save: bool,
    numbering: NumberingMode,
    progress: Arc<dyn ProgressCallback>,
}

impl Debug for ExtractOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ExtractOptions")
            .field("output_width", &self.output_width)
            .field("remove_duplicates", &self.remove_duplicates)
            .field("overwrite", &self.overwrite)
            .field("force_save", &self.force_save)
            .field("numbering", &self.numbering)
            .finish_non_exhaustive()
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractOptions {
    /// Defaults: 600 px wide, keep duplicates, never overwrite, split VR
    /// frames, sequential numbering, no progress callback.
    pub fn new() -> Self {
        Self {
            output_width: DEFAULT_OUTPUT_WIDTH,
            remove_duplicates: false,
            overwrite: false,
            force_save: false,
            numbering: NumberingMode::Sequential,
            progress: Arc::new(NoOpProgress),
        }
    }

    /// Set the width images are resized to. Zero keeps the source width.
    #[must_use]
    pub fn with_output_width(mut self, width: u32) -> Self {
        self.output_width = width;
        self
    }

    /// Drop consecutive actions with an unchanged position before extracting.
    #[must_use]
    pub fn with_remove_duplicates(mut self, remove: bool) -> Self {
        self.remove_duplicates = remove;
        self
    }

    /// Replace images that already exist instead of skipping them.
    #[must_use]
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Save whole frames even for VR videos, skipping classification.
    #[must_use]
    pub fn with_force_save(mut self, force: bool) -> Self {
        self.force_save = force;
        self
    }

    /// Choose how images are numbered.
    #[must_use]
    pub fn with_numbering(mut self, numbering: NumberingMode) -> Self {
        self.numbering = numbering;
        self
    }

    /// Attach a progress callback.
    #[must_use]
    pub fn with_progress(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress = callback;
        self
    }

    /// Width images are resized to.
    pub fn output_width(&self) -> u32 {
        self.output_width
    }

    /// Whether duplicate positions are removed first.
    pub fn remove_duplicates(&self) -> bool {
        self.remove_duplicates
    }

    /// Whether existing images are replaced.
    pub fn overwrite(&self) -> bool {
        self.overwrite
    }

    /// Whether VR splitting is bypassed.
    pub fn force_save(&self) -> bool {
        self.force_save
    }

    /// The numbering mode.
    pub fn numbering(&self) -> NumberingMode {
        self.numbering
    }

    pub(crate) fn progress(&self) -> Arc<dyn ProgressCallback> {
        Arc::clone(&self.progress)
    }
}

/// Settings for track extrapolation.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ExtrapolateOptions {
    fill: FillRatio,
    remove_duplicates: bool,
}

impl ExtrapolateOptions {
    /// Defaults: fill every frame, keep duplicates.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the fraction of each frame gap to fill.
    #[must_use]
    pub fn with_fill(mut self, fill: FillRatio) -> Self {
        self.fill = fill;
        self
    }

    /// Drop consecutive actions with an unchanged position before filling.
    #[must_use]
    pub fn with_remove_duplicates(mut self, remove: bool) -> Self {
        self.remove_duplicates = remove;
        self
    }

    /// The fill ratio.
    pub fn fill(&self) -> FillRatio {
        self.fill
    }

    /// Whether duplicate positions are removed first.
    pub fn remove_duplicates(&self) -> bool {
        self.remove_duplicates
    }
}

/// Which action a run performs on each video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionMode {
    /// Write one image per action.
    #[default]
    ExtractFrames,
    /// Write an extrapolated copy of the track.
    ExtrapolateFrames,
}

impl Display for ActionMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ActionMode::ExtractFrames => write!(f, "extract_frames"),
            ActionMode::ExtrapolateFrames => write!(f, "extrapolate_frames"),
        }
    }
}

impl FromStr for ActionMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().replace('-', "_").as_str() {
            "extract_frames" | "extract" => Ok(ActionMode::ExtractFrames),
            "extrapolate_frames" | "extrapolate" => Ok(ActionMode::ExtrapolateFrames),
            _ => Err(format!(
                "unknown action mode: {value} (expected extract_frames or extrapolate_frames)"
            )),
        }
    }
}

/// Recognized configuration options, as read from a JSON file.
///
/// Every key is optional; unknown keys are rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Action to run on every video.
    pub mode: ActionMode,
    /// Output image width in pixels.
    pub width: u32,
    /// Drop consecutive duplicate positions first.
    pub remove_duplicates: bool,
    /// Replace existing images.
    pub overwrite: bool,
    /// Save whole frames, bypassing VR splitting.
    pub force_save: bool,
    /// Percentage of each frame gap filled by extrapolation (0 to 100).
    pub fill_percentage: f64,
    /// Decoder backend.
    pub decoder: DecoderBackend,
    /// Collect images of all videos under one `bulk` folder.
    pub bulk: bool,
    /// Number images after the files already present.
    pub append: bool,
    /// Root directory for `output/`. Defaults to each video's folder.
    pub output: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mode: ActionMode::ExtractFrames,
            width: DEFAULT_OUTPUT_WIDTH,
            remove_duplicates: false,
            overwrite: false,
            force_save: false,
            fill_percentage: 100.0,
            decoder: DecoderBackend::Cpu,
            bulk: false,
            append: false,
            output: None,
        }
    }
}

impl Settings {
    /// Parse settings from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self, FunscriptError> {
        serde_json::from_str(text).map_err(|error| FunscriptError::ConfigError {
            path: PathBuf::new(),
            reason: error.to_string(),
        })
    }

    /// Read settings from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`FunscriptError::ConfigError`] if the file cannot be read or
    /// does not match the expected shape.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, FunscriptError> {
        let path = path.as_ref();
        let config_error = |reason: String| FunscriptError::ConfigError {
            path: path.to_path_buf(),
            reason,
        };
        let text = fs::read_to_string(path).map_err(|error| config_error(error.to_string()))?;
        let settings =
            serde_json::from_str(&text).map_err(|error| config_error(error.to_string()))?;
        log::debug!("Loaded configuration from {}", path.display());
        Ok(settings)
    }

    /// Validate the settings and build the options for a run.
    ///
    /// # Errors
    ///
    /// Returns [`FunscriptError::InvalidFillPercentage`] for a fill outside
    /// `0..=100`.
    pub fn run_options(&self) -> Result<RunOptions, FunscriptError> {
        let numbering = if self.append {
            NumberingMode::Append
        } else {
            NumberingMode::Sequential
        };
        let extract = ExtractOptions::new()
            .with_output_width(self.width)
            .with_remove_duplicates(self.remove_duplicates)
            .with_overwrite(self.overwrite)
            .with_force_save(self.force_save)
            .with_numbering(numbering);
        let extrapolate = ExtrapolateOptions::new()
            .with_fill(FillRatio::from_percentage(self.fill_percentage)?)
            .with_remove_duplicates(self.remove_duplicates);

        Ok(RunOptions {
            mode: self.mode,
            extract,
            extrapolate,
            decoder: self.decoder,
            bulk: self.bulk,
            output_root: self.output.clone(),
        })
    }
}

/// Everything a run over one or more videos needs.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Action to run.
    pub mode: ActionMode,
    /// Extraction settings.
    pub extract: ExtractOptions,
    /// Extrapolation settings.
    pub extrapolate: ExtrapolateOptions,
    /// Decoder backend used to open videos.
    pub decoder: DecoderBackend,
    /// Collect images under one `bulk` folder.
    pub bulk: bool,
    /// Root directory for `output/`; `None` uses each video's folder.
    pub output_root: Option<PathBuf>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            mode: ActionMode::default(),
            extract: ExtractOptions::new(),
            extrapolate: ExtrapolateOptions::new(),
            decoder: DecoderBackend::default(),
            bulk: false,
            output_root: None,
        }
    }
}

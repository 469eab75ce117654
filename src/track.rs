//! Funscript track documents.
//!
//! A track file is a JSON object holding an `actions` array next to any
//! number of free-form metadata keys (author, version, range, ...).
//! [`ActionTrack`] keeps both: the actions as typed [`Action`] values and
//! the remaining keys verbatim, in document order, so that a transformed
//! track can be written back out with its metadata untouched.
//!
//! # Example
//!
//! ```
//! use funscript_frames::ActionTrack;
//!
//! let track = ActionTrack::from_json_str(
//!     r#"{"version": "1.0", "actions": [{"at": 0, "pos": 10}, {"at": 500, "pos": 90}]}"#,
//! )?;
//! assert_eq!(track.len(), 2);
//! assert_eq!(track.metadata["version"], "1.0");
//! # Ok::<(), funscript_frames::FunscriptError>(())
//! ```

use std::{
    collections::BTreeSet,
    fs::File,
    io::{BufReader, BufWriter, Read, Write},
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, ser::PrettyFormatter};

use crate::{
    action::Action,
    dedup::{DedupReport, dedupe},
    error::FunscriptError,
    extrapolate::{ExtrapolationReport, FillRatio, extrapolate},
};

/// File extension of funscript track files.
pub const TRACK_EXTENSION: &str = "funscript";

/// Suffix appended to the video stem for extrapolated track files.
pub const EXTRAPOLATED_SUFFIX: &str = "_extrapolated";

/// An ordered list of actions plus the document's other keys.
///
/// Actions are kept sorted ascending by `at`. Every constructor sorts
/// (stably, so actions sharing a timestamp keep their document order).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ActionTrack {
    /// Actions, sorted ascending by `at`.
    pub actions: Vec<Action>,
    /// Every other key of the source document, preserved verbatim.
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

impl ActionTrack {
    /// Build a track from actions and metadata, sorting the actions.
    pub fn new(mut actions: Vec<Action>, metadata: Map<String, Value>) -> Self {
        actions.sort_by_key(|action| action.at);
        Self { actions, metadata }
    }

    /// Parse a track document from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`FunscriptError::FormatError`] if the text is not a JSON
    /// object, has no `actions` array, or an action lacks a non-negative
    /// integer `at` or an integer `pos`.
    pub fn from_json_str(text: &str) -> Result<Self, FunscriptError> {
        Self::parse(serde_json::from_str(text), None)
    }

    /// Parse a track document from a reader.
    ///
    /// # Errors
    ///
    /// Same as [`from_json_str`](ActionTrack::from_json_str).
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, FunscriptError> {
        Self::parse(serde_json::from_reader(reader), None)
    }

    /// Load a track document from disk.
    ///
    /// # Errors
    ///
    /// Returns [`FunscriptError::IoError`] if the file cannot be opened and
    /// [`FunscriptError::FormatError`] if its content is malformed.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, FunscriptError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let track = Self::parse(
            serde_json::from_reader(BufReader::new(file)),
            Some(path.to_path_buf()),
        )?;

        log::debug!(
            "Loaded {} actions from {} ({} metadata keys)",
            track.actions.len(),
            path.display(),
            track.metadata.len(),
        );
        Ok(track)
    }

    /// Load the track file paired with a video.
    ///
    /// The track must sit next to the video and share its file stem, e.g.
    /// `clip.mp4` pairs with `clip.funscript`.
    ///
    /// # Errors
    ///
    /// Returns [`FunscriptError::MissingTrackFile`] if no paired file exists,
    /// or any error from [`load`](ActionTrack::load).
    pub fn load_for_video<P: AsRef<Path>>(video_path: P) -> Result<Self, FunscriptError> {
        let video_path = video_path.as_ref();
        let expected = track_path_for(video_path);
        if !expected.is_file() {
            return Err(FunscriptError::MissingTrackFile {
                video: video_path.to_path_buf(),
                expected,
            });
        }
        log::debug!("Found matching funscript file {}", expected.display());
        Self::load(expected)
    }

    fn parse(
        result: Result<ActionTrack, serde_json::Error>,
        path: Option<PathBuf>,
    ) -> Result<Self, FunscriptError> {
        let track = result.map_err(|error| FunscriptError::format(path, error.to_string()))?;
        Ok(Self::new(track.actions, track.metadata))
    }

    /// Serialize the track as pretty-printed JSON with four-space indents.
    pub fn to_json_string(&self) -> Result<String, FunscriptError> {
        let mut buffer = Vec::new();
        self.write_json(&mut buffer)?;
        String::from_utf8(buffer)
            .map_err(|error| FunscriptError::format(None, error.to_string()))
    }

    fn write_json<W: Write>(&self, writer: W) -> Result<(), FunscriptError> {
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(writer, formatter);
        self.serialize(&mut serializer)?;
        let mut writer = serializer.into_inner();
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }

    /// Write the track to `path`, replacing any existing file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), FunscriptError> {
        let path = path.as_ref();
        let file = File::create(path)?;
        self.write_json(BufWriter::new(file))?;
        log::debug!("Wrote {} actions to {}", self.actions.len(), path.display());
        Ok(())
    }

    /// Number of actions.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Returns `true` if the track has no actions.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Fail with [`FunscriptError::EmptyTrack`] when there are no actions.
    pub fn ensure_not_empty(&self) -> Result<(), FunscriptError> {
        if self.actions.is_empty() {
            Err(FunscriptError::EmptyTrack)
        } else {
            Ok(())
        }
    }

    /// The distinct `pos` values of the track, ascending.
    pub fn distinct_positions(&self) -> Vec<i64> {
        self.actions
            .iter()
            .map(|action| action.pos)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// A copy of this track with consecutive duplicate positions collapsed.
    ///
    /// # Errors
    ///
    /// Returns [`FunscriptError::EmptyTrack`] if the track has no actions.
    pub fn deduplicated(&self) -> Result<(Self, DedupReport), FunscriptError> {
        self.ensure_not_empty()?;
        let actions = dedupe(&self.actions);
        let report = DedupReport {
            before: self.actions.len(),
            after: actions.len(),
        };
        Ok((
            Self {
                actions,
                metadata: self.metadata.clone(),
            },
            report,
        ))
    }

    /// A copy of this track with synthesized actions between existing ones.
    ///
    /// `frames_per_millisecond` is the video's average frame rate divided by
    /// 1000. Metadata is carried over unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`FunscriptError::EmptyTrack`] if the track has no actions.
    pub fn extrapolated(
        &self,
        frames_per_millisecond: f64,
        fill: FillRatio,
    ) -> Result<(Self, ExtrapolationReport), FunscriptError> {
        self.ensure_not_empty()?;
        let actions = extrapolate(&self.actions, frames_per_millisecond, fill);
        let report = ExtrapolationReport {
            source: self.actions.len(),
            total: actions.len(),
        };
        Ok((
            Self {
                actions,
                metadata: self.metadata.clone(),
            },
            report,
        ))
    }
}

/// Path of the track file paired with `video_path`.
///
/// ```
/// use std::path::Path;
///
/// use funscript_frames::track_path_for;
///
/// assert_eq!(
///     track_path_for(Path::new("videos/clip.mp4")),
///     Path::new("videos/clip.funscript"),
/// );
/// ```
pub fn track_path_for(video_path: &Path) -> PathBuf {
    video_path.with_extension(TRACK_EXTENSION)
}

/// Path of the extrapolated track written for `video_path`.
///
/// The file lands next to the video as `<stem>_extrapolated.funscript`.
pub fn extrapolated_track_path_for(video_path: &Path) -> PathBuf {
    let stem = video_path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    video_path.with_file_name(format!("{stem}{EXTRAPOLATED_SUFFIX}.{TRACK_EXTENSION}"))
}

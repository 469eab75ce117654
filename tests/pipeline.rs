//! Per-video operation and run tests.

mod common;

use std::{fs, path::Path};

use common::{SyntheticVideo, write_track};
use funscript_frames::{
    ActionTrack, ExtrapolateOptions, FillRatio, FunscriptError, RunOptions, extrapolate_track,
    pipeline::{folder_name_for, target_directory_for},
    run,
};
use serde_json::Value;

#[test]
fn folder_names() {
    assert_eq!(folder_name_for(Path::new("videos/clip.mp4"), false), "clip.mp4");
    assert_eq!(folder_name_for(Path::new("videos/clip.mp4"), true), "bulk");
}

#[test]
fn target_directory_defaults_to_video_folder() {
    let options = RunOptions::default();
    assert_eq!(
        target_directory_for(Path::new("videos/clip.mp4"), &options),
        Path::new("videos/output/clip.mp4"),
    );

    let options = RunOptions {
        output_root: Some("dataset".into()),
        bulk: true,
        ..RunOptions::default()
    };
    assert_eq!(
        target_directory_for(Path::new("videos/clip.mp4"), &options),
        Path::new("dataset/output/bulk"),
    );
}

#[test]
fn missing_track_stops_the_run_before_opening_the_video() {
    let temporary_directory = tempfile::tempdir().expect("Failed to create temp dir");
    let video = temporary_directory.path().join("lonely.mp4");

    let result = run(&[video.clone()], &RunOptions::default());
    match result {
        Err(FunscriptError::MissingTrackFile { video: reported, .. }) => {
            assert_eq!(reported, video)
        }
        other => panic!("Expected MissingTrackFile, got {other:?}"),
    }
    assert!(!temporary_directory.path().join("output").exists());
}

#[test]
fn run_is_fail_fast() {
    let temporary_directory = tempfile::tempdir().expect("Failed to create temp dir");
    // Has a track but is not a decodable video.
    let broken = write_track(
        temporary_directory.path(),
        "broken.mp4",
        r#"{"actions": [{"at": 0, "pos": 10}]}"#,
    );
    fs::write(&broken, b"this is not a media file").unwrap();
    let never_reached = temporary_directory.path().join("never.mp4");

    // The second video has no track; reaching it would report that instead.
    let result = run(&[broken, never_reached], &RunOptions::default());
    assert!(result.is_err());
    assert!(
        !matches!(result, Err(FunscriptError::MissingTrackFile { .. })),
        "Run should stop at the first video, got {result:?}",
    );
}

#[test]
fn gpu_backend_fails_before_any_video() {
    let options = RunOptions {
        decoder: funscript_frames::DecoderBackend::Gpu,
        ..RunOptions::default()
    };
    let result = run(&["missing.mp4".into()], &options);
    assert!(matches!(result, Err(FunscriptError::BackendUnavailable(_))));
}

#[test]
fn extrapolated_track_is_written_next_to_the_source() {
    let temporary_directory = tempfile::tempdir().expect("Failed to create temp dir");
    let video_path = write_track(
        temporary_directory.path(),
        "clip.mp4",
        r#"{"version": "1.0", "actions": [
            {"at": 0, "pos": 0},
            {"at": 500, "pos": 0},
            {"at": 1000, "pos": 100}
        ]}"#,
    );
    let source_path = video_path.with_extension("funscript");
    let source_text = fs::read_to_string(&source_path).unwrap();
    let track = ActionTrack::load(&source_path).unwrap();
    let video = SyntheticVideo::flat(30.0, 300);

    let output_path = temporary_directory.path().join("clip_extrapolated.funscript");
    let options = ExtrapolateOptions::new().with_remove_duplicates(true);
    let summary = extrapolate_track(&track, &video, &options, &output_path).unwrap();

    assert_eq!(summary.output_path, output_path);
    assert_eq!(summary.deduplication.map(|report| report.after), Some(2));
    assert_eq!(summary.report.source, 2);
    assert_eq!(summary.report.total, 31);

    let written: Value = serde_json::from_str(&fs::read_to_string(&output_path).unwrap()).unwrap();
    assert_eq!(written["version"], "1.0");
    assert_eq!(written["actions"].as_array().unwrap().len(), 31);
    assert_eq!(fs::read_to_string(&source_path).unwrap(), source_text);
}

#[test]
fn zero_fill_writes_a_copy_of_the_track() {
    let temporary_directory = tempfile::tempdir().expect("Failed to create temp dir");
    let track = ActionTrack::from_json_str(
        r#"{"actions": [{"at": 0, "pos": 0}, {"at": 1000, "pos": 100}]}"#,
    )
    .unwrap();
    let video = SyntheticVideo::flat(30.0, 300);
    let output_path = temporary_directory.path().join("copy.funscript");

    let options = ExtrapolateOptions::new().with_fill(FillRatio::ZERO);
    let summary = extrapolate_track(&track, &video, &options, &output_path).unwrap();

    assert_eq!(summary.report.added(), 0);
    assert_eq!(summary.deduplication, None);
    assert_eq!(ActionTrack::load(&output_path).unwrap(), track);
}

//! Configuration and option builder tests.

use std::{fs, path::PathBuf};

use funscript_frames::{
    ActionMode, DecoderBackend, ExtractOptions, ExtrapolateOptions, FillRatio, FunscriptError,
    NumberingMode, Settings,
};

#[test]
fn extract_options_defaults() {
    let options = ExtractOptions::new();
    assert_eq!(options.output_width(), 600);
    assert!(!options.remove_duplicates());
    assert!(!options.overwrite());
    assert!(!options.force_save());
    assert_eq!(options.numbering(), NumberingMode::Sequential);
}

#[test]
fn extract_options_builder() {
    let options = ExtractOptions::new()
        .with_output_width(320)
        .with_remove_duplicates(true)
        .with_overwrite(true)
        .with_force_save(true)
        .with_numbering(NumberingMode::Append);

    assert_eq!(options.output_width(), 320);
    assert!(options.remove_duplicates());
    assert!(options.overwrite());
    assert!(options.force_save());
    assert_eq!(options.numbering(), NumberingMode::Append);

    let debug = format!("{options:?}");
    assert!(debug.contains("output_width: 320"), "{debug}");
}

#[test]
fn extrapolate_options_defaults_to_full_fill() {
    let options = ExtrapolateOptions::new();
    assert_eq!(options.fill(), FillRatio::FULL);
    assert!(!options.remove_duplicates());
}

#[test]
fn settings_defaults() {
    let settings = Settings::from_json_str("{}").unwrap();
    assert_eq!(settings, Settings::default());
    assert_eq!(settings.mode, ActionMode::ExtractFrames);
    assert_eq!(settings.width, 600);
    assert_eq!(settings.fill_percentage, 100.0);
    assert_eq!(settings.decoder, DecoderBackend::Cpu);
    assert_eq!(settings.output, None);
}

#[test]
fn settings_to_run_options() {
    let settings = Settings::from_json_str(
        r#"{
            "mode": "extrapolate_frames",
            "width": 400,
            "remove_duplicates": true,
            "overwrite": true,
            "fill_percentage": 40,
            "decoder": "gpu",
            "bulk": true,
            "append": true,
            "output": "dataset"
        }"#,
    )
    .unwrap();

    let options = settings.run_options().unwrap();
    assert_eq!(options.mode, ActionMode::ExtrapolateFrames);
    assert_eq!(options.extract.output_width(), 400);
    assert!(options.extract.remove_duplicates());
    assert!(options.extract.overwrite());
    assert_eq!(options.extract.numbering(), NumberingMode::Append);
    assert_eq!(options.extrapolate.fill().percentage(), 40.0);
    assert!(options.extrapolate.remove_duplicates());
    assert_eq!(options.decoder, DecoderBackend::Gpu);
    assert!(options.bulk);
    assert_eq!(options.output_root, Some(PathBuf::from("dataset")));
}

#[test]
fn unknown_keys_are_rejected() {
    let result = Settings::from_json_str(r#"{"widht": 400}"#);
    assert!(matches!(result, Err(FunscriptError::ConfigError { .. })));
}

#[test]
fn invalid_fill_percentage_is_rejected() {
    let settings = Settings::from_json_str(r#"{"fill_percentage": 150}"#).unwrap();
    assert!(matches!(
        settings.run_options(),
        Err(FunscriptError::InvalidFillPercentage(_))
    ));
}

#[test]
fn load_reports_the_file() {
    let temporary_directory = tempfile::tempdir().expect("Failed to create temp dir");
    let path = temporary_directory.path().join("settings.json");
    fs::write(&path, r#"{"mode": "sideways"}"#).unwrap();

    match Settings::load(&path) {
        Err(FunscriptError::ConfigError { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("Expected ConfigError, got {other:?}"),
    }

    let missing = temporary_directory.path().join("missing.json");
    assert!(matches!(
        Settings::load(&missing),
        Err(FunscriptError::ConfigError { .. })
    ));
}

#[test]
fn mode_and_backend_parse_from_strings() {
    assert_eq!("extract_frames".parse(), Ok(ActionMode::ExtractFrames));
    assert_eq!("Extrapolate-Frames".parse(), Ok(ActionMode::ExtrapolateFrames));
    assert!("sideways".parse::<ActionMode>().is_err());

    assert_eq!("CPU".parse(), Ok(DecoderBackend::Cpu));
    assert_eq!("gpu".parse(), Ok(DecoderBackend::Gpu));
    assert!("tpu".parse::<DecoderBackend>().is_err());
}

#[test]
fn gpu_backend_is_unavailable() {
    assert!(DecoderBackend::Cpu.ensure_available().is_ok());
    assert!(matches!(
        DecoderBackend::Gpu.ensure_available(),
        Err(FunscriptError::BackendUnavailable(_))
    ));
}

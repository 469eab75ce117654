//! Track extrapolation tests.

use funscript_frames::{
    Action, ActionTrack, FillRatio, FunscriptError, extrapolate, extrapolate::gap_frames,
};

const THIRTY_FPS: f64 = 0.03;

#[test]
fn one_second_at_thirty_fps() {
    let source = [Action::new(0, 0), Action::new(1000, 100)];
    let filled = extrapolate(&source, THIRTY_FPS, FillRatio::FULL);

    assert_eq!(filled.len(), 31);
    assert_eq!(filled.first(), Some(&Action::new(0, 0)));
    assert_eq!(filled.last(), Some(&Action::new(1000, 100)));

    // First synthesized point sits one frame after the start.
    assert_eq!(filled[1], Action::new(33, 3));
    // Halfway through the gap.
    assert_eq!(filled[15], Action::new(500, 50));
    assert_eq!(filled[29], Action::new(967, 97));
}

#[test]
fn half_steps_round_to_even() {
    // 40 frames between the pair, so each frame moves 2.5 positions.
    let source = [Action::new(0, 0), Action::new(1000, 100)];
    let filled = extrapolate(&source, 0.04, FillRatio::FULL);

    assert_eq!(filled.len(), 41);
    assert_eq!(filled[1], Action::new(25, 2));
    assert_eq!(filled[2], Action::new(50, 5));
    assert_eq!(filled[3], Action::new(75, 8));
}

#[test]
fn synthesized_points_stay_between_their_pair() {
    let source = [
        Action::new(0, 20),
        Action::new(700, 80),
        Action::new(1500, 10),
        Action::new(1510, 90),
        Action::new(4000, 40),
    ];
    let filled = extrapolate(&source, 0.06, FillRatio::FULL);

    for action in &filled {
        let pair = source
            .windows(2)
            .find(|pair| pair[0].at <= action.at && action.at <= pair[1].at)
            .expect("Action outside the source range");
        let (low, high) = (pair[0].pos.min(pair[1].pos), pair[0].pos.max(pair[1].pos));
        assert!(
            (low..=high).contains(&action.pos),
            "{action} outside {}..={}",
            pair[0],
            pair[1],
        );
    }
}

#[test]
fn output_is_sorted_and_keeps_every_source_action() {
    let source = [
        Action::new(0, 0),
        Action::new(400, 100),
        Action::new(900, 0),
        Action::new(1000, 50),
    ];
    let filled = extrapolate(&source, THIRTY_FPS, FillRatio::FULL);

    assert!(filled.windows(2).all(|pair| pair[0].at <= pair[1].at));
    for action in &source {
        assert!(filled.contains(action), "Missing source action {action}");
    }
}

#[test]
fn zero_fill_inserts_nothing() {
    let source = [Action::new(0, 0), Action::new(1000, 100)];
    assert_eq!(extrapolate(&source, THIRTY_FPS, FillRatio::ZERO), source.to_vec());
}

#[test]
fn gaps_of_one_frame_or_less_insert_nothing() {
    // 40 ms at 30 fps is 1.2 frames, floored to 1.
    assert_eq!(gap_frames(40, THIRTY_FPS, FillRatio::FULL), 1);
    let source = [Action::new(0, 0), Action::new(40, 100), Action::new(40, 100)];
    assert_eq!(extrapolate(&source, THIRTY_FPS, FillRatio::FULL), source.to_vec());
}

#[test]
fn half_fill_halves_the_points() {
    assert_eq!(gap_frames(1000, THIRTY_FPS, FillRatio::from_percentage(50.0).unwrap()), 15);

    let source = [Action::new(0, 0), Action::new(1000, 100)];
    let filled = extrapolate(&source, THIRTY_FPS, FillRatio::from_percentage(50.0).unwrap());
    assert_eq!(filled.len(), 2 + 14);
}

#[test]
fn fill_percentage_outside_range_is_rejected() {
    for percentage in [-1.0, 100.5, f64::NAN, f64::INFINITY] {
        assert!(matches!(
            FillRatio::from_percentage(percentage),
            Err(FunscriptError::InvalidFillPercentage(_))
        ));
    }
    assert_eq!(FillRatio::from_percentage(0.0).unwrap(), FillRatio::ZERO);
    assert_eq!(FillRatio::from_percentage(100.0).unwrap(), FillRatio::FULL);
}

#[test]
fn track_extrapolation_carries_metadata_and_counts() {
    let track = ActionTrack::from_json_str(
        r#"{"author": "someone", "actions": [{"at": 0, "pos": 0}, {"at": 1000, "pos": 100}]}"#,
    )
    .unwrap();

    let (extrapolated, report) = track.extrapolated(THIRTY_FPS, FillRatio::FULL).unwrap();
    assert_eq!(extrapolated.metadata["author"], "someone");
    assert_eq!(report.source, 2);
    assert_eq!(report.total, 31);
    assert_eq!(report.added(), 29);
    assert_eq!(report.percent_increase(), 1450.0);
}

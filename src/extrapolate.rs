//! Synthesis of intermediate actions.
//!
//! Between two real actions there are usually many video frames without a
//! track point. [`extrapolate`] fills a fraction of those frames with
//! linearly interpolated actions whose timestamps land on frame boundaries.

use crate::{action::Action, error::FunscriptError};

/// Fraction of the frame gap between two actions that gets filled.
///
/// Built from a percentage in `0..=100`. Zero is allowed and inserts
/// nothing.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct FillRatio(f64);

impl FillRatio {
    /// Fill every available frame.
    pub const FULL: FillRatio = FillRatio(1.0);

    /// Insert nothing.
    pub const ZERO: FillRatio = FillRatio(0.0);

    /// Create a ratio from a percentage in `0..=100`.
    ///
    /// # Errors
    ///
    /// Returns [`FunscriptError::InvalidFillPercentage`] for values outside
    /// the range or non-finite values.
    ///
    /// # Example
    ///
    /// ```
    /// use funscript_frames::FillRatio;
    ///
    /// assert_eq!(FillRatio::from_percentage(50.0)?.fraction(), 0.5);
    /// assert!(FillRatio::from_percentage(120.0).is_err());
    /// # Ok::<(), funscript_frames::FunscriptError>(())
    /// ```
    pub fn from_percentage(percentage: f64) -> Result<Self, FunscriptError> {
        if !percentage.is_finite() || !(0.0..=100.0).contains(&percentage) {
            return Err(FunscriptError::InvalidFillPercentage(percentage));
        }
        Ok(FillRatio(percentage / 100.0))
    }

    /// The ratio as a fraction in `0.0..=1.0`.
    pub fn fraction(self) -> f64 {
        self.0
    }

    /// The ratio as a percentage in `0.0..=100.0`.
    pub fn percentage(self) -> f64 {
        self.0 * 100.0
    }
}

impl Default for FillRatio {
    fn default() -> Self {
        FillRatio::FULL
    }
}

/// Number of points a gap of `gap_ms` can hold at the given rate and fill.
///
/// Rounded down so interpolated points never overshoot the next action.
pub fn gap_frames(gap_ms: u64, frames_per_millisecond: f64, fill: FillRatio) -> u64 {
    let frames = (gap_ms as f64 * frames_per_millisecond * fill.fraction()).floor();
    if frames.is_finite() && frames > 0.0 {
        frames as u64
    } else {
        0
    }
}

/// Insert synthesized actions between every consecutive pair of `actions`.
///
/// For each pair `(a, b)` of the input (pairs are always formed over the
/// input, never over inserted points), `n = gap_frames(b.at - a.at)` and for
/// `i` in `1..n` one action is added with
///
/// - `pos = round(a.pos + i * (b.pos - a.pos) / n)`
/// - `at = round((a.at * fps_ms + i) / fps_ms)`, i.e. the timestamp of the
///   `i`-th frame after `a`.
///
/// Both roundings send exact halves to the even integer. Pairs with
/// `n <= 1` get nothing. The result holds the original and the
/// synthesized actions sorted ascending by `at`; equal timestamps keep
/// originals ahead of inserted points.
///
/// # Example
///
/// ```
/// use funscript_frames::{Action, FillRatio, extrapolate};
///
/// let actions = [Action::new(0, 0), Action::new(1000, 100)];
/// let filled = extrapolate(&actions, 0.03, FillRatio::FULL);
/// assert_eq!(filled.len(), 2 + 29);
/// ```
pub fn extrapolate(actions: &[Action], frames_per_millisecond: f64, fill: FillRatio) -> Vec<Action> {
    let mut synthesized = Vec::new();

    for pair in actions.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let frames = gap_frames(b.at.saturating_sub(a.at), frames_per_millisecond, fill);
        if frames <= 1 {
            continue;
        }

        let start_frame = a.at as f64 * frames_per_millisecond;
        let step = (b.pos - a.pos) as f64 / frames as f64;
        for i in 1..frames {
            let at = ((start_frame + i as f64) / frames_per_millisecond).round_ties_even() as u64;
            let pos = (a.pos as f64 + i as f64 * step).round_ties_even() as i64;
            synthesized.push(Action::new(at, pos));
        }
    }

    log::debug!(
        "Synthesized {} actions between {} source actions",
        synthesized.len(),
        actions.len(),
    );

    let mut combined = Vec::with_capacity(actions.len() + synthesized.len());
    combined.extend_from_slice(actions);
    combined.append(&mut synthesized);
    combined.sort_by_key(|action| action.at);
    combined
}

/// Source and final action counts of an extrapolation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtrapolationReport {
    /// Number of actions in the source track.
    pub source: usize,
    /// Number of actions after extrapolation.
    pub total: usize,
}

impl ExtrapolationReport {
    /// Number of synthesized actions.
    pub fn added(&self) -> usize {
        self.total - self.source
    }

    /// Growth relative to the source, in percent.
    pub fn percent_increase(&self) -> f64 {
        if self.source == 0 {
            0.0
        } else {
            self.added() as f64 / self.source as f64 * 100.0
        }
    }
}

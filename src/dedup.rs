//! Removal of redundant actions.
//!
//! Consecutive actions that share a position describe no motion; for frame
//! extraction only the first of such a run is interesting.

use crate::action::Action;

/// Collapse runs of equal positions into their first action.
///
/// Keeps the first action and every later action whose `pos` differs from
/// the last *kept* action. A run of three or more equal positions therefore
/// yields a single survivor. Returns a new vector; the input is untouched.
///
/// # Example
///
/// ```
/// use funscript_frames::{Action, dedupe};
///
/// let actions = [
///     Action::new(0, 5),
///     Action::new(10, 5),
///     Action::new(20, 5),
///     Action::new(30, 8),
/// ];
/// assert_eq!(dedupe(&actions), vec![Action::new(0, 5), Action::new(30, 8)]);
/// ```
pub fn dedupe(actions: &[Action]) -> Vec<Action> {
    let mut kept: Vec<Action> = Vec::with_capacity(actions.len());
    for action in actions {
        match kept.last() {
            Some(last) if last.pos == action.pos => {}
            _ => kept.push(*action),
        }
    }
    kept
}

/// Before/after counts of a deduplication pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DedupReport {
    /// Number of actions before deduplication.
    pub before: usize,
    /// Number of actions kept.
    pub after: usize,
}

impl DedupReport {
    /// Fraction of actions kept, `after / before` (1.0 for an empty input).
    pub fn ratio(&self) -> f64 {
        if self.before == 0 {
            1.0
        } else {
            self.after as f64 / self.before as f64
        }
    }

    /// [`ratio`](DedupReport::ratio) as a percentage rounded to two decimals.
    pub fn percentage(&self) -> f64 {
        (self.ratio() * 10_000.0).round() / 100.0
    }

    /// Number of actions dropped.
    pub fn removed(&self) -> usize {
        self.before - self.after
    }
}

//! The `(time, position)` action record.

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Deserializer, Serialize, de::Error as _};
use serde_json::Number;

/// One timestamped position in a funscript track.
///
/// `at` is the timeline position in milliseconds and `pos` the motion
/// amplitude at that instant. Two consecutive actions with the same `pos`
/// describe a stretch without motion.
///
/// Both fields read any JSON number. Fractional values are rounded to the
/// nearest integer, exact halves to the even one; `at` below zero is
/// rejected.
///
/// # Example
///
/// ```
/// use funscript_frames::Action;
///
/// let action: Action = serde_json::from_str(r#"{"at": 1500, "pos": 80}"#).unwrap();
/// assert_eq!(action, Action::new(1500, 80));
///
/// let action: Action = serde_json::from_str(r#"{"at": 1500.0, "pos": 80}"#).unwrap();
/// assert_eq!(action, Action::new(1500, 80));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Action {
    /// Timeline position in milliseconds.
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub at: u64,
    /// Position value.
    #[serde(deserialize_with = "deserialize_position")]
    pub pos: i64,
}

impl Action {
    /// Create an action at `at` milliseconds with position `pos`.
    pub const fn new(at: u64, pos: i64) -> Self {
        Self { at, pos }
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}ms@{}", self.at, self.pos)
    }
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let number = Number::deserialize(deserializer)?;
    if let Some(at) = number.as_u64() {
        return Ok(at);
    }
    match number.as_f64() {
        Some(value) if (0.0..=u64::MAX as f64).contains(&value) => {
            Ok(value.round_ties_even() as u64)
        }
        _ => Err(D::Error::custom(format!(
            "invalid timestamp {number}, expected a non-negative number of milliseconds"
        ))),
    }
}

fn deserialize_position<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let number = Number::deserialize(deserializer)?;
    if let Some(pos) = number.as_i64() {
        return Ok(pos);
    }
    match number.as_f64() {
        Some(value) if (i64::MIN as f64..=i64::MAX as f64).contains(&value) => {
            Ok(value.round_ties_even() as i64)
        }
        _ => Err(D::Error::custom(format!("invalid position {number}"))),
    }
}

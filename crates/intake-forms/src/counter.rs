//! Live remaining-character counter for length-limited fields

use serde::{Deserialize, Serialize};

/// Display state of a counter
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CounterState {
    /// Plenty of room left
    #[default]
    Normal,
    /// Fewer than `warn_below` characters left
    Warning,
    /// Over the limit
    Error,
}

/// One counter evaluation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterReading {
    /// `max_length - current_length`, negative when over
    pub remaining: i64,
    /// Display state
    pub state: CounterState,
}

impl CounterReading {
    /// Text shown under the field
    pub fn label(&self) -> String {
        format!("{} characters remaining", self.remaining)
    }
}

/// Counter policy
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharCounter {
    /// Remaining count below which the counter turns to a warning
    pub warn_below: i64,
}

impl Default for CharCounter {
    fn default() -> Self {
        Self { warn_below: 50 }
    }
}

impl CharCounter {
    /// Evaluate a value against a limit
    pub fn evaluate(&self, max_length: usize, value: &str) -> CounterReading {
        let max = i64::try_from(max_length).unwrap_or(i64::MAX);
        let used = i64::try_from(value.chars().count()).unwrap_or(i64::MAX);
        let remaining = max.saturating_sub(used);
        let state = if remaining < 0 {
            CounterState::Error
        } else if remaining < self.warn_below {
            CounterState::Warning
        } else {
            CounterState::Normal
        };
        CounterReading { remaining, state }
    }
}

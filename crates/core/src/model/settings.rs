use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::question::Difficulty;
use crate::model::session::SessionType;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("interview duration must be between {min} and {max} minutes, got {got}")]
    InvalidDuration { got: u32, min: u32, max: u32 },
}

pub const MIN_DURATION_MINUTES: u32 = 1;
pub const MAX_DURATION_MINUTES: u32 = 180;

/// Durations offered by the setup screen.
pub const DURATION_PRESETS: [u32; 5] = [15, 20, 30, 45, 60];

/// Topics to offer when the service cannot list its categories.
pub const FALLBACK_TOPICS: [&str; 11] = [
    "arrays",
    "strings",
    "trees",
    "graphs",
    "dynamic-programming",
    "linked-lists",
    "hash-tables",
    "sorting",
    "searching",
    "recursion",
    "greedy-algorithms",
];

/// Settings chosen before an interview starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewSettings {
    pub session_type: SessionType,
    pub difficulty: Difficulty,
    pub duration_minutes: u32,
    pub topic: Option<String>,
    pub enable_hints: bool,
}

impl Default for InterviewSettings {
    fn default() -> Self {
        Self {
            session_type: SessionType::Coding,
            difficulty: Difficulty::Medium,
            duration_minutes: 30,
            topic: None,
            enable_hints: true,
        }
    }
}

impl InterviewSettings {
    /// # Errors
    ///
    /// Returns `SettingsError::InvalidDuration` when the duration is out of range.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(MIN_DURATION_MINUTES..=MAX_DURATION_MINUTES).contains(&self.duration_minutes) {
            return Err(SettingsError::InvalidDuration {
                got: self.duration_minutes,
                min: MIN_DURATION_MINUTES,
                max: MAX_DURATION_MINUTES,
            });
        }
        Ok(())
    }

    /// Topic with surrounding whitespace removed; blank topics mean "any".
    #[must_use]
    pub fn topic(&self) -> Option<&str> {
        self.topic
            .as_deref()
            .map(str::trim)
            .filter(|topic| !topic.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(InterviewSettings::default().validate(), Ok(()));
    }

    #[test]
    fn zero_duration_is_rejected() {
        let settings = InterviewSettings {
            duration_minutes: 0,
            ..InterviewSettings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::InvalidDuration { got: 0, .. })
        ));
    }

    #[test]
    fn blank_topic_means_any() {
        let settings = InterviewSettings {
            topic: Some("   ".into()),
            ..InterviewSettings::default()
        };
        assert_eq!(settings.topic(), None);

        let settings = InterviewSettings {
            topic: Some(" graphs ".into()),
            ..InterviewSettings::default()
        };
        assert_eq!(settings.topic(), Some("graphs"));
    }
}

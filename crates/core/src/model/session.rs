use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::ids::SessionId;
use crate::time::lenient_timestamp;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown session type: {raw}")]
pub struct ParseSessionTypeError {
    raw: String,
}

/// Kind of interview being practised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionType {
    #[default]
    Coding,
    SystemDesign,
    Behavioral,
}

impl SessionType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SessionType::Coding => "coding",
            SessionType::SystemDesign => "system_design",
            SessionType::Behavioral => "behavioral",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            SessionType::Coding => "Coding Interview",
            SessionType::SystemDesign => "System Design",
            SessionType::Behavioral => "Behavioral",
        }
    }
}

impl fmt::Display for SessionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionType {
    type Err = ParseSessionTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "coding" => Ok(SessionType::Coding),
            "system_design" => Ok(SessionType::SystemDesign),
            "behavioral" | "behavioural" => Ok(SessionType::Behavioral),
            _ => Err(ParseSessionTypeError { raw: s.to_string() }),
        }
    }
}

/// Remote lifecycle state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    #[default]
    #[serde(alias = "in_progress")]
    Active,
    Paused,
    Completed,
}

/// A remote-tracked practice attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewSession {
    pub id: SessionId,
    #[serde(default)]
    pub session_type: SessionType,
    #[serde(default)]
    pub status: SessionStatus,
    #[serde(default)]
    pub duration_minutes: u32,
    #[serde(default, with = "lenient_timestamp")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default, with = "lenient_timestamp")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub questions_attempted: u32,
}

impl InterviewSession {
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status == SessionStatus::Completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn decodes_backend_session_with_numeric_id() {
        let json = r#"{
            "id": 7,
            "session_type": "coding",
            "status": "in_progress",
            "duration_minutes": 30,
            "start_time": "2023-11-14T22:13:20",
            "end_time": null
        }"#;
        let session: InterviewSession = serde_json::from_str(json).unwrap();
        assert_eq!(session.id, SessionId::new("7"));
        assert_eq!(session.status, SessionStatus::Active);
        assert_eq!(session.start_time, Some(fixed_now()));
        assert!(session.end_time.is_none());
        assert_eq!(session.questions_attempted, 0);
    }

    #[test]
    fn session_type_parses_cli_spellings() {
        assert_eq!("system-design".parse::<SessionType>().unwrap(), SessionType::SystemDesign);
        assert_eq!("Behavioral".parse::<SessionType>().unwrap(), SessionType::Behavioral);
        assert!("pairing".parse::<SessionType>().is_err());
    }
}

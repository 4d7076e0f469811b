use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::ids::QuestionId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("no question received from server")]
    Missing,

    #[error("question id cannot be empty")]
    EmptyId,

    #[error("question title cannot be empty")]
    EmptyTitle,

    #[error("question description cannot be empty")]
    EmptyDescription,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown difficulty: {raw} (expected easy, medium or hard)")]
pub struct ParseDifficultyError {
    raw: String,
}

//
// ─── DIFFICULTY ────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = ParseDifficultyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(ParseDifficultyError { raw: s.to_string() }),
        }
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// Worked example attached to a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Example {
    pub input: String,
    pub output: String,
    #[serde(default)]
    pub explanation: String,
}

/// Problem statement served for a session. Never mutated after it is received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub examples: Vec<Example>,
    #[serde(default)]
    pub constraints: Vec<String>,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default = "default_time_limit")]
    pub time_limit_minutes: u32,
    #[serde(default)]
    pub hints: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

fn default_time_limit() -> u32 {
    30
}

impl Question {
    /// Checks that the payload carries enough to be answered.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` naming the first blank required field.
    pub fn validate(&self) -> Result<(), QuestionError> {
        if self.id.as_str().trim().is_empty() {
            return Err(QuestionError::EmptyId);
        }
        if self.title.trim().is_empty() {
            return Err(QuestionError::EmptyTitle);
        }
        if self.description.trim().is_empty() {
            return Err(QuestionError::EmptyDescription);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Question {
        Question {
            id: QuestionId::new("q1"),
            title: "Two Sum".into(),
            description: "Find two numbers adding up to target.".into(),
            examples: Vec::new(),
            constraints: Vec::new(),
            difficulty: Difficulty::Easy,
            time_limit_minutes: 20,
            hints: vec!["Use a hash map".into()],
            tags: vec!["arrays".into()],
        }
    }

    #[test]
    fn valid_question_passes() {
        assert_eq!(sample().validate(), Ok(()));
    }

    #[test]
    fn blank_title_is_malformed() {
        let mut question = sample();
        question.title = "  ".into();
        assert_eq!(question.validate(), Err(QuestionError::EmptyTitle));
    }

    #[test]
    fn sparse_payload_fills_defaults() {
        let question: Question =
            serde_json::from_str(r#"{"id": 3, "title": "T", "description": "D"}"#).unwrap();
        assert_eq!(question.difficulty, Difficulty::Medium);
        assert_eq!(question.time_limit_minutes, 30);
        assert!(question.hints.is_empty());
    }

    #[test]
    fn difficulty_parsing_is_case_insensitive() {
        assert_eq!("HARD".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert!("brutal".parse::<Difficulty>().is_err());
    }
}

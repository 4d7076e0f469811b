//! Shared error types for the services crate.

use thiserror::Error;

use api::{ApiConfigError, ApiError};
use interview_core::model::{ParseLanguageError, QuestionError, SessionId, SettingsError};

use crate::controller::PhaseKind;

/// Errors emitted by `SubmissionPipeline`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SubmissionError {
    #[error("a submission for session {0} is already in progress")]
    Duplicate(SessionId),
    #[error("scoring failed: {0}")]
    Scoring(#[source] ApiError),
}

/// Errors emitted by `SessionController`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ControllerError {
    #[error("cannot {action} while {from}")]
    InvalidTransition {
        from: PhaseKind,
        action: &'static str,
    },
    #[error("write some code before submitting")]
    EmptyDraft,
    #[error("hints are disabled for this interview")]
    HintsDisabled,
    #[error(transparent)]
    InvalidSettings(#[from] SettingsError),
    #[error("could not start the interview: {0}")]
    Start(#[source] ApiError),
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Submission(#[from] SubmissionError),
    #[error("the interview is no longer running")]
    Closed,
}

/// Errors raised while reading service configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error(transparent)]
    Api(#[from] ApiConfigError),
    #[error("invalid INTERVIEW_LANGUAGE: {0}")]
    Language(#[source] ParseLanguageError),
}

use thiserror::Error;

use crate::model::{
    ParseDifficultyError, ParseLanguageError, ParseSessionTypeError, QuestionError, SettingsError,
};

/// Any validation failure raised by the domain model.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Difficulty(#[from] ParseDifficultyError),
    #[error(transparent)]
    SessionType(#[from] ParseSessionTypeError),
    #[error(transparent)]
    Language(#[from] ParseLanguageError),
}

mod countdown;
mod draft;
mod ids;
mod question;
mod session;
mod settings;
mod submission;

pub use countdown::{Countdown, CountdownSnapshot, StartOutcome, TickOutcome, Urgency};
pub use draft::{CodeDraft, DraftStats, Language, ParseLanguageError};
pub use ids::{ParseIdError, QuestionId, SessionId, SubmissionId};
pub use question::{Difficulty, Example, ParseDifficultyError, Question, QuestionError};
pub use session::{InterviewSession, ParseSessionTypeError, SessionStatus, SessionType};
pub use settings::{
    DURATION_PRESETS, FALLBACK_TOPICS, InterviewSettings, MAX_DURATION_MINUTES,
    MIN_DURATION_MINUTES, SettingsError,
};
pub use submission::{CodeAnalysis, ResultsBundle, SubmissionResult};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use interview_core::model::{
    Difficulty, InterviewSession, Question, QuestionId, SessionId, SessionType, SubmissionResult,
};

use crate::error::ApiError;

//
// ─── REQUESTS ──────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StartSessionRequest {
    pub session_type: SessionType,
    pub duration_minutes: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeSubmission {
    pub question_id: QuestionId,
    pub user_code: String,
    pub time_taken_seconds: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<SessionId>,
}

//
// ─── RESPONSES ─────────────────────────────────────────────────────────────────
//

/// Payload of the question endpoint. `question` may be absent on the wire;
/// callers decide whether that is fatal.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QuestionResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub question: Option<Question>,
    #[serde(default)]
    pub ai_generated: bool,
    #[serde(default)]
    pub session_id: Option<SessionId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

impl HealthStatus {
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy") || self.status.eq_ignore_ascii_case("ok")
    }
}

/// Some routes wrap their payload in `{success, data, message}`, others
/// return it bare.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum Envelope<T> {
    Bare(T),
    Wrapped {
        data: Option<T>,
        message: Option<String>,
    },
}

impl<T> Envelope<T> {
    pub(crate) fn into_data(self) -> Option<T> {
        match self {
            Envelope::Bare(value) => Some(value),
            Envelope::Wrapped { data, message } => {
                if data.is_none() {
                    if let Some(message) = message {
                        tracing::debug!(%message, "response carried no data");
                    }
                }
                data
            }
        }
    }
}

//
// ─── CONTRACT ──────────────────────────────────────────────────────────────────
//

/// The remote interview service, as seen by the session engine.
#[async_trait]
pub trait InterviewApi: Send + Sync {
    /// Create a remote session.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` for transport failures or non-success responses.
    async fn start_session(
        &self,
        request: &StartSessionRequest,
    ) -> Result<InterviewSession, ApiError>;

    /// Ask the service for a question.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` for transport failures or non-success responses.
    async fn generate_question(
        &self,
        difficulty: Difficulty,
        topic: Option<&str>,
    ) -> Result<QuestionResponse, ApiError>;

    /// Score a solution.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` for transport failures or non-success responses.
    async fn submit_code(
        &self,
        submission: &CodeSubmission,
    ) -> Result<SubmissionResult, ApiError>;

    /// Close a remote session. `None` when the service only acknowledges.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` for transport failures or non-success responses.
    async fn end_session(&self, id: &SessionId) -> Result<Option<InterviewSession>, ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError` when the service is down.
    async fn health(&self) -> Result<HealthStatus, ApiError>;

    /// Topics the question generator knows about.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` for transport failures or non-success responses.
    async fn question_categories(&self) -> Result<Vec<String>, ApiError>;
}

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use api::{ApiError, CodeSubmission, InterviewApi};
use interview_core::model::{QuestionId, SessionId, SubmissionResult};

use crate::error::SubmissionError;

/// Everything needed to score one attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionRequest {
    pub session_id: SessionId,
    pub question_id: QuestionId,
    pub code: String,
    pub elapsed_seconds: u64,
}

/// A scored attempt. The session-termination failure, if any, rides along
/// without invalidating the score.
#[derive(Debug)]
pub struct SubmissionReceipt {
    pub result: SubmissionResult,
    pub end_session_warning: Option<ApiError>,
}

/// Scores code and then closes the remote session, at most once per session
/// at a time.
#[derive(Clone)]
pub struct SubmissionPipeline {
    api: Arc<dyn InterviewApi>,
    in_flight: Arc<Mutex<HashSet<SessionId>>>,
}

impl SubmissionPipeline {
    #[must_use]
    pub fn new(api: Arc<dyn InterviewApi>) -> Self {
        Self {
            api,
            in_flight: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Submit code for scoring, then end the session.
    ///
    /// # Errors
    ///
    /// Returns `SubmissionError::Duplicate` without touching the network when
    /// the same session is already being submitted, and
    /// `SubmissionError::Scoring` when the scoring call fails.
    pub async fn submit(
        &self,
        request: SubmissionRequest,
    ) -> Result<SubmissionReceipt, SubmissionError> {
        let _marker = self.claim(&request.session_id)?;

        tracing::info!(
            session_id = %request.session_id,
            question_id = %request.question_id,
            elapsed_seconds = request.elapsed_seconds,
            "submitting code"
        );

        let submission = CodeSubmission {
            question_id: request.question_id,
            user_code: request.code,
            time_taken_seconds: request.elapsed_seconds,
            session_id: Some(request.session_id.clone()),
        };
        let result = self
            .api
            .submit_code(&submission)
            .await
            .map_err(SubmissionError::Scoring)?;

        let end_session_warning = match self.api.end_session(&request.session_id).await {
            Ok(_) => None,
            Err(err) => {
                tracing::warn!(
                    session_id = %request.session_id,
                    error = %err,
                    "scored, but the session could not be ended"
                );
                Some(err)
            }
        };

        Ok(SubmissionReceipt {
            result,
            end_session_warning,
        })
    }

    /// True while a submission for `session_id` is running.
    #[must_use]
    pub fn is_in_flight(&self, session_id: &SessionId) -> bool {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(session_id)
    }

    fn claim(&self, session_id: &SessionId) -> Result<InFlightMarker, SubmissionError> {
        let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        if !in_flight.insert(session_id.clone()) {
            tracing::debug!(%session_id, "duplicate submission rejected");
            return Err(SubmissionError::Duplicate(session_id.clone()));
        }
        Ok(InFlightMarker {
            in_flight: Arc::clone(&self.in_flight),
            session_id: session_id.clone(),
        })
    }
}

/// Releases the session's in-flight slot on every exit path, including a
/// dropped future.
struct InFlightMarker {
    in_flight: Arc<Mutex<HashSet<SessionId>>>,
    session_id: SessionId,
}

impl Drop for InFlightMarker {
    fn drop(&mut self) {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.session_id);
    }
}

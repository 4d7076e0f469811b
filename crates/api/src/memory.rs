//! Deterministic stand-in for the interview service.
//!
//! Backs the offline mode of the terminal app and every orchestration test.
//! Sessions, questions and scores come from fixed data; failures and latency
//! are scripted per endpoint.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::StatusCode;

use interview_core::model::{
    CodeAnalysis, Difficulty, Example, InterviewSession, Question, QuestionId, SessionId,
    SessionStatus, SubmissionId, SubmissionResult,
};

use crate::contract::{
    CodeSubmission, HealthStatus, InterviewApi, QuestionResponse, StartSessionRequest,
};
use crate::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    StartSession,
    GenerateQuestion,
    SubmitCode,
    EndSession,
    Health,
    Categories,
}

/// A failure to inject into the next call of an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    Unreachable,
    NotFound,
    ServerError,
    Timeout,
}

impl Failure {
    fn into_error(self) -> ApiError {
        match self {
            Failure::Unreachable => ApiError::Unreachable("memory://interview".into()),
            Failure::NotFound => ApiError::NotFound,
            Failure::ServerError => ApiError::Server(StatusCode::INTERNAL_SERVER_ERROR),
            Failure::Timeout => ApiError::Timeout,
        }
    }
}

#[derive(Default)]
struct State {
    next_id: u64,
    sessions: HashMap<SessionId, InterviewSession>,
    calls: HashMap<Endpoint, usize>,
    failures: HashMap<Endpoint, VecDeque<Failure>>,
    latency: HashMap<Endpoint, Duration>,
    omit_question: bool,
    submissions: Vec<CodeSubmission>,
}

#[derive(Clone, Default)]
pub struct InMemoryInterviewApi {
    state: Arc<Mutex<State>>,
}

impl InMemoryInterviewApi {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the next call to `endpoint`. Queued failures are consumed in order.
    pub fn fail_next(&self, endpoint: Endpoint, failure: Failure) {
        self.lock()
            .failures
            .entry(endpoint)
            .or_default()
            .push_back(failure);
    }

    /// Delay every call to `endpoint` by `delay` (tokio time).
    pub fn set_latency(&self, endpoint: Endpoint, delay: Duration) {
        self.lock().latency.insert(endpoint, delay);
    }

    /// Answer question requests without a `question` payload.
    pub fn omit_question(&self, omit: bool) {
        self.lock().omit_question = omit;
    }

    #[must_use]
    pub fn calls(&self, endpoint: Endpoint) -> usize {
        self.lock().calls.get(&endpoint).copied().unwrap_or(0)
    }

    /// Every scoring request received, in order.
    #[must_use]
    pub fn submissions(&self) -> Vec<CodeSubmission> {
        self.lock().submissions.clone()
    }

    #[must_use]
    pub fn session(&self, id: &SessionId) -> Option<InterviewSession> {
        self.lock().sessions.get(id).cloned()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Records the call and returns the latency to apply plus any scripted failure.
    fn enter(&self, endpoint: Endpoint) -> (Option<Duration>, Option<Failure>) {
        let mut state = self.lock();
        *state.calls.entry(endpoint).or_default() += 1;
        let failure = state
            .failures
            .get_mut(&endpoint)
            .and_then(VecDeque::pop_front);
        (state.latency.get(&endpoint).copied(), failure)
    }

    async fn call(&self, endpoint: Endpoint) -> Result<(), ApiError> {
        let (latency, failure) = self.enter(endpoint);
        if let Some(delay) = latency {
            tokio::time::sleep(delay).await;
        }
        match failure {
            Some(failure) => Err(failure.into_error()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl InterviewApi for InMemoryInterviewApi {
    async fn start_session(
        &self,
        request: &StartSessionRequest,
    ) -> Result<InterviewSession, ApiError> {
        self.call(Endpoint::StartSession).await?;
        let mut state = self.lock();
        state.next_id += 1;
        let session = InterviewSession {
            id: SessionId::new(format!("session-{}", state.next_id)),
            session_type: request.session_type,
            status: SessionStatus::Active,
            duration_minutes: request.duration_minutes,
            start_time: Some(Utc::now()),
            end_time: None,
            questions_attempted: 0,
        };
        state.sessions.insert(session.id.clone(), session.clone());
        Ok(session)
    }

    async fn generate_question(
        &self,
        difficulty: Difficulty,
        topic: Option<&str>,
    ) -> Result<QuestionResponse, ApiError> {
        self.call(Endpoint::GenerateQuestion).await?;
        let question = (!self.lock().omit_question).then(|| canned_question(difficulty, topic));
        Ok(QuestionResponse {
            success: question.is_some(),
            question,
            ai_generated: false,
            session_id: None,
        })
    }

    async fn submit_code(
        &self,
        submission: &CodeSubmission,
    ) -> Result<SubmissionResult, ApiError> {
        self.call(Endpoint::SubmitCode).await?;
        let mut state = self.lock();
        state.submissions.push(submission.clone());
        if let Some(session) = submission
            .session_id
            .as_ref()
            .and_then(|id| state.sessions.get_mut(id))
        {
            session.questions_attempted += 1;
        }
        Ok(SubmissionResult {
            submission_id: SubmissionId::new(format!("submission-{}", state.submissions.len())),
            success: true,
            ai_powered: false,
            analysis: fixed_analysis(&submission.user_code),
        })
    }

    async fn end_session(&self, id: &SessionId) -> Result<Option<InterviewSession>, ApiError> {
        self.call(Endpoint::EndSession).await?;
        let mut state = self.lock();
        let session = state.sessions.get_mut(id).ok_or(ApiError::NotFound)?;
        session.status = SessionStatus::Completed;
        session.end_time = Some(Utc::now());
        Ok(Some(session.clone()))
    }

    async fn health(&self) -> Result<HealthStatus, ApiError> {
        self.call(Endpoint::Health).await?;
        Ok(HealthStatus {
            status: "healthy".into(),
        })
    }

    async fn question_categories(&self) -> Result<Vec<String>, ApiError> {
        self.call(Endpoint::Categories).await?;
        Ok(vec!["arrays".into(), "strings".into(), "hash-tables".into()])
    }
}

fn canned_question(difficulty: Difficulty, topic: Option<&str>) -> Question {
    let topic = topic.unwrap_or("arrays");
    Question {
        id: QuestionId::new(format!("offline-{}-{topic}", difficulty.as_str())),
        title: "Two Sum".into(),
        description: "Given an array of integers `nums` and an integer `target`, return the \
                      indices of the two numbers that add up to `target`."
            .into(),
        examples: vec![Example {
            input: "nums = [2, 7, 11, 15], target = 9".into(),
            output: "[0, 1]".into(),
            explanation: "nums[0] + nums[1] == 9".into(),
        }],
        constraints: vec![
            "2 <= nums.length <= 10^4".into(),
            "Exactly one valid answer exists".into(),
        ],
        difficulty,
        time_limit_minutes: 30,
        hints: vec![
            "A hash map from value to index avoids the nested loop.".into(),
        ],
        tags: vec![topic.to_string()],
    }
}

/// Fixed scores; an empty solution scores zero.
fn fixed_analysis(code: &str) -> CodeAnalysis {
    if code.trim().is_empty() {
        return CodeAnalysis {
            feedback: vec!["No solution was submitted.".into()],
            ..CodeAnalysis::default()
        };
    }
    CodeAnalysis {
        overall_score: 70.0,
        correctness_score: 70.0,
        efficiency_score: 70.0,
        code_quality_score: 70.0,
        time_management_score: 70.0,
        time_complexity: "unknown".into(),
        space_complexity: "unknown".into(),
        feedback: vec!["Scored offline; connect to the service for a real review.".into()],
        improvements: Vec::new(),
        interview_tips: vec!["Explain your approach before you start typing.".into()],
    }
}

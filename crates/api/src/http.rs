use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use interview_core::model::{Difficulty, InterviewSession, SessionId, SubmissionResult};

use crate::config::ApiConfig;
use crate::contract::{
    CodeSubmission, Envelope, HealthStatus, InterviewApi, QuestionResponse, StartSessionRequest,
};
use crate::error::ApiError;

/// `InterviewApi` over HTTP/JSON.
#[derive(Clone)]
pub struct HttpInterviewApi {
    client: Client,
    config: ApiConfig,
}

impl HttpInterviewApi {
    /// # Errors
    ///
    /// Returns `ApiError::Http` if the TLS backend cannot be initialised.
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(ApiError::Http)?;
        Ok(Self { client, config })
    }

    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    async fn send<T: DeserializeOwned>(
        &self,
        label: &'static str,
        request: RequestBuilder,
    ) -> Result<T, ApiError> {
        let base = self.config.base_url.as_str();
        tracing::debug!(endpoint = label, "api request");

        let response = request
            .send()
            .await
            .map_err(|err| ApiError::from_transport(err, base))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(endpoint = label, %status, "api request failed");
            return Err(ApiError::from_status(status));
        }
        tracing::debug!(endpoint = label, %status, "api response");

        let bytes = response
            .bytes()
            .await
            .map_err(|err| ApiError::from_transport(err, base))?;
        serde_json::from_slice(&bytes).map_err(|err| ApiError::Decode(err.to_string()))
    }
}

#[async_trait]
impl InterviewApi for HttpInterviewApi {
    async fn start_session(
        &self,
        request: &StartSessionRequest,
    ) -> Result<InterviewSession, ApiError> {
        let url = self.config.endpoint("interview/start");
        let envelope: Envelope<InterviewSession> = self
            .send("start-session", self.client.post(url).json(request))
            .await?;
        envelope.into_data().ok_or(ApiError::MissingPayload("session"))
    }

    async fn generate_question(
        &self,
        difficulty: Difficulty,
        topic: Option<&str>,
    ) -> Result<QuestionResponse, ApiError> {
        let url = self
            .config
            .endpoint(&format!("questions/generate/{}", difficulty.as_str()));
        let mut request = self.client.get(url);
        if let Some(topic) = topic {
            request = request.query(&[("topic", topic)]);
        }
        self.send("generate-question", request).await
    }

    async fn submit_code(
        &self,
        submission: &CodeSubmission,
    ) -> Result<SubmissionResult, ApiError> {
        let url = self.config.endpoint("questions/submit");
        self.send("submit-code", self.client.post(url).json(submission))
            .await
    }

    async fn end_session(&self, id: &SessionId) -> Result<Option<InterviewSession>, ApiError> {
        let url = self
            .config
            .endpoint(&format!("interview/session/{}/end", id.as_str()));
        let envelope: Envelope<InterviewSession> =
            self.send("end-session", self.client.post(url)).await?;
        Ok(envelope.into_data())
    }

    async fn health(&self) -> Result<HealthStatus, ApiError> {
        let url = self.config.endpoint("health");
        self.send("health", self.client.get(url)).await
    }

    async fn question_categories(&self) -> Result<Vec<String>, ApiError> {
        #[derive(Deserialize)]
        struct Categories {
            #[serde(default)]
            categories: Vec<String>,
        }

        let url = self.config.endpoint("questions/categories");
        let body: Categories = self.send("question-categories", self.client.get(url)).await?;
        Ok(body
            .categories
            .into_iter()
            .map(|category| category.trim().to_string())
            .filter(|category| !category.is_empty())
            .collect())
    }
}

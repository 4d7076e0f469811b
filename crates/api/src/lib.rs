#![forbid(unsafe_code)]

pub mod config;
pub mod contract;
pub mod error;
pub mod http;
pub mod memory;

pub use config::{ApiConfig, ApiConfigError};
pub use contract::{
    CodeSubmission, HealthStatus, InterviewApi, QuestionResponse, StartSessionRequest,
};
pub use error::ApiError;
pub use http::HttpInterviewApi;
pub use memory::{Endpoint, Failure, InMemoryInterviewApi};

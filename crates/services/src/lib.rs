#![forbid(unsafe_code)]

pub mod config;
pub mod controller;
pub mod error;
pub mod pipeline;
pub mod timer;

pub use interview_core::Clock;

pub use config::ServiceConfig;
pub use controller::{
    Command, Completion, ControllerHandle, ControllerOptions, Phase, PhaseKind, Screen,
    SessionController,
};
pub use error::{ConfigError, ControllerError, SubmissionError};
pub use pipeline::{SubmissionPipeline, SubmissionReceipt, SubmissionRequest};
pub use timer::{CountdownTimer, TimerEvent, TimerOptions};

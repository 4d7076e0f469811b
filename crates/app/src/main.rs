mod cli;
mod telemetry;
mod terminal;

use std::error::Error;
use std::sync::Arc;

use api::{ApiConfig, HttpInterviewApi, InMemoryInterviewApi, InterviewApi};
use clap::Parser;
use interview_core::model::FALLBACK_TOPICS;
use services::controller::{self, ControllerHandle, NoticeLevel};
use services::{Clock, Command, PhaseKind, ServiceConfig, SessionController};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::cli::Cli;
use crate::terminal::{DraftBuffer, Input, Printer};

fn emit(lines: Vec<String>) {
    for line in lines {
        println!("{line}");
    }
}

async fn list_topics(api: &dyn InterviewApi) {
    let topics = match api.question_categories().await {
        Ok(topics) if !topics.is_empty() => topics,
        Ok(_) => FALLBACK_TOPICS.iter().map(ToString::to_string).collect(),
        Err(err) => {
            tracing::warn!(error = %err, "could not fetch topics, showing the built-in list");
            FALLBACK_TOPICS.iter().map(ToString::to_string).collect()
        }
    };
    for topic in topics {
        println!("{topic}");
    }
}

async fn check_health(api: &dyn InterviewApi) {
    match api.health().await {
        Ok(health) if health.is_healthy() => tracing::debug!("interview service is healthy"),
        Ok(health) => tracing::warn!(status = %health.status, "interview service reports a problem"),
        Err(err) => tracing::warn!(error = %err, "interview service health check failed"),
    }
}

/// Relay stdin and screen updates until the interview completes.
async fn drive(
    handle: &ControllerHandle,
    mut solution: Option<String>,
) -> Result<(), Box<dyn Error>> {
    let mut screen = handle.screen();
    let mut printer = Printer::default();
    let mut draft = DraftBuffer::default();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = solution.is_none();
    let mut auto_submitted = false;

    if stdin_open {
        println!("{}", terminal::HELP);
    }

    loop {
        tokio::select! {
            changed = screen.changed() => {
                if changed.is_err() {
                    return Ok(());
                }
                let current = screen.borrow_and_update().clone();
                emit(printer.update(&current));

                match current.phase {
                    PhaseKind::Completed => return Ok(()),
                    PhaseKind::Error => {
                        let message = current.error.unwrap_or_else(|| "interview failed".into());
                        return Err(message.into());
                    }
                    PhaseKind::Active => {
                        if let Some(code) = solution.take() {
                            handle.send(Command::Edit(code))?;
                            handle.send(Command::Submit)?;
                            auto_submitted = true;
                        } else if auto_submitted {
                            if let Some(notice) = current
                                .notice
                                .filter(|notice| notice.level == NoticeLevel::Error)
                            {
                                return Err(notice.message.into());
                            }
                        }
                    }
                    PhaseKind::Setup | PhaseKind::Loading | PhaseKind::Submitting => {}
                }
            }
            line = lines.next_line(), if stdin_open => {
                let Some(line) = line? else {
                    stdin_open = false;
                    handle.send(Command::End)?;
                    continue;
                };
                match terminal::parse_line(&line) {
                    Input::Command(Command::ResetDraft) => {
                        draft.clear();
                        handle.send(Command::ResetDraft)?;
                    }
                    Input::Command(command) => handle.send(command)?,
                    Input::Status => println!("{}", terminal::status_line(&screen.borrow())),
                    Input::Help => println!("{}", terminal::HELP),
                    Input::Unknown(command) => {
                        eprintln!("unknown command {command}, :help lists them");
                    }
                    Input::Code(code) => {
                        let text = draft.push_line(&code).to_string();
                        handle.send(Command::Edit(text))?;
                    }
                }
            }
        }
    }
}

async fn run() -> Result<(), Box<dyn Error>> {
    dotenvy::dotenv().ok();
    telemetry::init_tracing();

    let cli = Cli::parse();
    let mut config = ServiceConfig::from_env()?;
    if let Some(url) = &cli.api_url {
        config.api.base_url = ApiConfig::parse_base_url(url)?;
    }
    if let Some(language) = cli.language {
        config.language = language;
    }

    let api: Arc<dyn InterviewApi> = if cli.offline {
        Arc::new(InMemoryInterviewApi::new())
    } else {
        Arc::new(HttpInterviewApi::new(config.api.clone())?)
    };

    if cli.list_topics {
        list_topics(api.as_ref()).await;
        return Ok(());
    }

    let settings = cli.settings()?;
    let solution = match &cli.solution {
        Some(path) => Some(tokio::fs::read_to_string(path).await?),
        None => None,
    };
    check_health(api.as_ref()).await;

    let controller =
        SessionController::new(api, Clock::default_clock(), config.controller_options());
    let mut handle = controller::spawn(controller);
    handle.send(Command::Start(settings))?;

    drive(&handle, solution).await?;

    let completion = handle
        .finished()
        .await
        .ok_or("interview stopped before it finished")?;
    emit(terminal::completion_report(&completion));
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}

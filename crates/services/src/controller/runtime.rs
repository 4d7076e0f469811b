//! Runs a `SessionController` on its own task.
//!
//! Commands and countdown events are processed one at a time, commands first,
//! so a submit and an expiry that arrive together can only produce one
//! submission.

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::error::ControllerError;
use crate::timer::TimerEvent;

use super::phase::{Completion, PhaseKind};
use super::session::{Command, SessionController};
use super::view::Screen;

enum Step {
    Command(Command),
    Timer(TimerEvent),
    Closed,
}

/// Owner's side of a spawned controller.
///
/// Dropping it aborts the task: in-flight remote calls are abandoned, the
/// countdown stops, and no further state is published.
pub struct ControllerHandle {
    commands: mpsc::UnboundedSender<Command>,
    screen: watch::Receiver<Screen>,
    task: Option<JoinHandle<Option<Completion>>>,
}

/// Move `controller` onto a tokio task.
#[must_use]
pub fn spawn(controller: SessionController) -> ControllerHandle {
    let (commands, command_rx) = mpsc::unbounded_channel();
    let screen = controller.subscribe();
    let task = tokio::spawn(run(controller, command_rx));
    ControllerHandle {
        commands,
        screen,
        task: Some(task),
    }
}

impl ControllerHandle {
    /// Queue a command.
    ///
    /// # Errors
    ///
    /// Returns `ControllerError::Closed` once the controller has finished.
    pub fn send(&self, command: Command) -> Result<(), ControllerError> {
        self.commands
            .send(command)
            .map_err(|_| ControllerError::Closed)
    }

    /// Watch the screen. Closes when the controller finishes.
    #[must_use]
    pub fn screen(&self) -> watch::Receiver<Screen> {
        self.screen.clone()
    }

    /// Wait for the interview to end.
    ///
    /// Returns `None` if the controller stopped without completing or was
    /// already awaited.
    pub async fn finished(&mut self) -> Option<Completion> {
        let task = self.task.take()?;
        match task.await {
            Ok(completion) => completion,
            Err(err) => {
                tracing::warn!(error = %err, "controller task ended abnormally");
                None
            }
        }
    }
}

impl Drop for ControllerHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

async fn run(
    mut controller: SessionController,
    mut commands: mpsc::UnboundedReceiver<Command>,
) -> Option<Completion> {
    loop {
        let step = tokio::select! {
            biased;
            command = commands.recv() => command.map_or(Step::Closed, Step::Command),
            event = controller.next_timer_event() => match event {
                Some(event) => Step::Timer(event),
                None => Step::Closed,
            },
        };

        let result = match step {
            Step::Command(command) => {
                tracing::debug!(?command, "controller command");
                controller.apply(command).await
            }
            Step::Timer(event) => controller.handle_timer_event(event).await,
            Step::Closed => break,
        };
        if let Err(err) = result {
            log_rejection(&err);
        }

        if controller.phase().kind() == PhaseKind::Completed {
            break;
        }
    }
    controller.into_completion()
}

fn log_rejection(err: &ControllerError) {
    match err {
        ControllerError::InvalidTransition { .. } | ControllerError::EmptyDraft => {
            tracing::debug!(error = %err, "command rejected");
        }
        _ => tracing::warn!(error = %err, "command failed"),
    }
}

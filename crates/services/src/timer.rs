//! Countdown ticking as an owned tokio task.
//!
//! The task is the only owner of the [`Countdown`]. Callers steer it through
//! commands and observe it through a `watch` snapshot plus the event channel
//! handed in at spawn time. Dropping the [`CountdownTimer`] aborts the task,
//! so a pending tick can never reach a receiver that outlived its session.

use std::time::Duration;

use interview_core::model::{Countdown, CountdownSnapshot, StartOutcome};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_secs(1);

/// What the countdown reports to its owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    Tick { remaining: u32 },
    /// Delivered at most once per cycle.
    Expired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerOptions {
    pub auto_start: bool,
    pub period: Duration,
}

impl Default for TimerOptions {
    fn default() -> Self {
        Self {
            auto_start: false,
            period: DEFAULT_TICK_PERIOD,
        }
    }
}

#[derive(Debug)]
enum TimerCommand {
    Start,
    Pause,
    Reset,
    Query(oneshot::Sender<CountdownSnapshot>),
}

pub struct CountdownTimer {
    commands: mpsc::UnboundedSender<TimerCommand>,
    snapshot: watch::Receiver<CountdownSnapshot>,
    task: Option<JoinHandle<()>>,
}

impl CountdownTimer {
    /// Spawns the ticking task. Must be called inside a tokio runtime.
    #[must_use]
    pub fn spawn(
        duration_secs: u32,
        options: TimerOptions,
        events: mpsc::UnboundedSender<TimerEvent>,
    ) -> Self {
        let countdown = Countdown::new(duration_secs);
        let (snapshot_tx, snapshot) = watch::channel(countdown.snapshot());
        let (commands, command_rx) = mpsc::unbounded_channel();

        if options.auto_start {
            // Queued before the task runs, so it is the first thing it sees.
            let _ = commands.send(TimerCommand::Start);
        }

        let period = if options.period.is_zero() {
            DEFAULT_TICK_PERIOD
        } else {
            options.period
        };
        let task = tokio::spawn(run(countdown, period, command_rx, events, snapshot_tx));

        Self {
            commands,
            snapshot,
            task: Some(task),
        }
    }

    /// Start or resume. No-op while running or once the cycle has expired.
    pub fn start(&self) {
        self.send(TimerCommand::Start);
    }

    pub fn pause(&self) {
        self.send(TimerCommand::Pause);
    }

    /// Back to the full duration, stopped, ready for a new expiry cycle.
    pub fn reset(&self) {
        self.send(TimerCommand::Reset);
    }

    /// Latest state published by the task.
    #[must_use]
    pub fn snapshot(&self) -> CountdownSnapshot {
        *self.snapshot.borrow()
    }

    /// Asks the task for its state after every earlier command has been applied.
    ///
    /// Falls back to the last published snapshot once the task is gone.
    pub async fn query(&self) -> CountdownSnapshot {
        let (reply, answer) = oneshot::channel();
        if self.commands.send(TimerCommand::Query(reply)).is_err() {
            return self.snapshot();
        }
        answer.await.unwrap_or_else(|_| self.snapshot())
    }

    /// Stops ticking for good and waits for the task to finish.
    pub async fn shutdown(mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            let _ = task.await;
        }
    }

    fn send(&self, command: TimerCommand) {
        if let Err(mpsc::error::SendError(command)) = self.commands.send(command) {
            tracing::debug!(?command, "countdown task already finished");
        }
    }
}

impl Drop for CountdownTimer {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

async fn run(
    mut countdown: Countdown,
    period: Duration,
    mut commands: mpsc::UnboundedReceiver<TimerCommand>,
    events: mpsc::UnboundedSender<TimerEvent>,
    snapshot: watch::Sender<CountdownSnapshot>,
) {
    let mut ticker = time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Burst);

    loop {
        tokio::select! {
            command = commands.recv() => {
                let Some(command) = command else { break };
                match command {
                    TimerCommand::Start => match countdown.start() {
                        StartOutcome::Started => ticker.reset(),
                        StartOutcome::ExpiredImmediately => {
                            if events.send(TimerEvent::Expired).is_err() {
                                break;
                            }
                        }
                        StartOutcome::AlreadyRunning | StartOutcome::Exhausted => {}
                    },
                    TimerCommand::Pause => countdown.pause(),
                    TimerCommand::Reset => countdown.reset(),
                    TimerCommand::Query(reply) => {
                        let _ = reply.send(countdown.snapshot());
                    }
                }
            }
            _ = ticker.tick(), if countdown.is_running() => {
                if let Some(outcome) = countdown.tick() {
                    if events.send(TimerEvent::Tick { remaining: outcome.remaining_secs }).is_err() {
                        break;
                    }
                    if outcome.expired && events.send(TimerEvent::Expired).is_err() {
                        break;
                    }
                }
            }
        }
        snapshot.send_replace(countdown.snapshot());
    }
}

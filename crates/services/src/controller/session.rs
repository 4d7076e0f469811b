use std::future;
use std::mem;
use std::sync::Arc;
use std::time::Duration;

use api::{InterviewApi, StartSessionRequest};
use interview_core::Clock;
use interview_core::model::{
    CodeDraft, InterviewSession, InterviewSettings, Language, Question, QuestionError,
    ResultsBundle, SessionId,
};
use tokio::sync::{mpsc, watch};
use tokio::time::Instant;

use crate::error::ControllerError;
use crate::pipeline::{SubmissionPipeline, SubmissionReceipt, SubmissionRequest};
use crate::timer::{CountdownTimer, DEFAULT_TICK_PERIOD, TimerEvent, TimerOptions};

use super::phase::{ActiveSession, Completion, Phase, SubmitTrigger};
use super::view::{Notice, Screen};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerOptions {
    /// Decides the draft template.
    pub language: Language,
    pub tick_period: Duration,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            language: Language::default(),
            tick_period: DEFAULT_TICK_PERIOD,
        }
    }
}

/// Front-end intents, one per control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start(InterviewSettings),
    Edit(String),
    ResetDraft,
    ToggleHints,
    PauseTimer,
    ResumeTimer,
    Submit,
    End,
    DismissNotice,
    AcknowledgeError,
}

/// Drives one interview from setup to results.
///
/// Owns the phase, the countdown and the draft. Every operation is a
/// transition on `&mut self`, so two submissions can never overlap: whichever
/// reaches `Submitting` first wins and the other sees a non-active phase.
pub struct SessionController {
    api: Arc<dyn InterviewApi>,
    pipeline: SubmissionPipeline,
    clock: Clock,
    options: ControllerOptions,
    phase: Phase,
    notice: Option<Notice>,
    screen: watch::Sender<Screen>,
}

impl SessionController {
    #[must_use]
    pub fn new(api: Arc<dyn InterviewApi>, clock: Clock, options: ControllerOptions) -> Self {
        let phase = Phase::Setup;
        let (screen, _) = watch::channel(Screen::render(&phase, None));
        Self {
            pipeline: SubmissionPipeline::new(Arc::clone(&api)),
            api,
            clock,
            options,
            phase,
            notice: None,
            screen,
        }
    }

    #[must_use]
    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    #[must_use]
    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Receives a fresh [`Screen`] after every transition and tick.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Screen> {
        self.screen.subscribe()
    }

    #[must_use]
    pub fn completion(&self) -> Option<&Completion> {
        match &self.phase {
            Phase::Completed(completion) => Some(completion),
            _ => None,
        }
    }

    #[must_use]
    pub fn into_completion(self) -> Option<Completion> {
        match self.phase {
            Phase::Completed(completion) => Some(completion),
            _ => None,
        }
    }

    /// Dispatch a front-end command to the matching operation.
    ///
    /// # Errors
    ///
    /// Returns whatever the underlying operation returns.
    pub async fn apply(&mut self, command: Command) -> Result<(), ControllerError> {
        match command {
            Command::Start(settings) => self.start(settings).await,
            Command::Edit(text) => self.edit_code(text),
            Command::ResetDraft => self.reset_draft(),
            Command::ToggleHints => self.toggle_hints(),
            Command::PauseTimer => self.pause_timer(),
            Command::ResumeTimer => self.resume_timer(),
            Command::Submit => self.submit().await,
            Command::End => self.end_interview().await,
            Command::DismissNotice => {
                self.dismiss_notice();
                Ok(())
            }
            Command::AcknowledgeError => self.acknowledge_error(),
        }
    }

    // ─── LIFECYCLE ─────────────────────────────────────────────────────────

    /// Create the remote session, fetch its question and start the clock.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` outside `Setup`/`Error`, and
    /// `InvalidSettings`, `Start` or `Question` when loading fails. Every
    /// loading failure leaves the controller in `Error` without a timer.
    pub async fn start(&mut self, settings: InterviewSettings) -> Result<(), ControllerError> {
        let from = self.phase.kind();
        if !from.controls().can_start {
            return Err(ControllerError::InvalidTransition {
                from,
                action: "start",
            });
        }
        if let Err(err) = settings.validate() {
            self.fail(err.to_string());
            return Err(err.into());
        }

        self.notice = None;
        self.set_phase(Phase::Loading {
            settings: settings.clone(),
        });
        tracing::info!(
            session_type = settings.session_type.as_str(),
            difficulty = settings.difficulty.as_str(),
            duration_minutes = settings.duration_minutes,
            topic = settings.topic().unwrap_or("any"),
            "starting interview"
        );

        let request = StartSessionRequest {
            session_type: settings.session_type,
            duration_minutes: settings.duration_minutes,
        };
        let session = match self.api.start_session(&request).await {
            Ok(session) => session,
            Err(err) => {
                self.fail(format!("Could not start the interview: {err}"));
                return Err(ControllerError::Start(err));
            }
        };

        let question = match self.fetch_question(&settings).await {
            Ok(question) => question,
            Err(err) => {
                self.end_orphaned(&session.id).await;
                self.fail(format!("Could not load a question: {err}"));
                return Err(err);
            }
        };

        self.activate(session, question, &settings);
        Ok(())
    }

    async fn fetch_question(
        &self,
        settings: &InterviewSettings,
    ) -> Result<Question, ControllerError> {
        let response = self
            .api
            .generate_question(settings.difficulty, settings.topic())
            .await
            .map_err(ControllerError::Start)?;
        let question = response.question.ok_or(QuestionError::Missing)?;
        question.validate()?;
        Ok(question)
    }

    async fn end_orphaned(&self, session_id: &SessionId) {
        if let Err(err) = self.api.end_session(session_id).await {
            tracing::warn!(%session_id, error = %err, "could not end session after failed load");
        }
    }

    fn activate(
        &mut self,
        session: InterviewSession,
        question: Question,
        settings: &InterviewSettings,
    ) {
        let duration_minutes = if session.duration_minutes > 0 {
            session.duration_minutes
        } else {
            settings.duration_minutes
        };
        let duration_secs = duration_minutes.saturating_mul(60);

        let (events_tx, events) = mpsc::unbounded_channel();
        let timer = CountdownTimer::spawn(
            duration_secs,
            TimerOptions {
                auto_start: true,
                period: self.options.tick_period,
            },
            events_tx,
        );

        tracing::info!(
            session_id = %session.id,
            question_id = %question.id,
            duration_secs,
            "interview active"
        );

        self.set_phase(Phase::Active(ActiveSession {
            session,
            question: Arc::new(question),
            draft: CodeDraft::from_template(self.options.language),
            started_at: self.clock.now(),
            activated_at: Instant::now(),
            timer,
            events,
            duration_secs,
            remaining_secs: duration_secs,
            running: true,
            hints_enabled: settings.enable_hints,
            hints_visible: false,
        }));
    }

    /// Give up on the interview. The remote session is ended best-effort.
    ///
    /// Already completed interviews stay as they are.
    ///
    /// # Errors
    ///
    /// Never fails today; the `Result` keeps the operation uniform with the
    /// other commands.
    pub async fn end_interview(&mut self) -> Result<(), ControllerError> {
        let completion = match mem::replace(&mut self.phase, Phase::Setup) {
            Phase::Completed(completion) => {
                self.phase = Phase::Completed(completion);
                return Ok(());
            }
            Phase::Active(active) | Phase::Submitting { session: active, .. } => {
                let ActiveSession { session, timer, .. } = active;
                timer.shutdown().await;
                let warning = match self.api.end_session(&session.id).await {
                    Ok(_) => None,
                    Err(err) => {
                        tracing::warn!(session_id = %session.id, error = %err, "could not end session");
                        self.notice = Some(Notice::warning(format!(
                            "The interview ended here, but the service did not confirm it: {err}"
                        )));
                        Some(err.to_string())
                    }
                };
                tracing::info!(session_id = %session.id, "interview abandoned");
                Completion::Abandoned {
                    session_id: Some(session.id),
                    warning,
                }
            }
            Phase::Setup | Phase::Loading { .. } | Phase::Error { .. } => Completion::Abandoned {
                session_id: None,
                warning: None,
            },
        };
        self.set_phase(Phase::Completed(completion));
        Ok(())
    }

    pub fn dismiss_notice(&mut self) {
        if self.notice.take().is_some() {
            self.publish();
        }
    }

    /// Leave `Error` for `Setup`, keeping the message as a notice.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` outside `Error`.
    pub fn acknowledge_error(&mut self) -> Result<(), ControllerError> {
        match mem::replace(&mut self.phase, Phase::Setup) {
            Phase::Error { message } => {
                self.notice = Some(Notice::error(message));
                self.publish();
                Ok(())
            }
            other => {
                let from = other.kind();
                self.phase = other;
                Err(ControllerError::InvalidTransition {
                    from,
                    action: "acknowledge the error",
                })
            }
        }
    }

    // ─── EDITING ───────────────────────────────────────────────────────────

    /// Replace the draft wholesale.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` outside `Active`.
    pub fn edit_code(&mut self, text: String) -> Result<(), ControllerError> {
        self.active_mut("edit code")?.draft.replace(text);
        self.publish();
        Ok(())
    }

    /// Restore the language template.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` outside `Active`.
    pub fn reset_draft(&mut self) -> Result<(), ControllerError> {
        self.active_mut("reset the draft")?.draft.reset();
        self.publish();
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `InvalidTransition` outside `Active` and `HintsDisabled` when
    /// the settings turned hints off.
    pub fn toggle_hints(&mut self) -> Result<(), ControllerError> {
        let active = self.active_mut("toggle hints")?;
        if !active.hints_enabled {
            return Err(ControllerError::HintsDisabled);
        }
        active.hints_visible = !active.hints_visible;
        self.publish();
        Ok(())
    }

    // ─── TIMER ─────────────────────────────────────────────────────────────

    /// # Errors
    ///
    /// Returns `InvalidTransition` outside `Active`.
    pub fn pause_timer(&mut self) -> Result<(), ControllerError> {
        let active = self.active_mut("pause the timer")?;
        active.timer.pause();
        active.running = false;
        self.publish();
        Ok(())
    }

    /// Resume after a pause. An expired countdown stays at zero.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` outside `Active`.
    pub fn resume_timer(&mut self) -> Result<(), ControllerError> {
        let active = self.active_mut("resume the timer")?;
        if active.remaining_secs > 0 {
            active.timer.start();
            active.running = true;
            self.publish();
        }
        Ok(())
    }

    /// Next countdown event of the live session. Pending forever when there is
    /// no live session, so it can sit in a `select!`.
    pub async fn next_timer_event(&mut self) -> Option<TimerEvent> {
        match &mut self.phase {
            Phase::Active(active) => active.events.recv().await,
            _ => future::pending().await,
        }
    }

    /// React to the countdown. Expiry while active submits whatever is in the
    /// draft; anywhere else it is dropped.
    ///
    /// # Errors
    ///
    /// Returns `Submission` when the automatic submission fails.
    pub async fn handle_timer_event(&mut self, event: TimerEvent) -> Result<(), ControllerError> {
        let kind = self.phase.kind();
        let Phase::Active(active) = &mut self.phase else {
            tracing::debug!(?event, phase = ?kind, "timer event ignored");
            return Ok(());
        };
        match event {
            TimerEvent::Tick { remaining } => {
                active.remaining_secs = remaining;
                if remaining == 0 {
                    active.running = false;
                }
                self.publish();
                Ok(())
            }
            TimerEvent::Expired => {
                active.remaining_secs = 0;
                active.running = false;
                tracing::info!(session_id = %active.session.id, "time is up");
                self.notice = Some(Notice::info("Time is up. Submitting your solution."));
                self.run_submission(SubmitTrigger::Expiry).await
            }
        }
    }

    // ─── SUBMISSION ────────────────────────────────────────────────────────

    /// Submit the draft for scoring.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` outside `Active` (including a submission
    /// already under way), `EmptyDraft` for a blank draft, and `Submission`
    /// when scoring fails. After a failed submission the controller is back
    /// in `Active` with the draft untouched.
    pub async fn submit(&mut self) -> Result<(), ControllerError> {
        if self.active_mut("submit")?.draft.is_blank() {
            self.notice = Some(Notice::warning("Write some code before submitting."));
            self.publish();
            return Err(ControllerError::EmptyDraft);
        }
        self.run_submission(SubmitTrigger::Manual).await
    }

    async fn run_submission(&mut self, trigger: SubmitTrigger) -> Result<(), ControllerError> {
        let mut active = match mem::replace(&mut self.phase, Phase::Setup) {
            Phase::Active(active) => active,
            other => {
                let from = other.kind();
                self.phase = other;
                return Err(ControllerError::InvalidTransition {
                    from,
                    action: "submit",
                });
            }
        };

        let elapsed_seconds = active.elapsed_seconds();
        let was_running = active.running;
        active.timer.pause();
        active.running = false;

        let request = SubmissionRequest {
            session_id: active.session.id.clone(),
            question_id: active.question.id.clone(),
            code: active.draft.text().to_string(),
            elapsed_seconds,
        };
        self.set_phase(Phase::Submitting {
            session: active,
            trigger,
        });

        let outcome = self.pipeline.submit(request).await;

        let Phase::Submitting {
            session: mut active,
            trigger,
        } = mem::replace(&mut self.phase, Phase::Setup)
        else {
            return Err(ControllerError::Closed);
        };

        match outcome {
            Ok(receipt) => {
                self.complete(active, receipt, elapsed_seconds).await;
                Ok(())
            }
            Err(err) => {
                tracing::warn!(
                    session_id = %active.session.id,
                    ?trigger,
                    error = %err,
                    "submission failed"
                );
                if trigger == SubmitTrigger::Manual && was_running {
                    active.timer.start();
                    active.running = true;
                }
                self.notice = Some(Notice::error(format!(
                    "Submission failed: {err}. Your code is unchanged, please try again."
                )));
                self.set_phase(Phase::Active(active));
                Err(err.into())
            }
        }
    }

    async fn complete(
        &mut self,
        active: ActiveSession,
        receipt: SubmissionReceipt,
        elapsed_seconds: u64,
    ) {
        let ActiveSession {
            session,
            question,
            draft,
            timer,
            ..
        } = active;
        timer.shutdown().await;

        let SubmissionReceipt {
            result,
            end_session_warning,
        } = receipt;
        self.notice = end_session_warning.as_ref().map(|err| {
            Notice::warning(format!(
                "Your solution was scored, but the session could not be closed: {err}"
            ))
        });
        let warning = end_session_warning.map(|err| err.to_string());

        tracing::info!(
            session_id = %session.id,
            submission_id = %result.submission_id,
            elapsed_seconds,
            overall_score = result.analysis.overall_score,
            "interview submitted"
        );

        let results = ResultsBundle {
            submission: result,
            question: Arc::unwrap_or_clone(question),
            elapsed_seconds,
            user_code: draft.into_text(),
        };
        self.set_phase(Phase::Completed(Completion::Submitted {
            results: Box::new(results),
            warning,
        }));
    }

    // ─── HELPERS ───────────────────────────────────────────────────────────

    fn active_mut(&mut self, action: &'static str) -> Result<&mut ActiveSession, ControllerError> {
        let from = self.phase.kind();
        match &mut self.phase {
            Phase::Active(active) => Ok(active),
            _ => Err(ControllerError::InvalidTransition { from, action }),
        }
    }

    fn fail(&mut self, message: String) {
        tracing::warn!(%message, "interview could not start");
        self.set_phase(Phase::Error { message });
    }

    fn set_phase(&mut self, phase: Phase) {
        let from = self.phase.kind();
        self.phase = phase;
        tracing::debug!(?from, to = ?self.phase.kind(), "phase change");
        self.publish();
    }

    fn publish(&self) {
        self.screen
            .send_replace(Screen::render(&self.phase, self.notice.as_ref()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::PhaseKind;
    use api::{ApiError, Endpoint, Failure, InMemoryInterviewApi};
    use interview_core::model::Difficulty;
    use interview_core::time::fixed_now;

    fn new_controller(api: &InMemoryInterviewApi) -> SessionController {
        SessionController::new(
            Arc::new(api.clone()),
            Clock::fixed(fixed_now()),
            ControllerOptions::default(),
        )
    }

    fn settings(duration_minutes: u32) -> InterviewSettings {
        InterviewSettings {
            difficulty: Difficulty::Easy,
            duration_minutes,
            topic: Some("  arrays ".into()),
            ..InterviewSettings::default()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn start_activates_with_template_and_timer() {
        let api = InMemoryInterviewApi::new();
        let mut controller = new_controller(&api);

        controller.start(settings(20)).await.unwrap();

        let active = controller.phase().session().unwrap();
        assert_eq!(controller.phase().kind(), PhaseKind::Active);
        assert_eq!(active.draft().text(), Language::Python.template());
        assert_eq!(active.countdown().remaining_secs, 1200);
        assert_eq!(active.started_at(), fixed_now());
        assert_eq!(active.question().id.as_str(), "offline-easy-arrays");
        assert_eq!(api.calls(Endpoint::StartSession), 1);
        assert_eq!(api.calls(Endpoint::GenerateQuestion), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn invalid_settings_never_reach_the_service() {
        let api = InMemoryInterviewApi::new();
        let mut controller = new_controller(&api);

        let err = controller.start(settings(0)).await.unwrap_err();

        assert!(matches!(err, ControllerError::InvalidSettings(_)));
        assert_eq!(controller.phase().kind(), PhaseKind::Error);
        assert_eq!(api.calls(Endpoint::StartSession), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn start_session_failure_is_an_error_phase() {
        let api = InMemoryInterviewApi::new();
        api.fail_next(Endpoint::StartSession, Failure::Unreachable);
        let mut controller = new_controller(&api);

        let err = controller.start(settings(30)).await.unwrap_err();

        assert!(matches!(err, ControllerError::Start(ApiError::Unreachable(_))));
        assert_eq!(api.calls(Endpoint::GenerateQuestion), 0);
        let screen = controller.subscribe().borrow().clone();
        assert_eq!(screen.phase, PhaseKind::Error);
        assert!(screen.error.unwrap().contains("Could not start the interview"));
    }

    #[tokio::test(start_paused = true)]
    async fn missing_question_ends_the_orphaned_session() {
        let api = InMemoryInterviewApi::new();
        api.omit_question(true);
        let mut controller = new_controller(&api);

        let err = controller.start(settings(30)).await.unwrap_err();

        assert!(matches!(err, ControllerError::Question(QuestionError::Missing)));
        assert!(controller.phase().session().is_none());
        assert_eq!(api.calls(Endpoint::EndSession), 1);
        assert!(api.session(&SessionId::new("session-1")).unwrap().is_completed());
    }

    #[tokio::test(start_paused = true)]
    async fn acknowledged_error_returns_to_setup_and_allows_retry() {
        let api = InMemoryInterviewApi::new();
        api.fail_next(Endpoint::GenerateQuestion, Failure::Timeout);
        let mut controller = new_controller(&api);
        assert!(controller.start(settings(30)).await.is_err());

        controller.acknowledge_error().unwrap();
        assert_eq!(controller.phase().kind(), PhaseKind::Setup);
        assert!(controller.notice().is_some());

        controller.start(settings(30)).await.unwrap();
        assert_eq!(controller.phase().kind(), PhaseKind::Active);
    }

    #[tokio::test(start_paused = true)]
    async fn editing_outside_active_is_rejected() {
        let api = InMemoryInterviewApi::new();
        let mut controller = new_controller(&api);

        let err = controller.edit_code("x = 1".into()).unwrap_err();
        assert!(matches!(
            err,
            ControllerError::InvalidTransition {
                from: PhaseKind::Setup,
                ..
            }
        ));
        assert!(controller.acknowledge_error().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn reset_restores_the_template() {
        let api = InMemoryInterviewApi::new();
        let mut controller = new_controller(&api);
        controller.start(settings(30)).await.unwrap();

        controller.edit_code("print('hi')".into()).unwrap();
        assert_eq!(controller.subscribe().borrow().draft.lines, 1);
        controller.reset_draft().unwrap();

        let draft = controller.phase().session().unwrap().draft();
        assert_eq!(draft.text(), draft.template());
    }

    #[tokio::test(start_paused = true)]
    async fn blank_draft_cannot_be_submitted_by_hand() {
        let api = InMemoryInterviewApi::new();
        let mut controller = new_controller(&api);
        controller.start(settings(30)).await.unwrap();
        controller.edit_code("   \n".into()).unwrap();

        assert!(!controller.subscribe().borrow().controls.can_submit);
        let err = controller.submit().await.unwrap_err();

        assert!(matches!(err, ControllerError::EmptyDraft));
        assert_eq!(controller.phase().kind(), PhaseKind::Active);
        assert_eq!(api.calls(Endpoint::SubmitCode), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn hints_follow_settings() {
        let api = InMemoryInterviewApi::new();
        let mut controller = new_controller(&api);
        controller
            .start(InterviewSettings {
                enable_hints: false,
                ..settings(30)
            })
            .await
            .unwrap();

        assert!(matches!(
            controller.toggle_hints(),
            Err(ControllerError::HintsDisabled)
        ));

        let mut controller = new_controller(&api);
        controller.start(settings(30)).await.unwrap();
        controller.toggle_hints().unwrap();
        assert!(controller.subscribe().borrow().hints_visible);
    }

    #[tokio::test(start_paused = true)]
    async fn timer_controls_follow_the_running_state() {
        let api = InMemoryInterviewApi::new();
        let mut controller = new_controller(&api);
        let screen = controller.subscribe();
        controller.start(settings(20)).await.unwrap();

        let controls = screen.borrow().controls;
        assert!(controls.can_pause && !controls.can_resume);

        controller.pause_timer().unwrap();
        let controls = screen.borrow().controls;
        assert!(!controls.can_pause && controls.can_resume);

        controller.resume_timer().unwrap();
        let controls = screen.borrow().controls;
        assert!(controls.can_pause && !controls.can_resume);
    }

    #[tokio::test(start_paused = true)]
    async fn stale_timer_events_are_ignored() {
        let api = InMemoryInterviewApi::new();
        let mut controller = new_controller(&api);

        controller
            .handle_timer_event(TimerEvent::Expired)
            .await
            .unwrap();
        assert_eq!(controller.phase().kind(), PhaseKind::Setup);
        assert_eq!(api.calls(Endpoint::SubmitCode), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn ending_from_setup_is_an_abandonment_without_session() {
        let api = InMemoryInterviewApi::new();
        let mut controller = new_controller(&api);

        controller.end_interview().await.unwrap();

        assert_eq!(
            controller.completion(),
            Some(&Completion::Abandoned {
                session_id: None,
                warning: None,
            })
        );
        assert_eq!(api.calls(Endpoint::EndSession), 0);
    }
}

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use interview_core::model::{
    CodeDraft, CountdownSnapshot, InterviewSession, InterviewSettings, Question, ResultsBundle,
    SessionId,
};
use tokio::sync::mpsc;
use tokio::time::Instant;

use crate::timer::{CountdownTimer, TimerEvent};

/// Where the interview is in its lifecycle.
pub enum Phase {
    Setup,
    Loading { settings: InterviewSettings },
    Active(ActiveSession),
    Submitting {
        session: ActiveSession,
        trigger: SubmitTrigger,
    },
    Completed(Completion),
    Error { message: String },
}

impl Phase {
    #[must_use]
    pub fn kind(&self) -> PhaseKind {
        match self {
            Phase::Setup => PhaseKind::Setup,
            Phase::Loading { .. } => PhaseKind::Loading,
            Phase::Active(_) => PhaseKind::Active,
            Phase::Submitting { .. } => PhaseKind::Submitting,
            Phase::Completed(_) => PhaseKind::Completed,
            Phase::Error { .. } => PhaseKind::Error,
        }
    }

    /// The live session, while there is one.
    #[must_use]
    pub fn session(&self) -> Option<&ActiveSession> {
        match self {
            Phase::Active(session) | Phase::Submitting { session, .. } => Some(session),
            _ => None,
        }
    }
}

impl fmt::Debug for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Active(session) | Phase::Submitting { session, .. } => f
                .debug_struct("Phase")
                .field("kind", &self.kind())
                .field("session_id", &session.session.id)
                .finish(),
            Phase::Error { message } => f
                .debug_struct("Phase")
                .field("kind", &self.kind())
                .field("message", message)
                .finish(),
            _ => f.debug_struct("Phase").field("kind", &self.kind()).finish(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PhaseKind {
    #[default]
    Setup,
    Loading,
    Active,
    Submitting,
    Completed,
    Error,
}

impl PhaseKind {
    /// Affordances a front end may offer in this phase.
    #[must_use]
    pub fn controls(self) -> Controls {
        match self {
            PhaseKind::Setup => Controls {
                can_start: true,
                ..Controls::default()
            },
            PhaseKind::Active => Controls {
                can_edit: true,
                can_submit: true,
                can_pause: true,
                can_end: true,
                ..Controls::default()
            },
            PhaseKind::Loading | PhaseKind::Submitting | PhaseKind::Completed => {
                Controls::default()
            }
            PhaseKind::Error => Controls {
                can_start: true,
                can_dismiss: true,
                ..Controls::default()
            },
        }
    }
}

impl fmt::Display for PhaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PhaseKind::Setup => "setting up",
            PhaseKind::Loading => "loading",
            PhaseKind::Active => "active",
            PhaseKind::Submitting => "submitting",
            PhaseKind::Completed => "completed",
            PhaseKind::Error => "in error",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Controls {
    pub can_start: bool,
    pub can_edit: bool,
    pub can_submit: bool,
    pub can_pause: bool,
    pub can_resume: bool,
    pub can_end: bool,
    pub can_dismiss: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitTrigger {
    Manual,
    Expiry,
}

/// How an interview ended.
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    Submitted {
        results: Box<ResultsBundle>,
        /// Set when scoring worked but the remote session could not be ended.
        warning: Option<String>,
    },
    Abandoned {
        session_id: Option<SessionId>,
        warning: Option<String>,
    },
}

impl Completion {
    #[must_use]
    pub fn results(&self) -> Option<&ResultsBundle> {
        match self {
            Completion::Submitted { results, .. } => Some(results),
            Completion::Abandoned { .. } => None,
        }
    }

    #[must_use]
    pub fn warning(&self) -> Option<&str> {
        match self {
            Completion::Submitted { warning, .. } | Completion::Abandoned { warning, .. } => {
                warning.as_deref()
            }
        }
    }
}

/// State owned by a running interview.
pub struct ActiveSession {
    pub(crate) session: InterviewSession,
    pub(crate) question: Arc<Question>,
    pub(crate) draft: CodeDraft,
    pub(crate) started_at: DateTime<Utc>,
    pub(crate) activated_at: Instant,
    pub(crate) timer: CountdownTimer,
    pub(crate) events: mpsc::UnboundedReceiver<TimerEvent>,
    pub(crate) duration_secs: u32,
    pub(crate) remaining_secs: u32,
    pub(crate) running: bool,
    pub(crate) hints_enabled: bool,
    pub(crate) hints_visible: bool,
}

impl ActiveSession {
    #[must_use]
    pub fn session(&self) -> &InterviewSession {
        &self.session
    }

    #[must_use]
    pub fn question(&self) -> &Arc<Question> {
        &self.question
    }

    #[must_use]
    pub fn draft(&self) -> &CodeDraft {
        &self.draft
    }

    /// Wall-clock time the question became visible.
    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Whole seconds since activation, on the monotonic clock.
    #[must_use]
    pub fn elapsed_seconds(&self) -> u64 {
        self.activated_at.elapsed().as_secs()
    }

    #[must_use]
    pub fn hints_visible(&self) -> bool {
        self.hints_visible
    }

    /// Countdown as last reported by the timer's events.
    #[must_use]
    pub fn countdown(&self) -> CountdownSnapshot {
        CountdownSnapshot {
            remaining_secs: self.remaining_secs,
            duration_secs: self.duration_secs,
            running: self.running,
            expired: self.remaining_secs == 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_active_allows_editing_and_submitting() {
        for kind in [
            PhaseKind::Setup,
            PhaseKind::Loading,
            PhaseKind::Submitting,
            PhaseKind::Completed,
            PhaseKind::Error,
        ] {
            let controls = kind.controls();
            assert!(!controls.can_edit, "{kind:?}");
            assert!(!controls.can_submit, "{kind:?}");
        }
        let active = PhaseKind::Active.controls();
        assert!(active.can_edit && active.can_submit && active.can_pause && active.can_end);
        assert!(!active.can_start);
    }

    #[test]
    fn busy_and_finished_phases_offer_nothing() {
        assert_eq!(PhaseKind::Loading.controls(), Controls::default());
        assert_eq!(PhaseKind::Submitting.controls(), Controls::default());
        assert_eq!(PhaseKind::Completed.controls(), Controls::default());
    }

    #[test]
    fn error_can_be_acknowledged_or_retried() {
        let controls = PhaseKind::Error.controls();
        assert!(controls.can_dismiss && controls.can_start);
    }
}

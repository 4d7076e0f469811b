use std::sync::Arc;

use interview_core::model::{CountdownSnapshot, DraftStats, Question, SessionId, Urgency};

use super::phase::{Controls, Phase, PhaseKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// A message the front end should surface until it is dismissed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Everything a front end needs to draw the interview, republished on every
/// transition and tick.
///
/// No formatted strings beyond the notice; renderers decide presentation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Screen {
    pub phase: PhaseKind,
    pub controls: Controls,
    pub session_id: Option<SessionId>,
    pub question: Option<Arc<Question>>,
    pub countdown: Option<CountdownSnapshot>,
    pub draft: DraftStats,
    pub hints_visible: bool,
    pub notice: Option<Notice>,
    pub error: Option<String>,
}

impl Screen {
    pub(crate) fn render(phase: &Phase, notice: Option<&Notice>) -> Self {
        let kind = phase.kind();
        let mut screen = Screen {
            phase: kind,
            controls: kind.controls(),
            notice: notice.cloned(),
            ..Screen::default()
        };

        if let Some(active) = phase.session() {
            screen.session_id = Some(active.session.id.clone());
            screen.question = Some(Arc::clone(&active.question));
            screen.countdown = Some(active.countdown());
            screen.draft = active.draft.stats();
            screen.hints_visible = active.hints_visible;
            screen.controls.can_submit &= !active.draft.is_blank();
            if kind == PhaseKind::Active {
                screen.controls.can_pause = active.running;
                screen.controls.can_resume = !active.running && active.remaining_secs > 0;
            }
        }
        if let Phase::Error { message } = phase {
            screen.error = Some(message.clone());
        }
        screen.controls.can_dismiss |= screen.notice.is_some();
        screen
    }

    #[must_use]
    pub fn remaining_secs(&self) -> Option<u32> {
        self.countdown.map(|countdown| countdown.remaining_secs)
    }

    #[must_use]
    pub fn urgency(&self) -> Option<Urgency> {
        self.countdown.as_ref().map(CountdownSnapshot::urgency)
    }
}

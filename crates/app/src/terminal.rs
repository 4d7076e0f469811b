//! Line-oriented front end: parses what the candidate types and turns screen
//! updates into printable lines.

use interview_core::model::{Question, Urgency};
use interview_core::time::format_countdown;
use services::Completion;
use services::controller::{Command, Notice, NoticeLevel, PhaseKind, Screen};

pub const HELP: &str = "\
Type your solution line by line. Editor commands:
  :submit   submit the draft for scoring
  :reset    restore the starting template and clear what you typed
  :hints    show or hide hints
  :pause    pause the countdown
  :resume   resume the countdown
  :status   show time left and draft size
  :end      give up and end the interview
  :help     show this list";

/// One line of candidate input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Command(Command),
    Status,
    Help,
    Unknown(String),
    Code(String),
}

#[must_use]
pub fn parse_line(line: &str) -> Input {
    let trimmed = line.trim();
    if !trimmed.starts_with(':') || trimmed.len() < 2 {
        return Input::Code(line.trim_end_matches(['\r', '\n']).to_string());
    }
    match trimmed {
        ":submit" => Input::Command(Command::Submit),
        ":reset" => Input::Command(Command::ResetDraft),
        ":hints" => Input::Command(Command::ToggleHints),
        ":pause" => Input::Command(Command::PauseTimer),
        ":resume" => Input::Command(Command::ResumeTimer),
        ":end" => Input::Command(Command::End),
        ":status" => Input::Status,
        ":help" => Input::Help,
        other => Input::Unknown(other.to_string()),
    }
}

/// Candidate-typed lines accumulated into the draft.
///
/// The first typed line replaces the template; `:reset` brings the template
/// back and starts over.
#[derive(Debug, Default)]
pub struct DraftBuffer {
    text: String,
    lines: usize,
}

impl DraftBuffer {
    pub fn push_line(&mut self, line: &str) -> &str {
        if self.lines > 0 {
            self.text.push('\n');
        }
        self.text.push_str(line);
        self.lines += 1;
        &self.text
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.lines = 0;
    }
}

/// Remembers what was already printed so each update only adds news.
#[derive(Debug, Default)]
pub struct Printer {
    phase: Option<PhaseKind>,
    last_mark: Option<u32>,
    urgency: Option<Urgency>,
    hints_visible: bool,
    notice: Option<Notice>,
}

impl Printer {
    pub fn update(&mut self, screen: &Screen) -> Vec<String> {
        let mut out = Vec::new();

        if self.phase != Some(screen.phase) {
            self.phase = Some(screen.phase);
            match screen.phase {
                PhaseKind::Loading => out.push("Preparing your interview...".to_string()),
                PhaseKind::Active => {
                    if let Some(question) = &screen.question {
                        if self.last_mark.is_none() {
                            out.extend(question_block(question));
                        }
                    }
                }
                PhaseKind::Submitting => out.push("Submitting your solution...".to_string()),
                PhaseKind::Error => {
                    out.push(format!(
                        "Error: {}",
                        screen.error.as_deref().unwrap_or("unknown failure")
                    ));
                }
                PhaseKind::Setup | PhaseKind::Completed => {}
            }
        }

        if let Some(countdown) = screen.countdown {
            let remaining = countdown.remaining_secs;
            let urgency = countdown.urgency();
            let first = self.last_mark.is_none();
            let escalated = self.urgency.is_some_and(|seen| urgency > seen);
            let on_boundary = remaining % 60 == 0 && self.last_mark != Some(remaining);
            if first || escalated || on_boundary {
                let paused = if countdown.running || countdown.expired {
                    ""
                } else {
                    " (paused)"
                };
                out.push(format!("[{} left{paused}]", format_countdown(remaining)));
                self.last_mark = Some(remaining);
            }
            self.urgency = Some(urgency);
        }

        if screen.hints_visible != self.hints_visible {
            self.hints_visible = screen.hints_visible;
            match (&screen.question, screen.hints_visible) {
                (Some(question), true) => out.extend(hints_block(question)),
                _ => out.push("Hints hidden.".to_string()),
            }
        }

        if screen.notice != self.notice {
            if let Some(notice) = &screen.notice {
                let marker = match notice.level {
                    NoticeLevel::Info => "*",
                    NoticeLevel::Warning => "!",
                    NoticeLevel::Error => "!!",
                };
                out.push(format!("{marker} {}", notice.message));
            }
            self.notice = screen.notice.clone();
        }

        out
    }
}

#[must_use]
pub fn status_line(screen: &Screen) -> String {
    let clock = screen.countdown.map_or_else(
        || "--:--".to_string(),
        |countdown| {
            let state = if countdown.running { "running" } else { "paused" };
            let used = (countdown.progress() * 100.0).round();
            format!("{} left, {state}, {used:.0}% used", countdown.display())
        },
    );
    format!(
        "{} | {clock} | {} lines, {} chars",
        screen.phase, screen.draft.lines, screen.draft.chars
    )
}

fn question_block(question: &Question) -> Vec<String> {
    let mut out = vec![
        String::new(),
        format!("== {} ({}) ==", question.title, question.difficulty),
        question.description.clone(),
    ];
    for (n, example) in question.examples.iter().enumerate() {
        out.push(format!("Example {}:", n + 1));
        out.push(format!("  Input:  {}", example.input));
        out.push(format!("  Output: {}", example.output));
        if !example.explanation.is_empty() {
            out.push(format!("  Why:    {}", example.explanation));
        }
    }
    if !question.constraints.is_empty() {
        out.push("Constraints:".to_string());
        out.extend(question.constraints.iter().map(|c| format!("  - {c}")));
    }
    out.push(String::new());
    out
}

fn hints_block(question: &Question) -> Vec<String> {
    if question.hints.is_empty() {
        return vec!["No hints for this question.".to_string()];
    }
    let mut out = vec!["Hints:".to_string()];
    out.extend(question.hints.iter().map(|hint| format!("  - {hint}")));
    out
}

/// Final report for a finished interview.
#[must_use]
pub fn completion_report(completion: &Completion) -> Vec<String> {
    let mut out = Vec::new();
    match completion {
        Completion::Submitted { results, .. } => {
            let analysis = &results.submission.analysis;
            out.push(format!("== Results: {} ==", results.question.title));
            out.push(format!(
                "Time taken: {}",
                format_countdown(u32::try_from(results.elapsed_seconds).unwrap_or(u32::MAX))
            ));
            out.push(format!("Overall:         {:.0}", analysis.overall_score));
            out.push(format!("Correctness:     {:.0}", analysis.correctness_score));
            out.push(format!("Efficiency:      {:.0}", analysis.efficiency_score));
            out.push(format!("Code quality:    {:.0}", analysis.code_quality_score));
            out.push(format!("Time management: {:.0}", analysis.time_management_score));
            if !analysis.time_complexity.is_empty() {
                out.push(format!(
                    "Complexity: time {}, space {}",
                    analysis.time_complexity, analysis.space_complexity
                ));
            }
            for (title, items) in [
                ("Feedback", &analysis.feedback),
                ("Improvements", &analysis.improvements),
                ("Interview tips", &analysis.interview_tips),
            ] {
                if !items.is_empty() {
                    out.push(format!("{title}:"));
                    out.extend(items.iter().map(|item| format!("  - {item}")));
                }
            }
        }
        Completion::Abandoned { .. } => out.push("Interview ended without a submission.".into()),
    }
    if let Some(warning) = completion.warning() {
        out.push(format!("! {warning}"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use interview_core::model::{CountdownSnapshot, Difficulty, Example};
    use std::sync::Arc;

    fn question() -> Arc<Question> {
        Arc::new(Question {
            id: "q1".parse().unwrap(),
            title: "Two Sum".into(),
            description: "Find two numbers.".into(),
            examples: vec![Example {
                input: "[2,7], 9".into(),
                output: "[0,1]".into(),
                explanation: String::new(),
            }],
            constraints: vec![],
            difficulty: Difficulty::Easy,
            time_limit_minutes: 30,
            hints: vec!["Use a map".into()],
            tags: vec![],
        })
    }

    fn active(remaining_secs: u32) -> Screen {
        Screen {
            phase: PhaseKind::Active,
            question: Some(question()),
            countdown: Some(CountdownSnapshot {
                remaining_secs,
                duration_secs: 600,
                running: true,
                expired: false,
            }),
            ..Screen::default()
        }
    }

    #[test]
    fn colon_lines_are_commands() {
        assert_eq!(parse_line(":submit"), Input::Command(Command::Submit));
        assert_eq!(parse_line("  :pause "), Input::Command(Command::PauseTimer));
        assert_eq!(parse_line(":status"), Input::Status);
        assert_eq!(parse_line(":frobnicate"), Input::Unknown(":frobnicate".into()));
    }

    #[test]
    fn other_lines_are_code() {
        assert_eq!(
            parse_line("    return a + b"),
            Input::Code("    return a + b".into())
        );
        assert_eq!(parse_line(":"), Input::Code(":".into()));
        assert_eq!(parse_line(""), Input::Code(String::new()));
    }

    #[test]
    fn draft_buffer_joins_lines() {
        let mut draft = DraftBuffer::default();
        draft.push_line("def f():");
        assert_eq!(draft.push_line("    pass"), "def f():\n    pass");
        draft.clear();
        assert_eq!(draft.push_line(""), "");
        assert_eq!(draft.push_line("x"), "\nx");
    }

    #[test]
    fn question_prints_once_then_minute_marks() {
        let mut printer = Printer::default();

        let first = printer.update(&active(600));
        assert!(first.iter().any(|line| line.contains("Two Sum")));
        assert!(first.iter().any(|line| line == "[10:00 left]"));

        assert!(printer.update(&active(599)).is_empty());
        assert_eq!(printer.update(&active(540)), vec!["[09:00 left]".to_string()]);
    }

    #[test]
    fn urgency_escalation_is_announced() {
        let mut printer = Printer::default();
        printer.update(&active(400));
        assert_eq!(printer.update(&active(299)), vec!["[04:59 left]".to_string()]);
    }

    #[test]
    fn hints_and_notices_print_on_change() {
        let mut printer = Printer::default();
        printer.update(&active(600));

        let mut screen = active(600);
        screen.hints_visible = true;
        screen.notice = Some(Notice::warning("careful"));
        let out = printer.update(&screen);
        assert!(out.contains(&"  - Use a map".to_string()));
        assert!(out.contains(&"! careful".to_string()));

        assert!(printer.update(&screen).is_empty());
    }

    #[test]
    fn status_line_shows_time_used() {
        let mut screen = active(150);
        if let Some(countdown) = screen.countdown.as_mut() {
            countdown.running = false;
        }
        assert_eq!(
            status_line(&screen),
            "active | 02:30 left, paused, 75% used | 0 lines, 0 chars"
        );
    }

    #[test]
    fn abandoned_report_is_short() {
        let report = completion_report(&Completion::Abandoned {
            session_id: None,
            warning: None,
        });
        assert_eq!(report, vec!["Interview ended without a submission.".to_string()]);
    }
}

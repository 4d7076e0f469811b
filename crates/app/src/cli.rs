use std::path::PathBuf;

use clap::Parser;
use interview_core::error::Error as ModelError;
use interview_core::model::{
    DURATION_PRESETS, Difficulty, InterviewSettings, Language, MAX_DURATION_MINUTES,
    MIN_DURATION_MINUTES, SessionType,
};

fn duration_help() -> String {
    let presets: Vec<String> = DURATION_PRESETS.iter().map(ToString::to_string).collect();
    format!(
        "interview length in minutes ({MIN_DURATION_MINUTES}-{MAX_DURATION_MINUTES}); \
         usual choices are {}",
        presets.join(", ")
    )
}

/// timed coding interview practice in the terminal
#[derive(Parser, Debug, Clone)]
#[clap(version, about)]
pub struct Cli {
    /// question difficulty: easy, medium or hard
    #[clap(short, long, default_value_t = Difficulty::Medium)]
    pub difficulty: Difficulty,

    /// interview length in minutes (1-180)
    #[clap(short = 'm', long = "duration", default_value_t = 30, long_help = duration_help())]
    pub duration_minutes: u32,

    /// topic to draw the question from; any topic when omitted
    #[clap(short, long)]
    pub topic: Option<String>,

    /// coding, system_design or behavioral
    #[clap(long, default_value_t = SessionType::Coding)]
    pub session_type: SessionType,

    /// hide the hint toggle for this interview
    #[clap(long)]
    pub no_hints: bool,

    /// starting template language; overrides INTERVIEW_LANGUAGE
    #[clap(short, long)]
    pub language: Option<Language>,

    /// interview service base url; overrides INTERVIEW_API_URL
    #[clap(long)]
    pub api_url: Option<String>,

    /// run against the built-in offline question bank
    #[clap(long)]
    pub offline: bool,

    /// submit the contents of this file as soon as the question is shown
    #[clap(long, value_name = "FILE")]
    pub solution: Option<PathBuf>,

    /// print the available topics and exit
    #[clap(long)]
    pub list_topics: bool,
}

impl Cli {
    /// # Errors
    ///
    /// Returns the model error when the chosen duration is out of range.
    pub fn settings(&self) -> Result<InterviewSettings, ModelError> {
        let settings = InterviewSettings {
            session_type: self.session_type,
            difficulty: self.difficulty,
            duration_minutes: self.duration_minutes,
            topic: self.topic.clone(),
            enable_hints: !self.no_hints,
        };
        settings.validate()?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_setup_screen() {
        let cli = Cli::try_parse_from(["app"]).unwrap();
        let settings = cli.settings().unwrap();
        assert_eq!(settings, InterviewSettings::default());
        assert!(!cli.offline);
        assert!(cli.language.is_none());
    }

    #[test]
    fn parses_domain_values() {
        let cli = Cli::try_parse_from([
            "app",
            "--difficulty",
            "hard",
            "--duration",
            "45",
            "--topic",
            "graphs",
            "--session-type",
            "system_design",
            "--language",
            "rs",
            "--no-hints",
        ])
        .unwrap();
        let settings = cli.settings().unwrap();
        assert_eq!(settings.difficulty, Difficulty::Hard);
        assert_eq!(settings.duration_minutes, 45);
        assert_eq!(settings.topic(), Some("graphs"));
        assert_eq!(settings.session_type, SessionType::SystemDesign);
        assert!(!settings.enable_hints);
        assert_eq!(cli.language, Some(Language::Rust));
    }

    #[test]
    fn rejects_out_of_range_duration() {
        let cli = Cli::try_parse_from(["app", "--duration", "500"]).unwrap();
        assert!(matches!(cli.settings(), Err(ModelError::Settings(_))));
    }

    #[test]
    fn duration_help_lists_the_presets() {
        use clap::CommandFactory;

        let command = Cli::command();
        let duration = command
            .get_arguments()
            .find(|arg| arg.get_id() == "duration_minutes")
            .unwrap();
        let help = duration.get_long_help().unwrap().to_string();
        assert!(help.contains("1-180"));
        assert!(help.contains("15, 20, 30, 45, 60"));
    }

    #[test]
    fn rejects_unknown_difficulty() {
        assert!(Cli::try_parse_from(["app", "--difficulty", "brutal"]).is_err());
    }
}

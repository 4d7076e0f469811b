use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unsupported language: {raw}")]
pub struct ParseLanguageError {
    raw: String,
}

/// Language the candidate writes in. Only decides the starting template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Python,
    JavaScript,
    Rust,
}

impl Language {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::JavaScript => "javascript",
            Language::Rust => "rust",
        }
    }

    /// Starting text for a fresh draft.
    #[must_use]
    pub fn template(self) -> &'static str {
        match self {
            Language::Python => concat!(
                "# Write your solution here\n",
                "def solution():\n",
                "    # Your code goes here\n",
                "    pass\n",
                "\n",
                "# Test your solution\n",
                "if __name__ == \"__main__\":\n",
                "    print(\"Testing solution...\")",
            ),
            Language::JavaScript => concat!(
                "// Write your solution here\n",
                "function solution() {\n",
                "  // Your code goes here\n",
                "}\n",
                "\n",
                "console.log(\"Testing solution...\");",
            ),
            Language::Rust => concat!(
                "// Write your solution here\n",
                "fn solution() {\n",
                "    // Your code goes here\n",
                "}\n",
                "\n",
                "fn main() {\n",
                "    println!(\"Testing solution...\");\n",
                "}",
            ),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = ParseLanguageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "python" | "py" => Ok(Language::Python),
            "javascript" | "js" => Ok(Language::JavaScript),
            "rust" | "rs" => Ok(Language::Rust),
            _ => Err(ParseLanguageError { raw: s.to_string() }),
        }
    }
}

/// Line and character counts shown under the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DraftStats {
    pub lines: usize,
    pub chars: usize,
}

/// The candidate's in-progress solution.
///
/// Text is only ever replaced wholesale; `reset` restores the template exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeDraft {
    template: String,
    text: String,
}

impl CodeDraft {
    #[must_use]
    pub fn from_template(language: Language) -> Self {
        Self::with_template(language.template())
    }

    #[must_use]
    pub fn with_template(template: impl Into<String>) -> Self {
        let template = template.into();
        Self {
            text: template.clone(),
            template,
        }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn replace(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn reset(&mut self) {
        self.text.clone_from(&self.template);
    }

    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Counts lines the way an editor gutter does: an empty draft is one line.
    #[must_use]
    pub fn stats(&self) -> DraftStats {
        DraftStats {
            lines: self.text.split('\n').count(),
            chars: self.text.chars().count(),
        }
    }

    #[must_use]
    pub fn into_text(self) -> String {
        self.text
    }
}

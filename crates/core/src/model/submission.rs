use serde::{Deserialize, Serialize};

use crate::model::ids::SubmissionId;
use crate::model::question::Question;

/// Scoring breakdown returned by the service.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CodeAnalysis {
    #[serde(default)]
    pub overall_score: f32,
    #[serde(default)]
    pub correctness_score: f32,
    #[serde(default)]
    pub efficiency_score: f32,
    #[serde(default)]
    pub code_quality_score: f32,
    #[serde(default)]
    pub time_management_score: f32,
    #[serde(default)]
    pub time_complexity: String,
    #[serde(default)]
    pub space_complexity: String,
    #[serde(default)]
    pub feedback: Vec<String>,
    #[serde(default)]
    pub improvements: Vec<String>,
    #[serde(default)]
    pub interview_tips: Vec<String>,
}

/// Outcome of a scoring call. Produced once per session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionResult {
    pub submission_id: SubmissionId,
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub ai_powered: bool,
    #[serde(default)]
    pub analysis: CodeAnalysis,
}

/// Inert hand-off to whatever renders results.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultsBundle {
    pub submission: SubmissionResult,
    pub question: Question,
    pub elapsed_seconds: u64,
    pub user_code: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_scoring_response() {
        let json = r#"{
            "success": true,
            "ai_powered": false,
            "submission_id": "sub_17",
            "analysis": {
                "overall_score": 82.5,
                "correctness_score": 90,
                "efficiency_score": 75,
                "code_quality_score": 80,
                "time_management_score": 85,
                "time_complexity": "O(n)",
                "space_complexity": "O(n)",
                "feedback": ["Clean solution"],
                "improvements": [],
                "interview_tips": ["Talk through edge cases"]
            }
        }"#;
        let result: SubmissionResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.submission_id.as_str(), "sub_17");
        assert!(result.success);
        assert!((result.analysis.overall_score - 82.5).abs() < f32::EPSILON);
        assert_eq!(result.analysis.time_complexity, "O(n)");
    }
}

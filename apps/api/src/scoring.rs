//! Resume-to-JD fit scoring behind a trait seam.
//!
//! `AppState` holds an `Arc<dyn ResumeScorer>`, so the Gemini-backed scorer
//! can be swapped for a test double without touching the handlers.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::llm::GeminiClient;

/// Structured evaluation of a resume against a job description.
///
/// The aliases match the keys the model is instructed to emit; responses to
/// clients use the snake_case field names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evaluation {
    /// Match percentage, e.g. "85%".
    #[serde(alias = "JD Match")]
    pub jd_match: String,

    #[serde(alias = "Profile Summary")]
    pub profile_summary: String,

    #[serde(alias = "MissingKeywords", default)]
    pub missing_keywords: Vec<String>,
}

#[async_trait]
pub trait ResumeScorer: Send + Sync {
    async fn score(&self, resume_text: &str, jd_text: &str) -> Result<Evaluation, AppError>;
}

const SCORE_PROMPT_TEMPLATE: &str = r#"Act as an experienced applicant tracking system with deep knowledge of
technical hiring. Evaluate the resume below against the job description and
judge how well the candidate's experience covers the stated requirements.

Resume:
{resume_text}

Job Description:
{jd_text}

Respond with a single JSON object and nothing else, using exactly these keys:
{"JD Match": "<percentage>%", "MissingKeywords": ["<keyword>", ...], "Profile Summary": "<short summary>"}"#;

/// Gemini-backed scorer used in production.
pub struct GeminiScorer {
    client: GeminiClient,
}

impl GeminiScorer {
    pub fn new(client: GeminiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ResumeScorer for GeminiScorer {
    async fn score(&self, resume_text: &str, jd_text: &str) -> Result<Evaluation, AppError> {
        let prompt = SCORE_PROMPT_TEMPLATE
            .replace("{resume_text}", resume_text)
            .replace("{jd_text}", jd_text);

        self.client
            .call_json::<Evaluation>(&prompt)
            .await
            .map_err(|e| AppError::Scoring(format!("resume scoring failed: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evaluation_parses_model_keys() {
        let json = r#"{
            "JD Match": "85%",
            "Profile Summary": "Solid backend profile",
            "MissingKeywords": ["kubernetes", "terraform"]
        }"#;

        let eval: Evaluation = serde_json::from_str(json).unwrap();
        assert_eq!(eval.jd_match, "85%");
        assert_eq!(eval.profile_summary, "Solid backend profile");
        assert_eq!(eval.missing_keywords, vec!["kubernetes", "terraform"]);
    }

    #[test]
    fn test_evaluation_missing_keywords_default_to_empty() {
        let json = r#"{"JD Match": "90%", "Profile Summary": "Great fit"}"#;
        let eval: Evaluation = serde_json::from_str(json).unwrap();
        assert!(eval.missing_keywords.is_empty());
    }

    #[test]
    fn test_evaluation_serializes_snake_case() {
        let eval = Evaluation {
            jd_match: "70%".to_string(),
            profile_summary: "summary".to_string(),
            missing_keywords: vec!["rust".to_string()],
        };
        let value = serde_json::to_value(&eval).unwrap();
        assert_eq!(value["jd_match"], "70%");
        assert_eq!(value["profile_summary"], "summary");
        assert_eq!(value["missing_keywords"][0], "rust");
    }

    #[test]
    fn test_prompt_template_embeds_both_inputs() {
        let prompt = SCORE_PROMPT_TEMPLATE
            .replace("{resume_text}", "RESUME BODY")
            .replace("{jd_text}", "JD BODY");
        assert!(prompt.contains("RESUME BODY"));
        assert!(prompt.contains("JD BODY"));
        assert!(prompt.contains("JD Match"));
    }
}

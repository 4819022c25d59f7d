use serde::{Deserialize, Serialize};

/// How an interview question expects to be answered.
///
/// Only renderers branch on this; session logic treats every kind alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    Theory,
    CodeComprehension,
    LiveCoding,
    /// Any type this client does not know; rendered as plain text.
    #[serde(other)]
    Other,
}

impl QuestionKind {
    #[must_use]
    pub fn is_coding(self) -> bool {
        matches!(self, Self::LiveCoding)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InterviewQuestion {
    #[serde(rename = "question_type")]
    pub kind: QuestionKind,
    #[serde(rename = "question_text")]
    pub prompt: String,
    #[serde(rename = "template_code", default)]
    pub starter_code: Option<String>,
}

/// Knowledge question of an assessment. `correct_answer` is informational only.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AssessmentQuestion {
    #[serde(rename = "question_type")]
    pub kind: String,
    #[serde(rename = "question_text")]
    pub prompt: String,
    #[serde(default)]
    pub options: Option<Vec<String>>,
    #[serde(default)]
    pub correct_answer: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProjectTask {
    pub description: String,
    #[serde(rename = "template_code", default)]
    pub starter_code: String,
    #[serde(default)]
    pub evaluation: Option<String>,
}

use serde::Serialize;

use crate::model::answers::AnswerStore;
use crate::model::session::{AssessmentSession, InterviewSession};

/// One question paired with what the user wrote for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerEntry {
    pub question_text: String,
    pub user_answer: String,
}

/// Body of `POST /api/interviews/{id}/submit`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterviewSubmission {
    pub answers: Vec<AnswerEntry>,
}

impl InterviewSubmission {
    /// Pair every question, in session order, with its stored answer.
    #[must_use]
    pub fn build(session: &InterviewSession, answers: &AnswerStore) -> Self {
        let answers = session
            .questions()
            .iter()
            .enumerate()
            .map(|(index, question)| AnswerEntry {
                question_text: question.prompt.clone(),
                user_answer: answers.get(index).to_owned(),
            })
            .collect();
        Self { answers }
    }
}

/// Body of `POST /api/assessments/{id}/submit`. Project tasks send code only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssessmentSubmission {
    pub knowledge_answers: Vec<AnswerEntry>,
    pub project_codes: Vec<String>,
}

impl AssessmentSubmission {
    #[must_use]
    pub fn build(
        session: &AssessmentSession,
        knowledge: &AnswerStore,
        project_codes: &AnswerStore,
    ) -> Self {
        let knowledge_answers = session
            .knowledge_questions()
            .iter()
            .enumerate()
            .map(|(index, question)| AnswerEntry {
                question_text: question.prompt.clone(),
                user_answer: knowledge.get(index).to_owned(),
            })
            .collect();
        Self {
            knowledge_answers,
            project_codes: project_codes.collect(session.project_tasks().len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        AssessmentQuestion, InterviewQuestion, ProjectTask, QuestionKind, SessionId,
    };

    fn question(prompt: &str) -> InterviewQuestion {
        InterviewQuestion {
            kind: QuestionKind::Theory,
            prompt: prompt.to_string(),
            starter_code: None,
        }
    }

    #[test]
    fn interview_payload_keeps_order_and_blanks() {
        let session = InterviewSession::new(
            SessionId::parse("s1").unwrap(),
            "Rust",
            vec![question("Q1"), question("Q2"), question("Q3")],
        );
        let mut answers = AnswerStore::new();
        answers.set(1, "borrowing");

        let payload = InterviewSubmission::build(&session, &answers);
        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "answers": [
                    {"question_text": "Q1", "user_answer": ""},
                    {"question_text": "Q2", "user_answer": "borrowing"},
                    {"question_text": "Q3", "user_answer": ""}
                ]
            })
        );
    }

    #[test]
    fn assessment_payload_sends_codes_without_descriptions() {
        let knowledge = vec![
            AssessmentQuestion {
                kind: "open".to_string(),
                prompt: "K1".to_string(),
                options: None,
                correct_answer: Some("ignored".to_string()),
            },
            AssessmentQuestion {
                kind: "open".to_string(),
                prompt: "K2".to_string(),
                options: None,
                correct_answer: None,
            },
        ];
        let tasks = vec![ProjectTask {
            description: "Build a parser".to_string(),
            starter_code: "fn parse() {}".to_string(),
            evaluation: None,
        }];
        let session =
            AssessmentSession::new(SessionId::parse("a1").unwrap(), "Rust", knowledge, tasks);
        let mut codes = AnswerStore::new();
        codes.set(0, "fn parse() { todo() }");

        let payload = AssessmentSubmission::build(&session, &AnswerStore::new(), &codes);

        assert_eq!(payload.knowledge_answers.len(), 2);
        assert!(payload.knowledge_answers.iter().all(|a| a.user_answer.is_empty()));
        assert_eq!(payload.project_codes, vec!["fn parse() { todo() }"]);
    }
}

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::ids::SessionId;
use crate::model::question::{AssessmentQuestion, InterviewQuestion, ProjectTask};
use crate::model::timestamp::optional_utc;

//
// ─── STATUS ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    #[default]
    InProgress,
    Completed,
}

impl SessionStatus {
    #[must_use]
    pub fn is_in_progress(self) -> bool {
        matches!(self, Self::InProgress)
    }
}

/// Picks the identifier a record carries, whichever field name the server used.
fn carried_id(id: Option<&str>, legacy_id: Option<&str>) -> Option<SessionId> {
    id.into_iter()
        .chain(legacy_id)
        .find_map(|raw| SessionId::parse(raw).ok())
}

/// Like `carried_id`, falling back to `requested` when neither field holds a usable id.
fn unify_id(id: Option<&str>, legacy_id: Option<&str>, requested: &SessionId) -> SessionId {
    carried_id(id, legacy_id).unwrap_or_else(|| requested.clone())
}

//
// ─── START RESPONSE ───────────────────────────────────────────────────────────
//

/// Minimal view of the record returned when a session is created.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StartedSession {
    #[serde(default)]
    id: Option<String>,
    #[serde(default, rename = "_id")]
    legacy_id: Option<String>,
}

impl StartedSession {
    /// The new session's id, or `None` when the server sent neither field.
    #[must_use]
    pub fn session_id(&self) -> Option<SessionId> {
        self.id
            .iter()
            .chain(self.legacy_id.iter())
            .find_map(|raw| SessionId::parse(raw).ok())
    }
}

//
// ─── INTERVIEW ────────────────────────────────────────────────────────────────
//

/// Interview session exactly as the server sends it.
#[derive(Debug, Clone, Deserialize)]
pub struct InterviewRecord {
    #[serde(default)]
    id: Option<String>,
    #[serde(default, rename = "_id")]
    legacy_id: Option<String>,
    #[serde(default, rename = "ownerId")]
    owner_id: Option<String>,
    topic: String,
    #[serde(default)]
    questions: Vec<InterviewQuestion>,
    #[serde(default)]
    status: SessionStatus,
    #[serde(default)]
    feedback: Option<String>,
    #[serde(default)]
    score: Option<i32>,
    #[serde(default, deserialize_with = "optional_utc")]
    started_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "optional_utc")]
    completed_at: Option<DateTime<Utc>>,
}

impl InterviewRecord {
    /// Snapshot of a record listed without a request id; `None` if it carries no id.
    #[must_use]
    pub fn into_listed(self) -> Option<InterviewSession> {
        let id = carried_id(self.id.as_deref(), self.legacy_id.as_deref())?;
        Some(self.normalize(&id))
    }

    /// Unify the identifier fields and produce the client snapshot.
    #[must_use]
    pub fn normalize(self, requested: &SessionId) -> InterviewSession {
        InterviewSession {
            id: unify_id(self.id.as_deref(), self.legacy_id.as_deref(), requested),
            owner_id: self.owner_id,
            topic: self.topic,
            questions: self.questions,
            status: self.status,
            feedback: self.feedback,
            score: self.score,
            started_at: self.started_at,
            completed_at: self.completed_at,
        }
    }
}

/// Read-only snapshot of an interview; only the status moves locally.
#[derive(Debug, Clone, PartialEq)]
pub struct InterviewSession {
    id: SessionId,
    owner_id: Option<String>,
    topic: String,
    questions: Vec<InterviewQuestion>,
    status: SessionStatus,
    feedback: Option<String>,
    score: Option<i32>,
    started_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
}

impl InterviewSession {
    /// Builds a fresh in-progress snapshot, mostly useful for fakes and tests.
    #[must_use]
    pub fn new(id: SessionId, topic: impl Into<String>, questions: Vec<InterviewQuestion>) -> Self {
        Self {
            id,
            owner_id: None,
            topic: topic.into(),
            questions,
            status: SessionStatus::InProgress,
            feedback: None,
            score: None,
            started_at: None,
            completed_at: None,
        }
    }

    #[must_use]
    pub fn id(&self) -> &SessionId {
        &self.id
    }

    #[must_use]
    pub fn owner_id(&self) -> Option<&str> {
        self.owner_id.as_deref()
    }

    #[must_use]
    pub fn topic(&self) -> &str {
        &self.topic
    }

    #[must_use]
    pub fn questions(&self) -> &[InterviewQuestion] {
        &self.questions
    }

    #[must_use]
    pub fn question(&self, index: usize) -> Option<&InterviewQuestion> {
        self.questions.get(index)
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    #[must_use]
    pub fn feedback(&self) -> Option<&str> {
        self.feedback.as_deref()
    }

    #[must_use]
    pub fn score(&self) -> Option<i32> {
        self.score
    }

    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Local transition after the grading service accepted the answers.
    pub fn mark_completed(&mut self, at: DateTime<Utc>) {
        self.status = SessionStatus::Completed;
        self.completed_at = Some(at);
    }
}

//
// ─── ASSESSMENT ───────────────────────────────────────────────────────────────
//

/// Assessment session exactly as the server sends it.
#[derive(Debug, Clone, Deserialize)]
pub struct AssessmentRecord {
    #[serde(default)]
    id: Option<String>,
    #[serde(default, rename = "_id")]
    legacy_id: Option<String>,
    #[serde(default, rename = "ownerId")]
    owner_id: Option<String>,
    topic: String,
    #[serde(default)]
    knowledge_questions: Vec<AssessmentQuestion>,
    #[serde(default)]
    project_tasks: Vec<ProjectTask>,
    #[serde(default)]
    status: SessionStatus,
    #[serde(default)]
    final_report: Option<String>,
    #[serde(default, rename = "competency_matrix")]
    competency_map: Option<BTreeMap<String, f64>>,
    #[serde(default, deserialize_with = "optional_utc")]
    started_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "optional_utc")]
    completed_at: Option<DateTime<Utc>>,
}

impl AssessmentRecord {
    /// Snapshot of a record listed without a request id; `None` if it carries no id.
    #[must_use]
    pub fn into_listed(self) -> Option<AssessmentSession> {
        let id = carried_id(self.id.as_deref(), self.legacy_id.as_deref())?;
        Some(self.normalize(&id))
    }

    /// Unify the identifier fields and produce the client snapshot.
    #[must_use]
    pub fn normalize(self, requested: &SessionId) -> AssessmentSession {
        AssessmentSession {
            id: unify_id(self.id.as_deref(), self.legacy_id.as_deref(), requested),
            owner_id: self.owner_id,
            topic: self.topic,
            knowledge_questions: self.knowledge_questions,
            project_tasks: self.project_tasks,
            status: self.status,
            final_report: self.final_report,
            competency_map: self.competency_map.unwrap_or_default(),
            started_at: self.started_at,
            completed_at: self.completed_at,
        }
    }
}

/// Read-only snapshot of a two-part assessment.
#[derive(Debug, Clone, PartialEq)]
pub struct AssessmentSession {
    id: SessionId,
    owner_id: Option<String>,
    topic: String,
    knowledge_questions: Vec<AssessmentQuestion>,
    project_tasks: Vec<ProjectTask>,
    status: SessionStatus,
    final_report: Option<String>,
    competency_map: BTreeMap<String, f64>,
    started_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
}

impl AssessmentSession {
    #[must_use]
    pub fn new(
        id: SessionId,
        topic: impl Into<String>,
        knowledge_questions: Vec<AssessmentQuestion>,
        project_tasks: Vec<ProjectTask>,
    ) -> Self {
        Self {
            id,
            owner_id: None,
            topic: topic.into(),
            knowledge_questions,
            project_tasks,
            status: SessionStatus::InProgress,
            final_report: None,
            competency_map: BTreeMap::new(),
            started_at: None,
            completed_at: None,
        }
    }

    #[must_use]
    pub fn id(&self) -> &SessionId {
        &self.id
    }

    #[must_use]
    pub fn owner_id(&self) -> Option<&str> {
        self.owner_id.as_deref()
    }

    #[must_use]
    pub fn topic(&self) -> &str {
        &self.topic
    }

    #[must_use]
    pub fn knowledge_questions(&self) -> &[AssessmentQuestion] {
        &self.knowledge_questions
    }

    #[must_use]
    pub fn project_tasks(&self) -> &[ProjectTask] {
        &self.project_tasks
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    #[must_use]
    pub fn final_report(&self) -> Option<&str> {
        self.final_report.as_deref()
    }

    #[must_use]
    pub fn competency_map(&self) -> &BTreeMap<String, f64> {
        &self.competency_map
    }

    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    pub fn mark_completed(&mut self, at: DateTime<Utc>) {
        self.status = SessionStatus::Completed;
        self.completed_at = Some(at);
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

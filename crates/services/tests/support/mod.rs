#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use learn_core::model::{
    AssessmentQuestion, AssessmentSession, AssessmentSubmission, ChallengeId, CodeChallenge,
    FlashcardDeck, InterviewQuestion, InterviewSession, InterviewSubmission, ProjectTask,
    QuestionKind, RoadmapId, RoadmapSummary, SessionId, UserProfile,
};
use services::{ApiError, Notice, NoticeLevel, PracticeApi, Route, Shell};

// ─── SHELL ─────────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingShell {
    notices: Mutex<Vec<Notice>>,
    routes: Mutex<Vec<Route>>,
}

impl RecordingShell {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }

    pub fn messages(&self, level: NoticeLevel) -> Vec<String> {
        self.notices()
            .into_iter()
            .filter(|notice| notice.level == level)
            .map(|notice| notice.message)
            .collect()
    }

    pub fn routes(&self) -> Vec<Route> {
        self.routes.lock().unwrap().clone()
    }
}

impl Shell for RecordingShell {
    fn notify(&self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }

    fn navigate(&self, route: Route) {
        self.routes.lock().unwrap().push(route);
    }
}

// ─── API ───────────────────────────────────────────────────────────────────────

/// Scripted in-memory API. Unscripted reads answer 404.
#[derive(Default)]
pub struct FakeApi {
    interview: Mutex<Option<InterviewSession>>,
    assessment: Mutex<Option<AssessmentSession>>,
    deck: Mutex<Option<FlashcardDeck>>,
    started: Mutex<Option<SessionId>>,
    hint: Mutex<Option<String>>,
    profile: Mutex<Option<UserProfile>>,
    roadmaps: Mutex<Option<Vec<RoadmapSummary>>>,
    failures: Mutex<VecDeque<ApiError>>,
    fetch_gate: Mutex<Option<Arc<Notify>>>,
    submit_gate: Mutex<Option<Arc<Notify>>>,
    fetch_calls: AtomicUsize,
    submit_calls: AtomicUsize,
    interview_submissions: Mutex<Vec<InterviewSubmission>>,
    assessment_submissions: Mutex<Vec<AssessmentSubmission>>,
}

impl FakeApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_interview(session: InterviewSession) -> Arc<Self> {
        let api = Self::default();
        *api.interview.lock().unwrap() = Some(session);
        Arc::new(api)
    }

    pub fn with_assessment(session: AssessmentSession) -> Arc<Self> {
        let api = Self::default();
        *api.assessment.lock().unwrap() = Some(session);
        Arc::new(api)
    }

    pub fn set_deck(&self, deck: FlashcardDeck) {
        *self.deck.lock().unwrap() = Some(deck);
    }

    pub fn set_started(&self, id: &str) {
        *self.started.lock().unwrap() = Some(SessionId::parse(id).unwrap());
    }

    pub fn set_hint(&self, hint: &str) {
        *self.hint.lock().unwrap() = Some(hint.to_owned());
    }

    pub fn set_profile(&self, profile: UserProfile) {
        *self.profile.lock().unwrap() = Some(profile);
    }

    pub fn set_roadmaps(&self, roadmaps: Vec<RoadmapSummary>) {
        *self.roadmaps.lock().unwrap() = Some(roadmaps);
    }

    /// The next call of any kind fails with `err`.
    pub fn fail_next(&self, err: ApiError) {
        self.failures.lock().unwrap().push_back(err);
    }

    /// Reads wait until the returned handle is notified.
    pub fn gate_fetch(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.fetch_gate.lock().unwrap() = Some(Arc::clone(&gate));
        gate
    }

    /// Submissions and hint requests wait until the returned handle is notified.
    pub fn gate_submit(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.submit_gate.lock().unwrap() = Some(Arc::clone(&gate));
        gate
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn submit_calls(&self) -> usize {
        self.submit_calls.load(Ordering::SeqCst)
    }

    pub fn interview_submissions(&self) -> Vec<InterviewSubmission> {
        self.interview_submissions.lock().unwrap().clone()
    }

    pub fn assessment_submissions(&self) -> Vec<AssessmentSubmission> {
        self.assessment_submissions.lock().unwrap().clone()
    }

    fn scripted_failure(&self) -> Result<(), ApiError> {
        match self.failures.lock().unwrap().pop_front() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn fetch<T: Clone>(&self, slot: &Mutex<Option<T>>) -> Result<T, ApiError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.fetch_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.scripted_failure()?;
        slot.lock().unwrap().clone().ok_or_else(not_found)
    }

    async fn submitted(&self) -> Result<(), ApiError> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.submit_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.scripted_failure()
    }
}

pub fn not_found() -> ApiError {
    ApiError::Status {
        status: reqwest::StatusCode::NOT_FOUND,
        detail: Some("Session not found".into()),
    }
}

pub fn offline() -> ApiError {
    ApiError::Connection("connection refused".into())
}

#[async_trait]
impl PracticeApi for FakeApi {
    async fn start_interview(&self, _topic: &str) -> Result<SessionId, ApiError> {
        self.scripted_failure()?;
        self.started
            .lock()
            .unwrap()
            .clone()
            .ok_or(ApiError::MissingSessionId)
    }

    async fn interview(&self, _id: &SessionId) -> Result<InterviewSession, ApiError> {
        self.fetch(&self.interview).await
    }

    async fn submit_interview(
        &self,
        _id: &SessionId,
        payload: &InterviewSubmission,
    ) -> Result<(), ApiError> {
        self.submitted().await?;
        self.interview_submissions
            .lock()
            .unwrap()
            .push(payload.clone());
        Ok(())
    }

    async fn start_assessment(&self, topic: &str) -> Result<SessionId, ApiError> {
        self.start_interview(topic).await
    }

    async fn assessment(&self, _id: &SessionId) -> Result<AssessmentSession, ApiError> {
        self.fetch(&self.assessment).await
    }

    async fn submit_assessment(
        &self,
        _id: &SessionId,
        payload: &AssessmentSubmission,
    ) -> Result<(), ApiError> {
        self.submitted().await?;
        self.assessment_submissions
            .lock()
            .unwrap()
            .push(payload.clone());
        Ok(())
    }

    async fn generate_flashcards(&self, _roadmap: &RoadmapId) -> Result<FlashcardDeck, ApiError> {
        self.fetch(&self.deck).await
    }

    async fn challenges(&self) -> Result<Vec<CodeChallenge>, ApiError> {
        self.scripted_failure()?;
        Ok(vec![CodeChallenge {
            id: ChallengeId::parse("c1").unwrap(),
            title: "FizzBuzz".into(),
            description: "Print numbers".into(),
            difficulty: "easy".into(),
            category: "loops".into(),
            starter_code: "def fizzbuzz(n):\n    pass".into(),
        }])
    }

    async fn request_hint(&self, _challenge: &ChallengeId, _code: &str) -> Result<String, ApiError> {
        self.submitted().await?;
        self.hint.lock().unwrap().clone().ok_or_else(not_found)
    }

    async fn profile(&self) -> Result<UserProfile, ApiError> {
        self.fetch(&self.profile).await
    }

    async fn ongoing_roadmaps(&self) -> Result<Vec<RoadmapSummary>, ApiError> {
        self.fetch(&self.roadmaps).await
    }
}

// ─── FIXTURES ──────────────────────────────────────────────────────────────────

pub fn session_id(raw: &str) -> SessionId {
    SessionId::parse(raw).unwrap()
}

pub fn theory(prompt: &str) -> InterviewQuestion {
    InterviewQuestion {
        kind: QuestionKind::Theory,
        prompt: prompt.into(),
        starter_code: None,
    }
}

pub fn live_coding(prompt: &str, starter: &str) -> InterviewQuestion {
    InterviewQuestion {
        kind: QuestionKind::LiveCoding,
        prompt: prompt.into(),
        starter_code: Some(starter.into()),
    }
}

pub fn three_question_interview() -> InterviewSession {
    InterviewSession::new(
        session_id("iv-1"),
        "Rust",
        vec![
            theory("What is ownership?"),
            theory("Explain borrowing."),
            theory("What is a lifetime?"),
        ],
    )
}

pub fn knowledge(prompt: &str) -> AssessmentQuestion {
    AssessmentQuestion {
        kind: "multiple_choice".into(),
        prompt: prompt.into(),
        options: Some(vec!["A".into(), "B".into()]),
        correct_answer: None,
    }
}

pub fn task(description: &str, starter: &str) -> ProjectTask {
    ProjectTask {
        description: description.into(),
        starter_code: starter.into(),
        evaluation: None,
    }
}

pub fn small_assessment() -> AssessmentSession {
    AssessmentSession::new(
        session_id("as-1"),
        "Python",
        vec![knowledge("Q1?"), knowledge("Q2?")],
        vec![task("Build a parser", "def parse(s):\n    pass")],
    )
}

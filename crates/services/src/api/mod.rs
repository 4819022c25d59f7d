//! Seam between the runners and the remote practice API.

mod http;

use async_trait::async_trait;

use learn_core::model::{
    AssessmentSession, AssessmentSubmission, ChallengeId, CodeChallenge, FlashcardDeck,
    InterviewSession, InterviewSubmission, RoadmapId, RoadmapSummary, SessionId, UserProfile,
};

use crate::error::ApiError;

pub use http::HttpPracticeApi;

/// Remote operations the practice flows consume. Grading and persistence stay server-side.
#[async_trait]
pub trait PracticeApi: Send + Sync {
    async fn start_interview(&self, topic: &str) -> Result<SessionId, ApiError>;

    async fn interview(&self, id: &SessionId) -> Result<InterviewSession, ApiError>;

    async fn submit_interview(
        &self,
        id: &SessionId,
        payload: &InterviewSubmission,
    ) -> Result<(), ApiError>;

    async fn start_assessment(&self, topic: &str) -> Result<SessionId, ApiError>;

    async fn assessment(&self, id: &SessionId) -> Result<AssessmentSession, ApiError>;

    async fn submit_assessment(
        &self,
        id: &SessionId,
        payload: &AssessmentSubmission,
    ) -> Result<(), ApiError>;

    async fn generate_flashcards(&self, roadmap: &RoadmapId) -> Result<FlashcardDeck, ApiError>;

    async fn challenges(&self) -> Result<Vec<CodeChallenge>, ApiError>;

    async fn request_hint(
        &self,
        challenge: &ChallengeId,
        user_code: &str,
    ) -> Result<String, ApiError>;

    /// The signed-in user's roadmaps and graded sessions.
    async fn profile(&self) -> Result<UserProfile, ApiError>;

    async fn ongoing_roadmaps(&self) -> Result<Vec<RoadmapSummary>, ApiError>;
}

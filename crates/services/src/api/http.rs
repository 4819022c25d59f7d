use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use learn_core::model::{
    AssessmentRecord, AssessmentSession, AssessmentSubmission, ChallengeId, ChallengeRecord,
    CodeChallenge, FlashcardDeck, InterviewRecord, InterviewSession, InterviewSubmission,
    ProfileRecord, RoadmapId, RoadmapRecord, RoadmapSummary, SessionId, StartedSession,
    UserProfile,
};

use super::PracticeApi;
use crate::config::{ApiConfig, Credentials};
use crate::error::ApiError;

/// `PracticeApi` over HTTP with an explicitly injected bearer token.
#[derive(Clone, Debug)]
pub struct HttpPracticeApi {
    client: Client,
    config: ApiConfig,
    credentials: Credentials,
}

impl HttpPracticeApi {
    #[must_use]
    pub fn new(config: ApiConfig, credentials: Credentials) -> Self {
        Self::with_client(Client::new(), config, credentials)
    }

    #[must_use]
    pub fn with_client(client: Client, config: ApiConfig, credentials: Credentials) -> Self {
        Self {
            client,
            config,
            credentials,
        }
    }

    /// Exchange email and password for a bearer token.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` for rejected credentials and transport errors otherwise.
    pub async fn login(
        config: &ApiConfig,
        email: &str,
        password: &str,
    ) -> Result<Credentials, ApiError> {
        let response = Client::new()
            .post(config.endpoint("api/auth/token"))
            .form(&[("username", email), ("password", password)])
            .send()
            .await
            .map_err(transport)?;
        let token: TokenResponse = checked(response).await?.json().await?;
        Ok(Credentials::bearer(token.access_token))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        debug!(path, "GET");
        let request = self.client.get(self.config.endpoint(path));
        self.send(request).await?.json().await.map_err(ApiError::from)
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        debug!(path, "POST");
        let request = self.client.post(self.config.endpoint(path)).json(body);
        self.send(request).await?.json().await.map_err(ApiError::from)
    }

    /// POST where only the success status matters.
    async fn post_accepted<B>(&self, path: &str, body: &B) -> Result<(), ApiError>
    where
        B: Serialize + Sync + ?Sized,
    {
        debug!(path, "POST");
        let request = self.client.post(self.config.endpoint(path)).json(body);
        self.send(request).await?;
        Ok(())
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = self
            .credentials
            .apply(request)
            .send()
            .await
            .map_err(transport)?;
        checked(response).await
    }
}

fn transport(err: reqwest::Error) -> ApiError {
    if err.is_connect() || err.is_timeout() {
        ApiError::Connection(err.to_string())
    } else {
        ApiError::Http(err)
    }
}

async fn checked(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let detail = response
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(ErrorBody::into_message);
    Err(ApiError::Status { status, detail })
}

#[async_trait]
impl PracticeApi for HttpPracticeApi {
    async fn start_interview(&self, topic: &str) -> Result<SessionId, ApiError> {
        let started: StartedSession = self
            .post_json("api/interviews/start", &StartRequest { topic })
            .await?;
        started.session_id().ok_or(ApiError::MissingSessionId)
    }

    async fn interview(&self, id: &SessionId) -> Result<InterviewSession, ApiError> {
        let record: InterviewRecord = self.get_json(&format!("api/interviews/{id}")).await?;
        Ok(record.normalize(id))
    }

    async fn submit_interview(
        &self,
        id: &SessionId,
        payload: &InterviewSubmission,
    ) -> Result<(), ApiError> {
        self.post_accepted(&format!("api/interviews/{id}/submit"), payload)
            .await
    }

    async fn start_assessment(&self, topic: &str) -> Result<SessionId, ApiError> {
        let started: StartedSession = self
            .post_json("api/assessments/start", &StartRequest { topic })
            .await?;
        started.session_id().ok_or(ApiError::MissingSessionId)
    }

    async fn assessment(&self, id: &SessionId) -> Result<AssessmentSession, ApiError> {
        let record: AssessmentRecord = self.get_json(&format!("api/assessments/{id}")).await?;
        Ok(record.normalize(id))
    }

    async fn submit_assessment(
        &self,
        id: &SessionId,
        payload: &AssessmentSubmission,
    ) -> Result<(), ApiError> {
        self.post_accepted(&format!("api/assessments/{id}/submit"), payload)
            .await
    }

    async fn generate_flashcards(&self, roadmap: &RoadmapId) -> Result<FlashcardDeck, ApiError> {
        self.post_json(
            "api/flash-cards/generate",
            &FlashcardRequest {
                roadmap_id: roadmap.as_str(),
            },
        )
        .await
    }

    async fn challenges(&self) -> Result<Vec<CodeChallenge>, ApiError> {
        let records: Vec<ChallengeRecord> = self.get_json("api/challenges/").await?;
        Ok(records
            .into_iter()
            .filter_map(ChallengeRecord::into_challenge)
            .collect())
    }

    async fn request_hint(
        &self,
        challenge: &ChallengeId,
        user_code: &str,
    ) -> Result<String, ApiError> {
        let response: HintResponse = self
            .post_json(
                &format!("api/challenges/{challenge}/hint"),
                &HintRequest { user_code },
            )
            .await?;
        Ok(response.hint)
    }

    async fn profile(&self) -> Result<UserProfile, ApiError> {
        let record: ProfileRecord = self.get_json("api/auth/users/me/profile").await?;
        Ok(record.normalize())
    }

    async fn ongoing_roadmaps(&self) -> Result<Vec<RoadmapSummary>, ApiError> {
        let records: Vec<RoadmapRecord> = self.get_json("api/roadmaps/ongoing").await?;
        Ok(records
            .into_iter()
            .filter_map(RoadmapRecord::into_summary)
            .collect())
    }
}

//
// ─── WIRE TYPES ────────────────────────────────────────────────────────────────
//

#[derive(Debug, Serialize)]
struct StartRequest<'a> {
    topic: &'a str,
}

#[derive(Debug, Serialize)]
struct FlashcardRequest<'a> {
    #[serde(rename = "roadmapId")]
    roadmap_id: &'a str,
}

#[derive(Debug, Serialize)]
struct HintRequest<'a> {
    user_code: &'a str,
}

#[derive(Debug, Deserialize)]
struct HintResponse {
    hint: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Error body in the `{"detail": ...}` shape; validation failures send a list.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<serde_json::Value>,
}

impl ErrorBody {
    fn into_message(self) -> Option<String> {
        match self.detail? {
            serde_json::Value::String(message) => Some(message),
            serde_json::Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}

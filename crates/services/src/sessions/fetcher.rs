use std::future::Future;
use std::sync::Arc;

use tracing::{debug, info, warn};

use learn_core::model::{AssessmentSession, InterviewSession, SessionId};

use crate::api::PracticeApi;
use crate::error::{ApiError, RunnerError};
use crate::shell::{Notice, Route, Shell};

use super::lifecycle::Liveness;

const INVALID_ID: &str = "Invalid session ID.";

/// Loads one session snapshot per start; failures send the user back to the topic list.
#[derive(Clone)]
pub(crate) struct SessionFetcher {
    api: Arc<dyn PracticeApi>,
    shell: Arc<dyn Shell>,
}

impl SessionFetcher {
    pub(crate) fn new(api: Arc<dyn PracticeApi>, shell: Arc<dyn Shell>) -> Self {
        Self { api, shell }
    }

    /// Validate a route id before any network call.
    pub(crate) fn parse_id(&self, raw: &str, topics: Route) -> Result<SessionId, RunnerError> {
        SessionId::parse(raw).map_err(|err| {
            warn!(raw, "rejecting session id");
            self.shell.notify(Notice::error(INVALID_ID));
            self.shell.navigate(topics);
            RunnerError::from(err)
        })
    }

    pub(crate) async fn interview(
        &self,
        id: &SessionId,
        liveness: &Liveness,
    ) -> Result<InterviewSession, RunnerError> {
        self.load(
            liveness,
            || self.api.interview(id),
            "Could not load interview session.",
            Route::InterviewTopics,
        )
        .await
    }

    pub(crate) async fn assessment(
        &self,
        id: &SessionId,
        liveness: &Liveness,
    ) -> Result<AssessmentSession, RunnerError> {
        self.load(
            liveness,
            || self.api.assessment(id),
            "Could not load assessment session.",
            Route::AssessmentTopics,
        )
        .await
    }

    async fn load<T, F, Fut>(
        &self,
        liveness: &Liveness,
        fetch: F,
        failure: &'static str,
        topics: Route,
    ) -> Result<T, RunnerError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let result = fetch().await;
        if !liveness.is_live() {
            debug!("discarding fetch result for a stopped session");
            return Err(RunnerError::Superseded);
        }
        match result {
            Ok(session) => {
                info!("session loaded");
                Ok(session)
            }
            Err(err) => {
                warn!(error = %err, "session load failed");
                self.shell.notify(Notice::error(failure));
                self.shell.navigate(topics);
                Err(RunnerError::Load(err))
            }
        }
    }
}

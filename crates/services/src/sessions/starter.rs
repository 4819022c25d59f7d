use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{info, warn};

use learn_core::model::SessionId;

use crate::api::PracticeApi;
use crate::error::{ApiError, StartError};
use crate::shell::{Notice, Route, Shell};

use super::PendingGuard;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionKind {
    Interview,
    Assessment,
}

impl SessionKind {
    fn loading(self, topic: &str) -> String {
        match self {
            SessionKind::Interview => format!("Starting interview simulation for {topic}..."),
            SessionKind::Assessment => {
                format!("Preparing a challenging assessment for {topic}...")
            }
        }
    }

    fn failure(self) -> &'static str {
        match self {
            SessionKind::Interview => "Failed to start interview. Please try again.",
            SessionKind::Assessment => "Failed to start assessment. Please try again.",
        }
    }

    fn route(self, id: SessionId) -> Route {
        match self {
            SessionKind::Interview => Route::Interview(id),
            SessionKind::Assessment => Route::Assessment(id),
        }
    }
}

/// Topic pages' entry point: create a session server-side, then open it.
pub struct SessionStarter {
    api: Arc<dyn PracticeApi>,
    shell: Arc<dyn Shell>,
    starting: AtomicBool,
}

impl SessionStarter {
    #[must_use]
    pub fn new(api: Arc<dyn PracticeApi>, shell: Arc<dyn Shell>) -> Self {
        Self {
            api,
            shell,
            starting: AtomicBool::new(false),
        }
    }

    #[must_use]
    pub fn is_starting(&self) -> bool {
        self.starting.load(Ordering::Acquire)
    }

    /// # Errors
    ///
    /// Returns `StartError::BlankTopic` without a network call,
    /// `StartError::InFlight` while another start is pending, and
    /// `StartError::Api` when the server rejects the request or sends no id.
    pub async fn start_interview(&self, topic: &str) -> Result<SessionId, StartError> {
        self.start(SessionKind::Interview, topic).await
    }

    /// # Errors
    ///
    /// Same as `start_interview`.
    pub async fn start_assessment(&self, topic: &str) -> Result<SessionId, StartError> {
        self.start(SessionKind::Assessment, topic).await
    }

    async fn start(&self, kind: SessionKind, topic: &str) -> Result<SessionId, StartError> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(StartError::BlankTopic);
        }
        let Some(_starting) = PendingGuard::acquire(&self.starting) else {
            return Err(StartError::InFlight);
        };

        self.shell.notify(Notice::loading(kind.loading(topic)));
        let result = match kind {
            SessionKind::Interview => self.api.start_interview(topic).await,
            SessionKind::Assessment => self.api.start_assessment(topic).await,
        };

        match result {
            Ok(id) => {
                info!(?kind, session = %id, "session created");
                self.shell.navigate(kind.route(id.clone()));
                Ok(id)
            }
            Err(err) => Err(self.fail(kind, err)),
        }
    }

    fn fail(&self, kind: SessionKind, err: ApiError) -> StartError {
        warn!(?kind, error = %err, "could not start session");
        self.shell.notify(Notice::error(kind.failure()));
        StartError::Api(err)
    }
}

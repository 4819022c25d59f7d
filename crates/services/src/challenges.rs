use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{info, warn};

use learn_core::model::{ChallengeId, CodeChallenge};

use crate::api::PracticeApi;
use crate::error::{ApiError, HintError};
use crate::sessions::PendingGuard;
use crate::shell::{Notice, Shell};

const HINT_LOADING: &str = "Getting a hint from AI...";
const HINT_FAILED: &str = "Could not get a hint. Please try again.";

/// Coding challenges and AI hints for the code the user has so far.
pub struct ChallengeService {
    api: Arc<dyn PracticeApi>,
    shell: Arc<dyn Shell>,
    hinting: AtomicBool,
}

impl ChallengeService {
    #[must_use]
    pub fn new(api: Arc<dyn PracticeApi>, shell: Arc<dyn Shell>) -> Self {
        Self {
            api,
            shell,
            hinting: AtomicBool::new(false),
        }
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    pub async fn list(&self) -> Result<Vec<CodeChallenge>, ApiError> {
        let challenges = self.api.challenges().await?;
        info!(count = challenges.len(), "challenges loaded");
        Ok(challenges)
    }

    #[must_use]
    pub fn is_requesting_hint(&self) -> bool {
        self.hinting.load(Ordering::Acquire)
    }

    /// Ask for a hint and show it as a notice.
    ///
    /// # Errors
    ///
    /// Returns `HintError::InFlight` while another hint is pending and
    /// `HintError::Api` when the request fails.
    pub async fn request_hint(
        &self,
        challenge: &ChallengeId,
        user_code: &str,
    ) -> Result<String, HintError> {
        let Some(_hinting) = PendingGuard::acquire(&self.hinting) else {
            return Err(HintError::InFlight);
        };

        self.shell.notify(Notice::loading(HINT_LOADING));
        match self.api.request_hint(challenge, user_code).await {
            Ok(hint) => {
                info!(%challenge, "hint received");
                self.shell.notify(Notice::success(hint.clone()));
                Ok(hint)
            }
            Err(err) => {
                warn!(%challenge, error = %err, "hint request failed");
                self.shell.notify(Notice::error(HINT_FAILED));
                Err(err.into())
            }
        }
    }
}

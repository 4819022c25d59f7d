use std::sync::Arc;

use tracing::{info, warn};

use learn_core::model::{RoadmapSummary, UserProfile};

use crate::api::PracticeApi;
use crate::error::ApiError;
use crate::shell::{Notice, Shell};

const PROFILE_FAILED: &str = "Could not load profile data.";
const ROADMAPS_FAILED: &str = "Could not load your ongoing expeditions.";

/// Read side of finished work: the profile the runners redirect to, and the
/// roadmaps flashcard decks are generated from.
pub struct ProfileService {
    api: Arc<dyn PracticeApi>,
    shell: Arc<dyn Shell>,
}

impl ProfileService {
    #[must_use]
    pub fn new(api: Arc<dyn PracticeApi>, shell: Arc<dyn Shell>) -> Self {
        Self { api, shell }
    }

    /// # Errors
    ///
    /// Returns `ApiError` after showing an error notice.
    pub async fn load(&self) -> Result<UserProfile, ApiError> {
        match self.api.profile().await {
            Ok(profile) => {
                info!(
                    interviews = profile.interviews.len(),
                    assessments = profile.assessments.len(),
                    "profile loaded"
                );
                Ok(profile)
            }
            Err(err) => {
                warn!(error = %err, "profile load failed");
                self.shell.notify(Notice::error(PROFILE_FAILED));
                Err(err)
            }
        }
    }

    /// # Errors
    ///
    /// Returns `ApiError` after showing an error notice.
    pub async fn ongoing_roadmaps(&self) -> Result<Vec<RoadmapSummary>, ApiError> {
        match self.api.ongoing_roadmaps().await {
            Ok(roadmaps) => {
                info!(count = roadmaps.len(), "ongoing roadmaps loaded");
                Ok(roadmaps)
            }
            Err(err) => {
                warn!(error = %err, "roadmap listing failed");
                self.shell.notify(Notice::error(ROADMAPS_FAILED));
                Err(err)
            }
        }
    }
}

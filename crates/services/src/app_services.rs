use std::sync::Arc;

use crate::Clock;
use crate::api::{HttpPracticeApi, PracticeApi};
use crate::challenges::ChallengeService;
use crate::config::{ApiConfig, Credentials, RunnerConfig};
use crate::flashcards::FlashcardSession;
use crate::profile::ProfileService;
use crate::sessions::{AssessmentRunner, InterviewRunner, SessionStarter};
use crate::shell::Shell;

/// Assembles the app-facing services around one API client and one shell.
#[derive(Clone)]
pub struct AppServices {
    api: Arc<dyn PracticeApi>,
    interview: InterviewRunner,
    assessment: AssessmentRunner,
    starter: Arc<SessionStarter>,
    flashcards: FlashcardSession,
    challenges: Arc<ChallengeService>,
    profile: Arc<ProfileService>,
}

impl AppServices {
    /// Build services talking to the practice API over HTTP.
    #[must_use]
    pub fn over_http(
        api_config: ApiConfig,
        credentials: Credentials,
        runner_config: RunnerConfig,
        shell: Arc<dyn Shell>,
        clock: Clock,
    ) -> Self {
        let api: Arc<dyn PracticeApi> = Arc::new(HttpPracticeApi::new(api_config, credentials));
        Self::new(api, shell, clock, runner_config)
    }

    #[must_use]
    pub fn new(
        api: Arc<dyn PracticeApi>,
        shell: Arc<dyn Shell>,
        clock: Clock,
        runner_config: RunnerConfig,
    ) -> Self {
        let interview = InterviewRunner::new(
            Arc::clone(&api),
            Arc::clone(&shell),
            clock,
            runner_config.clone(),
        );
        let assessment =
            AssessmentRunner::new(Arc::clone(&api), Arc::clone(&shell), clock, runner_config);
        let starter = Arc::new(SessionStarter::new(Arc::clone(&api), Arc::clone(&shell)));
        let flashcards = FlashcardSession::new(Arc::clone(&api), Arc::clone(&shell));
        let challenges = Arc::new(ChallengeService::new(Arc::clone(&api), Arc::clone(&shell)));
        let profile = Arc::new(ProfileService::new(Arc::clone(&api), shell));

        Self {
            api,
            interview,
            assessment,
            starter,
            flashcards,
            challenges,
            profile,
        }
    }

    #[must_use]
    pub fn api(&self) -> Arc<dyn PracticeApi> {
        Arc::clone(&self.api)
    }

    #[must_use]
    pub fn interview(&self) -> InterviewRunner {
        self.interview.clone()
    }

    #[must_use]
    pub fn assessment(&self) -> AssessmentRunner {
        self.assessment.clone()
    }

    #[must_use]
    pub fn starter(&self) -> Arc<SessionStarter> {
        Arc::clone(&self.starter)
    }

    #[must_use]
    pub fn flashcards(&self) -> FlashcardSession {
        self.flashcards.clone()
    }

    #[must_use]
    pub fn challenges(&self) -> Arc<ChallengeService> {
        Arc::clone(&self.challenges)
    }

    #[must_use]
    pub fn profile(&self) -> Arc<ProfileService> {
        Arc::clone(&self.profile)
    }
}

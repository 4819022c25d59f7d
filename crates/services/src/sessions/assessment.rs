use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn};

use learn_core::model::{
    AnswerStore, AssessmentQuestion, AssessmentSession, AssessmentSubmission, NextAction,
    ProjectTask, SessionStatus, Stage, StageController,
};
use learn_core::{Clock, Countdown, Tick};

use crate::api::PracticeApi;
use crate::config::RunnerConfig;
use crate::error::RunnerError;
use crate::shell::{Route, Shell};

use super::countdown::CountdownTask;
use super::fetcher::SessionFetcher;
use super::gateway::{GatewayMessages, SubmissionGateway, Trigger};
use super::lifecycle::{Lifecycle, Liveness};
use super::LoadPhase;

const MESSAGES: GatewayMessages = GatewayMessages {
    loading: "Submitting your final assessment for evaluation...",
    success: "Assessment submitted! Your report will be on your profile page.",
    failure: "Failed to submit assessment.",
    timer_failure: "Time is up, but your assessment could not be submitted. Please try again.",
};

/// Snapshot of the assessment screen.
#[derive(Debug, Clone, PartialEq)]
pub struct AssessmentView {
    pub phase: LoadPhase,
    pub topic: String,
    pub stage: Stage,
    pub knowledge: Vec<(AssessmentQuestion, String)>,
    pub task_index: usize,
    pub task_count: usize,
    pub task: Option<ProjectTask>,
    pub code: String,
    pub next_action: Option<NextAction>,
    pub remaining_secs: Option<u32>,
    pub status: Option<SessionStatus>,
    pub submitting: bool,
}

struct AssessmentState {
    phase: LoadPhase,
    session: Option<AssessmentSession>,
    stages: StageController,
    knowledge: AnswerStore,
    codes: AnswerStore,
    countdown: Option<Countdown>,
    timer: Option<CountdownTask>,
    liveness: Option<Liveness>,
}

impl AssessmentState {
    fn new(budget_secs: Option<u32>) -> Self {
        Self {
            phase: LoadPhase::Idle,
            session: None,
            stages: StageController::new(0),
            knowledge: AnswerStore::new(),
            codes: AnswerStore::new(),
            countdown: budget_secs.map(Countdown::new),
            timer: None,
            liveness: None,
        }
    }

    fn load(&mut self, session: AssessmentSession, liveness: Liveness) {
        self.stages = StageController::new(session.project_tasks().len());
        for (index, task) in session.project_tasks().iter().enumerate() {
            self.codes.set(index, task.starter_code.clone());
        }
        self.session = Some(session);
        self.liveness = Some(liveness);
        self.phase = LoadPhase::Ready;
    }

    fn cancel_timer(&mut self) {
        if let Some(countdown) = self.countdown.as_mut() {
            countdown.cancel();
        }
        if let Some(timer) = self.timer.take() {
            timer.cancel();
        }
    }

    fn in_progress_session(&self) -> Result<&AssessmentSession, RunnerError> {
        let session = self.session.as_ref().ok_or(RunnerError::NotReady)?;
        if !session.status().is_in_progress() || self.stages.stage() == Stage::Completed {
            return Err(RunnerError::Completed);
        }
        Ok(session)
    }

    fn tick(&mut self) -> Tick {
        self.countdown.as_mut().map_or(Tick::Stopped, Countdown::tick)
    }
}

struct Inner {
    api: Arc<dyn PracticeApi>,
    clock: Clock,
    config: RunnerConfig,
    fetcher: SessionFetcher,
    gateway: SubmissionGateway,
    lifecycle: Lifecycle,
    state: Mutex<AssessmentState>,
}

impl Inner {
    fn state(&self) -> MutexGuard<'_, AssessmentState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn fresh_state(&self) -> AssessmentState {
        AssessmentState::new(self.config.assessment_budget_secs)
    }
}

/// Two-stage assessment: knowledge questions, then project tasks, then one submission.
#[derive(Clone)]
pub struct AssessmentRunner {
    inner: Arc<Inner>,
}

impl AssessmentRunner {
    #[must_use]
    pub fn new(
        api: Arc<dyn PracticeApi>,
        shell: Arc<dyn Shell>,
        clock: Clock,
        config: RunnerConfig,
    ) -> Self {
        let gateway = SubmissionGateway::new(
            Arc::clone(&shell),
            MESSAGES,
            Route::Profile,
            config.assessment_redirect_delay,
        );
        let fetcher = SessionFetcher::new(Arc::clone(&api), shell);
        let state = AssessmentState::new(config.assessment_budget_secs);
        Self {
            inner: Arc::new(Inner {
                api,
                clock,
                config,
                fetcher,
                gateway,
                lifecycle: Lifecycle::new(),
                state: Mutex::new(state),
            }),
        }
    }

    /// Load the assessment and seed every task's code with its starter code.
    ///
    /// # Errors
    ///
    /// Returns `RunnerError::InvalidSessionId`, `RunnerError::Load` or
    /// `RunnerError::Superseded`, as `InterviewRunner::start` does.
    pub async fn start(&self, raw_id: &str) -> Result<(), RunnerError> {
        let liveness = self.inner.lifecycle.begin();
        *self.inner.state() = self.inner.fresh_state();

        let id = self
            .inner
            .fetcher
            .parse_id(raw_id, Route::AssessmentTopics)?;
        self.inner.state().phase = LoadPhase::Loading;
        info!(session = %id, "loading assessment");

        let loaded = self.inner.fetcher.assessment(&id, &liveness).await;

        let mut state = self.inner.state();
        if !liveness.is_live() {
            return Err(RunnerError::Superseded);
        }
        let session = match loaded {
            Ok(session) => session,
            Err(err) => {
                state.phase = LoadPhase::Failed;
                return Err(err);
            }
        };

        let in_progress = session.status().is_in_progress();
        if !in_progress {
            debug!("assessment already completed");
        }
        state.load(session, liveness.clone());
        if !in_progress {
            if state.stages.mark_completed().is_err() {
                debug!("stage already completed");
            }
            return Ok(());
        }
        self.start_timer(&mut state, liveness);
        Ok(())
    }

    pub fn stop(&self) {
        self.inner.lifecycle.invalidate();
        let mut state = self.inner.state();
        state.cancel_timer();
        *state = self.inner.fresh_state();
        debug!("assessment runner stopped");
    }

    fn start_timer(&self, state: &mut AssessmentState, liveness: Liveness) {
        let Some(countdown) = state.countdown.as_mut() else {
            return;
        };
        if countdown.start() == Tick::Expired {
            spawn_forced_submission(Arc::clone(&self.inner));
            return;
        }
        info!(budget = countdown.budget(), "assessment timer started");
        state.timer = Some(CountdownTask::spawn_bound(
            &self.inner,
            liveness,
            self.inner.config.tick,
            |inner: &Inner| inner.state().tick(),
            spawn_forced_submission,
        ));
    }

    /// # Errors
    ///
    /// Returns `RunnerError::NoSuchQuestion` for an index past the last knowledge
    /// question, or `RunnerError::NotReady`/`RunnerError::Completed` outside a live session.
    pub fn set_knowledge_answer(
        &self,
        index: usize,
        value: impl Into<String>,
    ) -> Result<(), RunnerError> {
        let mut state = self.inner.state();
        let total = state.in_progress_session()?.knowledge_questions().len();
        if index >= total {
            return Err(RunnerError::NoSuchQuestion(index));
        }
        state.knowledge.set(index, value);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `RunnerError::NoSuchQuestion` for an index past the last task, or
    /// `RunnerError::NotReady`/`RunnerError::Completed` outside a live session.
    pub fn set_project_code(&self, index: usize, code: impl Into<String>) -> Result<(), RunnerError> {
        let mut state = self.inner.state();
        let total = state.in_progress_session()?.project_tasks().len();
        if index >= total {
            return Err(RunnerError::NoSuchQuestion(index));
        }
        state.codes.set(index, code);
        Ok(())
    }

    /// Replace the code of the task currently shown.
    ///
    /// # Errors
    ///
    /// Same as `set_project_code`.
    pub fn set_current_code(&self, code: impl Into<String>) -> Result<(), RunnerError> {
        let index = self.inner.state().stages.task_index();
        self.set_project_code(index, code)
    }

    #[must_use]
    pub fn knowledge_answer(&self, index: usize) -> String {
        self.inner.state().knowledge.get(index).to_owned()
    }

    #[must_use]
    pub fn project_code(&self, index: usize) -> String {
        self.inner.state().codes.get(index).to_owned()
    }

    /// # Errors
    ///
    /// Returns `RunnerError::Stage` outside the knowledge stage.
    pub fn advance_to_project(&self) -> Result<(), RunnerError> {
        let mut state = self.inner.state();
        state.in_progress_session()?;
        state.stages.advance_to_project()?;
        info!("assessment moved to project stage");
        Ok(())
    }

    pub fn previous_task(&self) -> bool {
        self.inner.state().stages.previous_task()
    }

    pub fn next_task(&self) -> bool {
        self.inner.state().stages.next_task()
    }

    #[must_use]
    pub fn next_action(&self) -> Option<NextAction> {
        let state = self.inner.state();
        state.session.as_ref()?;
        state.stages.next_action()
    }

    #[must_use]
    pub fn stage(&self) -> Stage {
        self.inner.state().stages.stage()
    }

    #[must_use]
    pub fn status(&self) -> Option<SessionStatus> {
        self.inner.state().session.as_ref().map(AssessmentSession::status)
    }

    #[must_use]
    pub fn remaining_secs(&self) -> Option<u32> {
        self.inner.state().countdown.as_ref().map(Countdown::remaining)
    }

    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.inner.gateway.is_pending()
    }

    /// Submit from the last project task.
    ///
    /// # Errors
    ///
    /// Returns `RunnerError::SubmitUnavailable` anywhere but the last project task,
    /// and `RunnerError::Submit` when the gateway rejects or the request fails.
    pub async fn submit(&self) -> Result<(), RunnerError> {
        if !self.inner.state().stages.can_submit() {
            return Err(RunnerError::SubmitUnavailable);
        }
        submit_with(&self.inner, Trigger::User).await
    }

    #[must_use]
    pub fn view(&self) -> AssessmentView {
        let state = self.inner.state();
        let session = state.session.as_ref();
        let task_index = state.stages.task_index();
        let knowledge = session
            .map(|session| {
                session
                    .knowledge_questions()
                    .iter()
                    .enumerate()
                    .map(|(index, question)| {
                        (question.clone(), state.knowledge.get(index).to_owned())
                    })
                    .collect()
            })
            .unwrap_or_default();
        AssessmentView {
            phase: state.phase,
            topic: session.map(|s| s.topic().to_owned()).unwrap_or_default(),
            stage: state.stages.stage(),
            knowledge,
            task_index,
            task_count: state.stages.task_count(),
            task: session.and_then(|s| s.project_tasks().get(task_index)).cloned(),
            code: state.codes.get(task_index).to_owned(),
            next_action: session.and(state.stages.next_action()),
            remaining_secs: state.countdown.as_ref().map(Countdown::remaining),
            status: session.map(AssessmentSession::status),
            submitting: self.inner.gateway.is_pending(),
        }
    }
}

fn spawn_forced_submission(inner: Arc<Inner>) {
    info!("assessment time is up");
    tokio::spawn(async move {
        if let Err(err) = submit_with(&inner, Trigger::Timer).await {
            debug!(error = %err, "forced submission did not complete");
        }
    });
}

async fn submit_with(inner: &Arc<Inner>, trigger: Trigger) -> Result<(), RunnerError> {
    let (id, payload, liveness) = {
        let mut state = inner.state();
        let session = state.in_progress_session()?;
        let payload = AssessmentSubmission::build(session, &state.knowledge, &state.codes);
        let id = session.id().clone();
        let liveness = state.liveness.clone().ok_or(RunnerError::NotReady)?;
        state.cancel_timer();
        (id, payload, liveness)
    };

    let api = Arc::clone(&inner.api);
    inner
        .gateway
        .submit(trigger, move || async move {
            api.submit_assessment(&id, &payload).await
        })
        .await?;

    if !liveness.is_live() {
        debug!("assessment accepted after the runner stopped");
        return Ok(());
    }
    {
        let mut state = inner.state();
        if let Err(err) = state.stages.mark_completed() {
            warn!(error = %err, "stage was already completed");
        }
        let now = inner.clock.now();
        if let Some(session) = state.session.as_mut() {
            session.mark_completed(now);
        }
    }
    inner.gateway.schedule_redirect(liveness);
    Ok(())
}

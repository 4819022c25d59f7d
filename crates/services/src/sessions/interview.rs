use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info};

use learn_core::model::{
    AnswerStore, InterviewQuestion, InterviewSession, InterviewSubmission, NextAction,
    PageCursor, SessionStatus,
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
    loading: "Submitting your answers for evaluation...",
    success: "Interview completed! Redirecting to your profile...",
    failure: "Failed to submit interview.",
    timer_failure: "Time is up, but your interview could not be submitted. Please try again.",
};

//
// ─── VIEW ──────────────────────────────────────────────────────────────────────
//

/// Everything a renderer needs to draw the interview screen.
#[derive(Debug, Clone, PartialEq)]
pub struct InterviewView {
    pub phase: LoadPhase,
    pub topic: String,
    pub index: usize,
    pub total: usize,
    pub question: Option<InterviewQuestion>,
    pub answer: String,
    pub remaining_secs: u32,
    pub timer_label: String,
    pub timer_urgent: bool,
    pub status: Option<SessionStatus>,
    pub can_go_previous: bool,
    pub next_action: Option<NextAction>,
    pub submitting: bool,
}

//
// ─── STATE ─────────────────────────────────────────────────────────────────────
//

struct InterviewState {
    phase: LoadPhase,
    session: Option<InterviewSession>,
    answers: AnswerStore,
    cursor: PageCursor,
    countdown: Countdown,
    timer: Option<CountdownTask>,
    liveness: Option<Liveness>,
}

impl InterviewState {
    fn new(budget_secs: u32) -> Self {
        Self {
            phase: LoadPhase::Idle,
            session: None,
            answers: AnswerStore::new(),
            cursor: PageCursor::default(),
            countdown: Countdown::new(budget_secs),
            timer: None,
            liveness: None,
        }
    }

    fn cancel_timer(&mut self) {
        self.countdown.cancel();
        if let Some(timer) = self.timer.take() {
            timer.cancel();
        }
    }

    fn in_progress_session(&self) -> Result<&InterviewSession, RunnerError> {
        let session = self.session.as_ref().ok_or(RunnerError::NotReady)?;
        if !session.status().is_in_progress() {
            return Err(RunnerError::Completed);
        }
        Ok(session)
    }

    fn displayed_answer(&self, index: usize) -> String {
        let starter = self
            .session
            .as_ref()
            .and_then(|session| session.question(index))
            .and_then(|question| question.starter_code.as_deref())
            .unwrap_or("");
        self.answers.get_or(index, starter).to_owned()
    }
}

struct Inner {
    api: Arc<dyn PracticeApi>,
    clock: Clock,
    config: RunnerConfig,
    fetcher: SessionFetcher,
    gateway: SubmissionGateway,
    lifecycle: Lifecycle,
    state: Mutex<InterviewState>,
}

impl Inner {
    fn state(&self) -> MutexGuard<'_, InterviewState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

//
// ─── RUNNER ────────────────────────────────────────────────────────────────────
//

/// Timed interview: load, answer per question index, submit once.
///
/// The owning shell calls `start` when the view opens and `stop` when it goes away.
#[derive(Clone)]
pub struct InterviewRunner {
    inner: Arc<Inner>,
}

impl InterviewRunner {
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
            config.interview_redirect_delay,
        );
        let fetcher = SessionFetcher::new(Arc::clone(&api), shell);
        let state = InterviewState::new(config.interview_budget_secs);
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

    /// Load the session behind `raw_id` and start the countdown.
    ///
    /// Discards any state from a previous start.
    ///
    /// # Errors
    ///
    /// Returns `RunnerError::InvalidSessionId` before any network call for a bad id,
    /// `RunnerError::Load` when the fetch fails, and `RunnerError::Superseded` when
    /// `stop` or another `start` ran while the fetch was in flight.
    pub async fn start(&self, raw_id: &str) -> Result<(), RunnerError> {
        let liveness = self.inner.lifecycle.begin();
        *self.inner.state() = InterviewState::new(self.inner.config.interview_budget_secs);

        let id = self
            .inner
            .fetcher
            .parse_id(raw_id, Route::InterviewTopics)?;
        self.inner.state().phase = LoadPhase::Loading;
        info!(session = %id, "loading interview");

        let loaded = self.inner.fetcher.interview(&id, &liveness).await;

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
        state.cursor = PageCursor::new(session.questions().len());
        state.session = Some(session);
        state.liveness = Some(liveness.clone());
        state.phase = LoadPhase::Ready;
        if in_progress {
            self.start_timer(&mut state, liveness);
        }
        Ok(())
    }

    /// Cancel the countdown and drop whatever is still in flight.
    pub fn stop(&self) {
        self.inner.lifecycle.invalidate();
        let mut state = self.inner.state();
        state.cancel_timer();
        *state = InterviewState::new(self.inner.config.interview_budget_secs);
        debug!("interview runner stopped");
    }

    fn start_timer(&self, state: &mut InterviewState, liveness: Liveness) {
        if state.countdown.start() == Tick::Expired {
            spawn_forced_submission(Arc::clone(&self.inner));
            return;
        }
        info!(budget = state.countdown.budget(), "interview timer started");
        state.timer = Some(CountdownTask::spawn_bound(
            &self.inner,
            liveness,
            self.inner.config.tick,
            |inner: &Inner| inner.state().countdown.tick(),
            spawn_forced_submission,
        ));
    }

    /// Replace the answer stored for question `index`.
    ///
    /// # Errors
    ///
    /// Returns `RunnerError::NotReady` before load, `RunnerError::NoSuchQuestion`
    /// for an index past the last question, and `RunnerError::Completed` after submission.
    pub fn set_answer(&self, index: usize, value: impl Into<String>) -> Result<(), RunnerError> {
        let mut state = self.inner.state();
        let total = state.in_progress_session()?.questions().len();
        if index >= total {
            return Err(RunnerError::NoSuchQuestion(index));
        }
        state.answers.set(index, value);
        Ok(())
    }

    /// Replace the answer of the question currently shown.
    ///
    /// # Errors
    ///
    /// Same as `set_answer`.
    pub fn set_current_answer(&self, value: impl Into<String>) -> Result<(), RunnerError> {
        let index = self.current_index();
        self.set_answer(index, value)
    }

    /// Stored answer for `index`, empty when untouched.
    #[must_use]
    pub fn answer(&self, index: usize) -> String {
        self.inner.state().answers.get(index).to_owned()
    }

    /// What the editor shows: the stored answer, or the starter code until first edit.
    #[must_use]
    pub fn displayed_answer(&self, index: usize) -> String {
        self.inner.state().displayed_answer(index)
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.inner.state().cursor.index()
    }

    pub fn previous(&self) -> bool {
        self.inner.state().cursor.previous()
    }

    pub fn next(&self) -> bool {
        self.inner.state().cursor.next()
    }

    #[must_use]
    pub fn next_action(&self) -> Option<NextAction> {
        let state = self.inner.state();
        state.in_progress_session().ok()?;
        Some(if state.cursor.is_last() {
            NextAction::Submit
        } else {
            NextAction::Next
        })
    }

    #[must_use]
    pub fn remaining_secs(&self) -> u32 {
        self.inner.state().countdown.remaining()
    }

    #[must_use]
    pub fn status(&self) -> Option<SessionStatus> {
        self.inner.state().session.as_ref().map(InterviewSession::status)
    }

    #[must_use]
    pub fn session(&self) -> Option<InterviewSession> {
        self.inner.state().session.clone()
    }

    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.inner.gateway.is_pending()
    }

    /// Submit on the user's behalf.
    ///
    /// # Errors
    ///
    /// Returns `RunnerError::Submit` with `SubmitError::InFlight` while another
    /// submission is pending, or with `SubmitError::Api` when the request fails.
    pub async fn submit(&self) -> Result<(), RunnerError> {
        submit_with(&self.inner, Trigger::User).await
    }

    #[must_use]
    pub fn view(&self) -> InterviewView {
        let state = self.inner.state();
        let index = state.cursor.index();
        let session = state.session.as_ref();
        let in_progress = session.is_some_and(|session| session.status().is_in_progress());
        InterviewView {
            phase: state.phase,
            topic: session.map(|s| s.topic().to_owned()).unwrap_or_default(),
            index,
            total: state.cursor.len(),
            question: session.and_then(|s| s.question(index)).cloned(),
            answer: state.displayed_answer(index),
            remaining_secs: state.countdown.remaining(),
            timer_label: state.countdown.label(),
            timer_urgent: state.countdown.is_urgent(),
            status: session.map(InterviewSession::status),
            can_go_previous: !state.cursor.is_first(),
            next_action: in_progress.then(|| {
                if state.cursor.is_last() {
                    NextAction::Submit
                } else {
                    NextAction::Next
                }
            }),
            submitting: self.inner.gateway.is_pending(),
        }
    }
}

impl fmt::Debug for InterviewRunner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state();
        f.debug_struct("InterviewRunner")
            .field("phase", &state.phase)
            .field("session", &state.session.as_ref().map(InterviewSession::id))
            .field("answered", &state.answers.touched_count())
            .field("remaining_secs", &state.countdown.remaining())
            .finish_non_exhaustive()
    }
}

fn spawn_forced_submission(inner: Arc<Inner>) {
    info!("interview time is up");
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
        let payload = InterviewSubmission::build(session, &state.answers);
        let id = session.id().clone();
        let liveness = state.liveness.clone().ok_or(RunnerError::NotReady)?;
        state.cancel_timer();
        (id, payload, liveness)
    };

    let api = Arc::clone(&inner.api);
    inner
        .gateway
        .submit(trigger, move || async move {
            api.submit_interview(&id, &payload).await
        })
        .await?;

    if !liveness.is_live() {
        debug!("interview accepted after the runner stopped");
        return Ok(());
    }
    if let Some(session) = inner.state().session.as_mut() {
        session.mark_completed(inner.clock.now());
    }
    inner.gateway.schedule_redirect(liveness);
    Ok(())
}

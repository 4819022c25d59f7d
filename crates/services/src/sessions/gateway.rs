use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::error::{ApiError, SubmitError};
use crate::shell::{Notice, Route, Shell};

use super::PendingGuard;
use super::lifecycle::Liveness;

/// Who asked for the submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    User,
    /// Forced by countdown expiry.
    Timer,
}

/// Notice texts for one kind of session.
#[derive(Debug, Clone, Copy)]
pub(crate) struct GatewayMessages {
    pub loading: &'static str,
    pub success: &'static str,
    pub failure: &'static str,
    pub timer_failure: &'static str,
}

/// Sends one session's answers, at most one request at a time.
pub(crate) struct SubmissionGateway {
    shell: Arc<dyn Shell>,
    pending: AtomicBool,
    messages: GatewayMessages,
    redirect: Route,
    redirect_delay: Duration,
}

impl SubmissionGateway {
    pub(crate) fn new(
        shell: Arc<dyn Shell>,
        messages: GatewayMessages,
        redirect: Route,
        redirect_delay: Duration,
    ) -> Self {
        Self {
            shell,
            pending: AtomicBool::new(false),
            messages,
            redirect,
            redirect_delay,
        }
    }

    pub(crate) fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }

    /// Run `send` unless another submission is still pending.
    ///
    /// # Errors
    ///
    /// Returns `SubmitError::InFlight` without calling `send` while a request is pending,
    /// or `SubmitError::Api` when the request fails.
    pub(crate) async fn submit<F, Fut>(&self, trigger: Trigger, send: F) -> Result<(), SubmitError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<(), ApiError>>,
    {
        let Some(_pending) = PendingGuard::acquire(&self.pending) else {
            debug!(?trigger, "submission already in flight");
            return Err(SubmitError::InFlight);
        };

        info!(?trigger, "submitting answers");
        self.shell.notify(Notice::loading(self.messages.loading));
        match send().await {
            Ok(()) => {
                info!(?trigger, "submission accepted");
                self.shell.notify(Notice::success(self.messages.success));
                Ok(())
            }
            Err(err) => {
                warn!(?trigger, error = %err, "submission failed");
                let message = match trigger {
                    Trigger::User => self.messages.failure,
                    Trigger::Timer => self.messages.timer_failure,
                };
                self.shell.notify(Notice::error(message));
                Err(err.into())
            }
        }
    }

    /// Navigate to the results view after the confirmation delay, unless the
    /// session was stopped in the meantime.
    pub(crate) fn schedule_redirect(&self, liveness: Liveness) {
        let shell = Arc::clone(&self.shell);
        let route = self.redirect.clone();
        let delay = self.redirect_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if liveness.is_live() {
                shell.navigate(route);
            } else {
                debug!(%route, "session stopped before redirect");
            }
        });
    }
}

//! Session runners and the plumbing they share.
//!
//! A runner owns one session's local state between an explicit `start` and
//! `stop`. Network results and timer ticks that arrive after `stop` are dropped.

mod assessment;
mod countdown;
mod fetcher;
mod gateway;
mod interview;
mod lifecycle;
mod starter;

use std::sync::atomic::{AtomicBool, Ordering};

pub use assessment::{AssessmentRunner, AssessmentView};
pub use gateway::Trigger;
pub use interview::{InterviewRunner, InterviewView};
pub use lifecycle::{Lifecycle, Liveness};
pub use starter::SessionStarter;

/// Where a runner is between `start` and a usable snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadPhase {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed,
}

/// Holds a busy flag for as long as it lives.
pub(crate) struct PendingGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> PendingGuard<'a> {
    /// `None` when the flag is already held.
    pub(crate) fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

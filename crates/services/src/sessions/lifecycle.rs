use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Epoch counter standing in for a view's mount/unmount cycle.
///
/// `begin` hands out a `Liveness` for the new epoch; `invalidate` (or another
/// `begin`) makes every earlier `Liveness` report stale.
#[derive(Debug, Clone, Default)]
pub struct Lifecycle {
    epoch: Arc<AtomicU64>,
}

impl Lifecycle {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self) -> Liveness {
        let at = self.epoch.fetch_add(1, Ordering::AcqRel) + 1;
        Liveness {
            epoch: Arc::clone(&self.epoch),
            at,
        }
    }

    pub fn invalidate(&self) {
        self.epoch.fetch_add(1, Ordering::AcqRel);
    }
}

/// Whether results for one epoch may still touch state.
#[derive(Debug, Clone)]
pub struct Liveness {
    epoch: Arc<AtomicU64>,
    at: u64,
}

impl Liveness {
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.epoch.load(Ordering::Acquire) == self.at
    }
}

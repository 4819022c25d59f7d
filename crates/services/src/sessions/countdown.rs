use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{self, Instant};

use learn_core::Tick;

use super::lifecycle::Liveness;

/// Repeating timer task feeding a `Countdown`. Aborted on `cancel` or drop.
#[derive(Debug)]
pub(crate) struct CountdownTask {
    handle: JoinHandle<()>,
}

impl CountdownTask {
    /// Call `tick` every `period`; call `on_expire` once when it reports `Expired`.
    ///
    /// The task ends on `Expired` or `Stopped`.
    pub(crate) fn spawn<T, E>(period: Duration, mut tick: T, on_expire: E) -> Self
    where
        T: FnMut() -> Tick + Send + 'static,
        E: FnOnce() + Send + 'static,
    {
        let period = period.max(Duration::from_millis(1));
        let handle = tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            loop {
                interval.tick().await;
                match tick() {
                    Tick::Running { .. } => {}
                    Tick::Expired => {
                        on_expire();
                        break;
                    }
                    Tick::Stopped => break,
                }
            }
        });
        Self { handle }
    }

    /// Same as `spawn`, but bound to an owner held weakly and to a liveness epoch.
    ///
    /// Ticks stop once the owner is dropped or the epoch goes stale.
    pub(crate) fn spawn_bound<S, T, E>(
        owner: &Arc<S>,
        liveness: Liveness,
        period: Duration,
        tick: T,
        on_expire: E,
    ) -> Self
    where
        S: Send + Sync + 'static,
        T: Fn(&S) -> Tick + Send + 'static,
        E: FnOnce(Arc<S>) + Send + 'static,
    {
        let tick_owner = Arc::downgrade(owner);
        let expire_owner = Arc::downgrade(owner);
        Self::spawn(
            period,
            move || match tick_owner.upgrade() {
                Some(owner) if liveness.is_live() => tick(&owner),
                _ => Tick::Stopped,
            },
            move || {
                if let Some(owner) = expire_owner.upgrade() {
                    on_expire(owner);
                }
            },
        )
    }

    pub(crate) fn cancel(&self) {
        self.handle.abort();
    }
}

impl Drop for CountdownTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use learn_core::Countdown;

    use crate::sessions::lifecycle::Lifecycle;

    #[tokio::test(start_paused = true)]
    async fn expires_once_after_budget_ticks() {
        let countdown = Arc::new(Mutex::new(Countdown::new(3)));
        countdown.lock().unwrap().start();
        let expired = Arc::new(AtomicUsize::new(0));

        let tick_state = Arc::clone(&countdown);
        let expired_count = Arc::clone(&expired);
        let _task = CountdownTask::spawn(
            Duration::from_secs(1),
            move || tick_state.lock().unwrap().tick(),
            move || {
                expired_count.fetch_add(1, Ordering::SeqCst);
            },
        );

        time::sleep(Duration::from_millis(2_500)).await;
        assert_eq!(countdown.lock().unwrap().remaining(), 1);
        assert_eq!(expired.load(Ordering::SeqCst), 0);

        time::sleep(Duration::from_secs(10)).await;
        assert_eq!(countdown.lock().unwrap().remaining(), 0);
        assert_eq!(expired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_stops_ticks() {
        let ticks = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&ticks);
        let task = CountdownTask::spawn(
            Duration::from_secs(1),
            move || {
                counter.fetch_add(1, Ordering::SeqCst);
                Tick::Running { remaining: 99 }
            },
            || {},
        );

        time::sleep(Duration::from_millis(2_500)).await;
        task.cancel();
        let seen = ticks.load(Ordering::SeqCst);
        time::sleep(Duration::from_secs(5)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), seen);
        assert_eq!(seen, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn stale_liveness_stops_bound_timer() {
        let lifecycle = Lifecycle::new();
        let owner = Arc::new(AtomicUsize::new(0));
        let _task = CountdownTask::spawn_bound(
            &owner,
            lifecycle.begin(),
            Duration::from_secs(1),
            |ticks: &AtomicUsize| {
                ticks.fetch_add(1, Ordering::SeqCst);
                Tick::Running { remaining: 1 }
            },
            |_| {},
        );

        time::sleep(Duration::from_millis(1_500)).await;
        lifecycle.invalidate();
        time::sleep(Duration::from_secs(5)).await;
        assert_eq!(owner.load(Ordering::SeqCst), 1);
    }
}

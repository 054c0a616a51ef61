//! Observable poller - a continuously-refreshed value over an async producer
//!
//! The remote store offers no push channel; the only way to observe it is
//! to ask again. [`Poller`] wraps a one-shot asynchronous fetch into a
//! live value: it re-invokes the producer on a fixed interval and on
//! demand, and publishes each resolution through a `watch` channel.
//!
//! ## Flow
//!
//! ```text
//! interval tick ──┐
//! dependency ─────┼──► poll task ──► producer().await ──► snapshot watch
//! refetch() ──────┘        │
//!                   CancellationToken
//! ```
//!
//! ## Discipline
//!
//! - Interval refreshes run only while every gating condition is true;
//!   while any gate is false the value stays frozen at its last
//!   resolution (it never resets to the default).
//! - A dependency change triggers one immediate out-of-cycle refresh and
//!   resets the interval timer. Dependency values are compared, so
//!   re-publishing an equal value does not trigger anything.
//! - `refetch()` forces an immediate refresh regardless of timer phase
//!   and of gating; it exists to make a completed write visible.
//! - At most one producer invocation is in flight. A refetch requested
//!   while one is in flight is satisfied by that invocation's result; a
//!   dependency change during flight defers into one follow-up
//!   invocation.
//! - Resolutions apply in resolution order: a resolution superseded by an
//!   already-applied later one is discarded, never overwriting it.
//! - A failed invocation keeps the previous value (stale-but-available)
//!   and raises the `failed` flag instead of surfacing an error to the
//!   rendering path.

use std::future::Future;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// The poller's published state: the latest value plus freshness bookkeeping
#[derive(Debug, Clone)]
pub struct PollSnapshot<T> {
    /// Latest resolved value, or the default before the first resolution
    pub value: T,
    /// True when the most recent completed invocation failed
    pub failed: bool,
    /// Completed invocations (successes, failures and discarded stale
    /// resolutions alike)
    pub attempts: u64,
    /// Applied successful resolutions
    pub resolutions: u64,
    /// Issuance sequence of the last applied resolution
    applied_seq: u64,
}

impl<T> PollSnapshot<T> {
    fn initial(value: T) -> Self {
        Self {
            value,
            failed: false,
            attempts: 0,
            resolutions: 0,
            applied_seq: 0,
        }
    }
}

/// Applies one completed invocation to the published snapshot
///
/// `seq` is the invocation's issuance sequence. A successful resolution
/// older than one already applied is discarded (last-resolved-wins); a
/// failure never clobbers the value, only the `failed` flag.
fn apply_resolution<T>(
    snapshot: &watch::Sender<PollSnapshot<T>>,
    name: &str,
    seq: u64,
    result: anyhow::Result<T>,
) {
    snapshot.send_modify(|snap| {
        snap.attempts += 1;
        if seq < snap.applied_seq {
            debug!(poller = name, seq, applied = snap.applied_seq, "Discarding stale resolution");
            return;
        }
        match result {
            Ok(value) => {
                snap.value = value;
                snap.failed = false;
                snap.resolutions += 1;
                snap.applied_seq = seq;
            }
            Err(error) => {
                // Keep the last good value on failure; the consumer sees
                // a stale-but-available snapshot with the flag raised.
                warn!(poller = name, error = %format!("{error:#}"), "Poll failed, keeping previous value");
                snap.failed = true;
            }
        }
    });
}

type DepSpawn = Box<dyn FnOnce(watch::Sender<u64>, CancellationToken) + Send>;

/// Builder for a [`Poller`]
pub struct PollerBuilder<T, F> {
    name: String,
    producer: F,
    default: T,
    interval: Duration,
    gates: Vec<watch::Receiver<bool>>,
    dep_spawns: Vec<DepSpawn>,
}

impl<T, F, Fut> PollerBuilder<T, F>
where
    T: Clone + Send + Sync + 'static,
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = anyhow::Result<T>> + Send,
{
    /// Sets the automatic refresh interval (default one second)
    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Adds a gating condition
    ///
    /// Automatic refreshes run only while every added gate reads true.
    pub fn gate(mut self, gate: watch::Receiver<bool>) -> Self {
        self.gates.push(gate);
        self
    }

    /// Adds a dependency signal
    ///
    /// Whenever the observed value changes (by comparison, not by
    /// publication), the poller refreshes immediately and resets its
    /// interval timer.
    pub fn dependency<D>(mut self, mut rx: watch::Receiver<D>) -> Self
    where
        D: Clone + PartialEq + Send + Sync + 'static,
    {
        self.dep_spawns.push(Box::new(move |signal, token| {
            tokio::spawn(async move {
                let mut last = rx.borrow().clone();
                loop {
                    tokio::select! {
                        _ = token.cancelled() => break,
                        changed = rx.changed() => {
                            if changed.is_err() {
                                break;
                            }
                            let current = rx.borrow_and_update().clone();
                            if current != last {
                                last = current;
                                signal.send_modify(|n| *n += 1);
                            }
                        }
                    }
                }
            });
        }));
        self
    }

    /// Spawns the poll task and returns the handle
    ///
    /// The first refresh is issued immediately (gates permitting). The
    /// task stops when the returned [`Poller`] is dropped.
    pub fn spawn(self) -> Poller<T> {
        let token = CancellationToken::new();
        let (request_tx, request_rx) = watch::channel(0u64);
        let (dep_tx, dep_rx) = watch::channel(0u64);
        for spawn_dep in self.dep_spawns {
            spawn_dep(dep_tx.clone(), token.clone());
        }

        let (snapshot_tx, snapshot_rx) = watch::channel(PollSnapshot::initial(self.default));

        let task_token = token.clone();
        let gates = self.gates;
        let mut producer = self.producer;
        let name = self.name;
        let interval = self.interval;
        let mut manual_rx = request_rx;
        let mut dep_rx = dep_rx;

        tokio::spawn(async move {
            // Held so the dependency arm stays live even with no
            // dependencies registered.
            let _dep_tx = dep_tx;

            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut seq: u64 = 0;

            debug!(poller = %name, interval_ms = interval.as_millis() as u64, "Poller started");

            loop {
                tokio::select! {
                    _ = task_token.cancelled() => break,

                    // Automatic refresh, gated.
                    _ = ticker.tick() => {
                        if gates_open(&gates) {
                            seq += 1;
                            let result = producer().await;
                            apply_resolution(&snapshot_tx, &name, seq, result);
                            // Refetches that raced this invocation are
                            // satisfied by its result.
                            manual_rx.borrow_and_update();
                        }
                    }

                    // Manual refetch: out of cycle, ignores gates.
                    changed = manual_rx.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        seq += 1;
                        let result = producer().await;
                        apply_resolution(&snapshot_tx, &name, seq, result);
                        manual_rx.borrow_and_update();
                        ticker.reset();
                    }

                    // Dependency change: immediate refresh, gated.
                    changed = dep_rx.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        dep_rx.borrow_and_update();
                        if gates_open(&gates) {
                            seq += 1;
                            let result = producer().await;
                            apply_resolution(&snapshot_tx, &name, seq, result);
                            manual_rx.borrow_and_update();
                            ticker.reset();
                        }
                    }
                }
            }

            debug!(poller = %name, "Poller stopped");
        });

        Poller {
            snapshot: snapshot_rx,
            requests: request_tx,
            token,
        }
    }
}

fn gates_open(gates: &[watch::Receiver<bool>]) -> bool {
    gates.iter().all(|gate| *gate.borrow())
}

/// Handle to a spawned poll task
///
/// Dropping the handle cancels the task and its dependency forwarders.
pub struct Poller<T> {
    snapshot: watch::Receiver<PollSnapshot<T>>,
    requests: watch::Sender<u64>,
    token: CancellationToken,
}

impl<T> Poller<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Starts building a poller around `producer`
    ///
    /// `default` is published until the first resolution; `name` labels
    /// the task in log output.
    pub fn builder<F, Fut>(name: impl Into<String>, default: T, producer: F) -> PollerBuilder<T, F>
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = anyhow::Result<T>> + Send,
    {
        PollerBuilder {
            name: name.into(),
            producer,
            default,
            interval: Duration::from_secs(1),
            gates: Vec::new(),
            dep_spawns: Vec::new(),
        }
    }

    /// The latest published snapshot
    pub fn latest(&self) -> PollSnapshot<T> {
        self.snapshot.borrow().clone()
    }

    /// The latest value (default before the first resolution)
    pub fn value(&self) -> T {
        self.snapshot.borrow().value.clone()
    }

    /// A receiver observing every published snapshot
    pub fn subscribe(&self) -> watch::Receiver<PollSnapshot<T>> {
        self.snapshot.clone()
    }

    /// Forces an immediate refresh, regardless of timer phase or gating
    pub fn refetch(&self) {
        self.requests.send_modify(|n| *n += 1);
    }

    /// Forces a refresh and waits until an invocation has completed
    ///
    /// If an invocation is already in flight, its completion satisfies
    /// the wait - the request coalesces into it.
    pub async fn refetch_and_wait(&self) {
        let mut rx = self.snapshot.clone();
        let seen = rx.borrow().attempts;
        self.requests.send_modify(|n| *n += 1);
        while rx.changed().await.is_ok() {
            if rx.borrow().attempts > seen {
                break;
            }
        }
    }
}

impl<T> Drop for Poller<T> {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    use super::*;

    /// Producer counting its invocations and resolving to the count
    fn counting_producer() -> (
        Arc<AtomicU64>,
        impl FnMut() -> std::pin::Pin<Box<dyn Future<Output = anyhow::Result<u64>> + Send>> + Send,
    ) {
        let count = Arc::new(AtomicU64::new(0));
        let counter = count.clone();
        let producer = move || {
            let counter = counter.clone();
            Box::pin(async move { Ok(counter.fetch_add(1, Ordering::SeqCst) + 1) })
                as std::pin::Pin<Box<dyn Future<Output = anyhow::Result<u64>> + Send>>
        };
        (count, producer)
    }

    #[tokio::test(start_paused = true)]
    async fn test_polls_immediately_and_then_at_interval() {
        let (count, producer) = counting_producer();
        let poller = Poller::builder("test", 0u64, producer)
            .interval(Duration::from_secs(1))
            .spawn();

        tokio::time::sleep(Duration::from_millis(3100)).await;

        // t=0, 1s, 2s, 3s
        assert_eq!(count.load(Ordering::SeqCst), 4);
        assert_eq!(poller.value(), 4);
        assert_eq!(poller.latest().resolutions, 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_closed_gate_means_no_invocations_and_frozen_value() {
        let (gate_tx, gate_rx) = watch::channel(false);
        let (count, producer) = counting_producer();
        let poller = Poller::builder("test", 0u64, producer)
            .interval(Duration::from_secs(1))
            .gate(gate_rx)
            .spawn();

        tokio::time::sleep(Duration::from_secs(30)).await;

        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert_eq!(poller.value(), 0);
        assert_eq!(poller.latest().attempts, 0);
        drop(gate_tx);
    }

    #[tokio::test(start_paused = true)]
    async fn test_gate_reopening_resumes_interval_refreshes() {
        let (gate_tx, gate_rx) = watch::channel(false);
        let (count, producer) = counting_producer();
        let _poller = Poller::builder("test", 0u64, producer)
            .interval(Duration::from_secs(1))
            .gate(gate_rx)
            .spawn();

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);

        gate_tx.send(true).unwrap();
        tokio::time::sleep(Duration::from_millis(1100)).await;

        assert!(count.load(Ordering::SeqCst) >= 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_closing_a_gate_freezes_the_last_resolution() {
        let (gate_tx, gate_rx) = watch::channel(true);
        let (count, producer) = counting_producer();
        let poller = Poller::builder("test", 0u64, producer)
            .interval(Duration::from_secs(1))
            .gate(gate_rx)
            .spawn();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);

        gate_tx.send(false).unwrap();
        let frozen_at = count.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_secs(30)).await;

        // Idle, not reset: the value stays at its last resolution.
        assert_eq!(count.load(Ordering::SeqCst), frozen_at);
        assert_eq!(poller.value(), frozen_at);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dependency_change_triggers_exactly_one_extra_invocation() {
        let (dep_tx, dep_rx) = watch::channel("/".to_string());
        let (count, producer) = counting_producer();
        let _poller = Poller::builder("test", 0u64, producer)
            .interval(Duration::from_secs(60))
            .dependency(dep_rx)
            .spawn();

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);

        dep_tx.send("/Docs/".to_string()).unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(count.load(Ordering::SeqCst), 2);

        // No further invocations inside the interval window.
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_republishing_an_equal_dependency_value_does_not_trigger() {
        let (dep_tx, dep_rx) = watch::channel("/".to_string());
        let (count, producer) = counting_producer();
        let _poller = Poller::builder("test", 0u64, producer)
            .interval(Duration::from_secs(60))
            .dependency(dep_rx)
            .spawn();

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);

        dep_tx.send("/".to_string()).unwrap();
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_refetch_runs_out_of_cycle_and_resets_the_timer() {
        let (count, producer) = counting_producer();
        let poller = Poller::builder("test", 0u64, producer)
            .interval(Duration::from_secs(60))
            .spawn();

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);

        poller.refetch_and_wait().await;
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_refetch_bypasses_gating() {
        let (_gate_tx, gate_rx) = watch::channel(false);
        let (count, producer) = counting_producer();
        let poller = Poller::builder("test", 0u64, producer)
            .interval(Duration::from_secs(1))
            .gate(gate_rx)
            .spawn();

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);

        poller.refetch_and_wait().await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(poller.value(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_keeps_previous_value_and_raises_flag() {
        let step = Arc::new(AtomicU64::new(0));
        let stepper = step.clone();
        let producer = move || {
            let stepper = stepper.clone();
            Box::pin(async move {
                match stepper.fetch_add(1, Ordering::SeqCst) {
                    0 => Ok("good".to_string()),
                    1 => anyhow::bail!("transport down"),
                    _ => Ok("better".to_string()),
                }
            })
                as std::pin::Pin<Box<dyn Future<Output = anyhow::Result<String>> + Send>>
        };
        let poller = Poller::builder("test", String::new(), producer)
            .interval(Duration::from_secs(1))
            .spawn();

        tokio::time::sleep(Duration::from_millis(100)).await;
        let snap = poller.latest();
        assert_eq!(snap.value, "good");
        assert!(!snap.failed);

        tokio::time::sleep(Duration::from_secs(1)).await;
        let snap = poller.latest();
        assert_eq!(snap.value, "good");
        assert!(snap.failed);

        tokio::time::sleep(Duration::from_secs(1)).await;
        let snap = poller.latest();
        assert_eq!(snap.value, "better");
        assert!(!snap.failed);
    }

    #[test]
    fn test_superseded_resolution_is_discarded() {
        let (tx, rx) = watch::channel(PollSnapshot::initial("default".to_string()));

        // Invocation 1 is issued first but resolves after invocation 2.
        apply_resolution(&tx, "test", 2, Ok("second".to_string()));
        apply_resolution(&tx, "test", 1, Ok("first".to_string()));

        let snap = rx.borrow();
        assert_eq!(snap.value, "second");
        assert_eq!(snap.resolutions, 1);
        assert_eq!(snap.attempts, 2);
    }

    #[test]
    fn test_stale_failure_does_not_raise_the_flag_over_a_newer_success() {
        let (tx, rx) = watch::channel(PollSnapshot::initial(0u64));

        apply_resolution(&tx, "test", 3, Ok(3));
        apply_resolution(&tx, "test", 2, Err(anyhow::anyhow!("late failure")));

        let snap = rx.borrow();
        assert_eq!(snap.value, 3);
        assert!(!snap.failed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_stops_the_task() {
        let (count, producer) = counting_producer();
        let poller = Poller::builder("test", 0u64, producer)
            .interval(Duration::from_secs(1))
            .spawn();

        tokio::time::sleep(Duration::from_millis(100)).await;
        drop(poller);
        let stopped_at = count.load(Ordering::SeqCst);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(count.load(Ordering::SeqCst), stopped_at);
    }
}

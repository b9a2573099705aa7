//! Cluster health polling loop.
//!
//! # Responsibilities
//! - Request cluster health with a bounded wait
//! - Log every outcome; never stop on failure
//! - Sleep between polls and exit cleanly on shutdown
//!
//! # Design Decisions
//! - Strictly sequential: poll N+1 starts after poll N's wait and sleep
//! - Shutdown aborts the in-flight wait or the sleep
//! - Failures are enumerated (`ProbeError`), counted, and logged

use std::time::{Duration, Instant};
use tokio::time;

use crate::client::{ClusterHealth, HealthSource, ProbeError, ProbeResult};
use crate::config::PollConfig;
use crate::health::state::StatusTracker;
use crate::lifecycle::ShutdownSignal;
use crate::observability::metrics;
use crate::resilience::backoff::poll_delay;

/// Counters accumulated over a poller run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollStats {
    pub polls: u64,
    pub successes: u64,
    pub failures: u64,
    pub timeouts: u64,
    pub consecutive_failures: u32,
}

pub struct HealthPoller<S> {
    source: S,
    config: PollConfig,
    tracker: StatusTracker,
    stats: PollStats,
}

impl<S: HealthSource> HealthPoller<S> {
    pub fn new(source: S, config: PollConfig) -> Self {
        Self {
            source,
            config,
            tracker: StatusTracker::new(),
            stats: PollStats::default(),
        }
    }

    pub fn stats(&self) -> PollStats {
        self.stats
    }

    fn timeout(&self) -> Duration {
        Duration::from_millis(self.config.timeout_ms)
    }

    /// One health request bounded by the configured wait.
    pub async fn poll_once(&self) -> ProbeResult<ClusterHealth> {
        let wait = self.timeout();
        match time::timeout(wait, self.source.cluster_health()).await {
            Ok(result) => result,
            Err(_) => Err(ProbeError::Timeout(wait)),
        }
    }

    /// Poll until shutdown (or `max_polls`), returning the accumulated counters.
    pub async fn run(mut self, mut shutdown: ShutdownSignal) -> PollStats {
        let interval = Duration::from_millis(self.config.interval_ms);

        tracing::info!(
            interval_ms = self.config.interval_ms,
            timeout_ms = self.config.timeout_ms,
            max_polls = ?self.config.max_polls,
            backoff = self.config.backoff.enabled,
            "Health poller starting"
        );

        loop {
            tracing::info!("Getting cluster health...");
            let started = Instant::now();

            let outcome = tokio::select! {
                outcome = self.poll_once() => outcome,
                _ = shutdown.recv() => {
                    tracing::info!("Health poller received shutdown signal during request, exiting loop");
                    break;
                }
            };

            metrics::record_check_duration(started.elapsed());
            self.record(&outcome);

            if let Some(max) = self.config.max_polls {
                if self.stats.polls >= max {
                    tracing::info!(polls = self.stats.polls, "Poll limit reached, exiting loop");
                    break;
                }
            }

            let delay = poll_delay(interval, self.stats.consecutive_failures, &self.config.backoff);
            if delay > interval {
                tracing::debug!(
                    delay_ms = delay.as_millis() as u64,
                    consecutive_failures = self.stats.consecutive_failures,
                    "Backing off"
                );
            }

            tokio::select! {
                _ = time::sleep(delay) => {}
                _ = shutdown.recv() => {
                    tracing::info!("Health poller received shutdown signal, exiting loop");
                    break;
                }
            }
        }

        self.stats
    }

    fn record(&mut self, outcome: &ProbeResult<ClusterHealth>) {
        self.stats.polls += 1;

        match outcome {
            Ok(health) => {
                self.stats.successes += 1;
                self.stats.consecutive_failures = 0;
                tracing::info!(
                    status = %health.status,
                    cluster = %health.cluster_name,
                    nodes = health.number_of_nodes,
                    unassigned_shards = health.unassigned_shards,
                    "Got cluster health response"
                );
                metrics::record_health_check("success");
                metrics::record_cluster_status(Some(health.status));
            }
            Err(e) => {
                self.stats.failures += 1;
                self.stats.consecutive_failures = self.stats.consecutive_failures.saturating_add(1);
                if matches!(e, ProbeError::Timeout(_)) {
                    self.stats.timeouts += 1;
                }
                tracing::error!(
                    kind = e.kind(),
                    error = %e,
                    consecutive_failures = self.stats.consecutive_failures,
                    "Unable to get cluster health response"
                );
                metrics::record_health_check(e.kind());
                metrics::record_cluster_status(None);
            }
        }

        if let Some(transition) = self.tracker.observe(outcome) {
            if transition.is_degradation() {
                tracing::warn!(from = %transition.from, to = %transition.to, "Cluster health degraded");
            } else {
                tracing::info!(from = %transition.from, to = %transition.to, "Cluster health improved");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::HealthStatus;
    use crate::lifecycle::Shutdown;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::layer::{Context, SubscriberExt};
    use tracing_subscriber::Layer;

    /// Records the message of every event emitted while installed.
    #[derive(Clone, Default)]
    struct CapturedEvents(Arc<Mutex<Vec<String>>>);

    impl CapturedEvents {
        fn count(&self, message: &str) -> usize {
            self.0.lock().unwrap().iter().filter(|m| m.as_str() == message).count()
        }
    }

    struct MessageVisitor<'a>(&'a mut Option<String>);

    impl tracing::field::Visit for MessageVisitor<'_> {
        fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
            if field.name() == "message" {
                *self.0 = Some(format!("{:?}", value));
            }
        }
    }

    impl<S: tracing::Subscriber> Layer<S> for CapturedEvents {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            let mut message = None;
            event.record(&mut MessageVisitor(&mut message));
            if let Some(message) = message {
                self.0.lock().unwrap().push(message);
            }
        }
    }

    #[derive(Debug, Clone, Copy)]
    enum Step {
        Status(HealthStatus),
        Refused,
        Hang,
    }

    #[derive(Default)]
    struct Calls {
        count: AtomicU32,
        in_flight: AtomicU32,
        max_in_flight: AtomicU32,
        started_at: Mutex<Vec<time::Instant>>,
    }

    /// Replays a script of responses; the last step repeats.
    struct ScriptedSource {
        steps: Mutex<VecDeque<Step>>,
        calls: Arc<Calls>,
    }

    impl ScriptedSource {
        fn new(steps: &[Step]) -> (Self, Arc<Calls>) {
            let calls = Arc::new(Calls::default());
            let source = Self {
                steps: Mutex::new(steps.iter().copied().collect()),
                calls: calls.clone(),
            };
            (source, calls)
        }

        fn next_step(&self) -> Step {
            let mut steps = self.steps.lock().unwrap();
            if steps.len() > 1 {
                steps.pop_front().unwrap()
            } else {
                *steps.front().unwrap()
            }
        }
    }

    impl HealthSource for ScriptedSource {
        async fn cluster_health(&self) -> ProbeResult<ClusterHealth> {
            let step = self.next_step();
            self.calls.count.fetch_add(1, Ordering::SeqCst);
            self.calls.started_at.lock().unwrap().push(time::Instant::now());
            let now = self.calls.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.calls.max_in_flight.fetch_max(now, Ordering::SeqCst);

            let result = match step {
                Step::Status(status) => Ok(ClusterHealth {
                    cluster_name: "esprod".into(),
                    status,
                    timed_out: false,
                    number_of_nodes: 3,
                    number_of_data_nodes: 3,
                    active_shards: 6,
                    relocating_shards: 0,
                    initializing_shards: 0,
                    unassigned_shards: 0,
                }),
                Step::Refused => Err(ProbeError::Connection("connection refused".into())),
                Step::Hang => {
                    time::sleep(Duration::from_secs(3600)).await;
                    Err(ProbeError::Transport("unreachable".into()))
                }
            };

            self.calls.in_flight.fetch_sub(1, Ordering::SeqCst);
            result
        }
    }

    fn config(max_polls: Option<u64>) -> PollConfig {
        PollConfig {
            max_polls,
            ..PollConfig::default()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_success() {
        let (source, calls) = ScriptedSource::new(&[Step::Status(HealthStatus::Green)]);
        let shutdown = Shutdown::new();

        let stats = HealthPoller::new(source, config(Some(1)))
            .run(shutdown.subscribe())
            .await;

        assert_eq!(stats.polls, 1);
        assert_eq!(stats.successes, 1);
        assert_eq!(stats.failures, 0);
        assert_eq!(calls.count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_then_sleep_before_next_request() {
        let (source, calls) = ScriptedSource::new(&[Step::Status(HealthStatus::Green)]);
        let shutdown = Shutdown::new();

        let stats = HealthPoller::new(source, config(Some(3)))
            .run(shutdown.subscribe())
            .await;

        assert_eq!(stats.successes, 3);
        assert_eq!(calls.max_in_flight.load(Ordering::SeqCst), 1);

        let started = calls.started_at.lock().unwrap();
        assert_eq!(started.len(), 3);
        for pair in started.windows(2) {
            assert!(pair[1] - pair[0] >= Duration::from_secs(1));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_is_one_failure_and_loop_continues() {
        let (source, calls) = ScriptedSource::new(&[
            Step::Hang,
            Step::Status(HealthStatus::Yellow),
        ]);
        let shutdown = Shutdown::new();

        let stats = HealthPoller::new(source, config(Some(2)))
            .run(shutdown.subscribe())
            .await;

        assert_eq!(stats.polls, 2);
        assert_eq!(stats.failures, 1);
        assert_eq!(stats.timeouts, 1);
        assert_eq!(stats.successes, 1);
        assert_eq!(stats.consecutive_failures, 0);
        assert_eq!(calls.count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_once_reports_timeout() {
        let (source, _) = ScriptedSource::new(&[Step::Hang]);
        let poller = HealthPoller::new(source, config(None));

        let started = time::Instant::now();
        let err = poller.poll_once().await.unwrap_err();
        assert!(matches!(err, ProbeError::Timeout(d) if d == Duration::from_secs(5)));
        assert!(started.elapsed() >= Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failures_never_stop_the_loop() {
        let (source, calls) = ScriptedSource::new(&[Step::Refused]);
        let shutdown = Shutdown::new();

        let stats = HealthPoller::new(source, config(Some(25)))
            .run(shutdown.subscribe())
            .await;

        assert_eq!(stats.failures, 25);
        assert_eq!(stats.consecutive_failures, 25);
        assert_eq!(stats.timeouts, 0);
        assert_eq!(calls.count.load(Ordering::SeqCst), 25);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_stops_unbounded_loop() {
        let (source, calls) = ScriptedSource::new(&[Step::Status(HealthStatus::Green)]);
        let shutdown = Shutdown::new();
        let handle = tokio::spawn(HealthPoller::new(source, config(None)).run(shutdown.subscribe()));

        time::sleep(Duration::from_millis(2500)).await;
        shutdown.trigger();

        let stats = handle.await.unwrap();
        assert_eq!(stats.polls, 3);
        assert_eq!(calls.count.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_aborts_in_flight_wait() {
        let (source, _) = ScriptedSource::new(&[Step::Hang]);
        let shutdown = Shutdown::new();
        let handle = tokio::spawn(HealthPoller::new(source, config(None)).run(shutdown.subscribe()));

        time::sleep(Duration::from_millis(100)).await;
        shutdown.trigger();

        let stats = handle.await.unwrap();
        assert_eq!(stats.polls, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_backoff_stretches_interval() {
        let (source, calls) = ScriptedSource::new(&[Step::Refused]);
        let shutdown = Shutdown::new();
        let mut cfg = config(Some(4));
        cfg.backoff.enabled = true;
        cfg.backoff.base_delay_ms = 1000;
        cfg.backoff.max_delay_ms = 4000;

        HealthPoller::new(source, cfg).run(shutdown.subscribe()).await;

        let started = calls.started_at.lock().unwrap();
        assert!(started[2] - started[1] >= Duration::from_secs(2));
        assert!(started[3] - started[2] >= Duration::from_secs(4));
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_success_logs_one_success_entry() {
        let events = CapturedEvents::default();
        let _guard = tracing::subscriber::set_default(tracing_subscriber::registry().with(events.clone()));

        let (source, _) = ScriptedSource::new(&[Step::Status(HealthStatus::Green)]);
        let shutdown = Shutdown::new();
        HealthPoller::new(source, config(Some(1)))
            .run(shutdown.subscribe())
            .await;

        assert_eq!(events.count("Getting cluster health..."), 1);
        assert_eq!(events.count("Got cluster health response"), 1);
        assert_eq!(events.count("Unable to get cluster health response"), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_logs_one_failure_entry() {
        let events = CapturedEvents::default();
        let _guard = tracing::subscriber::set_default(tracing_subscriber::registry().with(events.clone()));

        let (source, _) = ScriptedSource::new(&[Step::Hang, Step::Status(HealthStatus::Green)]);
        let shutdown = Shutdown::new();
        HealthPoller::new(source, config(Some(2)))
            .run(shutdown.subscribe())
            .await;

        assert_eq!(events.count("Getting cluster health..."), 2);
        assert_eq!(events.count("Unable to get cluster health response"), 1);
        assert_eq!(events.count("Got cluster health response"), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_triggered_before_subscribe_stops_loop() {
        let (source, calls) = ScriptedSource::new(&[Step::Status(HealthStatus::Green)]);
        let shutdown = Shutdown::new();
        shutdown.trigger();
        let signal = shutdown.subscribe();

        let stats = time::timeout(
            Duration::from_secs(1),
            HealthPoller::new(source, config(None)).run(signal),
        )
        .await
        .expect("poller should stop on an earlier trigger");

        assert!(stats.polls <= 1);
        assert!(calls.count.load(Ordering::SeqCst) <= 1);
    }
}

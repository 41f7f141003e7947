// ── Polling coordinator ──
//
// Owns one state source, refreshes a cached snapshot on a timer or on
// demand, and folds fetch failures into `UpdateFailed`. All refresh
// triggers funnel through one single-flight gate, so snapshot updates are
// totally ordered and concurrent callers share one fetch.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwapOption;
use bopi_api::BopiClient;
use futures_util::FutureExt;
use futures_util::future::{BoxFuture, Shared};
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::command::{self, Command, CommandResult};
use crate::config::CoordinatorConfig;
use crate::error::{CoreError, FailureKind, UpdateFailed};
use crate::snapshot::Snapshot;
use crate::source::StateSource;

type RefreshOutcome = Result<Arc<Snapshot>, UpdateFailed>;
type SharedRefresh = Shared<BoxFuture<'static, RefreshOutcome>>;

/// Periodic-refresh coordinator for one device.
///
/// Cheaply cloneable via `Arc<CoordinatorInner>`. Created at device setup,
/// torn down with [`shutdown()`](Self::shutdown). Reads of the cached
/// snapshot never block: the snapshot is swapped atomically as a whole.
pub struct Coordinator<S: StateSource = BopiClient> {
    inner: Arc<CoordinatorInner<S>>,
}

impl<S: StateSource> Clone for Coordinator<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: StateSource> std::fmt::Debug for Coordinator<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Coordinator")
            .field("name", &self.inner.name)
            .finish_non_exhaustive()
    }
}

struct CoordinatorInner<S> {
    name: String,
    source: S,
    snapshot: ArcSwapOption<Snapshot>,
    last_error: ArcSwapOption<UpdateFailed>,
    update_interval: watch::Sender<Duration>,
    /// Bumped after every completed refresh, success or failure.
    version: watch::Sender<u64>,
    /// The single-flight gate. `Some` while a fetch is running.
    in_flight: Mutex<Option<SharedRefresh>>,
    cancel: CancellationToken,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl Coordinator<BopiClient> {
    /// Build a client from `config` and wrap it in a coordinator.
    ///
    /// Does NOT fetch -- call [`first_refresh()`](Self::first_refresh) and
    /// [`start()`](Self::start).
    pub fn from_config(config: &CoordinatorConfig) -> Result<Self, CoreError> {
        let client = BopiClient::new(&config.host, config.port, config.timeout_secs)?;
        Ok(Self::new(client, config.scan_interval))
    }
}

impl<S: StateSource> Coordinator<S> {
    pub fn new(source: S, update_interval: Duration) -> Self {
        let name = format!("bopi ({})", source.host());
        let (update_interval, _) = watch::channel(update_interval);
        let (version, _) = watch::channel(0u64);

        Self {
            inner: Arc::new(CoordinatorInner {
                name,
                source,
                snapshot: ArcSwapOption::empty(),
                last_error: ArcSwapOption::empty(),
                update_interval,
                version,
                in_flight: Mutex::new(None),
                cancel: CancellationToken::new(),
                task_handles: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// The underlying state source.
    pub fn source(&self) -> &S {
        &self.inner.source
    }

    pub fn host(&self) -> &str {
        self.inner.source.host()
    }

    // ── Lifecycle ────────────────────────────────────────────────

    /// Perform the initial refresh during setup.
    ///
    /// Fails with [`CoreError::NotReady`] so the caller can abort setup
    /// instead of registering entities that have nothing to show.
    pub async fn first_refresh(&self) -> Result<(), CoreError> {
        match self.refresh_now().await {
            Ok(_) => Ok(()),
            Err(_) if self.is_shut_down() => Err(CoreError::ShutDown),
            Err(source) => Err(CoreError::NotReady { source }),
        }
    }

    /// Spawn the scheduling task. Calling it twice is a no-op.
    pub async fn start(&self) -> Result<(), CoreError> {
        if self.is_shut_down() {
            return Err(CoreError::ShutDown);
        }

        let mut handles = self.inner.task_handles.lock().await;
        if !handles.is_empty() {
            debug!(coordinator = %self.inner.name, "scheduler already running");
            return Ok(());
        }

        let cancel = self.inner.cancel.clone();
        handles.push(tokio::spawn(refresh_task(self.clone(), cancel)));
        info!(
            coordinator = %self.inner.name,
            interval_secs = self.update_interval().as_secs(),
            "polling started"
        );
        Ok(())
    }

    /// Tear the coordinator down.
    ///
    /// Stops the scheduler and waits for it to exit. A fetch that is still
    /// in flight runs to completion, but its result is discarded.
    pub async fn shutdown(&self) {
        self.inner.cancel.cancel();

        let mut handles = self.inner.task_handles.lock().await;
        for handle in handles.drain(..) {
            if let Err(e) = handle.await {
                warn!(coordinator = %self.inner.name, error = %e, "refresh task ended abnormally");
            }
        }

        debug!(coordinator = %self.inner.name, "shut down");
    }

    pub fn is_shut_down(&self) -> bool {
        self.inner.cancel.is_cancelled()
    }

    // ── Refresh ──────────────────────────────────────────────────

    /// Refresh immediately.
    ///
    /// If a refresh is already in flight (scheduled or requested), joins it
    /// and returns its outcome instead of issuing a second fetch.
    pub async fn refresh_now(&self) -> RefreshOutcome {
        let refresh = {
            let mut slot = self.inner.in_flight.lock().await;
            if let Some(existing) = slot.as_ref() {
                debug!(coordinator = %self.inner.name, "joining in-flight refresh");
                existing.clone()
            } else {
                if self.is_shut_down() {
                    return Err(UpdateFailed::shut_down());
                }

                // The fetch runs as its own task so it completes even if
                // every caller stops waiting.
                let handle = tokio::spawn(run_refresh(Arc::clone(&self.inner)));
                let inner = Arc::clone(&self.inner);
                let shared = async move {
                    match handle.await {
                        Ok(outcome) => outcome,
                        Err(e) => {
                            warn!(coordinator = %inner.name, error = %e, "refresh task failed");
                            // run_refresh never reached its own gate release.
                            *inner.in_flight.lock().await = None;
                            Err(UpdateFailed::new(
                                FailureKind::Unavailable,
                                format!("refresh task failed: {e}"),
                            ))
                        }
                    }
                }
                .boxed()
                .shared();

                *slot = Some(shared.clone());
                shared
            }
        };

        refresh.await
    }

    /// Fire-and-forget refresh trigger.
    pub fn request_refresh(&self) {
        let coordinator = self.clone();
        tokio::spawn(async move {
            if let Err(e) = coordinator.refresh_now().await {
                debug!(coordinator = %coordinator.inner.name, error = %e, "requested refresh failed");
            }
        });
    }

    /// Whether a fetch is currently running.
    pub async fn is_refreshing(&self) -> bool {
        self.inner.in_flight.lock().await.is_some()
    }

    // ── State observation ────────────────────────────────────────

    /// The last successfully fetched snapshot, if any.
    pub fn current_snapshot(&self) -> Option<Arc<Snapshot>> {
        self.inner.snapshot.load_full()
    }

    /// The failure recorded by the most recent refresh, cleared on success.
    pub fn last_error(&self) -> Option<UpdateFailed> {
        self.inner.last_error.load_full().map(|e| (*e).clone())
    }

    pub fn last_update_success(&self) -> bool {
        self.inner.last_error.load().is_none()
    }

    /// Subscribe to refresh completions.
    ///
    /// The value is a counter bumped after every completed refresh; read
    /// the new state through [`current_snapshot()`](Self::current_snapshot).
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.inner.version.subscribe()
    }

    pub fn update_interval(&self) -> Duration {
        *self.inner.update_interval.borrow()
    }

    /// Change the polling period.
    ///
    /// Takes effect once the currently scheduled tick has fired; never
    /// cancels a fetch that is already running. `Duration::ZERO` pauses
    /// scheduled polling.
    pub fn set_update_interval(&self, interval: Duration) {
        let previous = self.inner.update_interval.send_replace(interval);
        if previous != interval {
            info!(
                coordinator = %self.inner.name,
                interval_secs = interval.as_secs(),
                "update interval changed"
            );
        }
    }

    // ── Command execution ────────────────────────────────────────

    /// Execute a command against this device.
    pub async fn execute(&self, cmd: Command) -> Result<CommandResult, CoreError> {
        if self.is_shut_down() {
            return Err(CoreError::ShutDown);
        }
        command::route_command(self, cmd).await
    }
}

/// Fetch once and apply the outcome.
///
/// Applying and clearing the gate happen under the gate's lock, so the next
/// refresh cannot start before this one's result is visible.
async fn run_refresh<S: StateSource>(inner: Arc<CoordinatorInner<S>>) -> RefreshOutcome {
    // A panicking source counts as a failed refresh; the gate below is
    // released either way.
    let fetched = AssertUnwindSafe(inner.source.fetch_state())
        .catch_unwind()
        .await;
    let result = match fetched {
        Ok(fetched) => fetched
            .map_err(UpdateFailed::from)
            .and_then(|state| Snapshot::new(inner.source.host(), state))
            .map(Arc::new),
        Err(panic) => Err(UpdateFailed::new(
            FailureKind::Unavailable,
            format!("refresh task failed: {}", panic_message(&*panic)),
        )),
    };

    let mut slot = inner.in_flight.lock().await;

    if inner.cancel.is_cancelled() {
        debug!(coordinator = %inner.name, "coordinator shut down during refresh; discarding result");
        *slot = None;
        return Err(UpdateFailed::shut_down());
    }

    let was_failing = inner.last_error.load().is_some();
    match &result {
        Ok(snapshot) => {
            inner.snapshot.store(Some(Arc::clone(snapshot)));
            inner.last_error.store(None);
            if was_failing {
                info!(coordinator = %inner.name, "fetching data recovered");
            } else {
                debug!(coordinator = %inner.name, "fetched data");
            }
        }
        Err(err) => {
            inner.last_error.store(Some(Arc::new(err.clone())));
            if was_failing {
                debug!(coordinator = %inner.name, error = %err, "error fetching data");
            } else {
                warn!(coordinator = %inner.name, error = %err, "error fetching data");
            }
        }
    }
    inner.version.send_modify(|v| *v += 1);

    *slot = None;
    result
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("source panicked")
}

/// Periodically refresh until cancelled.
///
/// The period is re-read before each sleep, so an interval change applies
/// from the next scheduled tick onward.
async fn refresh_task<S: StateSource>(coordinator: Coordinator<S>, cancel: CancellationToken) {
    let mut interval_rx = coordinator.inner.update_interval.subscribe();

    loop {
        let period = *interval_rx.borrow_and_update();

        if period.is_zero() {
            tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                changed = interval_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    continue;
                }
            }
        }

        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            () = tokio::time::sleep(period) => {}
        }

        if coordinator.is_refreshing().await {
            debug!(coordinator = %coordinator.inner.name, "refresh in flight, skipping scheduled tick");
            continue;
        }

        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            result = coordinator.refresh_now() => {
                if let Err(e) = result {
                    debug!(coordinator = %coordinator.inner.name, error = %e, "scheduled refresh failed");
                }
            }
        }
    }

    debug!(coordinator = %coordinator.inner.name, "refresh task stopped");
}

//! The sort engine, running one algorithm at a time on a dedicated worker thread
//!
//! The worker owns the values for the whole run. Everything else only ever sees the immutable
//! [`MutationEvent`] snapshots it publishes, either through [`SortEngine::subscribe`] callbacks,
//! which run synchronously on the worker between two steps, or through the per run channel of a
//! [`RunHandle`].

use std::{
    panic::{AssertUnwindSafe, catch_unwind, resume_unwind},
    sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError, Weak, mpsc},
    thread::JoinHandle,
    time::Duration,
};

use rand::{RngCore, SeedableRng as _};
use tracing::{debug, error, info, trace, warn};

use crate::{
    Error, Result,
    algorithms::{Algorithm, ComplexityProfile},
    instrument::{Cancelled, Counters, EventKind, MutationEvent, Observer, Step, Tracked},
    lifecycle,
    pacing::{CancelToken, PacingController},
};

/// The lifecycle state of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunStatus {
    Idle,
    Running,
    Completed,
    Cancelled,
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            RunStatus::Idle => "idle",
            RunStatus::Running => "running",
            RunStatus::Completed => "completed",
            RunStatus::Cancelled => "cancelled",
        })
    }
}

/// A copy of the engine state at one instant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// The values, as of the last published step while a run is active
    pub values: Vec<i64>,
    pub counters: Counters,
    pub status: RunStatus,
    /// The algorithm of the current or last run, cleared by a reset
    pub algorithm: Option<Algorithm>,
    pub complexity: Option<ComplexityProfile>,
}

type Callback = Box<dyn FnMut(&MutationEvent) + Send>;

/// What a worker executes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Job {
    Sort(Algorithm),
    Shuffle,
}

#[derive(Default)]
struct Subscribers {
    next_id: u64,
    callbacks: Vec<(u64, Callback)>,
}

struct EngineState {
    /// `None` while a worker owns the values
    values: Option<Vec<i64>>,
    /// The last published values
    latest: Arc<[i64]>,
    counters: Counters,
    status: RunStatus,
    algorithm: Option<Algorithm>,
    complexity: Option<ComplexityProfile>,
    active: Option<Arc<RunControl>>,
    runs: u64,
}

struct Shared {
    state: Mutex<EngineState>,
    subscribers: Mutex<Subscribers>,
    rng: Mutex<Box<dyn RngCore + Send>>,
    pacing: PacingController,
}

/// Lock a mutex, ignoring poisoning since the guarded data stays consistent between steps
fn lock<T: ?Sized>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Shared {
    fn subscribe(&self, callback: Callback) -> u64 {
        let mut subscribers = lock(&self.subscribers);
        subscribers.next_id += 1;
        let id = subscribers.next_id;
        subscribers.callbacks.push((id, callback));

        id
    }

    fn unsubscribe(&self, id: u64) {
        lock(&self.subscribers)
            .callbacks
            .retain(|(subscriber, _)| *subscriber != id);
    }

    fn publish(&self, event: &MutationEvent) {
        trace!(run = event.run, step = event.step, kind = %event.kind, "publishing step");
        for (_, callback) in lock(&self.subscribers).callbacks.iter_mut() {
            callback(event);
        }
    }
}

enum JoinState {
    Pending,
    Running(JoinHandle<()>),
    Joined,
    Panicked,
}

/// State of a single run shared between the worker, the engine and the [`RunHandle`]
struct RunControl {
    id: u64,
    token: CancelToken,
    thread: Mutex<JoinState>,
    outcome: OnceLock<RunStatus>,
}

impl RunControl {
    fn new(id: u64) -> Self {
        Self {
            id,
            token: CancelToken::default(),
            thread: Mutex::new(JoinState::Pending),
            outcome: OnceLock::new(),
        }
    }

    /// Wait for the worker thread to exit, resuming its panic if it had one
    fn join(&self) {
        // The lock is held while joining, so a second caller returns only after the first joined
        let mut thread = lock(&self.thread);
        match std::mem::replace(&mut *thread, JoinState::Joined) {
            JoinState::Running(handle) => {
                if let Err(payload) = handle.join() {
                    *thread = JoinState::Panicked;
                    drop(thread);
                    std::panic::resume_unwind(payload);
                }
            }
            JoinState::Panicked => {
                *thread = JoinState::Panicked;
                drop(thread);
                panic!("sort worker of run {} panicked", self.id);
            }
            JoinState::Pending | JoinState::Joined => {}
        }
    }
}

/// Handle of a single run returned by [`SortEngine::start`] and [`SortEngine::shuffle`]
pub struct RunHandle {
    control: Arc<RunControl>,
    events: mpsc::Receiver<MutationEvent>,
    subscription: u64,
    shared: Weak<Shared>,
}

impl RunHandle {
    /// The run id, matching [`MutationEvent::run`]
    pub fn id(&self) -> u64 {
        self.control.id
    }

    /// Request the run to stop at the next step boundary, does nothing if it already finished
    pub fn cancel(&self) {
        if self.control.outcome.get().is_none() {
            debug!(run = self.control.id, "cancellation requested");
        }
        self.control.token.cancel();
    }

    /// Whether the worker has finished the run
    pub fn is_finished(&self) -> bool {
        self.control.outcome.get().is_some()
    }

    /// The events of this run, in order
    ///
    /// The channel closes right after the final [`EventKind::RunComplete`] event. The engine
    /// status is updated just after that, so use [`RunHandle::wait`] before issuing the next
    /// operation.
    ///
    /// The channel is unbounded and holds a copy of the values per step. A caller that keeps the
    /// handle only to cancel or wait should call [`RunHandle::close_events`].
    pub fn events(&self) -> &mpsc::Receiver<MutationEvent> {
        &self.events
    }

    /// Stop queueing events for this handle and drop those not yet received
    ///
    /// [`RunHandle::events`] is disconnected afterwards, cancelling and waiting keep working.
    pub fn close_events(&self) {
        if let Some(shared) = self.shared.upgrade() {
            shared.unsubscribe(self.subscription);
        }
        self.events.try_iter().for_each(drop);
    }

    /// Block until the worker exited and return the final status of the run
    ///
    /// # Panics
    ///
    /// Resumes the panic of a worker that panicked.
    pub fn wait(&self) -> RunStatus {
        self.control.join();
        self.control
            .outcome
            .get()
            .copied()
            .unwrap_or(RunStatus::Cancelled)
    }
}

impl std::fmt::Debug for RunHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunHandle")
            .field("id", &self.control.id)
            .field("outcome", &self.control.outcome.get())
            .finish()
    }
}

/// Keeps a [`SortEngine::subscribe`] callback registered until dropped
#[must_use = "dropping a subscription unsubscribes immediately"]
pub struct Subscription {
    id: u64,
    shared: Weak<Shared>,
}

impl Subscription {
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(shared) = self.shared.upgrade() {
            shared.unsubscribe(self.id);
        }
    }
}

/// Runs sorting algorithms step by step against a single array
pub struct SortEngine {
    shared: Arc<Shared>,
}

impl SortEngine {
    /// Create an engine for `values` using an rng seeded by the operating system
    pub fn new(values: Vec<i64>) -> Result<Self> {
        Self::with_rng(values, rand::rngs::StdRng::from_os_rng())
    }

    /// Create an engine for `values`, drawing all randomness from `rng`
    pub fn with_rng(values: Vec<i64>, rng: impl RngCore + Send + 'static) -> Result<Self> {
        lifecycle::validate(&values)?;

        let state = EngineState {
            latest: values.as_slice().into(),
            values: Some(values),
            counters: Counters::default(),
            status: RunStatus::Idle,
            algorithm: None,
            complexity: None,
            active: None,
            runs: 0,
        };

        Ok(Self {
            shared: Arc::new(Shared {
                state: Mutex::new(state),
                subscribers: Mutex::default(),
                rng: Mutex::new(Box::new(rng)),
                pacing: PacingController::default(),
            }),
        })
    }

    /// Start sorting with `algorithm` on a fresh worker
    ///
    /// # Errors
    ///
    /// Fails with [`Error::AlreadyRunning`] without touching anything if a run is in progress.
    pub fn start(&self, algorithm: Algorithm) -> Result<RunHandle> {
        let mut state = lock(&self.shared.state);
        if state.status == RunStatus::Running {
            warn!(%algorithm, "refusing to start while a run is in progress");
            return Err(Error::AlreadyRunning);
        }

        state.counters = Counters::default();
        state.algorithm = Some(algorithm);
        state.complexity = Some(algorithm.complexity());

        self.spawn(state, Job::Sort(algorithm))
    }

    /// Cancel the run of `handle`, see [`RunHandle::cancel`]
    pub fn cancel(&self, handle: &RunHandle) {
        handle.cancel();
    }

    /// Shuffle the values on the worker, cancelling a run in progress first
    ///
    /// The counters are left alone and the status returns to [`RunStatus::Idle`] once done.
    pub fn shuffle(&self) -> Result<RunHandle> {
        let state = self.quiesce();
        info!("shuffling");

        self.spawn(state, Job::Shuffle)
    }

    /// Replace the values, cancelling a run in progress first
    ///
    /// # Errors
    ///
    /// Fails with [`Error::InvalidInput`] for an empty sequence.
    pub fn reset(&self, values: Vec<i64>) -> Result<()> {
        lifecycle::validate(&values)?;

        let state = self.quiesce();
        Self::replace(state, values);

        Ok(())
    }

    /// Replace the values by `length` random values from `1..=max_value`, cancelling a run in
    /// progress first
    pub fn resize(&self, length: usize, max_value: i64) -> Result<()> {
        lifecycle::check_resize(length, max_value)?;

        let state = self.quiesce();
        let values = lifecycle::generate(length, max_value, &mut *lock(&self.shared.rng))?;
        Self::replace(state, values);

        Ok(())
    }

    /// Set the delay waited after every step, affects a run in progress from its next step on
    pub fn set_speed(&self, delay: Duration) {
        debug!(?delay, "pacing changed");
        self.shared.pacing.set_speed(delay);
    }

    /// A handle to the pacing of this engine
    pub fn pacing(&self) -> PacingController {
        self.shared.pacing.clone()
    }

    /// Register `callback` for every event of every run
    ///
    /// Callbacks run on the worker thread in step order and must not subscribe, unsubscribe or
    /// call lifecycle operations of this engine themselves.
    pub fn subscribe(&self, callback: impl FnMut(&MutationEvent) + Send + 'static) -> Subscription {
        Subscription {
            id: self.shared.subscribe(Box::new(callback)),
            shared: Arc::downgrade(&self.shared),
        }
    }

    pub fn status(&self) -> RunStatus {
        lock(&self.shared.state).status
    }

    /// A copy of the current state, never the live values of a running worker
    pub fn current_snapshot(&self) -> Snapshot {
        let state = lock(&self.shared.state);

        Snapshot {
            values: state.latest.to_vec(),
            counters: state.counters,
            status: state.status,
            algorithm: state.algorithm,
            complexity: state.complexity,
        }
    }

    fn replace(mut state: MutexGuard<'_, EngineState>, values: Vec<i64>) {
        info!(length = values.len(), "replacing values");
        state.latest = values.as_slice().into();
        state.values = Some(values);
        state.counters = Counters::default();
        state.status = RunStatus::Idle;
        state.algorithm = None;
        state.complexity = None;
    }

    /// Cancel and join a run in progress, returning the idle state
    fn quiesce(&self) -> MutexGuard<'_, EngineState> {
        loop {
            let state = lock(&self.shared.state);
            let control = match (&state.status, &state.active) {
                (RunStatus::Running, Some(control)) => Arc::clone(control),
                _ => return state,
            };
            drop(state);

            debug!(run = control.id, "interrupting run");
            control.token.cancel();
            control.join();
        }
    }

    /// Hand the values to a new worker running `job`
    fn spawn(&self, mut state: MutexGuard<'_, EngineState>, job: Job) -> Result<RunHandle> {
        let Some(values) = state.values.take() else {
            unreachable!("values are owned by the engine while no run is active");
        };

        state.runs += 1;
        let control = Arc::new(RunControl::new(state.runs));
        let initial = state.counters;

        let (sender, events) = mpsc::channel();
        let subscription = self.shared.subscribe(Box::new(move |event| {
            // The handle may have been dropped, the run goes on regardless
            let _ = sender.send(event.clone());
        }));

        let shared = Arc::clone(&self.shared);
        let worker = Arc::clone(&control);
        let spawned = std::thread::Builder::new()
            .name(format!("sort-worker-{}", control.id))
            .spawn(move || run_worker(&shared, &worker, job, values, initial, subscription));

        match spawned {
            Ok(handle) => {
                *lock(&control.thread) = JoinState::Running(handle);
                state.status = RunStatus::Running;
                state.active = Some(Arc::clone(&control));
                info!(run = control.id, ?job, "run started");

                Ok(RunHandle {
                    control,
                    events,
                    subscription,
                    shared: Arc::downgrade(&self.shared),
                })
            }
            Err(err) => {
                self.shared.unsubscribe(subscription);
                state.values = Some(state.latest.to_vec());
                Err(Error::Spawn(err))
            }
        }
    }
}

impl Drop for SortEngine {
    fn drop(&mut self) {
        // Stop the worker without blocking, it exits at its next step boundary
        if let Some(control) = &lock(&self.shared.state).active {
            control.token.cancel();
        }
    }
}

impl std::fmt::Debug for SortEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SortEngine")
            .field("snapshot", &self.current_snapshot())
            .field("pacing", &self.shared.pacing)
            .finish()
    }
}

/// Publishes every step of a run and paces it
struct EngineObserver<'a> {
    shared: &'a Shared,
    control: &'a RunControl,
    step: u64,
}

impl EngineObserver<'_> {
    fn publish(&mut self, kind: EventKind, values: Arc<[i64]>, counters: Counters) {
        let event = MutationEvent {
            run: self.control.id,
            step: self.step,
            kind,
            counters,
            values,
        };
        self.step += 1;
        self.shared.publish(&event);
    }
}

impl Observer for EngineObserver<'_> {
    fn checkpoint(&mut self) -> Step {
        if self.control.token.is_cancelled() {
            Err(Cancelled)
        } else {
            Ok(())
        }
    }

    fn observe(&mut self, kind: EventKind, values: &[i64], counters: Counters) -> Step {
        let values: Arc<[i64]> = values.into();
        {
            let mut state = lock(&self.shared.state);
            state.latest = Arc::clone(&values);
            state.counters = counters;
        }
        self.publish(kind, values, counters);

        // Read the delay fresh so speed changes apply to the very next step
        let delay = self.shared.pacing.current_delay();
        if self.control.token.pause(delay) {
            Err(Cancelled)
        } else {
            Ok(())
        }
    }
}

fn run_worker(
    shared: &Shared,
    control: &RunControl,
    job: Job,
    mut values: Vec<i64>,
    mut counters: Counters,
    subscription: u64,
) {
    let span = tracing::debug_span!("sort_worker", run = control.id, ?job);
    let _guard = span.enter();

    let mut observer = EngineObserver {
        shared,
        control,
        step: 0,
    };

    let outcome = catch_unwind(AssertUnwindSafe(|| {
        let mut tracked = Tracked::new(&mut values, &mut counters, &mut observer);
        match job {
            Job::Sort(algorithm) => algorithm.sort(&mut tracked),
            Job::Shuffle => lifecycle::shuffle(&mut tracked, &mut *lock(&shared.rng)),
        }
    }));

    let status = match (&outcome, job) {
        (Ok(Ok(())), Job::Sort(_)) => RunStatus::Completed,
        (Ok(Ok(())), Job::Shuffle) => RunStatus::Idle,
        (Ok(Err(Cancelled)) | Err(_), _) => RunStatus::Cancelled,
    };

    let latest: Arc<[i64]> = values.as_slice().into();
    match outcome {
        Ok(_) => {
            observer.publish(EventKind::RunComplete(status), Arc::clone(&latest), counters);
            shared.unsubscribe(subscription);
            finish(shared, control, values, latest, counters, status);
        }
        Err(payload) => {
            // Closes the channel of the handle, the panic resumes in `RunHandle::wait`
            shared.unsubscribe(subscription);
            finish(shared, control, values, latest, counters, status);
            error!("sort worker panicked, values of the last step were kept");
            resume_unwind(payload);
        }
    }
}

/// Hand the values back to the engine, leaving [`RunStatus::Running`]
fn finish(
    shared: &Shared,
    control: &RunControl,
    values: Vec<i64>,
    latest: Arc<[i64]>,
    counters: Counters,
    status: RunStatus,
) {
    {
        let mut state = lock(&shared.state);
        state.values = Some(values);
        state.latest = latest;
        state.counters = counters;
        state.status = status;
    }
    let _ = control.outcome.set(status);

    info!(
        %status,
        comparisons = counters.comparisons,
        swaps = counters.swaps,
        overwrites = counters.overwrites,
        "run finished"
    );
}

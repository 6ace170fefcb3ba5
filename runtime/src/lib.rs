//! # Storefront Runtime
//!
//! Runtime implementation for the storefront reducers.
//!
//! This crate provides the Store that owns session state, serializes every
//! action through the reducer and executes the effects the reducer returns.
//!
//! ## Core Components
//!
//! - **Store**: The runtime that manages state and executes effects
//! - **Effect Executor**: Executes effect descriptions and feeds actions back to reducers
//! - **Cancellation Registry**: At most one running task per [`EffectId`]; a new
//!   cancellable effect aborts the one it supersedes
//! - **Action Broadcast**: Every applied action is published to subscribers so
//!   views can re-render on change
//!
//! ## Example
//!
//! ```ignore
//! use storefront_runtime::Store;
//!
//! let store = Store::new(initial_state, my_reducer, environment);
//!
//! // Send an action
//! store.send(Action::DoSomething).await?;
//!
//! // Read state
//! let value = store.state(|s| s.some_field).await;
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use storefront_core::effect::{Effect, EffectId};
use storefront_core::reducer::Reducer;
use tokio::sync::{RwLock, watch};
use tokio::task::AbortHandle;

/// Prometheus metrics for observability
pub mod metrics;

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum StoreError {
        /// Store is shutting down and not accepting new actions
        ///
        /// This error is returned when `send()` is called after shutdown.
        #[error("Store is shutting down")]
        ShutdownInProgress,

        /// Timed out waiting for effects to complete
        #[error("Timed out waiting for effects")]
        Timeout,
    }
}

pub use error::StoreError;

/// Configuration for Store instances
///
/// # Example
///
/// ```
/// use storefront_runtime::StoreConfig;
///
/// let config = StoreConfig::default().with_broadcast_capacity(64);
/// assert_eq!(config.broadcast_capacity, 64);
/// ```
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Capacity of the action broadcast channel
    ///
    /// Subscribers that fall further behind than this skip old actions.
    pub broadcast_capacity: usize,
}

impl StoreConfig {
    /// Set the action broadcast capacity (at least 1)
    #[must_use]
    pub fn with_broadcast_capacity(mut self, capacity: usize) -> Self {
        self.broadcast_capacity = capacity.max(1);
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            broadcast_capacity: 64,
        }
    }
}

/// Handle for tracking effect completion
///
/// Returned by [`Store::send()`] to allow waiting for the effects started by
/// that action. Actions fed back by those effects are tracked by their own
/// sends, not by this handle.
#[derive(Clone)]
pub struct EffectHandle {
    effects: Arc<AtomicUsize>,
    completion: watch::Receiver<()>,
}

impl EffectHandle {
    fn new() -> (Self, EffectTracking) {
        let counter = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = watch::channel(());

        let handle = Self {
            effects: Arc::clone(&counter),
            completion: rx,
        };

        let tracking = EffectTracking {
            counter,
            notifier: Arc::new(tx),
        };

        (handle, tracking)
    }

    /// Create a handle that's already complete
    #[must_use]
    pub fn completed() -> Self {
        Self::new().0
    }

    /// Number of effects still running
    #[must_use]
    pub fn pending(&self) -> usize {
        self.effects.load(Ordering::SeqCst)
    }

    /// Wait for all effects to complete
    pub async fn wait(&mut self) {
        while self.effects.load(Ordering::SeqCst) > 0 {
            if self.completion.changed().await.is_err() {
                break;
            }
        }
    }

    /// Wait for all effects to complete with a timeout
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Timeout`] if the timeout expires before all effects complete.
    pub async fn wait_with_timeout(&mut self, timeout: Duration) -> Result<(), StoreError> {
        tokio::time::timeout(timeout, self.wait())
            .await
            .map_err(|_| StoreError::Timeout)
    }
}

impl std::fmt::Debug for EffectHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectHandle")
            .field("pending_effects", &self.pending())
            .finish_non_exhaustive()
    }
}

/// Internal: Effect tracking context passed through effect execution
#[derive(Clone)]
struct EffectTracking {
    counter: Arc<AtomicUsize>,
    notifier: Arc<watch::Sender<()>>,
}

impl EffectTracking {
    fn detached() -> Self {
        EffectHandle::new().1
    }

    fn increment(&self) {
        self.counter.fetch_add(1, Ordering::SeqCst);
    }

    fn decrement(&self) {
        if self.counter.fetch_sub(1, Ordering::SeqCst) == 1 {
            // Counter reached zero, notify waiters
            let _ = self.notifier.send(());
        }
    }
}

/// Internal: RAII guard that decrements effect counter on drop
///
/// Runs on completion, panic and abort alike.
struct DecrementGuard(EffectTracking);

impl Drop for DecrementGuard {
    fn drop(&mut self) {
        self.0.decrement();
    }
}

/// Internal: running cancellable tasks, one per slot
#[derive(Default)]
struct CancellationRegistry {
    next_token: u64,
    running: HashMap<EffectId, (u64, AbortHandle)>,
}

impl CancellationRegistry {
    fn issue_token(&mut self) -> u64 {
        self.next_token += 1;
        self.next_token
    }

    /// Abort and forget the task in `id`. Returns whether one was running.
    fn cancel(&mut self, id: EffectId) -> bool {
        match self.running.remove(&id) {
            Some((_, task)) => {
                task.abort();
                true
            },
            None => false,
        }
    }

    /// Forget `id` only if it still belongs to the task holding `token`.
    fn release(&mut self, id: EffectId, token: u64) {
        if self.running.get(&id).is_some_and(|(owner, _)| *owner == token) {
            self.running.remove(&id);
        }
    }

    fn cancel_all(&mut self) -> usize {
        let count = self.running.len();
        for (_, (_, task)) in self.running.drain() {
            task.abort();
        }
        count
    }
}

/// Store module - The runtime for reducers
pub mod store {
    use super::{
        Arc, AtomicBool, CancellationRegistry, DecrementGuard, Effect, EffectHandle, EffectId,
        EffectTracking, Mutex, Ordering, PoisonError, Reducer, RwLock, StoreConfig, StoreError,
        metrics::StoreMetrics,
    };
    use futures::future::join_all;
    use std::future::Future;
    use std::pin::Pin;
    use tokio::sync::broadcast;

    /// The Store - runtime coordinator for a reducer
    ///
    /// The Store manages:
    /// 1. State (behind `RwLock`; every mutation goes through [`Store::send`])
    /// 2. Reducer (business logic)
    /// 3. Environment (injected dependencies)
    /// 4. Effect execution (with feedback loop and cancellation)
    ///
    /// Cloning a Store yields another handle onto the same state.
    ///
    /// # Type Parameters
    ///
    /// - `S`: State type
    /// - `A`: Action type
    /// - `E`: Environment type
    /// - `R`: Reducer implementation
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        state: Arc<RwLock<S>>,
        reducer: Arc<R>,
        environment: Arc<E>,
        shutdown: Arc<AtomicBool>,
        cancellables: Arc<Mutex<CancellationRegistry>>,
        /// Every action applied to state, in reduction order.
        action_broadcast: broadcast::Sender<A>,
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
        A: Send + Sync + Clone + std::fmt::Debug + 'static,
        S: Send + Sync + 'static,
        E: Send + Sync + 'static,
    {
        /// Create a new store with initial state, reducer, and environment
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            Self::with_config(initial_state, reducer, environment, &StoreConfig::default())
        }

        /// Create a new store with explicit runtime configuration
        #[must_use]
        pub fn with_config(
            initial_state: S,
            reducer: R,
            environment: E,
            config: &StoreConfig,
        ) -> Self {
            let (action_broadcast, _) = broadcast::channel(config.broadcast_capacity.max(1));

            Self {
                state: Arc::new(RwLock::new(initial_state)),
                reducer: Arc::new(reducer),
                environment: Arc::new(environment),
                shutdown: Arc::new(AtomicBool::new(false)),
                cancellables: Arc::new(Mutex::new(CancellationRegistry::default())),
                action_broadcast,
            }
        }

        /// Send an action to the store
        ///
        /// 1. Acquires write lock on state
        /// 2. Calls reducer with (state, action, environment)
        /// 3. Broadcasts the applied action to subscribers
        /// 4. Starts the returned effects
        ///
        /// Effects are started before the lock is released, so a cancellable
        /// effect supersedes its predecessor before any other action can be
        /// reduced.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownInProgress`] if the store has been shut down.
        #[tracing::instrument(skip(self, action), name = "store_send")]
        pub async fn send(&self, action: A) -> Result<EffectHandle, StoreError> {
            if self.shutdown.load(Ordering::Acquire) {
                tracing::warn!(?action, "Rejected action: store is shutting down");
                return Err(StoreError::ShutdownInProgress);
            }

            tracing::debug!(?action, "Processing action");

            let (handle, tracking) = EffectHandle::new();

            {
                let mut state = self.state.write().await;

                let start = std::time::Instant::now();
                let effects = self.reducer.reduce(&mut state, action.clone(), &self.environment);
                StoreMetrics::record_action(start.elapsed());

                tracing::trace!("Reducer completed, returned {} effects", effects.len());

                // No receivers is fine
                let _ = self.action_broadcast.send(action);

                for effect in effects {
                    self.execute_effect(effect, &tracking);
                }
            }

            Ok(handle)
        }

        /// Read current state via a closure
        ///
        /// ```ignore
        /// let badge = store.state(|s| s.cart.total_items()).await;
        /// ```
        pub async fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            let state = self.state.read().await;
            f(&state)
        }

        /// Subscribe to every action applied to this store
        ///
        /// Views hold the Store and re-render when an action arrives.
        /// A receiver that lags more than the configured capacity skips old
        /// actions and receives `RecvError::Lagged`.
        #[must_use]
        pub fn subscribe_actions(&self) -> broadcast::Receiver<A> {
            self.action_broadcast.subscribe()
        }

        /// Whether an effect currently occupies the given cancellation slot
        #[must_use]
        pub fn is_running(&self, id: EffectId) -> bool {
            self.registry().running.contains_key(&id)
        }

        /// End the session
        ///
        /// Further sends are rejected and every running cancellable effect is
        /// aborted. Returns the number of aborted effects.
        pub fn shutdown(&self) -> usize {
            self.shutdown.store(true, Ordering::Release);
            let aborted = self.registry().cancel_all();
            tracing::info!(aborted, "Store shut down");
            aborted
        }

        fn registry(&self) -> std::sync::MutexGuard<'_, CancellationRegistry> {
            self.cancellables
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
        }

        async fn feed_back(&self, action: A) {
            if let Err(error) = self.send(action).await {
                tracing::debug!(%error, "Dropped action produced by effect");
            }
        }

        /// Execute an effect with tracking
        ///
        /// Spawns a task for anything that waits; never blocks the caller.
        fn execute_effect(&self, effect: Effect<A>, tracking: &EffectTracking) {
            match effect {
                Effect::None => {
                    tracing::trace!("Executing Effect::None (no-op)");
                },
                Effect::Parallel(effects) => {
                    tracing::trace!("Executing Effect::Parallel with {} effects", effects.len());
                    StoreMetrics::record_effect("parallel");
                    for effect in effects {
                        self.execute_effect(effect, tracking);
                    }
                },
                Effect::Cancel(id) => {
                    StoreMetrics::record_effect("cancel");
                    if self.registry().cancel(id) {
                        tracing::debug!(%id, "Cancelled running effect");
                        StoreMetrics::record_cancelled();
                    }
                },
                Effect::Cancellable { id, effect } => {
                    StoreMetrics::record_effect("cancellable");
                    tracking.increment();
                    let guard = DecrementGuard(tracking.clone());

                    // Hold the registry across spawn so the task cannot release
                    // its slot before it has been registered.
                    let mut registry = self.registry();
                    if registry.cancel(id) {
                        tracing::debug!(%id, "Superseded running effect");
                        StoreMetrics::record_cancelled();
                    }
                    let token = registry.issue_token();

                    let store = self.clone();
                    let task = tokio::spawn(async move {
                        let _guard = guard;
                        store.drive(*effect).await;
                        store.registry().release(id, token);
                    });
                    registry.running.insert(id, (token, task.abort_handle()));
                },
                other => {
                    tracking.increment();
                    let guard = DecrementGuard(tracking.clone());
                    let store = self.clone();
                    tokio::spawn(async move {
                        let _guard = guard;
                        store.drive(other).await;
                    });
                },
            }
        }

        /// Run an effect to completion on the current task
        fn drive(&self, effect: Effect<A>) -> Pin<Box<dyn Future<Output = ()> + Send>> {
            let store = self.clone();
            Box::pin(async move {
                match effect {
                    Effect::None => {},
                    Effect::Future(fut) => {
                        StoreMetrics::record_effect("future");
                        if let Some(action) = fut.await {
                            tracing::trace!("Effect::Future produced an action, sending to store");
                            store.feed_back(action).await;
                        }
                    },
                    Effect::Delay { duration, action } => {
                        StoreMetrics::record_effect("delay");
                        tracing::trace!("Executing Effect::Delay (duration: {:?})", duration);
                        tokio::time::sleep(duration).await;
                        store.feed_back(*action).await;
                    },
                    Effect::Parallel(effects) => {
                        StoreMetrics::record_effect("parallel");
                        join_all(effects.into_iter().map(|e| store.drive(e))).await;
                    },
                    Effect::Sequential(effects) => {
                        StoreMetrics::record_effect("sequential");
                        for effect in effects {
                            store.drive(effect).await;
                        }
                    },
                    nested @ (Effect::Cancellable { .. } | Effect::Cancel(_)) => {
                        store.execute_effect(nested, &EffectTracking::detached());
                    },
                }
            })
        }
    }

    impl<S, A, E, R> Clone for Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        fn clone(&self) -> Self {
            Self {
                state: Arc::clone(&self.state),
                reducer: Arc::clone(&self.reducer),
                environment: Arc::clone(&self.environment),
                shutdown: Arc::clone(&self.shutdown),
                cancellables: Arc::clone(&self.cancellables),
                action_broadcast: self.action_broadcast.clone(),
            }
        }
    }
}

pub use store::Store;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use storefront_core::{SmallVec, smallvec};

    const TIMER: EffectId = EffectId::new("timer");

    #[derive(Clone, Debug, PartialEq)]
    enum TestAction {
        Show(&'static str),
        Hide,
        Dismiss,
        Chain,
        Increment,
    }

    #[derive(Clone, Debug, Default)]
    struct TestState {
        banner: Option<&'static str>,
        hidden: u32,
        count: u32,
    }

    struct TestReducer;

    impl Reducer for TestReducer {
        type State = TestState;
        type Action = TestAction;
        type Environment = Duration;

        fn reduce(
            &self,
            state: &mut TestState,
            action: TestAction,
            ttl: &Duration,
        ) -> SmallVec<[Effect<TestAction>; 4]> {
            match action {
                TestAction::Show(text) => {
                    state.banner = Some(text);
                    smallvec![
                        Effect::Delay {
                            duration: *ttl,
                            action: Box::new(TestAction::Hide),
                        }
                        .cancellable(TIMER)
                    ]
                },
                TestAction::Hide => {
                    state.banner = None;
                    state.hidden += 1;
                    smallvec![Effect::None]
                },
                TestAction::Dismiss => {
                    state.banner = None;
                    smallvec![Effect::Cancel(TIMER)]
                },
                TestAction::Chain => smallvec![Effect::Sequential(vec![
                    Effect::Future(Box::pin(async { Some(TestAction::Increment) })),
                    Effect::Future(Box::pin(async { Some(TestAction::Increment) })),
                ])],
                TestAction::Increment => {
                    state.count += 1;
                    smallvec![Effect::None]
                },
            }
        }
    }

    fn store() -> Store<TestState, TestAction, Duration, TestReducer> {
        Store::new(TestState::default(), TestReducer, Duration::from_secs(3))
    }

    #[tokio::test(start_paused = true)]
    async fn test_delay_fires_after_duration() {
        let store = store();
        store.send(TestAction::Show("a")).await.unwrap();
        assert!(store.is_running(TIMER));

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(store.state(|s| s.banner).await, Some("a"));

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(store.state(|s| s.banner).await, None);
        assert!(!store.is_running(TIMER));
    }

    #[tokio::test(start_paused = true)]
    async fn test_superseded_timer_never_fires() {
        let store = store();
        store.send(TestAction::Show("a")).await.unwrap();
        tokio::time::sleep(Duration::from_secs(2)).await;
        store.send(TestAction::Show("b")).await.unwrap();

        // First timer would have fired at t=3s
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(store.state(|s| s.banner).await, Some("b"));
        assert_eq!(store.state(|s| s.hidden).await, 0);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(store.state(|s| s.banner).await, None);
        assert_eq!(store.state(|s| s.hidden).await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_aborts_running_timer() {
        let store = store();
        store.send(TestAction::Show("a")).await.unwrap();
        store.send(TestAction::Dismiss).await.unwrap();
        assert!(!store.is_running(TIMER));

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(store.state(|s| s.hidden).await, 0);
    }

    #[tokio::test]
    async fn test_sequential_effects_feed_back_in_order() {
        let store = store();
        let mut handle = store.send(TestAction::Chain).await.unwrap();
        handle
            .wait_with_timeout(Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(store.state(|s| s.count).await, 2);
    }

    #[tokio::test]
    async fn test_subscribers_see_every_applied_action() {
        let store = store();
        let mut rx = store.subscribe_actions();

        let mut handle = store.send(TestAction::Chain).await.unwrap();
        handle.wait().await;

        assert_eq!(rx.recv().await.unwrap(), TestAction::Chain);
        assert_eq!(rx.recv().await.unwrap(), TestAction::Increment);
        assert_eq!(rx.recv().await.unwrap(), TestAction::Increment);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_rejects_actions_and_aborts_timers() {
        let store = store();
        store.send(TestAction::Show("a")).await.unwrap();

        assert_eq!(store.shutdown(), 1);
        assert_eq!(
            store.send(TestAction::Increment).await.unwrap_err(),
            StoreError::ShutdownInProgress
        );

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(store.state(|s| s.banner).await, Some("a"));
    }

    #[tokio::test]
    async fn test_completed_handle_does_not_wait() {
        let mut handle = EffectHandle::completed();
        assert_eq!(handle.pending(), 0);
        handle.wait().await;
    }
}

//! # Registry Runtime
//!
//! The Store that owns controller state and executes effects.
//!
//! ## Core Components
//!
//! - **Store**: holds state behind a lock, runs the reducer, executes effects
//! - **Effect execution**: `Effect::Future` runs as a tokio task and its result
//!   action is fed back into the reducer
//! - **Liveness**: once a store is closed (the view it serves was torn down),
//!   results that resolve later are dropped instead of applied
//!
//! ## Example
//!
//! ```ignore
//! use registry_runtime::Store;
//!
//! let store = Store::new(AppState::default(), AppReducer::new(), environment);
//!
//! store.send(AppAction::Mounted).await?;
//! store.wait_until_idle(Duration::from_secs(5)).await?;
//!
//! let count = store.state(|s| s.records.len()).await;
//! ```

use registry_core::{effect::Effect, reducer::Reducer};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::{RwLock, broadcast, watch};

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum StoreError {
        /// Store was closed and no longer accepts actions
        #[error("Store is shutting down")]
        ShutdownInProgress,

        /// Effects were still running when the timeout elapsed
        #[error("Timed out with {0} effects still running")]
        Timeout(usize),
    }
}

pub use error::StoreError;
pub use store::Store;

/// Default capacity of the action broadcast channel
const ACTION_BROADCAST_CAPACITY: usize = 64;

/// Guard that keeps an effect counted as pending until dropped
///
/// Dropping happens on completion and on panic alike, so the idle signal
/// cannot get stuck.
struct PendingGuard(Arc<watch::Sender<usize>>);

impl PendingGuard {
    fn acquire(pending: &Arc<watch::Sender<usize>>) -> Self {
        pending.send_modify(|count| *count += 1);
        Self(Arc::clone(pending))
    }
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.0.send_modify(|count| *count = count.saturating_sub(1));
    }
}

/// Store module - the runtime for reducers
pub mod store {
    use super::{
        ACTION_BROADCAST_CAPACITY, Arc, AtomicBool, Duration, Effect, Ordering, PendingGuard,
        Reducer, RwLock, StoreError, broadcast, watch,
    };

    /// The Store - runtime coordinator for a reducer
    ///
    /// The Store manages:
    /// 1. State (behind `RwLock`, mutated only by the reducer)
    /// 2. Reducer (the controller logic)
    /// 3. Environment (injected dependencies)
    /// 4. Effect execution (with feedback loop)
    ///
    /// Cloning is cheap: clones share the same state and effect bookkeeping.
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        state: Arc<RwLock<S>>,
        reducer: Arc<R>,
        environment: Arc<E>,
        live: Arc<AtomicBool>,
        pending_effects: Arc<watch::Sender<usize>>,
        /// Actions produced by effects, for observers (views, tests)
        action_broadcast: broadcast::Sender<A>,
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
                live: Arc::clone(&self.live),
                pending_effects: Arc::clone(&self.pending_effects),
                action_broadcast: self.action_broadcast.clone(),
            }
        }
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
        A: Clone + Send + 'static,
        S: Send + Sync + 'static,
        E: Send + Sync + 'static,
    {
        /// Create a new store with initial state, reducer, and environment
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            let (action_broadcast, _) = broadcast::channel(ACTION_BROADCAST_CAPACITY);
            let (pending_effects, _) = watch::channel(0);

            Self {
                state: Arc::new(RwLock::new(initial_state)),
                reducer: Arc::new(reducer),
                environment: Arc::new(environment),
                live: Arc::new(AtomicBool::new(true)),
                pending_effects: Arc::new(pending_effects),
                action_broadcast,
            }
        }

        /// Send an action to the store
        ///
        /// 1. Acquires the write lock on state
        /// 2. Runs the reducer
        /// 3. Releases the lock and starts the returned effects
        ///
        /// Returns once effects are started, not once they complete. Use
        /// [`Store::wait_until_idle`] to wait for them.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownInProgress`] if the store was closed.
        #[tracing::instrument(skip(self, action), name = "store_send")]
        pub async fn send(&self, action: A) -> Result<(), StoreError> {
            if !self.is_live() {
                tracing::warn!("Rejected action: store is closed");
                metrics::counter!("store.actions.rejected").increment(1);
                return Err(StoreError::ShutdownInProgress);
            }

            metrics::counter!("store.actions.total").increment(1);

            let effects = {
                let mut state = self.state.write().await;

                let start = std::time::Instant::now();
                let effects = self.reducer.reduce(&mut state, action, &self.environment);
                metrics::histogram!("store.reducer.duration_seconds")
                    .record(start.elapsed().as_secs_f64());

                effects
            };

            tracing::trace!(effects = effects.len(), "Reducer completed");
            for effect in effects {
                self.execute_effect(effect);
            }

            Ok(())
        }

        /// Read current state via a closure
        ///
        /// ```ignore
        /// let loading = store.state(|s| s.is_loading).await;
        /// ```
        pub async fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            let state = self.state.read().await;
            f(&state)
        }

        /// Whether the store still applies effect results
        #[must_use]
        pub fn is_live(&self) -> bool {
            self.live.load(Ordering::Acquire)
        }

        /// Stop accepting actions and drop results of in-flight effects
        ///
        /// Effects already running are not aborted; they finish and their
        /// actions are discarded.
        pub fn close(&self) {
            if self.live.swap(false, Ordering::AcqRel) {
                tracing::info!(
                    pending_effects = self.pending_effects(),
                    "Store closed"
                );
            }
        }

        /// Number of effects still running
        #[must_use]
        pub fn pending_effects(&self) -> usize {
            *self.pending_effects.borrow()
        }

        /// Wait until no effect is running
        ///
        /// Effects that feed back actions producing further effects keep the
        /// store busy until the whole chain settles.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::Timeout`] if effects are still running when
        /// `timeout` elapses.
        pub async fn wait_until_idle(&self, timeout: Duration) -> Result<(), StoreError> {
            let mut pending = self.pending_effects.subscribe();
            let settled = tokio::time::timeout(timeout, pending.wait_for(|count| *count == 0)).await;

            match settled {
                Ok(_) => Ok(()),
                Err(_) => {
                    let still_running = self.pending_effects();
                    tracing::warn!(pending_effects = still_running, "Timed out waiting for effects");
                    Err(StoreError::Timeout(still_running))
                },
            }
        }

        /// Close the store and wait for in-flight effects to drain
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::Timeout`] if effects are still running when
        /// `timeout` elapses.
        pub async fn shutdown(&self, timeout: Duration) -> Result<(), StoreError> {
            self.close();
            self.wait_until_idle(timeout).await
        }

        /// Subscribe to actions produced by effects
        ///
        /// User-sent actions are not broadcast, only effect results.
        #[must_use]
        pub fn subscribe_actions(&self) -> broadcast::Receiver<A> {
            self.action_broadcast.subscribe()
        }

        fn execute_effect(&self, effect: Effect<A>) {
            match effect {
                Effect::None => {
                    metrics::counter!("store.effects.executed", "type" => "none").increment(1);
                },
                Effect::Parallel(effects) => {
                    metrics::counter!("store.effects.executed", "type" => "parallel").increment(1);
                    for effect in effects {
                        self.execute_effect(effect);
                    }
                },
                Effect::Future(future) => {
                    metrics::counter!("store.effects.executed", "type" => "future").increment(1);
                    let guard = PendingGuard::acquire(&self.pending_effects);
                    let store = self.clone();

                    tokio::spawn(async move {
                        let _guard = guard;
                        match future.await {
                            Some(action) => store.feed_back(action).await,
                            None => tracing::trace!("Effect::Future completed with no action"),
                        }
                    });
                },
            }
        }

        async fn feed_back(&self, action: A) {
            if !self.is_live() {
                tracing::debug!("Dropping effect result: store is closed");
                metrics::counter!("store.effects.dropped").increment(1);
                return;
            }

            let _ = self.action_broadcast.send(action.clone());

            if let Err(error) = self.send(action).await {
                tracing::debug!(%error, "Effect result not applied");
            }
        }
    }
}

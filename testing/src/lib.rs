//! # Registry Testing
//!
//! Testing utilities for reducers and stores.
//!
//! This crate provides:
//! - [`ReducerTest`]: Given-When-Then builder for reducer unit tests
//! - [`assertions`]: effect assertions
//! - [`collect_actions`]: run effect futures and gather the actions they produce
//! - [`Gate`]: hold a fake remote call in flight until the test releases it
//! - [`eventually`]: poll a condition until it holds or times out
//!
//! ## Example
//!
//! ```ignore
//! use registry_testing::{Gate, eventually};
//!
//! #[tokio::test]
//! async fn loading_flag_tracks_the_call() {
//!     let gate = Gate::closed();
//!     let app = app_with_gated_backend(gate.clone());
//!
//!     app.mount().await?;
//!     assert!(app.view().await.is_loading);
//!
//!     gate.open();
//!     assert!(eventually(Duration::from_secs(1), || async { !app.view().await.is_loading }).await);
//! }
//! ```


pub use reducer_test::{ReducerTest, assertions};

use registry_core::effect::Effect;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;

/// Interval between two checks in [`eventually`]
const POLL_INTERVAL: Duration = Duration::from_millis(5);

/// A latch that holds async work until opened
///
/// Cloned gates share the same latch. Once opened, a gate stays open.
#[derive(Clone, Debug)]
pub struct Gate {
    semaphore: Arc<Semaphore>,
}

impl Gate {
    /// A gate that holds every caller of [`Gate::pass`] until opened
    #[must_use]
    pub fn closed() -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(0)),
        }
    }

    /// A gate that lets everyone through
    #[must_use]
    pub fn opened() -> Self {
        let gate = Self::closed();
        gate.open();
        gate
    }

    /// Release all current and future callers
    pub fn open(&self) {
        // Acquiring from a closed semaphore fails immediately, which is what
        // lets callers through.
        self.semaphore.close();
    }

    /// Whether the gate was opened
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.semaphore.is_closed()
    }

    /// Wait until the gate is open
    pub async fn pass(&self) {
        let _ = self.semaphore.acquire().await;
    }
}

/// Poll `condition` until it returns `true` or `timeout` elapses
///
/// Returns whether the condition was met.
pub async fn eventually<F, Fut>(timeout: Duration, mut condition: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let deadline = tokio::time::Instant::now() + timeout;

    loop {
        if condition().await {
            return true;
        }
        if tokio::time::Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    }
}

type EffectFuture<A> = Pin<Box<dyn Future<Output = Option<A>> + Send>>;

fn flatten_futures<A>(effect: Effect<A>, futures: &mut Vec<EffectFuture<A>>) {
    match effect {
        Effect::None => {},
        Effect::Parallel(effects) => {
            for effect in effects {
                flatten_futures(effect, futures);
            }
        },
        Effect::Future(future) => futures.push(future),
    }
}

/// Run the futures inside `effects` and collect the actions they yield
///
/// Futures run concurrently; the returned actions keep the order in which the
/// effects were listed. Produced actions are not reduced.
pub async fn collect_actions<A, I>(effects: I) -> Vec<A>
where
    I: IntoIterator<Item = Effect<A>>,
{
    let mut futures = Vec::new();
    for effect in effects {
        flatten_futures(effect, &mut futures);
    }

    futures::future::join_all(futures)
        .await
        .into_iter()
        .flatten()
        .collect()
}

/// Install a test-friendly tracing subscriber
///
/// Respects `RUST_LOG`, defaults to `debug`. Safe to call from every test.
pub fn init_test_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

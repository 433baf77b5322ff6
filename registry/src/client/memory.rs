//! In-memory registry backend for development and testing.
//!
//! Assigns IDs the way the real backend does (sequentially) and answers from
//! a local list. It can also be told to fail, to exercise error paths.

use super::{ClientError, ClientFuture, CreateOutcome, TaxpayerClient};
use crate::types::{NewTaxpayer, Taxpayer, TaxpayerId};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;

#[derive(Debug)]
struct Inner {
    next_tid: u128,
    taxpayers: Vec<Taxpayer>,
    reject_next_create: Option<String>,
}

/// Registry backend held in process memory
///
/// Clones share the same records.
#[derive(Clone, Debug)]
pub struct InMemoryTaxpayerClient {
    inner: Arc<Mutex<Inner>>,
    unavailable: Arc<AtomicBool>,
}

impl InMemoryTaxpayerClient {
    /// An empty backend; the first created taxpayer gets ID 1
    #[must_use]
    pub fn new() -> Self {
        Self::with_taxpayers(Vec::new())
    }

    /// A backend seeded with `taxpayers`, kept in the given order
    ///
    /// New IDs continue after the largest seeded one.
    #[must_use]
    pub fn with_taxpayers(taxpayers: Vec<Taxpayer>) -> Self {
        let next_tid = taxpayers
            .iter()
            .map(|t| t.tid.get())
            .max()
            .map_or(1, |max| max.saturating_add(1));

        Self {
            inner: Arc::new(Mutex::new(Inner {
                next_tid,
                taxpayers,
                reject_next_create: None,
            })),
            unavailable: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Creates an Arc-wrapped instance for sharing
    #[must_use]
    pub fn shared(self) -> Arc<dyn TaxpayerClient> {
        Arc::new(self)
    }

    /// Make every call fail with a transport error until switched back
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::Release);
    }

    /// Answer the next create with `Rejected(reason)`
    pub async fn reject_next_create(&self, reason: impl Into<String>) {
        self.inner.lock().await.reject_next_create = Some(reason.into());
    }

    /// Current records, in storage order
    pub async fn taxpayers(&self) -> Vec<Taxpayer> {
        self.inner.lock().await.taxpayers.clone()
    }

    fn check_available(&self) -> Result<(), ClientError> {
        if self.unavailable.load(Ordering::Acquire) {
            Err(ClientError::Transport("backend unavailable".to_string()))
        } else {
            Ok(())
        }
    }
}

impl Default for InMemoryTaxpayerClient {
    fn default() -> Self {
        Self::new()
    }
}

fn blank_field(taxpayer: &NewTaxpayer) -> Option<&'static str> {
    [
        ("firstName", &taxpayer.first_name),
        ("lastName", &taxpayer.last_name),
        ("address", &taxpayer.address),
    ]
    .into_iter()
    .find(|(_, value)| value.trim().is_empty())
    .map(|(name, _)| name)
}

impl TaxpayerClient for InMemoryTaxpayerClient {
    fn create_taxpayer(&self, taxpayer: NewTaxpayer) -> ClientFuture<CreateOutcome> {
        let client = self.clone();

        Box::pin(async move {
            client.check_available()?;
            let mut inner = client.inner.lock().await;

            if let Some(reason) = inner.reject_next_create.take() {
                tracing::info!(%reason, "In-memory backend rejecting create as instructed");
                return Ok(CreateOutcome::Rejected(reason));
            }

            if let Some(field) = blank_field(&taxpayer) {
                return Ok(CreateOutcome::Rejected(format!("{field} must not be empty")));
            }

            let tid = TaxpayerId::new(inner.next_tid);
            inner.next_tid = inner.next_tid.saturating_add(1);

            let created = taxpayer.with_tid(tid);
            inner.taxpayers.push(created.clone());
            tracing::debug!(%tid, "In-memory backend stored taxpayer");

            Ok(CreateOutcome::Created(created))
        })
    }

    fn get_all_taxpayers(&self) -> ClientFuture<Vec<Taxpayer>> {
        let client = self.clone();

        Box::pin(async move {
            client.check_available()?;
            Ok(client.inner.lock().await.taxpayers.clone())
        })
    }

    fn get_taxpayer_by_tid(&self, tid: TaxpayerId) -> ClientFuture<Option<Taxpayer>> {
        let client = self.clone();

        Box::pin(async move {
            client.check_available()?;
            let inner = client.inner.lock().await;
            Ok(inner.taxpayers.iter().find(|t| t.tid == tid).cloned())
        })
    }
}

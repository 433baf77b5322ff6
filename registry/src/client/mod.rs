//! The boundary to the registry backend.
//!
//! The backend owns storage and ID assignment. The controller reaches it only
//! through [`TaxpayerClient`], which has an HTTP implementation for real
//! deployments and an in-memory one for development and tests.

pub mod http;
pub mod memory;

pub use http::HttpTaxpayerClient;
pub use memory::InMemoryTaxpayerClient;

use crate::config::BackendConfig;
use crate::types::{NewTaxpayer, Taxpayer, TaxpayerId};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use thiserror::Error;

/// Client call result
pub type ClientResult<T> = Result<T, ClientError>;

/// Boxed future returned by client calls
pub type ClientFuture<T> = Pin<Box<dyn Future<Output = ClientResult<T>> + Send>>;

/// A remote call failed before producing a backend answer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// Connection, timeout, or other transport failure
    #[error("Request failed: {0}")]
    Transport(String),

    /// Backend answered with a non-success status
    #[error("Backend error (status {status}): {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body
        message: String,
    },

    /// Backend answer could not be decoded
    #[error("Response parsing failed: {0}")]
    Decode(String),

    /// Client could not be built from its configuration
    #[error("Invalid client configuration: {0}")]
    Configuration(String),
}

/// What the backend says about a create request
///
/// A rejection is an answer, not a failure of the call itself. On the wire
/// this is `{"ok": <taxpayer>}` or `{"err": "<reason>"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CreateOutcome {
    /// The taxpayer was stored under a backend-assigned ID
    #[serde(rename = "ok")]
    Created(Taxpayer),

    /// The backend refused the request
    #[serde(rename = "err")]
    Rejected(String),
}

/// Remote operations exposed by the registry backend
///
/// Futures are `'static` so they can be handed to the store as effects.
pub trait TaxpayerClient: Send + Sync {
    /// Store a new taxpayer; the backend assigns its ID
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the call itself fails.
    fn create_taxpayer(&self, taxpayer: NewTaxpayer) -> ClientFuture<CreateOutcome>;

    /// The full current set of taxpayers, in backend order
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the call itself fails.
    fn get_all_taxpayers(&self) -> ClientFuture<Vec<Taxpayer>>;

    /// The taxpayer with `tid`, if there is one
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the call itself fails.
    fn get_taxpayer_by_tid(&self, tid: TaxpayerId) -> ClientFuture<Option<Taxpayer>>;
}

/// The backend `config` selects: HTTP if a URL is set, else an empty
/// in-memory backend
///
/// # Errors
///
/// Returns `ClientError::Configuration` if the HTTP client cannot be built.
pub fn from_config(config: &BackendConfig) -> ClientResult<Arc<dyn TaxpayerClient>> {
    from_config_or(config, InMemoryTaxpayerClient::new())
}

/// Like [`from_config`], falling back to `fallback` when no URL is set
///
/// # Errors
///
/// Returns `ClientError::Configuration` if the HTTP client cannot be built.
pub fn from_config_or(
    config: &BackendConfig,
    fallback: InMemoryTaxpayerClient,
) -> ClientResult<Arc<dyn TaxpayerClient>> {
    match &config.url {
        Some(url) => {
            tracing::info!(%url, timeout_secs = config.timeout_secs, "Using HTTP registry backend");
            Ok(Arc::new(HttpTaxpayerClient::new(url.as_str(), config.timeout())?))
        },
        None => {
            tracing::info!("No backend URL configured, using in-memory registry backend");
            Ok(fallback.shared())
        },
    }
}

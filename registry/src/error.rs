//! Errors surfaced by the application facade.

use crate::client::ClientError;
use registry_runtime::StoreError;
use thiserror::Error;

/// Errors from setting up or driving a [`crate::RegistryApp`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The backend client could not be built
    #[error(transparent)]
    Client(#[from] ClientError),

    /// The controller store refused an action or did not settle
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result alias for facade operations
pub type Result<T> = std::result::Result<T, RegistryError>;

//! Environment dependencies for the registry reducer.

use crate::client::TaxpayerClient;
use crate::config::ResponsePolicy;
use std::sync::Arc;

/// Environment dependencies for the registry reducer
#[derive(Clone)]
pub struct AppEnvironment {
    /// Backend the controller calls
    pub client: Arc<dyn TaxpayerClient>,
    /// How overlapping list/search responses are resolved
    pub response_policy: ResponsePolicy,
}

impl AppEnvironment {
    /// Creates an environment with the default response policy
    #[must_use]
    pub fn new(client: Arc<dyn TaxpayerClient>) -> Self {
        Self {
            client,
            response_policy: ResponsePolicy::default(),
        }
    }

    /// Use `policy` for overlapping responses
    #[must_use]
    pub fn with_response_policy(mut self, policy: ResponsePolicy) -> Self {
        self.response_policy = policy;
        self
    }
}

impl std::fmt::Debug for AppEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppEnvironment")
            .field("response_policy", &self.response_policy)
            .finish_non_exhaustive()
    }
}

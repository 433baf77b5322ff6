//! The registry view's entry point: a store plus user-facing operations.

use super::{AppAction, AppEnvironment, AppReducer, AppState, AppView};
use crate::client::{self, TaxpayerClient};
use crate::config::Config;
use crate::error::Result;
use crate::form::FormField;
use crate::table::Column;
use registry_runtime::Store;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;

/// Store running the registry reducer
pub type RegistryStore = Store<AppState, AppAction, AppEnvironment, AppReducer>;

/// The registry view, driven the way a user drives it
///
/// Each method maps one user gesture to an action. Remote calls run in the
/// background; use [`RegistryApp::settle`] to wait for them and
/// [`RegistryApp::view`] to read the result.
#[derive(Clone)]
pub struct RegistryApp {
    store: RegistryStore,
}

impl RegistryApp {
    /// A view over `client` with default settings
    #[must_use]
    pub fn new(client: Arc<dyn TaxpayerClient>) -> Self {
        Self::with_environment(AppEnvironment::new(client), AppState::default())
    }

    /// A view with an explicit environment and starting state
    #[must_use]
    pub fn with_environment(environment: AppEnvironment, initial_state: AppState) -> Self {
        Self {
            store: Store::new(initial_state, AppReducer::new(), environment),
        }
    }

    /// A view over `client`, with page size and response policy from `config`
    #[must_use]
    pub fn with_client(config: &Config, client: Arc<dyn TaxpayerClient>) -> Self {
        let environment =
            AppEnvironment::new(client).with_response_policy(config.controller.response_policy);
        Self::with_environment(
            environment,
            AppState::with_rows_per_page(config.table.rows_per_page),
        )
    }

    /// A view over the backend `config` selects
    ///
    /// # Errors
    ///
    /// Returns [`crate::RegistryError::Client`] if the HTTP client cannot be built.
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = client::from_config(&config.backend)?;
        Ok(Self::with_client(config, client))
    }

    /// The underlying store
    #[must_use]
    pub const fn store(&self) -> &RegistryStore {
        &self.store
    }

    async fn send(&self, action: AppAction) -> Result<()> {
        Ok(self.store.send(action).await?)
    }

    /// Show the view; loads every record on the first call only
    ///
    /// # Errors
    ///
    /// Returns [`crate::RegistryError::Store`] after [`RegistryApp::unmount`].
    pub async fn mount(&self) -> Result<()> {
        self.send(AppAction::Mounted).await
    }

    /// Tear the view down; results still in flight are dropped
    pub fn unmount(&self) {
        self.store.close();
    }

    /// Reload every record
    ///
    /// # Errors
    ///
    /// Returns [`crate::RegistryError::Store`] after [`RegistryApp::unmount`].
    pub async fn refresh(&self) -> Result<()> {
        self.send(AppAction::FetchAll).await
    }

    /// Press "Add New TaxPayer"
    ///
    /// # Errors
    ///
    /// Returns [`crate::RegistryError::Store`] after [`RegistryApp::unmount`].
    pub async fn add_new(&self) -> Result<()> {
        self.send(AppAction::OpenForm).await
    }

    /// Type into the search box
    ///
    /// # Errors
    ///
    /// Returns [`crate::RegistryError::Store`] after [`RegistryApp::unmount`].
    pub async fn type_search(&self, text: impl Into<String>) -> Result<()> {
        self.send(AppAction::SearchInputChanged(text.into())).await
    }

    /// Press "Search"
    ///
    /// Text that is not an ID shows an inline error and nothing is looked up.
    ///
    /// # Errors
    ///
    /// Returns [`crate::RegistryError::Store`] after [`RegistryApp::unmount`].
    pub async fn search(&self) -> Result<()> {
        self.send(AppAction::SearchRequested).await
    }

    /// Type into a form field
    ///
    /// # Errors
    ///
    /// Returns [`crate::RegistryError::Store`] after [`RegistryApp::unmount`].
    pub async fn edit_field(&self, field: FormField, value: impl Into<String>) -> Result<()> {
        self.send(AppAction::FormFieldChanged {
            field,
            value: value.into(),
        })
        .await
    }

    /// Press "Add TaxPayer"
    ///
    /// Ignored while the form is closed.
    ///
    /// # Errors
    ///
    /// Returns [`crate::RegistryError::Store`] after [`RegistryApp::unmount`].
    pub async fn submit_form(&self) -> Result<()> {
        self.send(AppAction::FormSubmitted).await
    }

    /// Press "Cancel"
    ///
    /// # Errors
    ///
    /// Returns [`crate::RegistryError::Store`] after [`RegistryApp::unmount`].
    pub async fn cancel_form(&self) -> Result<()> {
        self.send(AppAction::CloseForm).await
    }

    /// Click a column header
    ///
    /// # Errors
    ///
    /// Returns [`crate::RegistryError::Store`] after [`RegistryApp::unmount`].
    pub async fn sort_by(&self, column: Column) -> Result<()> {
        self.send(AppAction::SortBy(column)).await
    }

    /// Pick a page (1-based)
    ///
    /// # Errors
    ///
    /// Returns [`crate::RegistryError::Store`] after [`RegistryApp::unmount`].
    pub async fn go_to_page(&self, page: usize) -> Result<()> {
        self.send(AppAction::PageChanged(page)).await
    }

    /// Pick a page size
    ///
    /// # Errors
    ///
    /// Returns [`crate::RegistryError::Store`] after [`RegistryApp::unmount`].
    pub async fn set_rows_per_page(&self, rows_per_page: usize) -> Result<()> {
        self.send(AppAction::RowsPerPageChanged(rows_per_page)).await
    }

    /// Close the error banner
    ///
    /// # Errors
    ///
    /// Returns [`crate::RegistryError::Store`] after [`RegistryApp::unmount`].
    pub async fn dismiss_error(&self) -> Result<()> {
        self.send(AppAction::DismissError).await
    }

    /// Snapshot of what the view shows now
    pub async fn view(&self) -> AppView {
        self.store.state(AppView::from_state).await
    }

    /// Wait until no remote call is in flight
    ///
    /// # Errors
    ///
    /// Returns [`crate::RegistryError::Store`] if calls are still running
    /// when `timeout` elapses.
    pub async fn settle(&self, timeout: Duration) -> Result<()> {
        Ok(self.store.wait_until_idle(timeout).await?)
    }

    /// Results of remote calls, as they are applied
    #[must_use]
    pub fn subscribe_actions(&self) -> broadcast::Receiver<AppAction> {
        self.store.subscribe_actions()
    }
}

impl std::fmt::Debug for RegistryApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryApp")
            .field("live", &self.store.is_live())
            .field("pending_effects", &self.store.pending_effects())
            .finish()
    }
}

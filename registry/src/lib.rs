//! # Taxpayer Registry
//!
//! Records management front end for a taxpayer registry: list every record,
//! look one up by ID, and add new ones through a form. Storage and ID
//! assignment belong to a remote backend reached through [`TaxpayerClient`];
//! this crate fetches, displays, and submits.
//!
//! ## Modules
//!
//! - [`types`]: `Taxpayer`, `NewTaxpayer`, `TaxpayerId`
//! - [`client`]: the backend boundary, with HTTP and in-memory implementations
//! - [`search`], [`form`], [`table`]: local state of the three widgets
//! - [`app`]: the controller reducer, its view snapshot, and [`RegistryApp`]
//! - [`config`]: environment-driven settings
//!
//! ## Example
//!
//! ```ignore
//! use taxpayer_registry::{InMemoryTaxpayerClient, RegistryApp};
//!
//! let app = RegistryApp::new(InMemoryTaxpayerClient::new().shared());
//! app.mount().await?;
//! app.settle(Duration::from_secs(5)).await?;
//!
//! println!("{}", app.view().await.render_text());
//! ```

pub mod app;
pub mod client;
pub mod config;
pub mod error;
pub mod form;
pub mod search;
pub mod table;
pub mod types;

pub use app::{AppAction, AppEnvironment, AppReducer, AppState, AppView, RegistryApp};
pub use client::{
    ClientError, CreateOutcome, HttpTaxpayerClient, InMemoryTaxpayerClient, TaxpayerClient,
};
pub use config::{Config, ResponsePolicy};
pub use error::RegistryError;
pub use form::FormField;
pub use table::{Column, SortDirection, TablePage};
pub use types::{InvalidTaxpayerId, NewTaxpayer, Taxpayer, TaxpayerId};

//! The registry controller.
//!
//! # Architecture
//!
//! ```text
//! user gesture → RegistryApp → AppAction → AppReducer
//!                                             ↓
//!                               state change + Effect (client call)
//!                                             ↓
//!                         Store runs the call, feeds result back
//!                                             ↓
//!                               AppAction::*Completed → AppReducer
//!                                             ↓
//!                                  AppView snapshot → table
//! ```
//!
//! The reducer owns the canonical record list and the loading flag. Records
//! are only ever replaced by what the backend returns: a list-all result, a
//! zero-or-one search result, or a full reload after a successful create.

pub mod actions;
pub mod environment;
pub mod reducer;
pub mod state;
pub mod store;
pub mod view;

pub use actions::AppAction;
pub use environment::AppEnvironment;
pub use reducer::AppReducer;
pub use state::{AppState, RequestId};
pub use store::{RegistryApp, RegistryStore};
pub use view::{AppView, FieldView, FormView, SearchView};

//! Search box state.
//!
//! Holds the raw text the user typed and the inline error of the last failed
//! search. Only text that parses as a [`TaxpayerId`] ever leaves this module.

use crate::types::{InvalidTaxpayerId, TaxpayerId};

/// Label shown next to the search input
pub const SEARCH_LABEL: &str = "Search by TID";

/// Text of the search button
pub const SEARCH_BUTTON: &str = "Search";

/// Search box: input text plus inline validation error
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchState {
    input: String,
    error: Option<InvalidTaxpayerId>,
}

impl SearchState {
    /// The text as typed
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Inline error from the last search attempt, if it failed
    #[must_use]
    pub const fn error(&self) -> Option<&InvalidTaxpayerId> {
        self.error.as_ref()
    }

    /// Replace the input text; any inline error goes away
    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
        self.error = None;
    }

    /// Parse the input as an ID
    ///
    /// On failure the error is kept for display and `None` is returned. The
    /// input text is left as typed either way.
    pub fn submit(&mut self) -> Option<TaxpayerId> {
        match self.input.parse::<TaxpayerId>() {
            Ok(tid) => {
                self.error = None;
                Some(tid)
            },
            Err(error) => {
                tracing::debug!(input = %self.input, %error, "Search input rejected");
                self.error = Some(error);
                None
            },
        }
    }
}

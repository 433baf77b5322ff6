//! Actions for the registry controller.

use super::state::RequestId;
use crate::client::{ClientError, CreateOutcome};
use crate::form::FormField;
use crate::table::Column;
use crate::types::{NewTaxpayer, Taxpayer, TaxpayerId};

/// Everything that can happen to the registry view
///
/// Commands come from the user; results come back from remote calls issued
/// by earlier commands and carry the [`RequestId`] they answer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AppAction {
    // ========== Lifecycle ==========
    /// The view was mounted; loads all records the first time
    Mounted,

    // ========== Controller commands ==========
    /// Load every record from the backend
    FetchAll,
    /// Replace the records with the result of a lookup
    SubmitSearch {
        /// ID to look up
        tid: TaxpayerId,
    },
    /// Create a taxpayer, then reload every record
    SubmitCreate(NewTaxpayer),
    /// Show the "Add New TaxPayer" dialog
    OpenForm,
    /// Hide the dialog; field values are kept
    CloseForm,

    // ========== Remote call results ==========
    /// `get_all_taxpayers` finished
    TaxpayersLoaded {
        /// Request this answers
        request: RequestId,
        /// Records in backend order, or why the call failed
        result: Result<Vec<Taxpayer>, ClientError>,
    },
    /// `get_taxpayer_by_tid` finished
    SearchCompleted {
        /// Request this answers
        request: RequestId,
        /// ID that was looked up
        tid: TaxpayerId,
        /// The record, if any, or why the call failed
        result: Result<Option<Taxpayer>, ClientError>,
    },
    /// `create_taxpayer` finished
    CreateCompleted {
        /// Request this answers
        request: RequestId,
        /// Backend verdict, or why the call failed
        result: Result<CreateOutcome, ClientError>,
    },

    // ========== View input ==========
    /// The search text changed
    SearchInputChanged(String),
    /// The search button was pressed
    SearchRequested,
    /// A form field was edited
    FormFieldChanged {
        /// Edited field
        field: FormField,
        /// New text
        value: String,
    },
    /// The form's submit button was pressed
    FormSubmitted,
    /// A column header was clicked
    SortBy(Column),
    /// A page was picked
    PageChanged(usize),
    /// A page size was picked
    RowsPerPageChanged(usize),
    /// The error banner was closed
    DismissError,
}

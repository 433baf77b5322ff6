//! Controller state.

use crate::form::FormState;
use crate::search::SearchState;
use crate::table::TableState;
use crate::types::Taxpayer;
use std::fmt;

/// Token identifying one issued remote call
///
/// Issued in strictly increasing order, so a later request always compares
/// greater than an earlier one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(u64);

impl RequestId {
    /// Wraps a raw request number
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Everything the registry view renders
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AppState {
    /// Working set, in backend order; replaced wholesale, never edited
    pub records: Vec<Taxpayer>,
    /// A remote call is in flight
    pub is_loading: bool,
    /// The "Add New TaxPayer" dialog is showing
    pub is_form_open: bool,
    /// Banner text for the last failed remote operation
    pub last_error: Option<String>,
    /// The initial load was issued
    pub mounted: bool,
    /// Dialog form
    pub form: FormState,
    /// Search box
    pub search: SearchState,
    /// Sort and pagination settings
    pub table: TableState,
    pub(crate) issued_requests: u64,
    pub(crate) latest_request: Option<RequestId>,
}

impl AppState {
    /// Empty state whose table shows `rows_per_page` rows
    #[must_use]
    pub fn with_rows_per_page(rows_per_page: usize) -> Self {
        Self {
            table: TableState::with_rows_per_page(rows_per_page),
            ..Self::default()
        }
    }

    /// The most recently issued request, if any
    #[must_use]
    pub const fn latest_request(&self) -> Option<RequestId> {
        self.latest_request
    }

    /// Whether `request` is the most recently issued one
    #[must_use]
    pub fn is_latest(&self, request: RequestId) -> bool {
        self.latest_request == Some(request)
    }

    /// Replace the working set and go back to the first page
    pub fn replace_records(&mut self, records: Vec<Taxpayer>) {
        self.records = records;
        self.table.reset_page();
    }

    /// Allocate the next request token and mark it latest
    pub(crate) fn issue_request(&mut self) -> RequestId {
        self.issued_requests += 1;
        let request = RequestId(self.issued_requests);
        self.latest_request = Some(request);
        request
    }
}

//! Read-only snapshot of what the registry view shows.

use super::state::AppState;
use crate::form::{CANCEL_BUTTON, FORM_TITLE, FormField, SUBMIT_BUTTON};
use crate::search::{SEARCH_BUTTON, SEARCH_LABEL};
use crate::table::TablePage;
use crate::types::Taxpayer;
use std::fmt::Write as _;

/// Page title
pub const TITLE: &str = "TaxPayer Records Management";

/// Text of the button that opens the form
pub const ADD_BUTTON: &str = "Add New TaxPayer";

/// Snapshot of the whole view, taken from [`AppState`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppView {
    /// Page title
    pub title: &'static str,
    /// Text of the button that opens the form
    pub add_button: &'static str,
    /// Working set, in backend order
    pub records: Vec<Taxpayer>,
    /// A remote call is in flight
    pub is_loading: bool,
    /// Current table page; `None` while loading, when a spinner shows instead
    pub table: Option<TablePage>,
    /// Error banner
    pub error_banner: Option<String>,
    /// Search box
    pub search: SearchView,
    /// Whether the form dialog is showing
    pub is_form_open: bool,
    /// Form dialog contents, kept even while closed
    pub form: FormView,
}

/// Search box snapshot
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchView {
    /// Input label
    pub label: &'static str,
    /// Button text
    pub button: &'static str,
    /// Text as typed
    pub input: String,
    /// Inline error
    pub error: Option<String>,
}

/// Form dialog snapshot
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormView {
    /// Dialog title
    pub title: &'static str,
    /// Fields in display order
    pub fields: Vec<FieldView>,
    /// Submit button text
    pub submit_button: &'static str,
    /// Cancel button text
    pub cancel_button: &'static str,
}

/// One form field
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldView {
    /// Which field
    pub field: FormField,
    /// Input label
    pub label: &'static str,
    /// Current text
    pub value: String,
    /// Inline error
    pub error: Option<&'static str>,
}

impl AppView {
    /// Snapshot `state`
    #[must_use]
    pub fn from_state(state: &AppState) -> Self {
        let fields = FormField::ALL
            .iter()
            .map(|&field| FieldView {
                field,
                label: field.label(),
                value: state.form.value(field).to_string(),
                error: state.form.error(field),
            })
            .collect();

        Self {
            title: TITLE,
            add_button: ADD_BUTTON,
            records: state.records.clone(),
            is_loading: state.is_loading,
            table: (!state.is_loading).then(|| state.table.view(&state.records)),
            error_banner: state.last_error.clone(),
            search: SearchView {
                label: SEARCH_LABEL,
                button: SEARCH_BUTTON,
                input: state.search.input().to_string(),
                error: state.search.error().map(ToString::to_string),
            },
            is_form_open: state.is_form_open,
            form: FormView {
                title: FORM_TITLE,
                fields,
                submit_button: SUBMIT_BUTTON,
                cancel_button: CANCEL_BUTTON,
            },
        }
    }

    /// Plain-text rendering: title, banner, and table or loading marker
    #[must_use]
    pub fn render_text(&self) -> String {
        let mut out = format!("{}\n\n", self.title);

        if let Some(error) = &self.error_banner {
            let _ = writeln!(out, "! {error}\n");
        }

        match &self.table {
            Some(page) => out.push_str(&page.render_text()),
            None => out.push_str("Loading...\n"),
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TaxpayerId;

    #[test]
    fn loading_hides_the_table() {
        let state = AppState {
            is_loading: true,
            records: vec![Taxpayer::new(TaxpayerId::new(1), "Ann", "Lee", "1 Main St")],
            ..AppState::default()
        };
        let view = AppView::from_state(&state);

        assert!(view.table.is_none());
        assert!(view.render_text().contains("Loading..."));
    }

    #[test]
    fn idle_view_carries_the_table_and_banner() {
        let state = AppState {
            records: vec![Taxpayer::new(TaxpayerId::new(1), "Ann", "Lee", "1 Main St")],
            last_error: Some("Error fetching tax payers: timeout".to_string()),
            ..AppState::default()
        };
        let view = AppView::from_state(&state);

        assert_eq!(view.table.as_ref().map(|t| t.total_rows), Some(1));
        let text = view.render_text();
        assert!(text.starts_with("TaxPayer Records Management\n"));
        assert!(text.contains("! Error fetching tax payers: timeout"));
        assert!(text.contains("Ann"));
    }

    #[test]
    fn form_fields_appear_in_order_with_labels() {
        let view = AppView::from_state(&AppState::default());
        let labels: Vec<_> = view.form.fields.iter().map(|f| f.label).collect();

        assert_eq!(labels, ["First Name", "Last Name", "Address"]);
        assert_eq!(view.form.title, "Add New TaxPayer");
        assert_eq!(view.search.label, "Search by TID");
        assert!(!view.is_form_open);
    }
}

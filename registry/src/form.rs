//! The "Add New TaxPayer" dialog form.
//!
//! Three required text fields. Validation runs on submit; after a failed
//! submit, each edit re-checks the edited field so errors clear as the user
//! fixes them.

use crate::types::NewTaxpayer;
use std::collections::BTreeMap;

/// Dialog title
pub const FORM_TITLE: &str = "Add New TaxPayer";

/// Text of the submit button
pub const SUBMIT_BUTTON: &str = "Add TaxPayer";

/// Text of the cancel button
pub const CANCEL_BUTTON: &str = "Cancel";

/// A field of the form
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormField {
    /// Given name
    FirstName,
    /// Family name
    LastName,
    /// Postal address
    Address,
}

impl FormField {
    /// All fields, in display order
    pub const ALL: [Self; 3] = [Self::FirstName, Self::LastName, Self::Address];

    /// Label shown on the input
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::FirstName => "First Name",
            Self::LastName => "Last Name",
            Self::Address => "Address",
        }
    }

    /// Inline message shown when the field is left empty
    #[must_use]
    pub const fn required_message(self) -> &'static str {
        match self {
            Self::FirstName => "First name is required",
            Self::LastName => "Last name is required",
            Self::Address => "Address is required",
        }
    }
}

/// Field values and their validation errors
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormState {
    first_name: String,
    last_name: String,
    address: String,
    errors: BTreeMap<FormField, &'static str>,
    submit_attempted: bool,
}

impl FormState {
    /// Current value of `field`
    #[must_use]
    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::FirstName => &self.first_name,
            FormField::LastName => &self.last_name,
            FormField::Address => &self.address,
        }
    }

    /// Inline error for `field`, if any
    #[must_use]
    pub fn error(&self, field: FormField) -> Option<&'static str> {
        self.errors.get(&field).copied()
    }

    /// Whether any field currently shows an error
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Update a field as the user types
    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) {
        let value = value.into();
        match field {
            FormField::FirstName => self.first_name = value,
            FormField::LastName => self.last_name = value,
            FormField::Address => self.address = value,
        }

        if self.submit_attempted {
            self.validate_field(field);
        }
    }

    /// Validate every field
    ///
    /// Returns the new taxpayer if all are filled in, and clears the form.
    /// Otherwise the field errors are kept for display and nothing is emitted.
    pub fn submit(&mut self) -> Option<NewTaxpayer> {
        self.submit_attempted = true;
        for field in FormField::ALL {
            self.validate_field(field);
        }

        if self.has_errors() {
            tracing::debug!(errors = self.errors.len(), "Form submit blocked by validation");
            return None;
        }

        let taxpayer = NewTaxpayer::new(
            std::mem::take(&mut self.first_name),
            std::mem::take(&mut self.last_name),
            std::mem::take(&mut self.address),
        );
        self.reset();
        Some(taxpayer)
    }

    /// Clear values, errors, and the submit-attempted mode
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    // Presence only: whitespace counts as filled in.
    fn validate_field(&mut self, field: FormField) {
        if self.value(field).is_empty() {
            self.errors.insert(field, field.required_message());
        } else {
            self.errors.remove(&field);
        }
    }
}

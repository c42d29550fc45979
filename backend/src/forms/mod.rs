//! Request-scoped form validation.
//!
//! A form is validated in two passes that never short-circuit each other:
//! the schema pass (`validator` derive attributes on the form struct) and the
//! rule pass (an ordered list of named checks that see the whole form). Every
//! failure from both passes ends up in a single [`FieldErrors`] set.

pub mod profile;
pub mod registration;

use std::collections::BTreeMap;

use serde::Serialize;
use utoipa::ToSchema;
use validator::{Validate, ValidationErrors};

pub use profile::{ProfileForm, UploadedFile, ValidatedProfile};
pub use registration::{RegistrationForm, ValidatedUser};

/// Field name -> human-readable messages, in the order they were raised.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn merge(&mut self, other: FieldErrors) {
        for (field, messages) in other.0 {
            self.0.entry(field).or_default().extend(messages);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Total number of messages across all fields.
    pub fn len(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }
}

impl From<ValidationErrors> for FieldErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut out = FieldErrors::new();
        for (field, errs) in errors.field_errors() {
            for e in errs.iter() {
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string());
                out.add(field.to_string(), message);
            }
        }
        out
    }
}

/// Strips surrounding whitespace in place, as text inputs are cleaned before
/// validation. A whitespace-only value becomes empty.
pub fn strip(value: &mut String) {
    let trimmed = value.trim();
    if trimmed.len() != value.len() {
        *value = trimmed.to_string();
    }
}

/// A named check over the whole form that reports on one field.
pub struct FieldRule<F> {
    pub name: &'static str,
    pub field: &'static str,
    pub check: fn(&F) -> Option<String>,
}

/// Runs every rule in order, recording each failure under its field.
pub fn run_rules<F>(form: &F, rules: &[FieldRule<F>], errors: &mut FieldErrors) {
    for rule in rules {
        if let Some(message) = (rule.check)(form) {
            tracing::trace!(rule = rule.name, field = rule.field, "form rule failed");
            errors.add(rule.field, message);
        }
    }
}

/// A submitted form that maps onto a plain validated record.
pub trait Form: Validate + Sized + 'static {
    type Validated;

    /// Cross-field and per-field checks, run after the schema pass.
    fn rules() -> &'static [FieldRule<Self>];

    fn into_validated(self) -> Self::Validated;

    /// Normalizes submitted values before any check runs.
    fn clean(&mut self) {}

    fn validate_form(mut self) -> Result<Self::Validated, FieldErrors> {
        self.clean();
        let mut errors = match self.validate() {
            Ok(()) => FieldErrors::new(),
            Err(e) => FieldErrors::from(e),
        };
        run_rules(&self, Self::rules(), &mut errors);

        if errors.is_empty() {
            Ok(self.into_validated())
        } else {
            Err(errors)
        }
    }
}

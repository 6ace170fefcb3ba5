//! Field-level form validation shared by the checkout and payment forms.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Why a single field was rejected
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldError {
    /// Required field left blank
    #[error("This field is required")]
    Required,

    /// Text does not look like an email address
    #[error("Enter a valid email address")]
    InvalidEmail,
}

/// Errors keyed by field, in field order
///
/// An empty set means the form is valid.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldErrors<F: Ord> {
    errors: BTreeMap<F, FieldError>,
}

impl<F: Ord> Default for FieldErrors<F> {
    fn default() -> Self {
        Self {
            errors: BTreeMap::new(),
        }
    }
}

impl<F: Ord + Copy> FieldErrors<F> {
    /// No errors
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error; the first error for a field wins
    pub fn insert(&mut self, field: F, error: FieldError) {
        self.errors.entry(field).or_insert(error);
    }

    /// Record [`FieldError::Required`] when `value` is blank
    pub fn require(&mut self, field: F, value: &str) {
        if value.trim().is_empty() {
            self.insert(field, FieldError::Required);
        }
    }

    /// Error for one field
    #[must_use]
    pub fn get(&self, field: F) -> Option<FieldError> {
        self.errors.get(&field).copied()
    }

    /// Whether every field passed
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of rejected fields
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Rejected fields with their errors
    pub fn iter(&self) -> impl Iterator<Item = (F, FieldError)> + '_ {
        self.errors.iter().map(|(field, error)| (*field, *error))
    }
}

/// Basic email shape check
///
/// One `@`, non-empty local part, and a dotted domain without empty labels.
///
/// # Examples
///
/// ```
/// use storefront::validation::is_valid_email;
///
/// assert!(is_valid_email("ada@example.com"));
/// assert!(is_valid_email("ada+shop@mail.example.com.tr"));
/// assert!(!is_valid_email("ada"));
/// assert!(!is_valid_email("@example.com"));
/// assert!(!is_valid_email("ada@example"));
/// ```
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    if !(3..=255).contains(&email.len()) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    let local_ok = !local.is_empty()
        && local
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '.' | '-' | '+' | '_'));

    let domain_ok = domain.contains('.')
        && domain.split('.').all(|label| !label.is_empty())
        && domain
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '.' | '-'));

    local_ok && domain_ok
}

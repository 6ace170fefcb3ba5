//! Checkout Form: shipping and contact details.

use crate::validation::{FieldError, FieldErrors, is_valid_email};
use serde::{Deserialize, Serialize};

/// Fields of the checkout form, in display order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutField {
    /// Full name
    FullName,
    /// Email address
    Email,
    /// Phone number
    Phone,
    /// Shipping address
    Address,
}

/// Shipping and contact details
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutDetails {
    /// Required
    pub full_name: String,
    /// Required, must look like an email address
    pub email: String,
    /// Optional
    pub phone: Option<String>,
    /// Optional
    pub address: Option<String>,
}

impl CheckoutDetails {
    /// Details with the required fields only
    #[must_use]
    pub fn new(full_name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
            email: email.into(),
            phone: None,
            address: None,
        }
    }

    /// Sets the phone number
    #[must_use]
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    /// Sets the shipping address
    #[must_use]
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Trims every field; blank optional fields become `None`
    #[must_use]
    pub fn normalized(self) -> Self {
        fn optional(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        }

        Self {
            full_name: self.full_name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: optional(self.phone),
            address: optional(self.address),
        }
    }

    /// Field-level errors; empty when the details may proceed to payment
    #[must_use]
    pub fn validate(&self) -> FieldErrors<CheckoutField> {
        let mut errors = FieldErrors::new();

        errors.require(CheckoutField::FullName, &self.full_name);
        errors.require(CheckoutField::Email, &self.email);
        if !is_valid_email(self.email.trim()) {
            errors.insert(CheckoutField::Email, FieldError::InvalidEmail);
        }

        errors
    }
}

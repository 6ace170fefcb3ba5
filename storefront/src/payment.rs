//! Payment Form.
//!
//! The gateway is simulated: fields are only checked for presence. No card
//! checksum or expiry date arithmetic is performed.

use crate::validation::FieldErrors;
use serde::{Deserialize, Serialize};

/// Country preselected on the payment form
pub const DEFAULT_COUNTRY: &str = "Türkiye";

/// Fields of the payment form, in display order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentField {
    /// Card number
    CardNumber,
    /// Expiry (free text, e.g. `12/27`)
    Expiry,
    /// Card security code
    Cvc,
    /// Billing country
    Country,
}

/// Payment details as entered
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentFields {
    /// Card number
    pub card_number: String,
    /// Expiry
    pub expiry: String,
    /// Security code
    pub cvc: String,
    /// Billing country
    pub country: String,
}

impl PaymentFields {
    /// Fields for a card, billed to [`DEFAULT_COUNTRY`]
    #[must_use]
    pub fn new(
        card_number: impl Into<String>,
        expiry: impl Into<String>,
        cvc: impl Into<String>,
    ) -> Self {
        Self {
            card_number: card_number.into(),
            expiry: expiry.into(),
            cvc: cvc.into(),
            country: DEFAULT_COUNTRY.to_string(),
        }
    }

    /// Sets the billing country
    #[must_use]
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = country.into();
        self
    }

    /// Field-level errors; empty when the order may be placed
    #[must_use]
    pub fn validate(&self) -> FieldErrors<PaymentField> {
        let mut errors = FieldErrors::new();
        errors.require(PaymentField::CardNumber, &self.card_number);
        errors.require(PaymentField::Expiry, &self.expiry);
        errors.require(PaymentField::Cvc, &self.cvc);
        errors.require(PaymentField::Country, &self.country);
        errors
    }
}

impl Default for PaymentFields {
    fn default() -> Self {
        Self::new("", "", "")
    }
}

// Card data never reaches logs
impl std::fmt::Debug for PaymentFields {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentFields")
            .field("card_number", &"<redacted>")
            .field("expiry", &"<redacted>")
            .field("cvc", &"<redacted>")
            .field("country", &self.country)
            .finish()
    }
}

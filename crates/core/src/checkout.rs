//! Checkout
//!
//! Checkout form input, its validation, and the submission projected from it. Card fields and
//! the wallet confirmation only exist on [`PaymentInput`]; [`CheckoutSubmission`] has no place
//! to put them.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Digits in a card number.
pub const CARD_NUMBER_DIGITS: usize = 16;

/// Digits in a card verification value.
pub const CVV_DIGITS: usize = 3;

/// Payment methods accepted at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    /// Debit or credit card.
    #[serde(rename = "TARJETA")]
    Card,

    /// Mobile wallet paid by scanning a QR code.
    #[serde(rename = "YAPE")]
    WalletQr,

    /// Cash handed over on delivery.
    #[serde(rename = "EFECTIVO")]
    CashOnDelivery,
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Card => "card",
            Self::WalletQr => "wallet (QR)",
            Self::CashOnDelivery => "cash on delivery",
        })
    }
}

/// Card entry fields. Validated locally, never transmitted.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct CardDetails {
    /// Card number, separators allowed
    pub number: String,

    /// Card holder name
    pub holder: String,

    /// Expiry as typed, e.g. `12/27`
    pub expiry: String,

    /// Card verification value
    pub cvv: String,
}

impl fmt::Debug for CardDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardDetails")
            .field("number", &"**redacted**")
            .field("holder", &self.holder)
            .field("expiry", &"**redacted**")
            .field("cvv", &"**redacted**")
            .finish()
    }
}

/// Payment method selection together with its method-specific input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentInput {
    /// Card payment with the entered card fields.
    Card(CardDetails),

    /// Wallet payment; `confirmed` is the customer's own assertion that they paid.
    WalletQr {
        /// "I completed the payment" checkbox
        confirmed: bool,
    },

    /// Cash on delivery; no extra input.
    CashOnDelivery,
}

impl PaymentInput {
    /// The method tag for this input.
    pub fn method(&self) -> PaymentMethod {
        match self {
            Self::Card(_) => PaymentMethod::Card,
            Self::WalletQr { .. } => PaymentMethod::WalletQr,
            Self::CashOnDelivery => PaymentMethod::CashOnDelivery,
        }
    }

    /// Empty input for the given method.
    pub fn blank(method: PaymentMethod) -> Self {
        match method {
            PaymentMethod::Card => Self::Card(CardDetails::default()),
            PaymentMethod::WalletQr => Self::WalletQr { confirmed: false },
            PaymentMethod::CashOnDelivery => Self::CashOnDelivery,
        }
    }

    fn validate(&self) -> Result<(), CheckoutError> {
        match self {
            Self::Card(card) => validate_card(card),
            Self::WalletQr { confirmed: false } => Err(CheckoutError::WalletPaymentUnconfirmed),
            Self::WalletQr { confirmed: true } | Self::CashOnDelivery => Ok(()),
        }
    }
}

/// Form field a validation failure refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutField {
    /// Delivery address
    Address,
    /// Contact phone
    Phone,
    /// Payment method selector
    PaymentMethod,
    /// Card number
    CardNumber,
    /// Card holder name
    CardHolder,
    /// Card expiry
    CardExpiry,
    /// Card verification value
    CardCvv,
    /// Wallet payment confirmation checkbox
    WalletConfirmation,
}

/// Checkout validation failures, in the order they are checked.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum CheckoutError {
    /// Delivery address is empty.
    #[error("enter a delivery address")]
    MissingAddress,

    /// Contact phone is empty.
    #[error("enter a contact phone")]
    MissingPhone,

    /// No payment method selected.
    #[error("select a payment method")]
    MissingPaymentMethod,

    /// Card number does not have exactly 16 digits.
    #[error("card number must have 16 digits")]
    InvalidCardNumber,

    /// Card holder name is empty.
    #[error("enter the card holder name")]
    MissingCardHolder,

    /// Card expiry is empty.
    #[error("enter the card expiry date")]
    MissingCardExpiry,

    /// CVV does not have exactly 3 digits.
    #[error("CVV must have 3 digits")]
    InvalidCvv,

    /// Wallet payment selected but not confirmed by the customer.
    #[error("confirm that you completed the wallet payment")]
    WalletPaymentUnconfirmed,
}

impl CheckoutError {
    /// The form field this failure refers to.
    pub fn field(self) -> CheckoutField {
        match self {
            Self::MissingAddress => CheckoutField::Address,
            Self::MissingPhone => CheckoutField::Phone,
            Self::MissingPaymentMethod => CheckoutField::PaymentMethod,
            Self::InvalidCardNumber => CheckoutField::CardNumber,
            Self::MissingCardHolder => CheckoutField::CardHolder,
            Self::MissingCardExpiry => CheckoutField::CardExpiry,
            Self::InvalidCvv => CheckoutField::CardCvv,
            Self::WalletPaymentUnconfirmed => CheckoutField::WalletConfirmation,
        }
    }
}

/// Checkout form state as entered by the customer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutForm {
    /// Delivery address
    pub address: String,

    /// Contact phone
    pub phone: String,

    /// Selected payment method and its input
    pub payment: Option<PaymentInput>,
}

impl CheckoutForm {
    /// Validate the form and project it into a submission.
    ///
    /// Rules run in order and the first failure is returned.
    ///
    /// # Errors
    ///
    /// Returns the first [`CheckoutError`] encountered.
    pub fn validate(&self) -> Result<CheckoutSubmission, CheckoutError> {
        let address = self.address.trim();

        if address.is_empty() {
            return Err(CheckoutError::MissingAddress);
        }

        let phone = self.phone.trim();

        if phone.is_empty() {
            return Err(CheckoutError::MissingPhone);
        }

        let payment = self
            .payment
            .as_ref()
            .ok_or(CheckoutError::MissingPaymentMethod)?;

        payment.validate()?;

        Ok(CheckoutSubmission {
            address: address.to_string(),
            phone: phone.to_string(),
            method: payment.method(),
        })
    }
}

/// The order submission: delivery details and the payment method tag, nothing else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSubmission {
    address: String,
    phone: String,
    method: PaymentMethod,
}

impl CheckoutSubmission {
    /// Delivery address
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Contact phone
    pub fn phone(&self) -> &str {
        &self.phone
    }

    /// Payment method
    pub fn method(&self) -> PaymentMethod {
        self.method
    }
}

/// Order number issued when an order is created.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderReference(String);

impl OrderReference {
    /// Wrap an order number.
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    /// The order number as text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn validate_card(card: &CardDetails) -> Result<(), CheckoutError> {
    let digits: String = card
        .number
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect();

    if digits.len() != CARD_NUMBER_DIGITS || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(CheckoutError::InvalidCardNumber);
    }

    if card.holder.trim().is_empty() {
        return Err(CheckoutError::MissingCardHolder);
    }

    if card.expiry.trim().is_empty() {
        return Err(CheckoutError::MissingCardExpiry);
    }

    let cvv = card.cvv.trim();

    if cvv.len() != CVV_DIGITS || !cvv.chars().all(|c| c.is_ascii_digit()) {
        return Err(CheckoutError::InvalidCvv);
    }

    Ok(())
}

/// Format a card number as typed into groups of four digits, dropping anything else.
pub fn format_card_number(input: &str) -> String {
    let digits: Vec<char> = input
        .chars()
        .filter(char::is_ascii_digit)
        .take(CARD_NUMBER_DIGITS)
        .collect();

    digits
        .chunks(4)
        .map(|group| group.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Format an expiry date as typed into `MM/YY`.
pub fn format_expiry(input: &str) -> String {
    let digits: String = input.chars().filter(char::is_ascii_digit).take(4).collect();

    if digits.len() > 2 {
        let (month, year) = digits.split_at(2);

        format!("{month}/{year}")
    } else {
        digits
    }
}

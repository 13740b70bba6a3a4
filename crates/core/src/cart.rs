//! Cart

use std::collections::BTreeSet;

use jiff::civil::DateTime;
use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

use crate::{
    ids::{LineId, SupplierId},
    pricing::{line_total, total_price},
    products::Offer,
    quantity::QuantityBounds,
};

mod table;

pub use table::CartTableError;

/// Errors related to cart construction or totals.
#[derive(Debug, Error)]
pub enum CartError {
    /// A line's currency differs from the cart currency (line id, line currency, cart currency).
    #[error("Line {0} has currency {1}, but cart has currency {2}")]
    CurrencyMismatch(LineId, &'static str, &'static str),
}

/// One product offer held in the cart.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    /// Server-assigned line id
    pub id: LineId,

    /// Product offer the line refers to
    pub offer: Offer,

    /// Units ordered
    pub quantity: u32,

    /// When the line was first added, if the server reports it
    pub added_at: Option<DateTime>,
}

impl CartLine {
    /// Quantity bounds for this line.
    pub fn bounds(&self) -> QuantityBounds {
        self.offer.bounds
    }

    /// Supplier id of the line's offer.
    pub fn supplier_id(&self) -> SupplierId {
        self.offer.supplier.id
    }

    /// Quantity multiplied by unit price.
    pub fn subtotal(&self) -> Money<'static, Currency> {
        line_total(&self.offer.unit_price, self.quantity)
    }

    /// Whether the line can still be ordered as-is.
    pub fn is_orderable(&self) -> bool {
        self.offer.is_orderable()
    }

    /// Copy of this line with a different quantity.
    #[must_use]
    pub fn with_quantity(&self, quantity: u32) -> Self {
        Self {
            quantity,
            ..self.clone()
        }
    }
}

/// Totals derived from a list of lines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CartTotals {
    /// Sum of line subtotals
    pub subtotal: Money<'static, Currency>,

    /// Sum of quantities
    pub total_units: u64,

    /// Number of distinct lines
    pub line_count: usize,

    /// Number of unique suppliers across lines
    pub distinct_suppliers: usize,
}

impl CartTotals {
    /// Compute totals for any list of lines.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if a line is priced in another currency.
    pub fn from_lines(lines: &[CartLine], currency: &'static Currency) -> Result<Self, MoneyError> {
        Ok(Self {
            subtotal: total_price(lines.iter().map(CartLine::subtotal), currency)?,
            total_units: lines.iter().map(|line| u64::from(line.quantity)).sum(),
            line_count: lines.len(),
            distinct_suppliers: lines
                .iter()
                .map(CartLine::supplier_id)
                .collect::<BTreeSet<_>>()
                .len(),
        })
    }
}

/// The lines held by one session.
#[derive(Debug, Clone, PartialEq)]
pub struct Cart {
    lines: Vec<CartLine>,
    currency: &'static Currency,
}

impl Cart {
    /// Create an empty cart in the given currency.
    pub fn new(currency: &'static Currency) -> Self {
        Self {
            lines: Vec::new(),
            currency,
        }
    }

    /// Create a cart with the given lines.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::CurrencyMismatch`] if a line is priced in another currency.
    pub fn with_lines(
        lines: impl Into<Vec<CartLine>>,
        currency: &'static Currency,
    ) -> Result<Self, CartError> {
        let lines = lines.into();

        lines.iter().try_for_each(|line| {
            let line_currency = line.offer.unit_price.currency();

            if line_currency == currency {
                Ok(())
            } else {
                Err(CartError::CurrencyMismatch(
                    line.id,
                    line_currency.iso_alpha_code,
                    currency.iso_alpha_code,
                ))
            }
        })?;

        Ok(Self { lines, currency })
    }

    /// All lines, in server order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Look up a line by id.
    pub fn line(&self, id: LineId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.id == id)
    }

    /// Lines that cannot be ordered: withdrawn products, or stock below the minimum.
    pub fn unavailable_lines(&self) -> impl Iterator<Item = &CartLine> {
        self.lines.iter().filter(|line| !line.is_orderable())
    }

    /// Calculate the subtotal of the cart.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if line currencies disagree.
    pub fn subtotal(&self) -> Result<Money<'static, Currency>, MoneyError> {
        total_price(self.lines.iter().map(CartLine::subtotal), self.currency)
    }

    /// Sum of all line quantities.
    pub fn total_units(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Number of unique suppliers represented in the cart.
    pub fn distinct_suppliers(&self) -> usize {
        self.lines
            .iter()
            .map(CartLine::supplier_id)
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// Compute every derived total from the current lines.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if line currencies disagree.
    pub fn totals(&self) -> Result<CartTotals, MoneyError> {
        CartTotals::from_lines(&self.lines, self.currency)
    }

    /// Get the number of lines in the cart.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Get the currency of the cart.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }
}

//! Products

use rusty_money::{Money, iso::Currency};

use crate::{
    ids::{ProductId, SupplierId},
    quantity::{BoundsViolation, QuantityBounds},
};

/// An independent supplier selling through the marketplace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Supplier {
    /// Supplier id
    pub id: SupplierId,

    /// Company display name
    pub name: String,
}

/// A product as offered by one supplier, read from the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct Offer {
    /// Product id
    pub id: ProductId,

    /// Product display name
    pub name: String,

    /// Unit price
    pub unit_price: Money<'static, Currency>,

    /// Minimum order quantity and stock ceiling
    pub bounds: QuantityBounds,

    /// Unit of measure label, e.g. "kg" or "box"
    pub unit_of_measure: String,

    /// Whether the product is still on sale
    pub available: bool,

    /// Supplier selling the product
    pub supplier: Supplier,
}

impl Offer {
    /// Whether the offer can be ordered at all.
    pub fn is_orderable(&self) -> bool {
        self.available && self.bounds.is_orderable()
    }

    /// Validate a requested quantity against availability and bounds.
    ///
    /// # Errors
    ///
    /// Returns [`BoundsViolation::Unavailable`] for withdrawn products, otherwise the bound the
    /// quantity violates.
    pub fn check_quantity(&self, quantity: u32) -> Result<u32, BoundsViolation> {
        if !self.available {
            return Err(BoundsViolation::Unavailable);
        }

        self.bounds.check(quantity)
    }
}

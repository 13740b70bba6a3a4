//! Quantity Bounds

use std::fmt;

use thiserror::Error;

/// Reasons a requested quantity cannot be applied to a line or offer.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum BoundsViolation {
    /// Increment attempted while already at the stock ceiling.
    #[error("stock ceiling reached ({ceiling} available)")]
    StockCeilingReached {
        /// Units currently in stock.
        ceiling: u32,
    },

    /// Quantity would drop below the supplier's minimum order quantity.
    #[error("minimum quantity is {minimum}")]
    MinimumQuantity {
        /// Smallest quantity the supplier accepts.
        minimum: u32,
    },

    /// Quantity exceeds the units in stock.
    #[error("insufficient stock: {available} available")]
    InsufficientStock {
        /// Units currently in stock.
        available: u32,
    },

    /// Stock is below the minimum order quantity, so no quantity is valid.
    #[error("unavailable: {ceiling} in stock, minimum order is {minimum}")]
    Unorderable {
        /// Smallest quantity the supplier accepts.
        minimum: u32,

        /// Units currently in stock.
        ceiling: u32,
    },

    /// The product has been withdrawn from sale.
    #[error("product is not available")]
    Unavailable,
}

/// Which bound a clamped quantity was pulled to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppliedBound {
    /// Raised to the minimum order quantity.
    Minimum(u32),

    /// Lowered to the stock ceiling.
    StockCeiling(u32),
}

impl fmt::Display for AppliedBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Minimum(minimum) => write!(f, "minimum order is {minimum}"),
            Self::StockCeiling(ceiling) => write!(f, "only {ceiling} available"),
        }
    }
}

/// Result of clamping a directly entered quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clamped {
    /// Quantity after clamping.
    pub quantity: u32,

    /// Bound that was applied, if the request was out of range.
    pub applied: Option<AppliedBound>,
}

/// Per-line quantity constraints supplied by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantityBounds {
    minimum: u32,
    ceiling: u32,
}

impl QuantityBounds {
    /// Create bounds from a minimum order quantity and a stock ceiling.
    ///
    /// A minimum of zero is treated as one; a line always holds at least one unit.
    pub fn new(minimum: u32, ceiling: u32) -> Self {
        Self {
            minimum: minimum.max(1),
            ceiling,
        }
    }

    /// Minimum order quantity.
    pub fn minimum(&self) -> u32 {
        self.minimum
    }

    /// Stock ceiling.
    pub fn ceiling(&self) -> u32 {
        self.ceiling
    }

    /// Whether any quantity satisfies both bounds.
    pub fn is_orderable(&self) -> bool {
        self.ceiling >= self.minimum
    }

    /// Whether `quantity` lies within `[minimum, ceiling]`.
    pub fn contains(&self, quantity: u32) -> bool {
        (self.minimum..=self.ceiling).contains(&quantity)
    }

    /// Check a requested quantity, e.g. before adding an offer to the cart.
    ///
    /// # Errors
    ///
    /// Returns the violated bound.
    pub fn check(&self, quantity: u32) -> Result<u32, BoundsViolation> {
        self.ensure_orderable()?;

        if quantity < self.minimum {
            return Err(BoundsViolation::MinimumQuantity {
                minimum: self.minimum,
            });
        }

        if quantity > self.ceiling {
            return Err(BoundsViolation::InsufficientStock {
                available: self.ceiling,
            });
        }

        Ok(quantity)
    }

    /// Quantity after a single-step increment from `current`.
    ///
    /// # Errors
    ///
    /// Returns [`BoundsViolation::StockCeilingReached`] when `current` is already at or above
    /// the ceiling.
    pub fn increment(&self, current: u32) -> Result<u32, BoundsViolation> {
        self.ensure_orderable()?;

        if current >= self.ceiling {
            return Err(BoundsViolation::StockCeilingReached {
                ceiling: self.ceiling,
            });
        }

        Ok(current + 1)
    }

    /// Quantity after a single-step decrement from `current`.
    ///
    /// # Errors
    ///
    /// Returns [`BoundsViolation::MinimumQuantity`] when `current` is already at or below the
    /// minimum.
    pub fn decrement(&self, current: u32) -> Result<u32, BoundsViolation> {
        self.ensure_orderable()?;

        if current <= self.minimum {
            return Err(BoundsViolation::MinimumQuantity {
                minimum: self.minimum,
            });
        }

        Ok(current - 1)
    }

    /// Clamp a directly entered quantity to the nearest bound.
    ///
    /// # Errors
    ///
    /// Returns [`BoundsViolation::Unorderable`] when no quantity is valid.
    pub fn clamp(&self, requested: u32) -> Result<Clamped, BoundsViolation> {
        self.ensure_orderable()?;

        let clamped = if requested < self.minimum {
            Clamped {
                quantity: self.minimum,
                applied: Some(AppliedBound::Minimum(self.minimum)),
            }
        } else if requested > self.ceiling {
            Clamped {
                quantity: self.ceiling,
                applied: Some(AppliedBound::StockCeiling(self.ceiling)),
            }
        } else {
            Clamped {
                quantity: requested,
                applied: None,
            }
        };

        Ok(clamped)
    }

    fn ensure_orderable(&self) -> Result<(), BoundsViolation> {
        if self.is_orderable() {
            Ok(())
        } else {
            Err(BoundsViolation::Unorderable {
                minimum: self.minimum,
                ceiling: self.ceiling,
            })
        }
    }
}

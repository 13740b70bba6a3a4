//! Bazaar prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartError, CartLine, CartTableError, CartTotals},
    checkout::{
        CardDetails, CheckoutError, CheckoutField, CheckoutForm, CheckoutSubmission,
        OrderReference, PaymentInput, PaymentMethod, format_card_number, format_expiry,
    },
    ids::{LineId, ProductId, SupplierId, TypedId},
    pricing::{line_total, total_price},
    products::{Offer, Supplier},
    quantity::{AppliedBound, BoundsViolation, Clamped, QuantityBounds},
};

//! Checkout errors.

use bazaar::checkout::{CheckoutError, OrderReference};
use thiserror::Error;

use crate::{carts::CartActionError, store::StoreError};

/// Why the checkout page sends the customer back to the cart.
#[derive(Debug, Error)]
pub enum RedirectToCart {
    #[error("your cart is empty")]
    EmptyCart,

    #[error("sign in to check out")]
    SignedOut,

    #[error("could not load the cart: {0}")]
    LoadFailed(#[source] StoreError),
}

/// Why a submit did not produce an order.
#[derive(Debug, Error)]
pub enum CheckoutFailure {
    #[error(transparent)]
    Invalid(#[from] CheckoutError),

    #[error("could not place the order: {0}")]
    Rejected(#[source] CartActionError),

    #[error("an order is already being submitted")]
    InProgress,

    #[error("order {0} was already placed")]
    AlreadyPlaced(OrderReference),
}

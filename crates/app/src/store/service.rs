//! Cart store service.

use async_trait::async_trait;
use bazaar::{
    cart::{Cart, CartLine},
    checkout::{CheckoutSubmission, OrderReference},
    ids::{LineId, ProductId},
};
use mockall::automock;

use crate::store::StoreError;

/// Remote cart and order operations for the signed-in session.
///
/// Every call is authenticated with the session's bearer token. Implementations fail with
/// [`StoreError::Unauthorized`] before any I/O when there is none.
#[automock]
#[async_trait]
pub trait CartStore: Send + Sync {
    /// Add `quantity` units of a product. Returns the resulting line.
    async fn add_line(&self, product: ProductId, quantity: u32) -> Result<CartLine, StoreError>;

    /// Retrieve the current cart.
    async fn fetch_cart(&self) -> Result<Cart, StoreError>;

    /// Retrieve the number of units in the cart.
    async fn fetch_count(&self) -> Result<u64, StoreError>;

    /// Set a line's quantity. Returns the line as the server stored it.
    async fn update_line_quantity(
        &self,
        line: LineId,
        quantity: u32,
    ) -> Result<CartLine, StoreError>;

    /// Remove a line. Removing a line that is already gone succeeds.
    async fn remove_line(&self, line: LineId) -> Result<(), StoreError>;

    /// Remove every line.
    async fn clear_cart(&self) -> Result<(), StoreError>;

    /// Remove lines whose products can no longer be ordered.
    async fn purge_unavailable(&self) -> Result<(), StoreError>;

    /// Place an order for the current cart contents.
    async fn submit_order(
        &self,
        submission: &CheckoutSubmission,
    ) -> Result<OrderReference, StoreError>;
}

//! Cart state container.
//!
//! Shared by every surface of a session: holds the cart count badge and the loading flag, and
//! routes every cart mutation so the count is resynchronised after each one.

use std::sync::{
    Arc,
    atomic::{AtomicBool, AtomicU64, Ordering},
};

use bazaar::{
    cart::{Cart, CartLine},
    checkout::{CheckoutSubmission, OrderReference},
    ids::{LineId, ProductId},
    products::Offer,
};
use tracing::{debug, info, instrument, warn};

use crate::{
    carts::CartActionError,
    session::SessionStore,
    store::{CartStore, StoreError},
};

/// Session-wide cart state.
pub struct CartState {
    store: Arc<dyn CartStore>,
    session: Arc<dyn SessionStore>,
    count: AtomicU64,
    loading: AtomicBool,
    active: AtomicBool,
}

impl CartState {
    /// Create a container with a zero count. Nothing is fetched.
    #[must_use]
    pub fn new(store: Arc<dyn CartStore>, session: Arc<dyn SessionStore>) -> Self {
        Self {
            store,
            session,
            count: AtomicU64::new(0),
            loading: AtomicBool::new(false),
            active: AtomicBool::new(true),
        }
    }

    /// Create a container and fetch the initial count when signed in.
    pub async fn start(store: Arc<dyn CartStore>, session: Arc<dyn SessionStore>) -> Arc<Self> {
        let state = Arc::new(Self::new(store, session));
        let count = state.refresh_count().await;

        match state.session.identity() {
            Some(identity) => info!(
                user_id = identity.user_id,
                name = %identity.name,
                count,
                "cart session started"
            ),
            None => debug!(count, "cart session started"),
        }

        state
    }

    /// Units in the cart as last reported by the server.
    pub fn cart_count(&self) -> u64 {
        self.count.load(Ordering::Acquire)
    }

    /// Whether a mutation is in flight.
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }

    /// Whether the session can make cart requests.
    pub fn is_authenticated(&self) -> bool {
        self.active.load(Ordering::Acquire) && self.session.is_authenticated()
    }

    /// Re-read the count from the server.
    ///
    /// A guest session reads as zero. Failures also reset the count to zero.
    #[instrument(skip(self))]
    pub async fn refresh_count(&self) -> u64 {
        if !self.is_authenticated() {
            self.count.store(0, Ordering::Release);

            return 0;
        }

        let count = match self.store.fetch_count().await {
            Ok(count) => count,
            Err(error) => {
                warn!(%error, "failed to load cart count");

                0
            }
        };

        self.count.store(count, Ordering::Release);

        count
    }

    /// Fetch the full cart.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unauthorized`] for a guest session, or whatever the store reports.
    pub async fn load_cart(&self) -> Result<Cart, StoreError> {
        if !self.is_authenticated() {
            return Err(StoreError::Unauthorized);
        }

        self.store.fetch_cart().await
    }

    /// Add units of a product, then resync the count.
    ///
    /// # Errors
    ///
    /// Returns [`CartActionError::AuthenticationRequired`] without contacting the server when
    /// signed out, [`CartActionError::Busy`] while another mutation runs, or the store failure.
    #[instrument(skip(self))]
    pub async fn add_to_cart(
        &self,
        product: ProductId,
        quantity: u32,
    ) -> Result<CartLine, CartActionError> {
        let _loading = self.begin()?;

        let line = self.store.add_line(product, quantity).await?;

        info!(line = %line.id, "product added to cart");

        self.refresh_count().await;

        Ok(line)
    }

    /// Check `quantity` against the offer's bounds, then add it.
    ///
    /// # Errors
    ///
    /// Returns [`CartActionError::Bounds`] without contacting the server when the quantity is
    /// out of range, or any error from [`CartState::add_to_cart`].
    pub async fn add_offer(&self, offer: &Offer, quantity: u32) -> Result<CartLine, CartActionError> {
        offer.check_quantity(quantity)?;

        self.add_to_cart(offer.id, quantity).await
    }

    /// Set a line's quantity, then resync the count.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`CartState::add_to_cart`].
    #[instrument(skip(self))]
    pub async fn update_quantity(
        &self,
        line: LineId,
        quantity: u32,
    ) -> Result<CartLine, CartActionError> {
        let _loading = self.begin()?;

        let updated = self.store.update_line_quantity(line, quantity).await?;

        self.refresh_count().await;

        Ok(updated)
    }

    /// Remove a line, then resync the count. Already-removed lines are not an error.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`CartState::add_to_cart`].
    #[instrument(skip(self))]
    pub async fn remove_from_cart(&self, line: LineId) -> Result<(), CartActionError> {
        let _loading = self.begin()?;

        self.store.remove_line(line).await?;

        self.refresh_count().await;

        Ok(())
    }

    /// Remove every line. The count reads zero on success.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`CartState::add_to_cart`].
    #[instrument(skip(self))]
    pub async fn clear_cart(&self) -> Result<(), CartActionError> {
        let _loading = self.begin()?;

        self.store.clear_cart().await?;

        self.count.store(0, Ordering::Release);

        Ok(())
    }

    /// Remove lines that can no longer be ordered, then resync the count.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`CartState::add_to_cart`].
    #[instrument(skip(self))]
    pub async fn purge_unavailable(&self) -> Result<(), CartActionError> {
        let _loading = self.begin()?;

        self.store.purge_unavailable().await?;

        self.refresh_count().await;

        Ok(())
    }

    /// Submit an order. On success the count is cleared and then re-read.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`CartState::add_to_cart`].
    #[instrument(skip_all, fields(method = %submission.method()))]
    pub async fn place_order(
        &self,
        submission: &CheckoutSubmission,
    ) -> Result<OrderReference, CartActionError> {
        let reference = {
            let _loading = self.begin()?;

            self.store.submit_order(submission).await?
        };

        info!(order = %reference, "order placed");

        self.after_order_placed().await;

        Ok(reference)
    }

    /// Reset the count after an order consumed the cart, then confirm it with the server.
    pub async fn after_order_placed(&self) -> u64 {
        self.count.store(0, Ordering::Release);

        self.refresh_count().await
    }

    /// Tear down for logout: the count reads zero and further mutations are refused.
    pub fn end_session(&self) {
        self.active.store(false, Ordering::Release);
        self.count.store(0, Ordering::Release);
    }

    fn begin(&self) -> Result<LoadingGuard<'_>, CartActionError> {
        if !self.is_authenticated() {
            return Err(CartActionError::AuthenticationRequired);
        }

        self.loading
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| CartActionError::Busy)?;

        Ok(LoadingGuard(&self.loading))
    }
}

/// Clears the loading flag however the mutation ends.
struct LoadingGuard<'a>(&'a AtomicBool);

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

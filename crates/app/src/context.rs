//! App Context

use std::sync::Arc;

use rusty_money::iso::Currency;
use thiserror::Error;

use crate::{
    carts::{CartState, CartView},
    checkout::{CheckoutController, RedirectToCart},
    config::{ApiConfig, ConfigError},
    session::SessionStore,
    store::{CartStore, HttpCartStore},
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to build HTTP client")]
    Http(#[source] reqwest::Error),
}

/// Everything a session's screens share.
#[derive(Clone)]
pub struct AppContext {
    pub session: Arc<dyn SessionStore>,
    pub store: Arc<dyn CartStore>,
    pub cart: Arc<CartState>,
    currency: &'static Currency,
}

impl AppContext {
    /// Start a session over the given store; the cart count is loaded once.
    pub async fn start(
        store: Arc<dyn CartStore>,
        session: Arc<dyn SessionStore>,
        currency: &'static Currency,
    ) -> Self {
        let cart = CartState::start(Arc::clone(&store), Arc::clone(&session)).await;

        Self {
            session,
            store,
            cart,
            currency,
        }
    }

    /// Build application context talking to the configured API.
    ///
    /// # Errors
    ///
    /// Returns an error for invalid settings or when the HTTP client cannot be built.
    pub async fn from_config(config: &ApiConfig) -> Result<Self, AppInitError> {
        let store_config = config.store_config()?;
        let currency = store_config.currency;
        let session: Arc<dyn SessionStore> = Arc::new(config.session());

        let store = HttpCartStore::new(store_config, Arc::clone(&session))
            .map_err(AppInitError::Http)?;

        Ok(Self::start(Arc::new(store), session, currency).await)
    }

    /// A fresh cart page over this session.
    #[must_use]
    pub fn cart_view(&self) -> CartView {
        CartView::new(Arc::clone(&self.cart), self.currency)
    }

    /// Open the checkout page.
    ///
    /// # Errors
    ///
    /// Returns a [`RedirectToCart`] when there is nothing to check out.
    pub async fn checkout(&self) -> Result<CheckoutController, RedirectToCart> {
        CheckoutController::mount(Arc::clone(&self.cart)).await
    }

    /// Sign out: the cart count drops to zero and the credential is forgotten.
    pub fn logout(&self) {
        self.cart.end_session();
        self.session.sign_out();
    }
}

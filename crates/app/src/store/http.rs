//! HTTP cart store client.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use bazaar::{
    cart::{Cart, CartLine},
    checkout::{CheckoutSubmission, OrderReference},
    ids::{LineId, ProductId},
};
use reqwest::{Client, RequestBuilder};
use rusty_money::iso::Currency;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::{
    session::SessionStore,
    store::{
        CartStore, StoreError,
        wire::{
            AddLineRequest, CartLineDto, CartSummaryDto, CheckoutRequest, CheckoutResponse,
            Envelope, UpdateQuantityRequest,
        },
    },
};

/// Configuration for reaching the cart and order endpoints.
#[derive(Debug, Clone)]
pub struct HttpStoreConfig {
    /// API base URL, e.g. `"http://localhost:8080/api"`.
    pub base_url: String,

    /// Currency prices are quoted in.
    pub currency: &'static Currency,

    /// Per-request timeout.
    pub timeout: Duration,
}

/// [`CartStore`] backed by the marketplace REST API.
#[derive(Clone)]
pub struct HttpCartStore {
    config: HttpStoreConfig,
    http: Client,
    session: Arc<dyn SessionStore>,
}

impl HttpCartStore {
    /// Create a client from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(
        config: HttpStoreConfig,
        session: Arc<dyn SessionStore>,
    ) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            config,
            http,
            session,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.config.base_url.trim_end_matches('/'))
    }

    fn authorize(&self, request: RequestBuilder) -> Result<RequestBuilder, StoreError> {
        let token = self
            .session
            .bearer_token()
            .ok_or(StoreError::Unauthorized)?;

        Ok(request.bearer_auth(token.expose()))
    }

    async fn execute(&self, request: RequestBuilder) -> Result<String, StoreError> {
        let response = self.authorize(request)?.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            Ok(body)
        } else {
            debug!(%status, "cart request rejected");

            Err(StoreError::from_status(status, &body))
        }
    }

    async fn envelope<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<Option<T>, StoreError> {
        let body = self.execute(request).await?;

        if body.trim().is_empty() {
            return Ok(None);
        }

        let envelope: Envelope<T> = serde_json::from_str(&body)?;

        if envelope.success {
            Ok(envelope.data)
        } else {
            Err(rejected(envelope.message))
        }
    }

    async fn line(&self, request: RequestBuilder) -> Result<CartLine, StoreError> {
        self.envelope::<CartLineDto>(request)
            .await?
            .map(|line| line.into_line(self.config.currency))
            .ok_or(StoreError::MissingData("cart line"))
    }
}

#[async_trait]
impl CartStore for HttpCartStore {
    #[instrument(skip(self))]
    async fn add_line(&self, product: ProductId, quantity: u32) -> Result<CartLine, StoreError> {
        let request = self
            .http
            .post(self.url("usuario/carrito"))
            .json(&AddLineRequest {
                product_id: product,
                quantity,
            });

        self.line(request).await
    }

    #[instrument(skip(self))]
    async fn fetch_cart(&self) -> Result<Cart, StoreError> {
        let request = self.http.get(self.url("usuario/carrito"));

        match self.envelope::<CartSummaryDto>(request).await? {
            Some(summary) => Ok(summary.into_cart(self.config.currency)?),
            None => Ok(Cart::new(self.config.currency)),
        }
    }

    /// The count endpoint reports lines, so units come from the summary.
    #[instrument(skip(self))]
    async fn fetch_count(&self) -> Result<u64, StoreError> {
        let request = self.http.get(self.url("usuario/carrito"));

        Ok(self
            .envelope::<CartSummaryDto>(request)
            .await?
            .map_or(0, |summary| summary.units()))
    }

    #[instrument(skip(self))]
    async fn update_line_quantity(
        &self,
        line: LineId,
        quantity: u32,
    ) -> Result<CartLine, StoreError> {
        let request = self
            .http
            .put(self.url(&format!("usuario/carrito/{line}")))
            .json(&UpdateQuantityRequest { quantity });

        self.line(request).await
    }

    #[instrument(skip(self))]
    async fn remove_line(&self, line: LineId) -> Result<(), StoreError> {
        let request = self.http.delete(self.url(&format!("usuario/carrito/{line}")));

        match self.envelope::<serde_json::Value>(request).await {
            Ok(_) => Ok(()),
            Err(StoreError::NotFound) => {
                debug!("line already removed");

                Ok(())
            }
            // An absent line is reported as a plain rejection.
            Err(error @ StoreError::ValidationFailed(_)) => {
                if self.fetch_cart().await?.line(line).is_none() {
                    debug!(%error, "line already removed");

                    Ok(())
                } else {
                    Err(error)
                }
            }
            Err(error) => Err(error),
        }
    }

    #[instrument(skip(self))]
    async fn clear_cart(&self) -> Result<(), StoreError> {
        let request = self.http.delete(self.url("usuario/carrito"));

        self.envelope::<serde_json::Value>(request).await?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn purge_unavailable(&self) -> Result<(), StoreError> {
        let request = self.http.post(self.url("usuario/carrito/limpiar"));

        self.envelope::<serde_json::Value>(request).await?;

        Ok(())
    }

    #[instrument(skip_all, fields(method = %submission.method()))]
    async fn submit_order(
        &self,
        submission: &CheckoutSubmission,
    ) -> Result<OrderReference, StoreError> {
        let request = self
            .http
            .post(self.url("pedidos/checkout"))
            .json(&CheckoutRequest::from(submission));

        let body = self.execute(request).await?;
        let parsed: CheckoutResponse = serde_json::from_str(&body)?;

        if !parsed.success {
            return Err(rejected(parsed.message));
        }

        parsed
            .reference
            .ok_or(StoreError::MissingData("order number"))
    }
}

fn rejected(message: Option<String>) -> StoreError {
    StoreError::ValidationFailed(message.unwrap_or_else(|| "request rejected".to_string()))
}

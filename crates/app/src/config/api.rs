//! API Config

use std::time::Duration;

use clap::Args;
use rusty_money::{Findable, iso::Currency};
use thiserror::Error;

use crate::{
    session::{BearerToken, SessionIdentity, StaticSession},
    store::HttpStoreConfig,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown currency code {0:?}")]
    UnknownCurrency(String),

    #[error("HTTP timeout must be at least one second")]
    ZeroTimeout,
}

/// Marketplace API settings.
#[derive(Debug, Clone, Args)]
pub struct ApiConfig {
    /// Marketplace API base URL
    #[arg(
        long,
        env = "BAZAAR_API_URL",
        default_value = "http://localhost:8080/api"
    )]
    pub api_url: String,

    /// Bearer token of the signed-in customer
    #[arg(long, env = "BAZAAR_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Server id of the signed-in customer
    #[arg(long, env = "BAZAAR_USER_ID", requires = "token")]
    pub user_id: Option<u64>,

    /// Display name or email of the signed-in customer
    #[arg(long, env = "BAZAAR_USER_NAME", requires = "user_id")]
    pub user_name: Option<String>,

    /// ISO code of the currency prices are quoted in
    #[arg(long, env = "BAZAAR_CURRENCY", default_value = "PEN")]
    pub currency: String,

    /// Per-request timeout in seconds
    #[arg(long, env = "BAZAAR_HTTP_TIMEOUT_SECS", default_value_t = 10u64)]
    pub http_timeout_secs: u64,
}

impl ApiConfig {
    /// Currency matching the configured code.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownCurrency`] for codes outside ISO 4217.
    pub fn currency(&self) -> Result<&'static Currency, ConfigError> {
        let code = self.currency.trim().to_ascii_uppercase();

        Currency::find(&code).ok_or(ConfigError::UnknownCurrency(code))
    }

    /// Store client settings.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for an unknown currency or a zero timeout.
    pub fn store_config(&self) -> Result<HttpStoreConfig, ConfigError> {
        if self.http_timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }

        Ok(HttpStoreConfig {
            base_url: self.api_url.trim_end_matches('/').to_string(),
            currency: self.currency()?,
            timeout: Duration::from_secs(self.http_timeout_secs),
        })
    }

    /// Session signed in with the configured token, or a guest session without one.
    #[must_use]
    pub fn session(&self) -> StaticSession {
        match self.token.clone().and_then(|raw| BearerToken::new(raw)) {
            Some(token) => StaticSession::signed_in(token, self.identity()),
            None => StaticSession::guest(),
        }
    }

    fn identity(&self) -> Option<SessionIdentity> {
        self.user_id.map(|user_id| SessionIdentity {
            user_id,
            name: self
                .user_name
                .clone()
                .unwrap_or_else(|| format!("customer {user_id}")),
        })
    }
}

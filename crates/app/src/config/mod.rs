//! Client configuration
//!
//! Settings are read from CLI flags, then the environment (a `.env` file is loaded first).

mod api;
mod logging;

pub use api::{ApiConfig, ConfigError};
pub use logging::{LogFormat, LoggingConfig};

//! Cart Store

mod errors;
pub mod http;
mod service;
pub(crate) mod wire;

pub use errors::StoreError;
pub use http::{HttpCartStore, HttpStoreConfig};
pub use service::*;

//! Bazaar
//!
//! Bazaar is the cart and checkout core of a multi-supplier marketplace storefront: catalog
//! offers, quantity bounds, cart aggregation and checkout validation.

pub mod cart;
pub mod checkout;
pub mod ids;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod quantity;

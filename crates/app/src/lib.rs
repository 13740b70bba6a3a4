//! Bazaar client: cart state, cart and checkout page controllers, and the HTTP store they use.

pub mod carts;
pub mod checkout;
pub mod config;
pub mod context;
pub mod observability;
pub mod session;
pub mod store;

#[cfg(test)]
mod test;

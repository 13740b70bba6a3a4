//! Test support: an in-memory cart store and fixtures.

mod helpers;

pub(crate) use helpers::*;
pub(crate) use store::InMemoryCartStore;

//! Cart action errors.

use bazaar::quantity::BoundsViolation;
use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum CartActionError {
    #[error("sign in to use the cart")]
    AuthenticationRequired,

    #[error("another cart update is still in progress")]
    Busy,

    #[error(transparent)]
    Bounds(#[from] BoundsViolation),

    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for CartActionError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::Unauthorized => Self::AuthenticationRequired,
            other => Self::Store(other),
        }
    }
}

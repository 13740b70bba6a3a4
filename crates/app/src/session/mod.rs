//! Session
//!
//! Who is signed in, and the credential their requests carry.

use std::sync::{PoisonError, RwLock};

use mockall::automock;

mod token;

pub use token::BearerToken;

/// Identity of the signed-in customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionIdentity {
    /// Customer id on the server
    pub user_id: u64,

    /// Display name or email
    pub name: String,
}

/// Source of the current session's credential.
#[automock]
pub trait SessionStore: Send + Sync {
    /// Token for the current session, if signed in.
    fn bearer_token(&self) -> Option<BearerToken>;

    /// Identity for the current session, if signed in.
    fn identity(&self) -> Option<SessionIdentity>;

    /// Whether requests can be authenticated.
    fn is_authenticated(&self) -> bool;

    /// Forget the current credential and identity.
    fn sign_out(&self);
}

#[derive(Debug, Default)]
struct Signed {
    token: Option<BearerToken>,
    identity: Option<SessionIdentity>,
}

/// Session held in memory for the lifetime of the process.
#[derive(Debug, Default)]
pub struct StaticSession {
    signed: RwLock<Signed>,
}

impl StaticSession {
    /// A session nobody is signed into.
    #[must_use]
    pub fn guest() -> Self {
        Self::default()
    }

    /// A session signed in with `token`.
    #[must_use]
    pub fn signed_in(token: BearerToken, identity: Option<SessionIdentity>) -> Self {
        Self {
            signed: RwLock::new(Signed {
                token: Some(token),
                identity,
            }),
        }
    }

    /// Replace the credential, e.g. after a fresh login.
    pub fn sign_in(&self, token: BearerToken, identity: Option<SessionIdentity>) {
        let mut signed = self.signed.write().unwrap_or_else(PoisonError::into_inner);

        signed.token = Some(token);
        signed.identity = identity;
    }
}

impl SessionStore for StaticSession {
    fn bearer_token(&self) -> Option<BearerToken> {
        self.signed
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .token
            .clone()
    }

    fn identity(&self) -> Option<SessionIdentity> {
        self.signed
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .identity
            .clone()
    }

    fn is_authenticated(&self) -> bool {
        self.signed
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .token
            .is_some()
    }

    fn sign_out(&self) {
        let mut signed = self.signed.write().unwrap_or_else(PoisonError::into_inner);

        *signed = Signed::default();
    }
}

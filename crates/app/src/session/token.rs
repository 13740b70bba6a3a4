//! Bearer token held by a signed-in session.

use std::fmt;

use zeroize::Zeroize;

/// Credential attached to every cart and order request.
///
/// The token text is wiped when the value is dropped and never shows up in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    /// Wrap a raw token. Blank input yields `None`.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let mut raw = raw.into();
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            raw.zeroize();

            return None;
        }

        let token = Self(trimmed.to_string());

        raw.zeroize();

        Some(token)
    }

    /// Token text for the `Authorization` header.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("BearerToken").field(&"**redacted**").finish()
    }
}

impl Drop for BearerToken {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

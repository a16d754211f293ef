//! Session token errors

/// A session token was rejected.
///
/// Every failure (bad structure, signature, time window, audience or shop)
/// surfaces as this one type. Callers treat it as "unauthenticated"; the
/// message is for diagnostics only.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct InvalidTokenError {
    message: String,
}

impl InvalidTokenError {
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn error_code(&self) -> &'static str {
        "INVALID_TOKEN"
    }
}

/// Why a token was rejected. Never exposed outside the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Rejection {
    Malformed,
    UnsupportedAlgorithm,
    BadSignature,
    InvalidClaims,
    Expired,
    NotYetValid,
    AudienceMismatch,
    InvalidShop,
    IssuerMismatch,
}

impl Rejection {
    fn message(self) -> &'static str {
        match self {
            Rejection::Malformed => "Session token is malformed",
            Rejection::UnsupportedAlgorithm => "Session token uses unsupported algorithm",
            Rejection::BadSignature => "Session token signature is invalid",
            Rejection::InvalidClaims => "Session token has invalid claims",
            Rejection::Expired => "Session token has expired",
            Rejection::NotYetValid => "Session token is not active yet",
            Rejection::AudienceMismatch => "Session token had invalid API key",
            Rejection::InvalidShop => "Session token had invalid shop",
            Rejection::IssuerMismatch => "Session token issuer does not match destination",
        }
    }
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

impl From<Rejection> for InvalidTokenError {
    fn from(reason: Rejection) -> Self {
        Self {
            message: reason.message().to_string(),
        }
    }
}

//! Session token verification for Appkit embedded apps
//!
//! Provides the claims type, verifier configuration, and the verifier that
//! turns a signed session token into trusted [`SessionClaims`] or a single
//! [`InvalidTokenError`].

mod claims;
mod config;
mod error;
mod verifier;

pub use claims::{offline_session_id, NumericDate, SessionClaims};
pub use config::AuthConfig;
pub use error::InvalidTokenError;
pub use verifier::SessionTokenVerifier;

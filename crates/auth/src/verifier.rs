//! Session token verification
//!
//! A session token is an HS256 JWT minted by the platform for an embedded app
//! request. Verification runs in a fixed order and stops at the first failure:
//!
//! 1. structure: three dot-separated segments, header and payload are
//!    base64url-encoded JSON objects
//! 2. algorithm: the header must declare `HS256`
//! 3. signature: HMAC-SHA256 over `header.payload` with the app secret
//! 4. claims: the payload must carry every [`SessionClaims`] field
//! 5. time window: `nbf <= now < exp`, widened by the configured leeway
//! 6. audience: `aud` equals the app's API key
//! 7. shop: `dest` is an accepted shop domain and `iss` is that shop's admin
//!
//! Claims are returned exactly as signed.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use jsonwebtoken::{decode, errors::ErrorKind, Algorithm, DecodingKey, Validation};
use serde_json::Value;

use appkit_common::{Error, Result, ShopDomainPolicy};

use crate::claims::SessionClaims;
use crate::config::AuthConfig;
use crate::error::{InvalidTokenError, Rejection};

const SUPPORTED_ALGORITHM: &str = "HS256";

/// Verifies session tokens against one app's credentials.
///
/// Holds only read-only state, so a single instance can be shared across
/// threads (e.g. behind an `Arc`) and called concurrently.
#[derive(Clone)]
pub struct SessionTokenVerifier {
    api_key: String,
    leeway_secs: i64,
    decoding_key: DecodingKey,
    validation: Validation,
    shops: ShopDomainPolicy,
}

impl SessionTokenVerifier {
    pub fn new(config: AuthConfig) -> Result<Self> {
        if config.api_secret_key.is_empty() {
            return Err(Error::Configuration(
                "API secret key must be non-empty".to_string(),
            ));
        }
        if config.api_key.is_empty() {
            return Err(Error::Configuration("API key must be non-empty".to_string()));
        }

        let leeway_secs = i64::try_from(config.leeway_secs)
            .map_err(|_| Error::Configuration("Leeway is out of range".to_string()))?;

        let shops = ShopDomainPolicy::new(&config.shop_domains)?;

        // Signature and algorithm only; `check` handles time, audience and shop.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        Ok(Self {
            api_key: config.api_key,
            leeway_secs,
            decoding_key: DecodingKey::from_secret(config.api_secret_key.as_bytes()),
            validation,
            shops,
        })
    }

    /// Verify `token` against the current system time
    pub fn verify(&self, token: &str) -> std::result::Result<SessionClaims, InvalidTokenError> {
        self.verify_at(token, chrono::Utc::now().timestamp())
    }

    /// Verify `token` as if the current time were `now` (Unix seconds)
    pub fn verify_at(
        &self,
        token: &str,
        now: i64,
    ) -> std::result::Result<SessionClaims, InvalidTokenError> {
        match self.check(token, now) {
            Ok(claims) => {
                tracing::trace!(
                    shop = %claims.shop(),
                    session_id = %claims.session_id,
                    "Session token verified"
                );
                Ok(claims)
            }
            Err(reason) => {
                tracing::debug!(reason = %reason, "Session token rejected");
                Err(reason.into())
            }
        }
    }

    fn check(&self, token: &str, now: i64) -> std::result::Result<SessionClaims, Rejection> {
        let segments: Vec<&str> = token.split('.').collect();
        let [header, payload, _signature] = segments.as_slice() else {
            return Err(Rejection::Malformed);
        };

        let header = decode_segment(header)?;
        decode_segment(payload)?;

        if header.get("alg").and_then(Value::as_str) != Some(SUPPORTED_ALGORITHM) {
            return Err(Rejection::UnsupportedAlgorithm);
        }

        let claims = decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
            .map_err(map_decode_error)?
            .claims;

        if claims.is_expired_at(now, self.leeway_secs) {
            return Err(Rejection::Expired);
        }

        if claims.is_pending_at(now, self.leeway_secs) {
            return Err(Rejection::NotYetValid);
        }

        if claims.audience != self.api_key {
            return Err(Rejection::AudienceMismatch);
        }

        let destination = self
            .shops
            .sanitize(&claims.destination)
            .map_err(|_| Rejection::InvalidShop)?;
        let issuer = self
            .shops
            .shop_from_issuer(&claims.issuer)
            .map_err(|_| Rejection::IssuerMismatch)?;
        if issuer != destination {
            return Err(Rejection::IssuerMismatch);
        }

        Ok(claims)
    }
}

impl std::fmt::Debug for SessionTokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionTokenVerifier")
            .field("api_key", &self.api_key)
            .field("leeway_secs", &self.leeway_secs)
            .field("shop_domains", &self.shops.domains())
            .finish_non_exhaustive()
    }
}

/// Decode a base64url segment that must hold a JSON object
fn decode_segment(segment: &str) -> std::result::Result<Value, Rejection> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|_| Rejection::Malformed)?;

    match serde_json::from_slice::<Value>(&bytes) {
        Ok(value) if value.is_object() => Ok(value),
        _ => Err(Rejection::Malformed),
    }
}

fn map_decode_error(error: jsonwebtoken::errors::Error) -> Rejection {
    match error.kind() {
        ErrorKind::InvalidSignature => Rejection::BadSignature,
        ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
            Rejection::UnsupportedAlgorithm
        }
        ErrorKind::Json(_) => Rejection::InvalidClaims,
        _ => Rejection::Malformed,
    }
}

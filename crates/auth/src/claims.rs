//! Session token claims

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Unix time in seconds, kept exactly as it appeared in the token.
///
/// Issuers may send integer or fractional seconds; both round-trip unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NumericDate(serde_json::Number);

impl NumericDate {
    /// `None` for NaN or infinite values
    pub fn from_secs_f64(secs: f64) -> Option<Self> {
        serde_json::Number::from_f64(secs).map(Self)
    }

    pub fn as_secs_f64(&self) -> f64 {
        self.0.as_f64().unwrap_or(f64::NAN)
    }
}

impl From<i64> for NumericDate {
    fn from(secs: i64) -> Self {
        Self(secs.into())
    }
}

impl std::fmt::Display for NumericDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Payload of a verified session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Shop admin URL, `{shop}/admin`
    #[serde(rename = "iss")]
    pub issuer: String,
    /// Shop storefront domain
    #[serde(rename = "dest")]
    pub destination: String,
    /// API key of the app the token was minted for
    #[serde(rename = "aud")]
    pub audience: String,
    /// Acting user
    #[serde(rename = "sub")]
    pub subject: String,
    #[serde(rename = "exp")]
    pub expires_at: NumericDate,
    #[serde(rename = "nbf")]
    pub not_before: NumericDate,
    #[serde(rename = "iat")]
    pub issued_at: NumericDate,
    #[serde(rename = "jti")]
    pub jwt_id: String,
    /// Browser session the request belongs to
    #[serde(rename = "sid")]
    pub session_id: String,
}

impl SessionClaims {
    /// Shop domain from `dest`, without the URL scheme
    pub fn shop(&self) -> &str {
        self.destination
            .strip_prefix("https://")
            .or_else(|| self.destination.strip_prefix("http://"))
            .unwrap_or(&self.destination)
            .trim_end_matches('/')
    }

    /// Id under which an app stores the online (per-user) session
    pub fn online_session_id(&self) -> String {
        format!("{}_{}", self.shop(), self.subject)
    }

    /// `now >= exp + leeway`. Unorderable values count as expired.
    pub fn is_expired_at(&self, now: i64, leeway_secs: i64) -> bool {
        let deadline = self.expires_at.as_secs_f64() + leeway_secs as f64;
        !matches!((now as f64).partial_cmp(&deadline), Some(Ordering::Less))
    }

    /// `now + leeway < nbf`. Unorderable values count as not yet valid.
    pub fn is_pending_at(&self, now: i64, leeway_secs: i64) -> bool {
        let earliest = self.not_before.as_secs_f64() - leeway_secs as f64;
        !matches!(
            (now as f64).partial_cmp(&earliest),
            Some(Ordering::Greater | Ordering::Equal)
        )
    }

    pub fn is_active_at(&self, now: i64, leeway_secs: i64) -> bool {
        !self.is_pending_at(now, leeway_secs) && !self.is_expired_at(now, leeway_secs)
    }
}

/// Id under which an app stores the offline (per-shop) session
pub fn offline_session_id(shop: &str) -> String {
    format!("offline_{}", shop)
}

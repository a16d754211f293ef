//! Session token verifier configuration

use std::fmt;

use appkit_common::{Config, DEFAULT_SHOP_DOMAINS};

/// Read-only settings the verifier is built from
#[derive(Clone)]
pub struct AuthConfig {
    /// Expected `aud` claim
    pub api_key: String,
    /// HMAC key the platform signs session tokens with
    pub api_secret_key: String,
    /// Domains a token's shop may live under
    pub shop_domains: Vec<String>,
    /// Allowed clock skew for `exp` and `nbf`, in seconds
    pub leeway_secs: u64,
}

impl AuthConfig {
    pub fn new(api_key: impl Into<String>, api_secret_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret_key: api_secret_key.into(),
            shop_domains: DEFAULT_SHOP_DOMAINS.iter().map(|d| d.to_string()).collect(),
            leeway_secs: 0,
        }
    }

    pub fn with_shop_domains<I, S>(mut self, domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.shop_domains = domains.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_leeway(mut self, seconds: u64) -> Self {
        self.leeway_secs = seconds;
        self
    }
}

impl From<&Config> for AuthConfig {
    fn from(config: &Config) -> Self {
        Self {
            api_key: config.api_key.clone(),
            api_secret_key: config.api_secret_key.clone(),
            shop_domains: config.shop_domains(),
            leeway_secs: config.session_token_leeway_secs,
        }
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("api_key", &self.api_key)
            .field("api_secret_key", &"[REDACTED]")
            .field("shop_domains", &self.shop_domains)
            .field("leeway_secs", &self.leeway_secs)
            .finish()
    }
}

//! Shop domain types and validation
//!
//! A shop is identified by its storefront domain, e.g. `my-shop.myshopify.com`.
//! Session tokens carry the shop in two forms:
//! - `dest`: the storefront domain, optionally prefixed with `https://`
//! - `iss`: the shop admin URL, `{shop domain}/admin`
//!
//! [`ShopDomainPolicy`] decides which domain suffixes are accepted and turns
//! both forms into a canonical [`ShopDomain`].

use regex::{Regex, RegexBuilder};
use serde::Serialize;
use std::fmt;

use crate::error::{Error, Result};

/// Domains a shop may live under when no custom domains are configured
pub const DEFAULT_SHOP_DOMAINS: [&str; 2] = ["myshopify.com", "myshopify.io"];

/// Canonical (scheme-less, lowercase) shop domain
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ShopDomain(String);

impl ShopDomain {
    /// Get the raw domain string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ShopDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<ShopDomain> for String {
    fn from(shop: ShopDomain) -> Self {
        shop.0
    }
}

/// Set of accepted shop domain suffixes, compiled into a single pattern
#[derive(Debug, Clone)]
pub struct ShopDomainPolicy {
    domains: Vec<String>,
    pattern: Regex,
}

impl ShopDomainPolicy {
    /// Build a policy accepting shops under any of `domains`
    pub fn new<I, S>(domains: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized: Vec<String> = Vec::new();
        for domain in domains {
            let domain = domain
                .as_ref()
                .trim()
                .trim_start_matches('.')
                .to_ascii_lowercase();
            if domain.is_empty() {
                return Err(Error::Configuration(
                    "Shop domain entries cannot be empty".to_string(),
                ));
            }
            if !normalized.contains(&domain) {
                normalized.push(domain);
            }
        }

        if normalized.is_empty() {
            return Err(Error::Configuration(
                "At least one shop domain is required".to_string(),
            ));
        }

        let pattern = compile_pattern(&normalized)?;

        Ok(Self {
            domains: normalized,
            pattern,
        })
    }

    /// Accepted domain suffixes, normalized and de-duplicated
    pub fn domains(&self) -> &[String] {
        &self.domains
    }

    /// Validate a storefront domain such as `https://my-shop.myshopify.com`
    pub fn sanitize(&self, raw: &str) -> Result<ShopDomain> {
        let host = strip_scheme(raw.trim()).trim_end_matches('/');

        if !self.pattern.is_match(host) {
            return Err(Error::Validation(format!("Invalid shop domain: {}", raw)));
        }

        Ok(ShopDomain(host.to_ascii_lowercase()))
    }

    /// Extract the shop from an admin URL such as `my-shop.myshopify.com/admin`
    pub fn shop_from_issuer(&self, issuer: &str) -> Result<ShopDomain> {
        let without_scheme = strip_scheme(issuer.trim());

        let (host, path) = without_scheme
            .split_once('/')
            .ok_or_else(|| Error::Validation(format!("Issuer has no admin path: {}", issuer)))?;

        if path.trim_end_matches('/') != "admin" {
            return Err(Error::Validation(format!(
                "Issuer is not a shop admin URL: {}",
                issuer
            )));
        }

        self.sanitize(host)
    }
}

impl Default for ShopDomainPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_SHOP_DOMAINS).expect("default shop domains are valid")
    }
}

fn compile_pattern(domains: &[String]) -> Result<Regex> {
    let alternatives = domains
        .iter()
        .map(|d| regex::escape(d))
        .collect::<Vec<_>>()
        .join("|");

    RegexBuilder::new(&format!(r"^[a-z0-9][a-z0-9\-]*\.({})$", alternatives))
        .case_insensitive(true)
        .build()
        .map_err(|e| Error::Configuration(format!("Invalid shop domain pattern: {}", e)))
}

fn strip_scheme(value: &str) -> &str {
    value
        .strip_prefix("https://")
        .or_else(|| value.strip_prefix("http://"))
        .unwrap_or(value)
}

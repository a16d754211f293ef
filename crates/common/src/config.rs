//! Configuration management following 12-factor app principles
//!
//! All configuration is loaded from environment variables to ensure
//! clean separation between code and config.

use anyhow::Result;
use std::env;
use std::fmt;

use crate::shop::DEFAULT_SHOP_DOMAINS;

/// Output format for the tracing subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(anyhow::anyhow!(
                "LOG_FORMAT must be 'pretty' or 'json', got '{}'",
                other
            )),
        }
    }
}

#[derive(Clone)]
pub struct Config {
    /// App credentials issued by the platform
    pub api_key: String,
    pub api_secret_key: String,

    /// Extra shop domains accepted on top of the defaults
    pub custom_shop_domains: Vec<String>,

    /// Allowed clock skew when checking session token `exp`/`nbf`
    pub session_token_leeway_secs: u64,

    /// Runtime configuration
    pub rust_log: String,
    pub log_format: LogFormat,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        let api_secret_key = env::var("SHOPIFY_API_SECRET")
            .map_err(|_| anyhow::anyhow!("SHOPIFY_API_SECRET is required"))?;
        if api_secret_key.is_empty() {
            anyhow::bail!("SHOPIFY_API_SECRET cannot be empty");
        }

        let config = Self {
            api_key: env::var("SHOPIFY_API_KEY")
                .map_err(|_| anyhow::anyhow!("SHOPIFY_API_KEY is required"))?,
            api_secret_key,

            custom_shop_domains: env::var("SHOPIFY_CUSTOM_SHOP_DOMAINS")
                .map(|raw| parse_domain_list(&raw))
                .unwrap_or_default(),

            session_token_leeway_secs: match env::var("SESSION_TOKEN_LEEWAY_SECS") {
                Ok(raw) => raw.trim().parse().map_err(|_| {
                    anyhow::anyhow!("SESSION_TOKEN_LEEWAY_SECS must be a whole number of seconds")
                })?,
                Err(_) => 0,
            },

            rust_log: env::var("RUST_LOG").unwrap_or_else(|_| "appkit=info".to_string()),
            log_format: match env::var("LOG_FORMAT") {
                Ok(raw) => raw.parse()?,
                Err(_) => LogFormat::default(),
            },
        };

        Ok(config)
    }

    /// Default shop domains followed by custom ones, without duplicates
    pub fn shop_domains(&self) -> Vec<String> {
        let mut domains: Vec<String> = DEFAULT_SHOP_DOMAINS.iter().map(|d| d.to_string()).collect();
        for domain in &self.custom_shop_domains {
            if !domains.contains(domain) {
                domains.push(domain.clone());
            }
        }
        domains
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &self.api_key)
            .field("api_secret_key", &"[REDACTED]")
            .field("custom_shop_domains", &self.custom_shop_domains)
            .field("session_token_leeway_secs", &self.session_token_leeway_secs)
            .field("rust_log", &self.rust_log)
            .field("log_format", &self.log_format)
            .finish()
    }
}

fn parse_domain_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|d| d.trim().to_ascii_lowercase())
        .filter(|d| !d.is_empty())
        .collect()
}

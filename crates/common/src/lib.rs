//! Shared utilities, configuration, and error handling for Appkit
//!
//! This crate provides common functionality used across the Appkit crates:
//! - Configuration management following 12-factor principles
//! - Error types and handling
//! - Shop domain validation
//! - Tracing setup

pub mod config;
pub mod error;
pub mod shop;
pub mod telemetry;

pub use config::{Config, LogFormat};
pub use error::{Error, Result};
pub use shop::{ShopDomain, ShopDomainPolicy, DEFAULT_SHOP_DOMAINS};
pub use telemetry::init_tracing;

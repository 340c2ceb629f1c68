//! Environment-driven service configuration.
//!
//! The daemon binary loads `.env.local` via dotenvy before calling
//! [`ServiceConfig::from_env`]; production injects env vars directly.
//! Configuration is resolved through a lookup closure so tests can feed a
//! map instead of mutating process-global env vars.

use anyhow::{Context, Result};
use std::net::SocketAddr;

pub const ENV_BIND_ADDR: &str = "MVD_ORDERD_ADDR";
pub const ENV_DB_URL: &str = "MVD_DATABASE_URL";
pub const ENV_CATALOG_URL: &str = "MVD_PRODUCT_SERVICE_URL";
pub const ENV_AUTH_SECRET: &str = "MVD_AUTH_SECRET";

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3003";
const DEFAULT_CATALOG_URL: &str = "http://127.0.0.1:3002";

/// Everything the order daemon needs to boot.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub bind_addr: SocketAddr,
    pub database_url: String,
    pub catalog_base_url: String,
    /// HS256 secret shared with the user service; never log it.
    pub auth_secret: String,
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(get: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_addr = get(ENV_BIND_ADDR)
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .with_context(|| format!("invalid {ENV_BIND_ADDR}"))?;

        let database_url =
            get(ENV_DB_URL).with_context(|| format!("missing env var {ENV_DB_URL}"))?;

        let catalog_base_url =
            get(ENV_CATALOG_URL).unwrap_or_else(|| DEFAULT_CATALOG_URL.to_string());

        // Fail-closed: without the shared secret no token can be verified,
        // so refusing to boot beats accepting nothing.
        let auth_secret =
            get(ENV_AUTH_SECRET).with_context(|| format!("missing env var {ENV_AUTH_SECRET}"))?;

        Ok(Self {
            bind_addr,
            database_url,
            catalog_base_url,
            auth_secret,
        })
    }
}

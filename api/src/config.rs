use std::env;
use std::str::FromStr;

use anyhow::{Context, Result};

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    /// Create missing tables on startup
    pub auto_migrate: bool,
    /// Replace stored producers with the demo set on startup
    pub seed_demo_data: bool,
    /// Sustained requests per second per client IP
    pub rate_limit_per_second: u64,
    pub rate_limit_burst: u32,
    /// Allow any origin, method and header. When false no CORS layer is added.
    pub cors_allow_any: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            port: parse_var("PORT", 3000)?,
            auto_migrate: parse_var("AUTO_MIGRATE", true)?,
            seed_demo_data: parse_var("SEED_DEMO_DATA", false)?,
            rate_limit_per_second: parse_var("RATE_LIMIT_PER_SECOND", 10)?,
            rate_limit_burst: parse_var("RATE_LIMIT_BURST", 20)?,
            cors_allow_any: parse_var("CORS_ALLOW_ANY", true)?,
        })
    }
}

/// Read an optional variable, falling back to `default` when unset or empty
fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .with_context(|| format!("{} has an invalid value: {}", name, raw)),
        _ => Ok(default),
    }
}

use anyhow::Context;
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::services::completion::DEFAULT_PROCESSING_DELAY_SECS;

const DEFAULT_SERVER_PORT: u16 = 8000;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            "memory" => Ok(StoreBackend::Memory),
            other => anyhow::bail!("STORE_BACKEND must be 'postgres' or 'memory', got '{}'", other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "pretty" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => anyhow::bail!("LOG_FORMAT must be 'text' or 'json', got '{}'", other),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    pub database_url: String,
    pub db_max_connections: u32,
    pub processing_delay: Duration,
    pub store_backend: StoreBackend,
    pub log_format: LogFormat,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv().ok(); // Load .env file if present

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source. A missing or
    /// malformed `DATABASE_URL` is a startup failure.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").context("DATABASE_URL must be set")?;
        validate_database_url(&database_url)?;

        Ok(Config {
            server_port: parse_or("SERVER_PORT", &lookup, DEFAULT_SERVER_PORT)?,
            database_url,
            db_max_connections: parse_or(
                "DB_MAX_CONNECTIONS",
                &lookup,
                DEFAULT_DB_MAX_CONNECTIONS,
            )?,
            processing_delay: Duration::from_secs(parse_or(
                "PROCESSING_DELAY_SECS",
                &lookup,
                DEFAULT_PROCESSING_DELAY_SECS,
            )?),
            store_backend: parse_or("STORE_BACKEND", &lookup, StoreBackend::Postgres)?,
            log_format: parse_or("LOG_FORMAT", &lookup, LogFormat::Text)?,
        })
    }
}

fn parse_or<T, F>(key: &str, lookup: &F, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .parse()
            .map_err(|e| anyhow::anyhow!("{} is invalid: {}", key, e)),
        None => Ok(default),
    }
}

fn validate_database_url(raw: &str) -> anyhow::Result<()> {
    let url = url::Url::parse(raw).context("DATABASE_URL is not a valid URL")?;
    match url.scheme() {
        "postgres" | "postgresql" => Ok(()),
        other => anyhow::bail!("DATABASE_URL has unsupported scheme '{}'", other),
    }
}

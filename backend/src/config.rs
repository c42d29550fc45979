use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use std::{env, net::IpAddr, path::PathBuf, str::FromStr};

use crate::forms::profile::AVATAR_MAX_BYTES;

const DEFAULT_MAX_REQUEST_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database_url: String,
    pub host: IpAddr,
    pub port: u16,
    /// Root directory for uploaded media such as avatars.
    pub media_root: PathBuf,
    /// Upper bound on request bodies, multipart uploads included.
    pub max_request_bytes: usize,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .unwrap_or_else(|| "postgres://localhost/accounts".to_string());

        let host = parse_or(&lookup, "APP_HOST", IpAddr::from([0, 0, 0, 0]))?;
        let port = parse_or(&lookup, "APP_PORT", 3000u16)?;

        let media_root = lookup("MEDIA_ROOT")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./media"));

        let max_request_bytes = parse_or(&lookup, "MAX_REQUEST_BYTES", DEFAULT_MAX_REQUEST_BYTES)?;
        // The avatar size check must see oversized uploads instead of a 413.
        if (max_request_bytes as u64) <= AVATAR_MAX_BYTES {
            return Err(anyhow!(
                "MAX_REQUEST_BYTES must exceed the avatar limit of {} bytes",
                AVATAR_MAX_BYTES
            ));
        }

        Ok(Config {
            database_url,
            host,
            port,
            media_root,
            max_request_bytes,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| anyhow!("Invalid {} value: {}", key, raw)),
        None => Ok(default),
    }
}

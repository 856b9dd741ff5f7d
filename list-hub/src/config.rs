use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_TIMEOUT_SECS: u64 = 60;
const DEV_SIGN_KEY: &str = "list-hub-dev-key";

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub data_dir: PathBuf,
    pub jwt_sign_key: String,
    pub request_timeout: Duration,
}

impl Config {
    /// Read settings from the environment, falling back to development
    /// defaults. `LIST_HUB_ADDR` wins over `PORT` when both are set.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let addr = match lookup("LIST_HUB_ADDR") {
            Some(addr) => addr
                .parse()
                .with_context(|| format!("invalid LIST_HUB_ADDR {addr:?}"))?,
            None => {
                let port = match lookup("PORT") {
                    Some(p) => p
                        .parse()
                        .with_context(|| format!("invalid PORT {p:?}"))?,
                    None => DEFAULT_PORT,
                };
                SocketAddr::from(([0, 0, 0, 0], port))
            }
        };
        let request_timeout = match lookup("REQUEST_TIMEOUT_SECS") {
            Some(s) => Duration::from_secs(
                s.parse()
                    .with_context(|| format!("invalid REQUEST_TIMEOUT_SECS {s:?}"))?,
            ),
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };
        let jwt_sign_key = lookup("JWT_SIGN_KEY").unwrap_or_else(|| {
            tracing::warn!("JWT_SIGN_KEY not set; using the development key");
            DEV_SIGN_KEY.to_string()
        });

        Ok(Self {
            addr,
            data_dir: lookup("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
            jwt_sign_key,
            request_timeout,
        })
    }
}

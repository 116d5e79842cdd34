use std::net::SocketAddr;

use anyhow::Result;

use crate::db::DbConfig;
use crate::engine::EngineSettings;

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub log_level: String,
    pub dev_mode: bool,
    pub database: DbConfig,
    pub engine: EngineSettings,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let listen_addr = std::env::var("ARKLET_LISTEN_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
            .parse()?;

        let log_level = std::env::var("ARKLET_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let dev_mode = std::env::var("ARKLET_DEV")
            .map(|v| v == "1" || v.to_lowercase() == "true")
            .unwrap_or(false);

        let database = DbConfig::from_env();

        let defaults = EngineSettings::default();
        let mint_attempts = std::env::var("ARKLET_MINT_ATTEMPTS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.mint_attempts);
        let fallback_resolver = std::env::var("ARKLET_FALLBACK_RESOLVER")
            .unwrap_or(defaults.fallback_resolver)
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            listen_addr,
            log_level,
            dev_mode,
            database,
            engine: EngineSettings {
                mint_attempts,
                noid_length: defaults.noid_length,
                fallback_resolver,
            },
        })
    }
}

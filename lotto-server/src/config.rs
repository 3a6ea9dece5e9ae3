//! Server configuration, from command-line flags with environment fallbacks.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Result};
use axum::http::HeaderValue;
use chrono::NaiveDate;
use clap::Parser;

use lotto_predict::config::{
    GeneratorConfig, RoundConfig, RoundMode, DEFAULT_BASE_ROUND, DEFAULT_GAME_COUNT, DEFAULT_WINDOW,
};

use crate::auth::AuthPolicy;

/// Default session lifetime (24h).
pub const DEFAULT_SESSION_TTL_SECS: u64 = 24 * 60 * 60;

#[derive(Debug, Clone, Parser)]
#[command(name = "lotto-server", about = "Lotto 6/45 number generation service")]
pub struct ServerConfig {
    /// Address to bind
    #[arg(long, env = "LOTTO_BIND_HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// Listening port
    #[arg(short, long, env = "PORT", default_value_t = 5000)]
    pub port: u16,

    /// Allowed CORS origin (any origin when unset)
    #[arg(long, env = "LOTTO_CORS_ORIGIN")]
    pub cors_origin: Option<String>,

    /// API key expected in the x-api-key header
    #[arg(long, env = "LOTTO_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Who may call /generate-lotto
    #[arg(long, env = "LOTTO_AUTH_POLICY", value_enum, default_value = "open")]
    pub auth_policy: AuthPolicy,

    /// SQLite database holding the user table
    #[arg(long, env = "DATABASE_URL", default_value = "data/lotto.db")]
    pub database_url: PathBuf,

    /// Model artifact (JSON)
    #[arg(long, env = "LOTTO_MODEL_PATH", default_value = "lotto_model.json")]
    pub model_path: PathBuf,

    /// History store, one draw per line
    #[arg(long, env = "LOTTO_DATA_PATH", default_value = "lotto_numbers.txt")]
    pub data_path: PathBuf,

    /// Games returned per request
    #[arg(long, env = "LOTTO_GAME_COUNT", default_value_t = DEFAULT_GAME_COUNT)]
    pub game_count: usize,

    /// Draws fed to the model
    #[arg(long, env = "LOTTO_WINDOW", default_value_t = DEFAULT_WINDOW)]
    pub window: usize,

    #[arg(long, env = "LOTTO_ROUND_MODE", value_enum, default_value = "data")]
    pub round_mode: RoundMode,

    /// Anchor round for the fixed round mode
    #[arg(long, env = "LOTTO_BASE_ROUND", default_value_t = DEFAULT_BASE_ROUND)]
    pub base_round: u32,

    /// Draw date of the anchor round (YYYY-MM-DD)
    #[arg(long, env = "LOTTO_BASE_DATE", default_value = "2024-09-21")]
    pub base_date: NaiveDate,

    #[arg(long, env = "LOTTO_SESSION_TTL_SECS", default_value_t = DEFAULT_SESSION_TTL_SECS)]
    pub session_ttl_secs: u64,

    /// Fixed RNG seed for the duplicate backfill
    #[arg(long, env = "LOTTO_SEED")]
    pub seed: Option<u64>,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }

    pub fn generator_config(&self) -> GeneratorConfig {
        GeneratorConfig {
            window: self.window,
            count: self.game_count,
            seed: self.seed,
        }
    }

    pub fn round_config(&self) -> RoundConfig {
        RoundConfig {
            mode: self.round_mode,
            base_round: self.base_round,
            base_date: self.base_date,
            ..RoundConfig::default()
        }
    }

    /// Reject combinations the server cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.window == 0 {
            bail!("window must be at least 1");
        }
        if self.game_count == 0 {
            bail!("game count must be at least 1");
        }
        if self.auth_policy == AuthPolicy::ApiKey && self.api_key.as_deref().map_or(true, str::is_empty) {
            bail!("the api-key policy needs LOTTO_API_KEY");
        }
        if let Some(origin) = &self.cors_origin {
            if HeaderValue::from_str(origin).is_err() {
                bail!("invalid CORS origin {:?}", origin);
            }
        }
        Ok(())
    }
}

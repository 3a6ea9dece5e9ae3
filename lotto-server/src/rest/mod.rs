//! HTTP API: game generation, health and account endpoints.

use std::sync::Arc;

use axum::http::header::{CONTENT_TYPE, COOKIE};
use axum::http::{HeaderMap, HeaderName, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use lotto_predict::model::{load_model, SequenceModel};
use lotto_predict::round::RoundCalculator;

use crate::auth::{AuthService, API_KEY_HEADER, SESSION_COOKIE};
use crate::config::ServerConfig;

pub mod accounts;
pub mod error;
pub mod generate;
pub mod health;
pub mod types;

pub use error::{ApiError, ApiResult};
pub use types::*;

/// Context shared across REST handlers, built once at start-up.
pub struct AppContext {
    pub config: ServerConfig,
    /// `None` when the artifact failed to load.
    pub model: Option<Arc<dyn SequenceModel>>,
    pub rounds: RoundCalculator,
    pub auth: AuthService,
}

impl AppContext {
    #[must_use]
    pub fn new(config: ServerConfig, auth: AuthService) -> Self {
        let rounds = RoundCalculator::new(config.round_config());
        Self {
            config,
            model: None,
            rounds,
            auth,
        }
    }

    /// Open the user table and load the model. A model that fails to load, or
    /// whose window differs from the configured one, is logged and left out so
    /// the account endpoints keep working.
    pub fn from_config(config: ServerConfig) -> anyhow::Result<Self> {
        let auth = AuthService::open(&config.database_url, config.session_ttl())?;
        let model: Option<Arc<dyn SequenceModel>> = match load_model(&config.model_path) {
            Ok(model) if model.window() != config.window => {
                log::error!(
                    "Model {:?} expects a window of {} draws but the server is configured for {}; \
                     /generate-lotto will fail until they match",
                    config.model_path,
                    model.window(),
                    config.window
                );
                None
            }
            Ok(model) => Some(Arc::new(model)),
            Err(e) => {
                log::error!("{e}; /generate-lotto will fail until the model is fixed");
                None
            }
        };
        Ok(Self::new(config, auth).with_model(model))
    }

    #[must_use]
    pub fn with_model(mut self, model: Option<Arc<dyn SequenceModel>>) -> Self {
        self.model = model;
        self
    }
}

/// Create the REST API router.
pub fn router(ctx: Arc<AppContext>) -> Router {
    let cors = cors_layer(ctx.config.cors_origin.as_deref());
    Router::new()
        .route("/generate-lotto", get(generate::generate_lotto))
        .route("/current-round", get(generate::current_round))
        .route("/health", get(health::health))
        .route("/register", post(accounts::register))
        .route("/login", post(accounts::login))
        .route("/logout", post(accounts::logout))
        .layer(cors)
        .with_state(ctx)
}

/// Any origin when none is configured. An origin that is not a valid header
/// value allows no cross-origin requests; `ServerConfig::validate` rejects it
/// before start-up.
fn cors_layer(origin: Option<&str>) -> CorsLayer {
    let Some(origin) = origin else {
        return CorsLayer::permissive();
    };
    match HeaderValue::from_str(origin) {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([CONTENT_TYPE, HeaderName::from_static(API_KEY_HEADER)])
            .allow_credentials(true),
        Err(_) => CorsLayer::new(),
    }
}

/// Session token from the `Cookie` header, if present.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.to_string())
        .filter(|value| !value.is_empty())
}

pub fn api_key(headers: &HeaderMap) -> Option<String> {
    headers
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(String::from)
}

fn session_cookie(token: &str) -> String {
    format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax")
}

fn expired_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_token_from_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("theme=dark; lotto_session=abc123; x=y"));
        assert_eq!(session_token(&headers).as_deref(), Some("abc123"));
    }

    #[test]
    fn test_session_token_missing_or_empty() {
        let mut headers = HeaderMap::new();
        assert!(session_token(&headers).is_none());
        headers.insert(COOKIE, HeaderValue::from_static("lotto_session="));
        assert!(session_token(&headers).is_none());
    }

    #[test]
    fn test_api_key_header() {
        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, HeaderValue::from_static("k-1"));
        assert_eq!(api_key(&headers).as_deref(), Some("k-1"));
    }

    #[test]
    fn test_cookie_strings() {
        assert!(session_cookie("tok").starts_with("lotto_session=tok;"));
        assert!(expired_session_cookie().contains("Max-Age=0"));
    }
}

//! Game generation endpoints.

use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use rand::rngs::StdRng;
use rand::SeedableRng;

use lotto_db::history::{last_round, load_history};
use lotto_predict::generator::generate_games;

use crate::rest::error::{ApiError, ApiResult};
use crate::rest::types::{GenerateResponse, RoundResponse};
use crate::rest::{api_key, session_token, AppContext};

/// `GET /generate-lotto`
pub async fn generate_lotto(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
) -> ApiResult<GenerateResponse> {
    let session = session_token(&headers);
    let key = api_key(&headers);
    ctx.auth
        .authorize(
            ctx.config.auth_policy,
            ctx.config.api_key.as_deref(),
            session.as_deref(),
            key.as_deref(),
        )
        .inspect_err(|e| log::warn!("Rejected /generate-lotto: {e}"))?;

    let model = ctx
        .model
        .as_ref()
        .ok_or_else(|| ApiError::model_load("model is not loaded"))?;

    let history = load_history(&ctx.config.data_path).map_err(|e| {
        log::error!("{e:#}");
        ApiError::data_load(format!("{e:#}"))
    })?;

    let generator = ctx.config.generator_config();
    let mut rng: StdRng = match generator.seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_rng(&mut rand::rng()),
    };

    let games = generate_games(&history, model.as_ref(), &generator, &mut rng)?;
    let round = ctx.rounds.current_round_now(last_round(&history));
    log::info!("Round {}: {} games generated", round, games.len());

    Ok(Json(GenerateResponse {
        numbers: games.into_iter().map(|g| g.numbers).collect(),
        round,
    }))
}

/// `GET /current-round`
pub async fn current_round(State(ctx): State<Arc<AppContext>>) -> ApiResult<RoundResponse> {
    let last = match load_history(&ctx.config.data_path) {
        Ok(history) => last_round(&history),
        Err(e) => {
            log::warn!("{e:#}");
            None
        }
    };
    Ok(Json(RoundResponse {
        round: ctx.rounds.current_round_now(last),
    }))
}

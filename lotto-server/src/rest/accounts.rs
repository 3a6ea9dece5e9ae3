//! Registration, login and logout endpoints.

use std::sync::Arc;

use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;

use crate::auth::Profile;
use crate::rest::error::ApiError;
use crate::rest::types::{LoginRequest, MessageResponse, RegisterRequest};
use crate::rest::{expired_session_cookie, session_cookie, session_token, AppContext};

/// `POST /register`
pub async fn register(
    State(ctx): State<Arc<AppContext>>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let profile = Profile {
        name: request.name,
        age: request.age,
        gender: request.gender,
    };
    blocking(move || {
        ctx.auth.register(
            &request.username,
            &request.password,
            &request.confirm_password,
            profile,
        )
    })
    .await??;
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("User registered successfully")),
    ))
}

/// `POST /login`; sets the session cookie on success.
pub async fn login(
    State(ctx): State<Arc<AppContext>>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let token = blocking(move || ctx.auth.login(&request.username, &request.password)).await??;
    Ok((
        [(SET_COOKIE, session_cookie(&token))],
        Json(MessageResponse::new("Logged in successfully")),
    ))
}

/// `POST /logout`; always succeeds and clears the cookie.
pub async fn logout(State(ctx): State<Arc<AppContext>>, headers: HeaderMap) -> impl IntoResponse {
    ctx.auth.logout(session_token(&headers).as_deref());
    (
        [(SET_COOKIE, expired_session_cookie())],
        Json(MessageResponse::new("Logged out successfully")),
    )
}

/// Password hashing and the SQLite user table run off the async workers.
async fn blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ApiError::internal(format!("account task failed: {e}")))
}

use super::HttpServerState;
use crate::error::Result;
use crate::models::{AuthResult, CheckTokenRequest, CheckTokenResponse, LoginRequest, SignupRequest};
use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};
use validator::Validate;

pub(super) async fn signup(
    State(state): State<HttpServerState>,
    Json(req): Json<SignupRequest>,
) -> Result<(StatusCode, Json<AuthResult>)> {
    req.validate()?;

    let result = state
        .credentials
        .signup(&req.name, &req.email, &req.password)
        .await?;

    Ok((StatusCode::CREATED, Json(result)))
}

pub(super) async fn login(
    State(state): State<HttpServerState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResult>> {
    req.validate()?;

    let result = state.credentials.login(&req.email, &req.password).await?;

    Ok(Json(result))
}

/// Always 200: an unreadable body is just another invalid token
pub(super) async fn check_token(
    State(state): State<HttpServerState>,
    body: std::result::Result<Json<CheckTokenRequest>, JsonRejection>,
) -> Json<CheckTokenResponse> {
    let valid = match body {
        Ok(Json(req)) => state.credentials.check_token(&req.token),
        Err(_) => false,
    };

    Json(CheckTokenResponse { valid })
}

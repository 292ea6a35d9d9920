// HTTP handlers for authentication endpoints

use axum::{extract::State, http::StatusCode, Json};
use validator::Validate;

use crate::auth::{
    error::AuthError,
    middleware::AuthenticatedUser,
    models::{
        ProfileResponse, RefreshRequest, RefreshResponse, SignInRequest, SignInResponse,
        SignUpRequest, SignUpResponse,
    },
};
use crate::AppState;

/// Register a new user
/// POST /api/auth/signup
pub async fn signup_handler(
    State(state): State<AppState>,
    Json(request): Json<SignUpRequest>,
) -> Result<(StatusCode, Json<SignUpResponse>), AuthError> {
    request
        .validate()
        .map_err(|e| AuthError::Validation(e.to_string()))?;

    let response = state.auth.sign_up(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Authenticate a user and issue tokens
/// POST /api/auth/signin
pub async fn signin_handler(
    State(state): State<AppState>,
    Json(request): Json<SignInRequest>,
) -> Result<Json<SignInResponse>, AuthError> {
    let response = state.auth.sign_in(request).await?;
    Ok(Json(response))
}

/// Mint a fresh session token from a refresh token
/// POST /api/auth/refresh
pub async fn refresh_handler(
    State(state): State<AppState>,
    Json(request): Json<RefreshRequest>,
) -> Result<Json<RefreshResponse>, AuthError> {
    let response = state.auth.refresh_token(request).await?;
    Ok(Json(response))
}

/// Profile of the authenticated subject (protected endpoint)
/// GET /api/auth/profile
pub async fn profile_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<ProfileResponse>, AuthError> {
    let response = state.auth.profile(&user.email).await?;
    Ok(Json(response))
}

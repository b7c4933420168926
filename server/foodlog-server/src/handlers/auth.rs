use auth_identity::{AuthResponse, CredentialsRequest};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use tracing::debug;

use crate::error::{api_success, ApiError, ApiResponse};
use crate::server::FoodLogServer;

/// Register a new account and return its first token
pub async fn register(
    State(server): State<FoodLogServer>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<AuthResponse>>), ApiError> {
    let Json(request) = payload?;
    let response = server
        .identity
        .register(
            request.email.as_deref().unwrap_or_default(),
            request.password.as_deref().unwrap_or_default(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(api_success(response))))
}

/// Exchange email and password for a token
pub async fn login(
    State(server): State<FoodLogServer>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<AuthResponse>>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        debug!(error = %rejection.body_text(), "Unreadable login body");
        ApiError::authentication("Invalid credentials")
    })?;

    let response = server
        .identity
        .login(
            request.email.as_deref().unwrap_or_default(),
            request.password.as_deref().unwrap_or_default(),
        )
        .await?;

    Ok(Json(api_success(response)))
}

//! Authentication context extraction
//!
//! Handlers that take an [`AuthContext`] only run for requests carrying a
//! valid `Authorization: Bearer <token>` header. Everything else is answered
//! with 401 before the handler body executes.

use async_trait::async_trait;
use auth_identity::Principal;
use axum::extract::FromRequestParts;
use axum::http::{header::AUTHORIZATION, request::Parts, HeaderMap};
use logger_redacted::redacted_warn;

use crate::error::ApiError;
use crate::server::FoodLogServer;

/// The verified caller of a request
#[derive(Debug, Clone, Copy)]
pub struct AuthContext {
    pub principal: Principal,
}

#[async_trait]
impl FromRequestParts<FoodLogServer> for AuthContext {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &FoodLogServer,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_token(&parts.headers)?;

        match state.identity.verify_token(token).await {
            Ok(principal) => Ok(Self { principal }),
            Err(err) => {
                redacted_warn!(
                    state.redactor,
                    "Rejected credentials for {} {}: Bearer {}",
                    parts.method,
                    parts.uri.path(),
                    token
                );
                Err(err.into())
            }
        }
    }
}

/// Extract the bearer token from the Authorization header
fn extract_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    let header = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| ApiError::authentication("Missing authorization header"))?
        .to_str()
        .map_err(|_| ApiError::authentication("Invalid authorization header"))?;

    match header.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim()),
        _ => Err(ApiError::authentication(
            "Authorization header must use the Bearer scheme",
        )),
    }
}

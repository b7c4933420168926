pub mod auth_context;

pub use auth_context::AuthContext;

use axum::http::{header, Method};
use tower_http::cors::{Any, CorsLayer};

/// CORS for browser clients: any origin, bearer tokens in the Authorization header
pub fn create_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
}

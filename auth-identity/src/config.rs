use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    /// HMAC secret used to sign and verify tokens
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub password_min_length: usize,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "foodlog-development-secret".to_string(),
            token_ttl_hours: 24,
            password_min_length: 1,
        }
    }
}

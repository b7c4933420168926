//! Account identity for FoodLog Engine
//!
//! - Registration with globally unique emails
//! - Password hashing and verification (argon2)
//! - HS256 bearer tokens whose subject is the account id
//! - Token verification into a [`Principal`]
//!
//! # Example
//!
//! ```rust
//! use auth_identity::{IdentityConfig, IdentityService, repository::InMemoryAccountRepository};
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let service = IdentityService::new(
//!     Arc::new(InMemoryAccountRepository::new()),
//!     IdentityConfig::default(),
//! );
//!
//! let auth = service.register("parent@example.com", "password123").await?;
//! let principal = service.verify_token(&auth.token).await?;
//! assert_eq!(principal.account_id, auth.user.id);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod service;

pub use config::*;
pub use error::*;
pub use models::*;
pub use service::*;

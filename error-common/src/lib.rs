//! Common error handling utilities for FoodLog Engine
//!
//! This crate defines the error taxonomy shared by the identity, storage and
//! records crates, along with the stable error codes carried in API responses.
//!
//! # Error Categories
//!
//! - **Unauthenticated**: missing or unverifiable principal
//! - **Validation**: missing or malformed required field
//! - **NotFound**: absent resource, or one masked because another account owns it
//! - **Forbidden**: addressable resource owned by another account
//! - **Conflict**: uniqueness violation at registration
//! - **Internal**: opaque persistence failure
//!
//! # Example
//!
//! ```rust
//! use error_common::{FoodLogError, Result};
//!
//! fn require_name(name: &str) -> Result<&str> {
//!     if name.trim().is_empty() {
//!         return Err(FoodLogError::validation("name", "Name is required"));
//!     }
//!     Ok(name)
//! }
//!
//! assert!(require_name("").is_err());
//! ```

pub mod codes;
pub mod types;

pub use types::*;

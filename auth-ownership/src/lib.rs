//! Ownership-scoped authorization for FoodLog Engine
//!
//! Every `Child` belongs to one account and every `FoodEntry` to one child, so
//! ownership of any record is decided by walking up to the owning account and
//! comparing it with the caller.
//!
//! # Decisions
//!
//! - **Allowed**: the caller owns the record; the resolved record is returned
//! - **NotFound**: the record is missing, or it is a child (or a child addressed
//!   to create or list entries) owned by someone else
//! - **Denied**: the record is a food entry addressed by its own id and owned by
//!   someone else
//!
//! # Example
//!
//! ```rust
//! use auth_identity::Principal;
//! use auth_ownership::{Decision, Operation, OwnershipEngine, ResourceKind};
//! use database_layer::InMemoryHierarchyStore;
//! use std::sync::Arc;
//! use uuid::Uuid;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = OwnershipEngine::new(Arc::new(InMemoryHierarchyStore::new()));
//! let caller = Principal::new(Uuid::new_v4());
//!
//! let decision = engine
//!     .authorize(&caller, Operation::Read, ResourceKind::Child, Uuid::new_v4())
//!     .await?;
//! assert_eq!(decision, Decision::NotFound);
//! # Ok(())
//! # }
//! ```

pub mod engine;
pub mod error;
pub mod models;

pub use engine::*;
pub use error::*;
pub use models::*;

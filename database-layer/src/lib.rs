//! Hierarchy store for FoodLog Engine
//!
//! Persists the `Account -> Child -> FoodEntry` hierarchy behind the
//! [`HierarchyStore`] trait. Two backends are provided:
//!
//! - [`InMemoryHierarchyStore`]: serialized transactions with an undo log, for
//!   development and tests
//! - [`PostgresHierarchyStore`]: one database transaction per unit of work, with
//!   row locks on the parent child and foreign keys that cascade on delete
//!
//! Every authorization check and the mutation that follows it run inside one
//! [`HierarchyTransaction`]; [`settle`] commits or rolls it back from the
//! outcome.
//!
//! # Example
//!
//! ```rust
//! use database_layer::{AccessMode, Child, HierarchyStore, InMemoryHierarchyStore};
//! use chrono::NaiveDate;
//! use uuid::Uuid;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = InMemoryHierarchyStore::new();
//! let child = Child::new(Uuid::new_v4(), "Ada", NaiveDate::from_ymd_opt(2023, 1, 1).unwrap());
//!
//! let mut tx = store.begin(AccessMode::Write).await?;
//! tx.insert_child(&child).await?;
//! tx.commit().await?;
//! # Ok(())
//! # }
//! ```

pub mod connection;
pub mod error;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod store;
pub mod transaction;

pub use connection::*;
pub use error::*;
pub use memory::InMemoryHierarchyStore;
pub use models::*;
pub use postgres::PostgresHierarchyStore;
pub use store::*;
pub use transaction::settle;

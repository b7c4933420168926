//! Child and food entry records for FoodLog Engine
//!
//! [`RecordService`] is what request handlers call. It combines the
//! ownership engine with the [`HierarchyManager`], which keeps the
//! `Account -> Child -> FoodEntry` hierarchy consistent: no entry without a
//! child, cascading child deletes, notes as the only mutable field.

pub mod input;
pub mod manager;
pub mod models;
pub mod service;

pub use input::*;
pub use manager::HierarchyManager;
pub use models::ChildDetail;
pub use service::RecordService;

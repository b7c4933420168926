// Hierarchy store contracts
use crate::error::DatabaseResult;
use crate::models::{Child, FoodEntry};
use async_trait::async_trait;
use uuid::Uuid;

/// How a transaction intends to use the child rows it resolves.
///
/// Backends with row locks take a shared lock for `Read` and an exclusive lock
/// for `Write` on every child looked up by id, so an ownership check and the
/// mutation that follows it see the same parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    Read,
    Write,
}

/// Lookups available inside a transaction.
///
/// List methods return records in insertion order.
#[async_trait]
pub trait HierarchyReader: Send {
    async fn find_child_by_id(&mut self, id: Uuid) -> DatabaseResult<Option<Child>>;

    async fn find_children_by_account(&mut self, account_id: Uuid) -> DatabaseResult<Vec<Child>>;

    async fn find_food_entry_by_id(&mut self, id: Uuid) -> DatabaseResult<Option<FoodEntry>>;

    async fn find_food_entries_by_child(&mut self, child_id: Uuid)
        -> DatabaseResult<Vec<FoodEntry>>;
}

/// A unit of work against the store.
///
/// Dropping a transaction without calling [`commit`](Self::commit) rolls it back.
#[async_trait]
pub trait HierarchyTransaction: HierarchyReader {
    async fn insert_child(&mut self, child: &Child) -> DatabaseResult<()>;

    /// Fails with `MissingParent` when `entry.child_id` does not resolve
    async fn insert_food_entry(&mut self, entry: &FoodEntry) -> DatabaseResult<()>;

    /// Returns false when the entry does not exist
    async fn update_food_entry_notes(&mut self, id: Uuid, notes: Option<&str>)
        -> DatabaseResult<bool>;

    async fn delete_food_entries_by_child(&mut self, child_id: Uuid) -> DatabaseResult<u64>;

    /// Returns false when the child does not exist
    async fn delete_child(&mut self, id: Uuid) -> DatabaseResult<bool>;

    /// Returns false when the entry does not exist
    async fn delete_food_entry(&mut self, id: Uuid) -> DatabaseResult<bool>;

    async fn commit(self: Box<Self>) -> DatabaseResult<()>;

    async fn rollback(self: Box<Self>) -> DatabaseResult<()>;
}

/// Handle to a hierarchy backend. Constructed once at startup and shared.
#[async_trait]
pub trait HierarchyStore: Send + Sync {
    async fn begin(&self, mode: AccessMode) -> DatabaseResult<Box<dyn HierarchyTransaction>>;

    async fn is_healthy(&self) -> bool;

    /// Release backend resources. Later `begin` calls fail.
    async fn close(&self);
}

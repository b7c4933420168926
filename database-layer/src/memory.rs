//! In-memory hierarchy store
//!
//! Transactions are serialized: `begin` takes the store mutex and holds it until
//! the transaction commits, rolls back or is dropped. Every mutation records its
//! inverse in an undo log, replayed in reverse when the transaction does not
//! commit.

use crate::error::{DatabaseError, DatabaseResult};
use crate::models::{Child, FoodEntry};
use crate::store::{AccessMode, HierarchyReader, HierarchyStore, HierarchyTransaction};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Clone)]
struct Stored<T> {
    seq: u64,
    record: T,
}

#[derive(Debug, Default)]
struct State {
    children: HashMap<Uuid, Stored<Child>>,
    entries: HashMap<Uuid, Stored<FoodEntry>>,
    next_seq: u64,
}

impl State {
    fn next_seq(&mut self) -> u64 {
        self.next_seq = self.next_seq.saturating_add(1);
        self.next_seq
    }
}

#[derive(Debug)]
enum Undo {
    RemoveChild(Uuid),
    RestoreChild(Stored<Child>),
    RemoveEntry(Uuid),
    RestoreEntry(Stored<FoodEntry>),
    RestoreNotes(Uuid, Option<String>),
}

/// Process-local store used for development and tests
#[derive(Debug, Clone, Default)]
pub struct InMemoryHierarchyStore {
    state: Arc<Mutex<State>>,
    closed: Arc<AtomicBool>,
}

impl InMemoryHierarchyStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HierarchyStore for InMemoryHierarchyStore {
    async fn begin(&self, mode: AccessMode) -> DatabaseResult<Box<dyn HierarchyTransaction>> {
        if self.closed.load(Ordering::Acquire) {
            return Err(DatabaseError::ConnectionFailed("store is closed".to_string()));
        }
        let guard = Arc::clone(&self.state).lock_owned().await;
        debug!(?mode, "In-memory transaction started");
        Ok(Box::new(MemoryTransaction {
            state: guard,
            undo: Vec::new(),
            finished: false,
        }))
    }

    async fn is_healthy(&self) -> bool {
        !self.closed.load(Ordering::Acquire)
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::Release);
    }
}

struct MemoryTransaction {
    state: OwnedMutexGuard<State>,
    undo: Vec<Undo>,
    finished: bool,
}

impl MemoryTransaction {
    fn revert(&mut self) {
        while let Some(step) = self.undo.pop() {
            match step {
                Undo::RemoveChild(id) => {
                    self.state.children.remove(&id);
                }
                Undo::RestoreChild(stored) => {
                    self.state.children.insert(stored.record.id, stored);
                }
                Undo::RemoveEntry(id) => {
                    self.state.entries.remove(&id);
                }
                Undo::RestoreEntry(stored) => {
                    self.state.entries.insert(stored.record.id, stored);
                }
                Undo::RestoreNotes(id, notes) => {
                    if let Some(stored) = self.state.entries.get_mut(&id) {
                        stored.record.notes = notes;
                    }
                }
            }
        }
    }
}

impl Drop for MemoryTransaction {
    fn drop(&mut self) {
        if !self.finished && !self.undo.is_empty() {
            debug!(steps = self.undo.len(), "Rolling back abandoned in-memory transaction");
            self.revert();
        }
    }
}

fn in_insertion_order<T: Clone>(mut rows: Vec<&Stored<T>>) -> Vec<T> {
    rows.sort_by_key(|stored| stored.seq);
    rows.into_iter().map(|stored| stored.record.clone()).collect()
}

#[async_trait]
impl HierarchyReader for MemoryTransaction {
    async fn find_child_by_id(&mut self, id: Uuid) -> DatabaseResult<Option<Child>> {
        Ok(self.state.children.get(&id).map(|s| s.record.clone()))
    }

    async fn find_children_by_account(&mut self, account_id: Uuid) -> DatabaseResult<Vec<Child>> {
        let rows = self
            .state
            .children
            .values()
            .filter(|s| s.record.account_id == account_id)
            .collect();
        Ok(in_insertion_order(rows))
    }

    async fn find_food_entry_by_id(&mut self, id: Uuid) -> DatabaseResult<Option<FoodEntry>> {
        Ok(self.state.entries.get(&id).map(|s| s.record.clone()))
    }

    async fn find_food_entries_by_child(
        &mut self,
        child_id: Uuid,
    ) -> DatabaseResult<Vec<FoodEntry>> {
        let rows = self
            .state
            .entries
            .values()
            .filter(|s| s.record.child_id == child_id)
            .collect();
        Ok(in_insertion_order(rows))
    }
}

#[async_trait]
impl HierarchyTransaction for MemoryTransaction {
    async fn insert_child(&mut self, child: &Child) -> DatabaseResult<()> {
        if self.state.children.contains_key(&child.id) {
            return Err(DatabaseError::QueryFailed(format!(
                "duplicate child id {}",
                child.id
            )));
        }
        let seq = self.state.next_seq();
        self.state.children.insert(
            child.id,
            Stored {
                seq,
                record: child.clone(),
            },
        );
        self.undo.push(Undo::RemoveChild(child.id));
        Ok(())
    }

    async fn insert_food_entry(&mut self, entry: &FoodEntry) -> DatabaseResult<()> {
        if !self.state.children.contains_key(&entry.child_id) {
            return Err(DatabaseError::MissingParent {
                kind: "Child",
                id: entry.child_id,
            });
        }
        if self.state.entries.contains_key(&entry.id) {
            return Err(DatabaseError::QueryFailed(format!(
                "duplicate food entry id {}",
                entry.id
            )));
        }
        let seq = self.state.next_seq();
        self.state.entries.insert(
            entry.id,
            Stored {
                seq,
                record: entry.clone(),
            },
        );
        self.undo.push(Undo::RemoveEntry(entry.id));
        Ok(())
    }

    async fn update_food_entry_notes(
        &mut self,
        id: Uuid,
        notes: Option<&str>,
    ) -> DatabaseResult<bool> {
        let Some(stored) = self.state.entries.get_mut(&id) else {
            return Ok(false);
        };
        let previous = std::mem::replace(&mut stored.record.notes, notes.map(str::to_string));
        self.undo.push(Undo::RestoreNotes(id, previous));
        Ok(true)
    }

    async fn delete_food_entries_by_child(&mut self, child_id: Uuid) -> DatabaseResult<u64> {
        let ids: Vec<Uuid> = self
            .state
            .entries
            .values()
            .filter(|s| s.record.child_id == child_id)
            .map(|s| s.record.id)
            .collect();
        let mut removed = 0u64;
        for id in ids {
            if let Some(stored) = self.state.entries.remove(&id) {
                self.undo.push(Undo::RestoreEntry(stored));
                removed = removed.saturating_add(1);
            }
        }
        Ok(removed)
    }

    async fn delete_child(&mut self, id: Uuid) -> DatabaseResult<bool> {
        match self.state.children.remove(&id) {
            Some(stored) => {
                self.undo.push(Undo::RestoreChild(stored));
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_food_entry(&mut self, id: Uuid) -> DatabaseResult<bool> {
        match self.state.entries.remove(&id) {
            Some(stored) => {
                self.undo.push(Undo::RestoreEntry(stored));
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn commit(self: Box<Self>) -> DatabaseResult<()> {
        let mut tx = self;
        tx.undo.clear();
        tx.finished = true;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> DatabaseResult<()> {
        let mut tx = self;
        tx.revert();
        tx.finished = true;
        Ok(())
    }
}

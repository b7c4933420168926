//! Hierarchy consistency rules
//!
//! Every operation runs inside the caller's transaction and re-checks that its
//! target (or parent) still exists at execution time. Deleting a child removes
//! its entries first, in the same transaction, so no entry outlives its child.

use crate::input::{ChildInput, FoodEntryInput};
use crate::ChildDetail;
use database_layer::{Child, FoodEntry, HierarchyReader, HierarchyTransaction};
use error_common::{FoodLogError, Result};
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Debug, Default, Clone, Copy)]
pub struct HierarchyManager;

impl HierarchyManager {
    pub fn new() -> Self {
        Self
    }

    pub async fn create_child(
        &self,
        tx: &mut dyn HierarchyTransaction,
        account_id: Uuid,
        input: &ChildInput,
    ) -> Result<Child> {
        let valid = input.validate()?;
        let child = Child::new(account_id, valid.name, valid.date_of_birth);
        tx.insert_child(&child).await?;
        info!(%account_id, child_id = %child.id, "Child created");
        Ok(child)
    }

    pub async fn create_food_entry(
        &self,
        tx: &mut dyn HierarchyTransaction,
        child_id: Uuid,
        input: &FoodEntryInput,
    ) -> Result<FoodEntry> {
        let valid = input.validate()?;
        if tx.find_child_by_id(child_id).await?.is_none() {
            return Err(FoodLogError::not_found("Child"));
        }
        let entry = FoodEntry::new(child_id, valid.food_id, valid.tried_date, valid.notes);
        tx.insert_food_entry(&entry).await?;
        info!(%child_id, entry_id = %entry.id, "Food entry created");
        Ok(entry)
    }

    /// Remove the child and every entry under it
    pub async fn delete_child(&self, tx: &mut dyn HierarchyTransaction, child_id: Uuid) -> Result<()> {
        let removed_entries = tx.delete_food_entries_by_child(child_id).await?;
        if !tx.delete_child(child_id).await? {
            return Err(FoodLogError::not_found("Child"));
        }
        info!(%child_id, removed_entries, "Child deleted");
        Ok(())
    }

    /// Replace the notes of an entry and return the updated entry
    pub async fn update_food_entry_notes(
        &self,
        tx: &mut dyn HierarchyTransaction,
        entry_id: Uuid,
        notes: Option<&str>,
    ) -> Result<FoodEntry> {
        if !tx.update_food_entry_notes(entry_id, notes).await? {
            return Err(FoodLogError::not_found("Food entry"));
        }
        let entry = tx
            .find_food_entry_by_id(entry_id)
            .await?
            .ok_or_else(|| FoodLogError::not_found("Food entry"))?;
        debug!(%entry_id, "Food entry notes updated");
        Ok(entry)
    }

    pub async fn delete_food_entry(&self, tx: &mut dyn HierarchyTransaction, entry_id: Uuid) -> Result<()> {
        if !tx.delete_food_entry(entry_id).await? {
            return Err(FoodLogError::not_found("Food entry"));
        }
        info!(%entry_id, "Food entry deleted");
        Ok(())
    }

    /// Children of an account in creation order, each with its entries
    pub async fn list_children_for_account(
        &self,
        tx: &mut dyn HierarchyTransaction,
        account_id: Uuid,
    ) -> Result<Vec<ChildDetail>> {
        let children = tx.find_children_by_account(account_id).await?;
        let mut details = Vec::with_capacity(children.len());
        for child in children {
            details.push(self.child_detail(tx, child).await?);
        }
        Ok(details)
    }

    /// Entries of a child, most recently tried first; equal dates keep creation order
    pub async fn list_food_entries_for_child(
        &self,
        tx: &mut dyn HierarchyTransaction,
        child_id: Uuid,
    ) -> Result<Vec<FoodEntry>> {
        if tx.find_child_by_id(child_id).await?.is_none() {
            return Err(FoodLogError::not_found("Child"));
        }
        let mut entries = tx.find_food_entries_by_child(child_id).await?;
        sort_newest_first(&mut entries);
        Ok(entries)
    }

    pub async fn child_detail(&self, tx: &mut dyn HierarchyTransaction, child: Child) -> Result<ChildDetail> {
        let mut food_entries = tx.find_food_entries_by_child(child.id).await?;
        sort_newest_first(&mut food_entries);
        Ok(ChildDetail { child, food_entries })
    }
}

fn sort_newest_first(entries: &mut [FoodEntry]) {
    // sort_by is stable, so ties keep insertion order
    entries.sort_by(|a, b| b.tried_date.cmp(&a.tried_date));
}

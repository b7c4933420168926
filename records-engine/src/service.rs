use crate::input::{ChildInput, FoodEntryInput};
use crate::manager::HierarchyManager;
use crate::models::ChildDetail;
use auth_identity::Principal;
use auth_ownership::{Decision, Operation, OwnershipEngine, Resource, ResourceKind};
use database_layer::{settle, AccessMode, Child, FoodEntry, HierarchyStore, HierarchyTransaction};
use error_common::{FoodLogError, Result};
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

/// Authorize-then-act entry point for every record operation.
///
/// Each call opens one store transaction, asks the [`OwnershipEngine`] for a
/// decision inside it, performs the [`HierarchyManager`] operation in the same
/// transaction when allowed, and commits. Any failure rolls the transaction back.
pub struct RecordService {
    store: Arc<dyn HierarchyStore>,
    engine: OwnershipEngine,
    manager: HierarchyManager,
}

impl RecordService {
    pub fn new(store: Arc<dyn HierarchyStore>) -> Self {
        Self {
            engine: OwnershipEngine::new(store.clone()),
            store,
            manager: HierarchyManager::new(),
        }
    }

    pub async fn create_child(&self, principal: &Principal, input: &ChildInput) -> Result<Child> {
        input.validate()?;
        let mut tx = self.store.begin(AccessMode::Write).await?;
        let result = self
            .manager
            .create_child(tx.as_mut(), principal.account_id, input)
            .await;
        settle(tx, result).await
    }

    pub async fn list_children(&self, principal: &Principal) -> Result<Vec<ChildDetail>> {
        let mut tx = self.store.begin(AccessMode::Read).await?;
        let result = self
            .manager
            .list_children_for_account(tx.as_mut(), principal.account_id)
            .await;
        settle(tx, result).await
    }

    pub async fn get_child(&self, principal: &Principal, child_id: Uuid) -> Result<ChildDetail> {
        let mut tx = self.store.begin(AccessMode::Read).await?;
        let result = async {
            let child = self
                .authorize_child(tx.as_mut(), principal, Operation::Read, ResourceKind::Child, child_id)
                .await?;
            self.manager.child_detail(tx.as_mut(), child).await
        }
        .await;
        settle(tx, result).await
    }

    pub async fn delete_child(&self, principal: &Principal, child_id: Uuid) -> Result<()> {
        let mut tx = self.store.begin(AccessMode::Write).await?;
        let result = async {
            self.authorize_child(tx.as_mut(), principal, Operation::Delete, ResourceKind::Child, child_id)
                .await?;
            self.manager.delete_child(tx.as_mut(), child_id).await
        }
        .await;
        settle(tx, result).await
    }

    /// Missing fields are reported before the child is resolved
    pub async fn create_food_entry(
        &self,
        principal: &Principal,
        child_id: Uuid,
        input: &FoodEntryInput,
    ) -> Result<FoodEntry> {
        input.validate()?;
        let mut tx = self.store.begin(AccessMode::Write).await?;
        let result = async {
            self.authorize_child(tx.as_mut(), principal, Operation::Create, ResourceKind::FoodEntry, child_id)
                .await?;
            self.manager.create_food_entry(tx.as_mut(), child_id, input).await
        }
        .await;
        settle(tx, result).await
    }

    pub async fn list_food_entries(&self, principal: &Principal, child_id: Uuid) -> Result<Vec<FoodEntry>> {
        let mut tx = self.store.begin(AccessMode::Read).await?;
        let result = async {
            self.authorize_child(tx.as_mut(), principal, Operation::List, ResourceKind::FoodEntry, child_id)
                .await?;
            self.manager.list_food_entries_for_child(tx.as_mut(), child_id).await
        }
        .await;
        settle(tx, result).await
    }

    pub async fn get_food_entry(&self, principal: &Principal, entry_id: Uuid) -> Result<FoodEntry> {
        let mut tx = self.store.begin(AccessMode::Read).await?;
        let result = self
            .authorize_entry(tx.as_mut(), principal, Operation::Read, entry_id)
            .await;
        settle(tx, result).await
    }

    /// `notes: None` leaves the entry unchanged; `Some(None)` clears the notes
    pub async fn update_food_entry_notes(
        &self,
        principal: &Principal,
        entry_id: Uuid,
        notes: Option<Option<String>>,
    ) -> Result<FoodEntry> {
        let mut tx = self.store.begin(AccessMode::Write).await?;
        let result = async {
            let entry = self
                .authorize_entry(tx.as_mut(), principal, Operation::Update, entry_id)
                .await?;
            match notes {
                Some(notes) => {
                    self.manager
                        .update_food_entry_notes(tx.as_mut(), entry_id, notes.as_deref())
                        .await
                }
                None => Ok(entry),
            }
        }
        .await;
        settle(tx, result).await
    }

    pub async fn delete_food_entry(&self, principal: &Principal, entry_id: Uuid) -> Result<()> {
        let mut tx = self.store.begin(AccessMode::Write).await?;
        let result = async {
            self.authorize_entry(tx.as_mut(), principal, Operation::Delete, entry_id)
                .await?;
            self.manager.delete_food_entry(tx.as_mut(), entry_id).await
        }
        .await;
        settle(tx, result).await
    }

    async fn decide(
        &self,
        tx: &mut dyn HierarchyTransaction,
        principal: &Principal,
        operation: Operation,
        kind: ResourceKind,
        id: Uuid,
    ) -> Result<Resource> {
        match self.engine.authorize_in(tx, principal, operation, kind, id).await? {
            Decision::Allowed(resource) => Ok(resource),
            Decision::NotFound => Err(FoodLogError::not_found(kind.addressed_by(operation).name())),
            Decision::Denied => {
                warn!(
                    account_id = %principal.account_id,
                    %operation,
                    resource = %kind,
                    resource_id = %id,
                    "Access denied"
                );
                Err(FoodLogError::forbidden(kind.noun(), operation.verb()))
            }
        }
    }

    async fn authorize_child(
        &self,
        tx: &mut dyn HierarchyTransaction,
        principal: &Principal,
        operation: Operation,
        kind: ResourceKind,
        child_id: Uuid,
    ) -> Result<Child> {
        let resource = self.decide(tx, principal, operation, kind, child_id).await?;
        Ok(resource.child().clone())
    }

    async fn authorize_entry(
        &self,
        tx: &mut dyn HierarchyTransaction,
        principal: &Principal,
        operation: Operation,
        entry_id: Uuid,
    ) -> Result<FoodEntry> {
        match self
            .decide(tx, principal, operation, ResourceKind::FoodEntry, entry_id)
            .await?
        {
            Resource::FoodEntry { entry, .. } => Ok(entry),
            Resource::Child(_) => Err(FoodLogError::internal("entry lookup resolved to a child")),
        }
    }
}

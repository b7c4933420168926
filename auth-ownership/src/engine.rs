use crate::{error::Result, models::*};
use auth_identity::Principal;
use database_layer::{settle, AccessMode, DatabaseError, HierarchyReader, HierarchyStore};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Ownership-scoped authorization engine.
///
/// Decisions are computed from current store state on every call and never
/// cached. Rules, first match wins:
///
/// 1. `Child`, any operation: missing or foreign child is `NotFound`.
/// 2. `FoodEntry` + `Create`: the id is the target child; missing or foreign is `NotFound`.
/// 3. `FoodEntry` + `List`: same as 2.
/// 4. `FoodEntry` + `Read`/`Update`/`Delete`: the id is the entry. A missing entry
///    is `NotFound`; an entry under another account's child is `Denied`.
pub struct OwnershipEngine {
    store: Arc<dyn HierarchyStore>,
}

impl OwnershipEngine {
    pub fn new(store: Arc<dyn HierarchyStore>) -> Self {
        Self { store }
    }

    /// Decide in a transaction of its own.
    ///
    /// Callers that act on the decision should use [`authorize_in`](Self::authorize_in)
    /// with the transaction that performs the action.
    pub async fn authorize(
        &self,
        principal: &Principal,
        operation: Operation,
        kind: ResourceKind,
        resource_id: Uuid,
    ) -> Result<Decision> {
        let mut tx = self.store.begin(AccessMode::Read).await?;
        let decision = self
            .authorize_in(tx.as_mut(), principal, operation, kind, resource_id)
            .await;
        Ok(settle::<_, DatabaseError>(tx, decision).await?)
    }

    /// Decide against the state visible to `tx`
    pub async fn authorize_in<R>(
        &self,
        tx: &mut R,
        principal: &Principal,
        operation: Operation,
        kind: ResourceKind,
        resource_id: Uuid,
    ) -> std::result::Result<Decision, DatabaseError>
    where
        R: HierarchyReader + ?Sized,
    {
        let decision = match (kind, operation) {
            (ResourceKind::Child, _)
            | (ResourceKind::FoodEntry, Operation::Create)
            | (ResourceKind::FoodEntry, Operation::List) => {
                match tx.find_child_by_id(resource_id).await? {
                    Some(child) if child.account_id == principal.account_id => {
                        Decision::Allowed(Resource::Child(child))
                    }
                    // Foreign children are indistinguishable from missing ones
                    _ => Decision::NotFound,
                }
            }
            (ResourceKind::FoodEntry, _) => {
                match tx.find_food_entry_by_id(resource_id).await? {
                    None => Decision::NotFound,
                    Some(entry) => match tx.find_child_by_id(entry.child_id).await? {
                        // Parent vanished between the two lookups
                        None => Decision::NotFound,
                        Some(child) if child.account_id == principal.account_id => {
                            Decision::Allowed(Resource::FoodEntry { entry, child })
                        }
                        Some(_) => Decision::Denied,
                    },
                }
            }
        };

        debug!(
            account_id = %principal.account_id,
            %operation,
            resource = %kind,
            %resource_id,
            decision = decision.label(),
            "Authorization decision"
        );

        Ok(decision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use database_layer::{Child, FoodEntry, HierarchyTransaction, InMemoryHierarchyStore};

    struct Fixture {
        engine: OwnershipEngine,
        owner: Principal,
        stranger: Principal,
        child: Child,
        entry: FoodEntry,
    }

    async fn fixture() -> Fixture {
        let store = Arc::new(InMemoryHierarchyStore::new());
        let owner = Principal::new(Uuid::new_v4());
        let stranger = Principal::new(Uuid::new_v4());
        let child = Child::new(
            owner.account_id,
            "Test Child",
            NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
        );
        let entry = FoodEntry::new(
            child.id,
            1,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            Some("Really enjoyed the banana!".into()),
        );

        let mut tx = store.begin(AccessMode::Write).await.unwrap();
        tx.insert_child(&child).await.unwrap();
        tx.insert_food_entry(&entry).await.unwrap();
        tx.commit().await.unwrap();

        Fixture {
            engine: OwnershipEngine::new(store),
            owner,
            stranger,
            child,
            entry,
        }
    }

    #[tokio::test]
    async fn test_owner_is_allowed_on_child() {
        let f = fixture().await;
        let decision = f
            .engine
            .authorize(&f.owner, Operation::Read, ResourceKind::Child, f.child.id)
            .await
            .unwrap();
        assert_eq!(decision, Decision::Allowed(Resource::Child(f.child.clone())));
    }

    #[tokio::test]
    async fn test_foreign_child_is_masked() {
        let f = fixture().await;
        for op in [Operation::Read, Operation::Delete, Operation::List] {
            let decision = f
                .engine
                .authorize(&f.stranger, op, ResourceKind::Child, f.child.id)
                .await
                .unwrap();
            assert_eq!(decision, Decision::NotFound, "operation {op}");
        }
    }

    #[tokio::test]
    async fn test_entry_create_and_list_mask_foreign_child() {
        let f = fixture().await;
        for op in [Operation::Create, Operation::List] {
            let masked = f
                .engine
                .authorize(&f.stranger, op, ResourceKind::FoodEntry, f.child.id)
                .await
                .unwrap();
            assert_eq!(masked, Decision::NotFound);

            let allowed = f
                .engine
                .authorize(&f.owner, op, ResourceKind::FoodEntry, f.child.id)
                .await
                .unwrap();
            assert!(allowed.is_allowed());
        }
    }

    #[tokio::test]
    async fn test_foreign_entry_mutation_is_denied() {
        let f = fixture().await;
        for op in [Operation::Read, Operation::Update, Operation::Delete] {
            let decision = f
                .engine
                .authorize(&f.stranger, op, ResourceKind::FoodEntry, f.entry.id)
                .await
                .unwrap();
            assert_eq!(decision, Decision::Denied, "operation {op}");
        }
    }

    #[tokio::test]
    async fn test_owned_entry_resolves_with_its_child() {
        let f = fixture().await;
        let decision = f
            .engine
            .authorize(&f.owner, Operation::Update, ResourceKind::FoodEntry, f.entry.id)
            .await
            .unwrap();
        assert_eq!(
            decision,
            Decision::Allowed(Resource::FoodEntry {
                entry: f.entry.clone(),
                child: f.child.clone(),
            })
        );
    }

    #[tokio::test]
    async fn test_missing_ids_are_not_found() {
        let f = fixture().await;
        let missing = Uuid::new_v4();
        for kind in [ResourceKind::Child, ResourceKind::FoodEntry] {
            let decision = f
                .engine
                .authorize(&f.owner, Operation::Delete, kind, missing)
                .await
                .unwrap();
            assert_eq!(decision, Decision::NotFound);
        }
    }
}

//! Ownership rules exercised against the in-memory store
//!
//! Accounts A and B each own children with entries; every cross-account access
//! must be masked (children, entry create/list) or denied (entries by id).

use auth_identity::Principal;
use auth_ownership::*;
use chrono::NaiveDate;
use database_layer::{
    AccessMode, Child, FoodEntry, HierarchyStore, HierarchyTransaction, InMemoryHierarchyStore,
};
use proptest::prelude::*;
use std::sync::Arc;
use uuid::Uuid;

async fn seed(store: &InMemoryHierarchyStore, owner: &Principal, children: usize) -> Vec<(Child, FoodEntry)> {
    let mut seeded = Vec::new();
    let mut tx = store.begin(AccessMode::Write).await.unwrap();
    for i in 0..children {
        let child = Child::new(
            owner.account_id,
            format!("Child {i}"),
            NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
        );
        let entry = FoodEntry::new(child.id, i as i32, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), None);
        tx.insert_child(&child).await.unwrap();
        tx.insert_food_entry(&entry).await.unwrap();
        seeded.push((child, entry));
    }
    tx.commit().await.unwrap();
    seeded
}

#[tokio::test]
async fn test_two_accounts_never_see_each_other() {
    let store = Arc::new(InMemoryHierarchyStore::new());
    let alice = Principal::new(Uuid::new_v4());
    let bob = Principal::new(Uuid::new_v4());
    let alices = seed(&store, &alice, 2).await;
    let bobs = seed(&store, &bob, 2).await;
    let engine = OwnershipEngine::new(store.clone());

    for (caller, others) in [(&alice, &bobs), (&bob, &alices)] {
        for (child, entry) in others {
            for op in [Operation::Read, Operation::Delete] {
                let d = engine.authorize(caller, op, ResourceKind::Child, child.id).await.unwrap();
                assert_eq!(d, Decision::NotFound);
            }
            for op in [Operation::Create, Operation::List] {
                let d = engine.authorize(caller, op, ResourceKind::FoodEntry, child.id).await.unwrap();
                assert_eq!(d, Decision::NotFound);
            }
            for op in [Operation::Update, Operation::Delete] {
                let d = engine.authorize(caller, op, ResourceKind::FoodEntry, entry.id).await.unwrap();
                assert_eq!(d, Decision::Denied);
            }
        }
    }
}

#[tokio::test]
async fn test_decision_tracks_current_state() {
    let store = Arc::new(InMemoryHierarchyStore::new());
    let alice = Principal::new(Uuid::new_v4());
    let seeded = seed(&store, &alice, 1).await;
    let (child, entry) = &seeded[0];
    let engine = OwnershipEngine::new(store.clone());

    let before = engine
        .authorize(&alice, Operation::Update, ResourceKind::FoodEntry, entry.id)
        .await
        .unwrap();
    assert!(before.is_allowed());

    let mut tx = store.begin(AccessMode::Write).await.unwrap();
    tx.delete_food_entries_by_child(child.id).await.unwrap();
    tx.delete_child(child.id).await.unwrap();
    tx.commit().await.unwrap();

    let after = engine
        .authorize(&alice, Operation::Update, ResourceKind::FoodEntry, entry.id)
        .await
        .unwrap();
    assert_eq!(after, Decision::NotFound);
}

fn operation() -> impl Strategy<Value = Operation> {
    prop_oneof![
        Just(Operation::Create),
        Just(Operation::Read),
        Just(Operation::List),
        Just(Operation::Update),
        Just(Operation::Delete),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// A principal never gets `Allowed` on a child it does not own, whatever the
    /// operation, and never learns that the child exists.
    #[test]
    fn prop_foreign_child_is_always_masked(
        owner_bits in any::<u128>(),
        caller_bits in any::<u128>(),
        op in operation(),
    ) {
        prop_assume!(owner_bits != caller_bits);
        let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
        let decision = runtime.block_on(async {
            let store = Arc::new(InMemoryHierarchyStore::new());
            let owner = Principal::new(Uuid::from_u128(owner_bits));
            let caller = Principal::new(Uuid::from_u128(caller_bits));
            let seeded = seed(&store, &owner, 1).await;
            let engine = OwnershipEngine::new(store);
            engine.authorize(&caller, op, ResourceKind::Child, seeded[0].0.id).await.unwrap()
        });
        prop_assert_eq!(decision, Decision::NotFound);
    }

    /// Entries addressed by id under a foreign child are denied for every
    /// by-id operation.
    #[test]
    fn prop_foreign_entry_is_denied(
        owner_bits in any::<u128>(),
        caller_bits in any::<u128>(),
        op in prop_oneof![Just(Operation::Read), Just(Operation::Update), Just(Operation::Delete)],
    ) {
        prop_assume!(owner_bits != caller_bits);
        let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
        let decision = runtime.block_on(async {
            let store = Arc::new(InMemoryHierarchyStore::new());
            let owner = Principal::new(Uuid::from_u128(owner_bits));
            let caller = Principal::new(Uuid::from_u128(caller_bits));
            let seeded = seed(&store, &owner, 1).await;
            let engine = OwnershipEngine::new(store);
            engine.authorize(&caller, op, ResourceKind::FoodEntry, seeded[0].1.id).await.unwrap()
        });
        prop_assert_eq!(decision, Decision::Denied);
    }
}

//! RecordService behaviour over the in-memory store

use async_trait::async_trait;
use auth_identity::Principal;
use database_layer::{
    AccessMode, DatabaseError, DatabaseResult, HierarchyReader, HierarchyStore,
    HierarchyTransaction, InMemoryHierarchyStore,
};
use error_common::FoodLogError;
use mockall::mock;
use records_engine::*;
use std::sync::Arc;
use uuid::Uuid;

struct Setup {
    store: Arc<InMemoryHierarchyStore>,
    service: Arc<RecordService>,
    alice: Principal,
    bob: Principal,
}

fn setup() -> Setup {
    let store = Arc::new(InMemoryHierarchyStore::new());
    Setup {
        service: Arc::new(RecordService::new(store.clone())),
        store,
        alice: Principal::new(Uuid::new_v4()),
        bob: Principal::new(Uuid::new_v4()),
    }
}

#[tokio::test]
async fn test_food_log_walkthrough() {
    let s = setup();

    let c1 = s
        .service
        .create_child(&s.alice, &ChildInput::new("Test Child", "2023-01-01"))
        .await
        .unwrap();
    let e1 = s
        .service
        .create_food_entry(
            &s.alice,
            c1.id,
            &FoodEntryInput::new(1, "2024-01-01", Some("Really enjoyed the banana!".into())),
        )
        .await
        .unwrap();

    // Another account may not touch the entry
    let denied = s
        .service
        .update_food_entry_notes(&s.bob, e1.id, Some(Some("mine now".into())))
        .await
        .unwrap_err();
    assert!(matches!(denied, FoodLogError::Forbidden { .. }));
    assert_eq!(denied.to_string(), "Not authorized to update this food entry");

    let updated = s
        .service
        .update_food_entry_notes(&s.alice, e1.id, Some(Some("x".into())))
        .await
        .unwrap();
    assert_eq!(updated.notes.as_deref(), Some("x"));

    s.service.delete_child(&s.alice, c1.id).await.unwrap();

    let gone = s.service.get_food_entry(&s.alice, e1.id).await.unwrap_err();
    assert!(matches!(gone, FoodLogError::NotFound { .. }));
}

#[tokio::test]
async fn test_foreign_child_is_masked_as_not_found() {
    let s = setup();
    let child = s
        .service
        .create_child(&s.alice, &ChildInput::new("Ada", "2023-06-01"))
        .await
        .unwrap();

    for err in [
        s.service.get_child(&s.bob, child.id).await.unwrap_err(),
        s.service.delete_child(&s.bob, child.id).await.unwrap_err(),
        s.service
            .list_food_entries(&s.bob, child.id)
            .await
            .unwrap_err(),
        s.service
            .create_food_entry(&s.bob, child.id, &FoodEntryInput::new(1, "2024-01-01", None))
            .await
            .unwrap_err(),
    ] {
        assert_eq!(err.to_string(), "Child not found");
    }

    // Still intact for the owner
    let detail = s.service.get_child(&s.alice, child.id).await.unwrap();
    assert_eq!(detail.child, child);
}

#[tokio::test]
async fn test_child_listing_is_scoped_and_embeds_entries() {
    let s = setup();
    let mine = s
        .service
        .create_child(&s.alice, &ChildInput::new("Mine", "2023-01-01"))
        .await
        .unwrap();
    s.service
        .create_child(&s.bob, &ChildInput::new("Theirs", "2023-01-01"))
        .await
        .unwrap();
    s.service
        .create_food_entry(&s.alice, mine.id, &FoodEntryInput::new(5, "2024-05-05", None))
        .await
        .unwrap();

    let listed = s.service.list_children(&s.alice).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].child.id, mine.id);
    assert_eq!(listed[0].food_entries.len(), 1);
}

#[tokio::test]
async fn test_double_delete_reports_not_found_and_spares_siblings() {
    let s = setup();
    let doomed = s
        .service
        .create_child(&s.alice, &ChildInput::new("Doomed", "2023-01-01"))
        .await
        .unwrap();
    let sibling = s
        .service
        .create_child(&s.alice, &ChildInput::new("Sibling", "2023-01-01"))
        .await
        .unwrap();
    let sibling_entry = s
        .service
        .create_food_entry(&s.alice, sibling.id, &FoodEntryInput::new(2, "2024-01-01", None))
        .await
        .unwrap();

    s.service.delete_child(&s.alice, doomed.id).await.unwrap();
    let second = s.service.delete_child(&s.alice, doomed.id).await.unwrap_err();
    assert!(matches!(second, FoodLogError::NotFound { .. }));

    let entries = s.service.list_food_entries(&s.alice, sibling.id).await.unwrap();
    assert_eq!(entries, vec![sibling_entry]);
}

#[tokio::test]
async fn test_validation_errors_come_before_ownership() {
    let s = setup();
    let child = s
        .service
        .create_child(&s.alice, &ChildInput::new("Ada", "2023-01-01"))
        .await
        .unwrap();

    let err = s
        .service
        .create_food_entry(&s.bob, child.id, &FoodEntryInput::default())
        .await
        .unwrap_err();
    assert_eq!(err.field(), Some("foodId"));

    let err = s
        .service
        .create_child(&s.alice, &ChildInput::default())
        .await
        .unwrap_err();
    assert_eq!(err.field(), Some("name"));
}

#[tokio::test]
async fn test_absent_notes_leave_entry_unchanged() {
    let s = setup();
    let child = s
        .service
        .create_child(&s.alice, &ChildInput::new("Ada", "2023-01-01"))
        .await
        .unwrap();
    let entry = s
        .service
        .create_food_entry(&s.alice, child.id, &FoodEntryInput::new(3, "2024-01-01", Some("keep".into())))
        .await
        .unwrap();

    let same = s
        .service
        .update_food_entry_notes(&s.alice, entry.id, None)
        .await
        .unwrap();
    assert_eq!(same, entry);

    let cleared = s
        .service
        .update_food_entry_notes(&s.alice, entry.id, Some(None))
        .await
        .unwrap();
    assert!(cleared.notes.is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_create_and_delete_leave_no_orphans() {
    let s = setup();
    let child = s
        .service
        .create_child(&s.alice, &ChildInput::new("Racer", "2023-01-01"))
        .await
        .unwrap();

    let mut handles = Vec::new();
    let mut deletion = None;
    for i in 0..32i64 {
        let service = s.service.clone();
        let alice = s.alice;
        let child_id = child.id;
        handles.push(tokio::spawn(async move {
            service
                .create_food_entry(&alice, child_id, &FoodEntryInput::new(i, "2024-01-01", None))
                .await
                .map(|entry| entry.id)
        }));
        if i == 16 {
            let service = s.service.clone();
            let alice = s.alice;
            deletion = Some(tokio::spawn(async move {
                service.delete_child(&alice, child_id).await
            }));
        }
    }

    let mut created = Vec::new();
    for result in futures::future::join_all(handles).await {
        match result.unwrap() {
            Ok(id) => created.push(id),
            Err(FoodLogError::NotFound { .. }) => {}
            Err(other) => panic!("unexpected error: {other}"),
        }
    }
    deletion.unwrap().await.unwrap().unwrap();

    // Whatever won the race, nothing may reference the deleted child
    let mut tx = s.store.begin(AccessMode::Read).await.unwrap();
    assert!(tx.find_child_by_id(child.id).await.unwrap().is_none());
    assert!(tx.find_food_entries_by_child(child.id).await.unwrap().is_empty());
    for id in created {
        assert!(tx.find_food_entry_by_id(id).await.unwrap().is_none());
    }
}

mock! {
    pub UnreachableStore {}

    #[async_trait]
    impl HierarchyStore for UnreachableStore {
        async fn begin(&self, mode: AccessMode) -> DatabaseResult<Box<dyn HierarchyTransaction>>;
        async fn is_healthy(&self) -> bool;
        async fn close(&self);
    }
}

#[tokio::test]
async fn test_store_failure_surfaces_as_internal() {
    let mut store = MockUnreachableStore::new();
    store
        .expect_begin()
        .returning(|_| Err(DatabaseError::ConnectionFailed("connection refused".into())));
    let service = RecordService::new(Arc::new(store));
    let principal = Principal::new(Uuid::new_v4());

    let err = service.list_children(&principal).await.unwrap_err();
    assert!(matches!(err, FoodLogError::Internal(_)));
    assert!(!err.to_string().contains("connection refused"));
}

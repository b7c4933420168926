//! PostgreSQL-backed hierarchy store
//!
//! Each transaction owns a pooled connection for its whole lifetime. Child rows
//! looked up by id are locked `FOR SHARE` or `FOR UPDATE` according to the
//! transaction's [`AccessMode`]; entries are locked implicitly by the statement
//! that mutates them. Locks are always taken child first, then entry.

use crate::connection::DatabasePool;
use crate::error::{DatabaseError, DatabaseResult};
use crate::models::{Child, FoodEntry};
use crate::store::{AccessMode, HierarchyReader, HierarchyStore, HierarchyTransaction};
use async_trait::async_trait;
use sqlx::{Postgres, Transaction};
use tracing::{debug, info};
use uuid::Uuid;

const FOREIGN_KEY_VIOLATION: &str = "23503";

const CHILD_BY_ID_SHARE: &str =
    "SELECT id, name, date_of_birth, account_id FROM children WHERE id = $1 FOR SHARE";
const CHILD_BY_ID_UPDATE: &str =
    "SELECT id, name, date_of_birth, account_id FROM children WHERE id = $1 FOR UPDATE";

/// PostgreSQL-backed hierarchy store
#[derive(Clone, Debug)]
pub struct PostgresHierarchyStore {
    pool: DatabasePool,
}

impl PostgresHierarchyStore {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DatabasePool {
        &self.pool
    }
}

#[async_trait]
impl HierarchyStore for PostgresHierarchyStore {
    async fn begin(&self, mode: AccessMode) -> DatabaseResult<Box<dyn HierarchyTransaction>> {
        let tx = self
            .pool
            .pool()
            .begin()
            .await
            .map_err(|e| DatabaseError::QueryFailed(format!("Failed to begin transaction: {}", e)))?;
        debug!(?mode, "PostgreSQL transaction started");
        Ok(Box::new(PostgresTransaction { tx, mode }))
    }

    async fn is_healthy(&self) -> bool {
        self.pool.is_healthy().await
    }

    async fn close(&self) {
        self.pool.close().await;
        info!("PostgreSQL hierarchy store closed");
    }
}

struct PostgresTransaction {
    tx: Transaction<'static, Postgres>,
    mode: AccessMode,
}

fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => db.code().as_deref() == Some(FOREIGN_KEY_VIOLATION),
        _ => false,
    }
}

#[async_trait]
impl HierarchyReader for PostgresTransaction {
    async fn find_child_by_id(&mut self, id: Uuid) -> DatabaseResult<Option<Child>> {
        let sql = match self.mode {
            AccessMode::Read => CHILD_BY_ID_SHARE,
            AccessMode::Write => CHILD_BY_ID_UPDATE,
        };
        let child = sqlx::query_as::<_, Child>(sql)
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await?;
        Ok(child)
    }

    async fn find_children_by_account(&mut self, account_id: Uuid) -> DatabaseResult<Vec<Child>> {
        let children = sqlx::query_as::<_, Child>(
            r#"
            SELECT id, name, date_of_birth, account_id
            FROM children
            WHERE account_id = $1
            ORDER BY seq
            "#,
        )
        .bind(account_id)
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(children)
    }

    async fn find_food_entry_by_id(&mut self, id: Uuid) -> DatabaseResult<Option<FoodEntry>> {
        let entry = sqlx::query_as::<_, FoodEntry>(
            "SELECT id, food_id, tried_date, notes, child_id FROM food_entries WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(entry)
    }

    async fn find_food_entries_by_child(
        &mut self,
        child_id: Uuid,
    ) -> DatabaseResult<Vec<FoodEntry>> {
        let entries = sqlx::query_as::<_, FoodEntry>(
            r#"
            SELECT id, food_id, tried_date, notes, child_id
            FROM food_entries
            WHERE child_id = $1
            ORDER BY seq
            "#,
        )
        .bind(child_id)
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(entries)
    }
}

#[async_trait]
impl HierarchyTransaction for PostgresTransaction {
    async fn insert_child(&mut self, child: &Child) -> DatabaseResult<()> {
        sqlx::query(
            "INSERT INTO children (id, name, date_of_birth, account_id) VALUES ($1, $2, $3, $4)",
        )
        .bind(child.id)
        .bind(&child.name)
        .bind(child.date_of_birth)
        .bind(child.account_id)
        .execute(&mut *self.tx)
        .await
        .map_err(|e| DatabaseError::QueryFailed(format!("Failed to insert child: {}", e)))?;
        Ok(())
    }

    async fn insert_food_entry(&mut self, entry: &FoodEntry) -> DatabaseResult<()> {
        sqlx::query(
            r#"
            INSERT INTO food_entries (id, food_id, tried_date, notes, child_id)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(entry.id)
        .bind(entry.food_id)
        .bind(entry.tried_date)
        .bind(&entry.notes)
        .bind(entry.child_id)
        .execute(&mut *self.tx)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                DatabaseError::MissingParent {
                    kind: "Child",
                    id: entry.child_id,
                }
            } else {
                DatabaseError::QueryFailed(format!("Failed to insert food entry: {}", e))
            }
        })?;
        Ok(())
    }

    async fn update_food_entry_notes(
        &mut self,
        id: Uuid,
        notes: Option<&str>,
    ) -> DatabaseResult<bool> {
        let result = sqlx::query("UPDATE food_entries SET notes = $2 WHERE id = $1")
            .bind(id)
            .bind(notes)
            .execute(&mut *self.tx)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_food_entries_by_child(&mut self, child_id: Uuid) -> DatabaseResult<u64> {
        let result = sqlx::query("DELETE FROM food_entries WHERE child_id = $1")
            .bind(child_id)
            .execute(&mut *self.tx)
            .await?;
        Ok(result.rows_affected())
    }

    async fn delete_child(&mut self, id: Uuid) -> DatabaseResult<bool> {
        let result = sqlx::query("DELETE FROM children WHERE id = $1")
            .bind(id)
            .execute(&mut *self.tx)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_food_entry(&mut self, id: Uuid) -> DatabaseResult<bool> {
        let result = sqlx::query("DELETE FROM food_entries WHERE id = $1")
            .bind(id)
            .execute(&mut *self.tx)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn commit(self: Box<Self>) -> DatabaseResult<()> {
        self.tx
            .commit()
            .await
            .map_err(|e| DatabaseError::QueryFailed(format!("Failed to commit: {}", e)))
    }

    async fn rollback(self: Box<Self>) -> DatabaseResult<()> {
        self.tx
            .rollback()
            .await
            .map_err(|e| DatabaseError::QueryFailed(format!("Failed to roll back: {}", e)))
    }
}

// Hierarchy records: Account -> Child -> FoodEntry
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A child owned by exactly one account. `account_id` never changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Child {
    pub id: Uuid,
    pub name: String,
    pub date_of_birth: NaiveDate,
    pub account_id: Uuid,
}

impl Child {
    pub fn new(account_id: Uuid, name: impl Into<String>, date_of_birth: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            date_of_birth,
            account_id,
        }
    }
}

/// A food a child has tried. Only `notes` is mutable after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct FoodEntry {
    pub id: Uuid,
    pub food_id: i32,
    pub tried_date: NaiveDate,
    pub notes: Option<String>,
    pub child_id: Uuid,
}

impl FoodEntry {
    pub fn new(child_id: Uuid, food_id: i32, tried_date: NaiveDate, notes: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            food_id,
            tried_date,
            notes,
            child_id,
        }
    }
}

// Request payloads and their validation
use chrono::{DateTime, NaiveDate};
use error_common::{FoodLogError, Result};
use serde::Deserialize;
use uuid::Uuid;

/// Parse a calendar date given as `YYYY-MM-DD` or as an RFC 3339 timestamp.
///
/// For timestamps the date part as written is kept, without shifting to UTC.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

/// Parse a record id. Anything that is not a UUID cannot address a record.
pub fn parse_id(raw: &str, resource: &str) -> Result<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| FoodLogError::not_found(resource))
}

/// Blank counts as missing; the value itself is returned as given
fn required_text<'a>(value: Option<&'a str>, field: &str) -> Result<&'a str> {
    match value {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(FoodLogError::validation(field, format!("{field} is required"))),
    }
}

fn required_date(value: Option<&str>, field: &str) -> Result<NaiveDate> {
    let raw = required_text(value, field)?;
    parse_date(raw).ok_or_else(|| {
        FoodLogError::validation(field, format!("{field} must be a date (YYYY-MM-DD)"))
    })
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildInput {
    pub name: Option<String>,
    pub date_of_birth: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidChild {
    pub name: String,
    pub date_of_birth: NaiveDate,
}

impl ChildInput {
    pub fn new(name: impl Into<String>, date_of_birth: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            date_of_birth: Some(date_of_birth.into()),
        }
    }

    pub fn validate(&self) -> Result<ValidChild> {
        let name = required_text(self.name.as_deref(), "name")?;
        let date_of_birth = required_date(self.date_of_birth.as_deref(), "dateOfBirth")?;
        Ok(ValidChild {
            name: name.to_string(),
            date_of_birth,
        })
    }
}

/// A new food entry. `food_id` is any integer; it is never checked against a catalog.
#[derive(Debug, Clone, Default)]
pub struct FoodEntryInput {
    pub food_id: Option<i64>,
    pub tried_date: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidFoodEntry {
    pub food_id: i32,
    pub tried_date: NaiveDate,
    pub notes: Option<String>,
}

impl FoodEntryInput {
    pub fn new(food_id: i64, tried_date: impl Into<String>, notes: Option<String>) -> Self {
        Self {
            food_id: Some(food_id),
            tried_date: Some(tried_date.into()),
            notes,
        }
    }

    pub fn validate(&self) -> Result<ValidFoodEntry> {
        let raw_food_id = self
            .food_id
            .ok_or_else(|| FoodLogError::validation("foodId", "foodId is required"))?;
        let food_id = i32::try_from(raw_food_id)
            .map_err(|_| FoodLogError::validation("foodId", "foodId is out of range"))?;
        let tried_date = required_date(self.tried_date.as_deref(), "triedDate")?;
        Ok(ValidFoodEntry {
            food_id,
            tried_date,
            notes: self.notes.clone(),
        })
    }
}

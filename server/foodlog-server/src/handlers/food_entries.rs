use auth_ownership::ResourceKind;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use database_layer::FoodEntry;
use records_engine::{parse_id, FoodEntryInput};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::MessageResponse;
use crate::error::{api_list, api_success, ApiError, ApiResponse};
use crate::middleware::AuthContext;
use crate::server::FoodLogServer;
use crate::validation::RequestValidation;
use crate::{validate_field, validate_present, validate_required};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFoodEntryRequest {
    pub child_id: Option<String>,
    /// Integer, or a string holding one
    pub food_id: Option<Value>,
    pub tried_date: Option<String>,
    pub notes: Option<String>,
}

impl CreateFoodEntryRequest {
    fn food_id(&self) -> Option<i64> {
        match self.food_id.as_ref()? {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    fn to_input(&self) -> FoodEntryInput {
        FoodEntryInput {
            food_id: self.food_id(),
            tried_date: self.tried_date.clone(),
            notes: self.notes.clone(),
        }
    }
}

impl RequestValidation for CreateFoodEntryRequest {
    fn validate(&self) -> Result<(), ApiError> {
        validate_required!(self.child_id, "childId");
        validate_present!(self.food_id, "foodId");
        validate_field!("foodId", self.food_id().is_some(), "foodId must be an integer");
        validate_required!(self.tried_date, "triedDate");
        Ok(())
    }
}

/// PATCH body. An absent `notes` leaves the entry alone; `null` clears it.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateFoodEntryRequest {
    #[serde(default, deserialize_with = "present")]
    pub notes: Option<Option<String>>,
}

fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

pub async fn create_food_entry(
    State(server): State<FoodLogServer>,
    auth: AuthContext,
    payload: Result<Json<CreateFoodEntryRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<FoodEntry>>), ApiError> {
    let Json(request) = payload?;
    request.validate()?;
    // Every body field is checked before the child id is resolved
    let input = request.to_input();
    input.validate()?;

    let raw_child_id = request.child_id.as_deref().unwrap_or_default();
    let child_id = parse_id(raw_child_id, ResourceKind::Child.name())?;
    let entry = server
        .records
        .create_food_entry(&auth.principal, child_id, &input)
        .await?;

    Ok((StatusCode::CREATED, Json(api_success(entry))))
}

/// Entries of one child, newest tried date first
pub async fn list_food_entries_for_child(
    State(server): State<FoodLogServer>,
    auth: AuthContext,
    Path(child_id): Path<String>,
) -> Result<Json<ApiResponse<Vec<FoodEntry>>>, ApiError> {
    let child_id = parse_id(&child_id, ResourceKind::Child.name())?;
    let entries = server
        .records
        .list_food_entries(&auth.principal, child_id)
        .await?;
    Ok(Json(api_list(entries)))
}

pub async fn get_food_entry(
    State(server): State<FoodLogServer>,
    auth: AuthContext,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<FoodEntry>>, ApiError> {
    let entry_id = parse_id(&id, ResourceKind::FoodEntry.name())?;
    let entry = server.records.get_food_entry(&auth.principal, entry_id).await?;
    Ok(Json(api_success(entry)))
}

pub async fn update_food_entry(
    State(server): State<FoodLogServer>,
    auth: AuthContext,
    Path(id): Path<String>,
    payload: Result<Json<UpdateFoodEntryRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<FoodEntry>>, ApiError> {
    let entry_id = parse_id(&id, ResourceKind::FoodEntry.name())?;
    let Json(request) = payload?;
    let entry = server
        .records
        .update_food_entry_notes(&auth.principal, entry_id, request.notes)
        .await?;
    Ok(Json(api_success(entry)))
}

pub async fn delete_food_entry(
    State(server): State<FoodLogServer>,
    auth: AuthContext,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let entry_id = parse_id(&id, ResourceKind::FoodEntry.name())?;
    server
        .records
        .delete_food_entry(&auth.principal, entry_id)
        .await?;
    Ok(Json(api_success(MessageResponse::new(
        "Food entry deleted successfully",
    ))))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(body: Value) -> CreateFoodEntryRequest {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_food_id_accepts_numbers_and_numeric_strings() {
        let numeric = request(serde_json::json!({ "foodId": 7 }));
        assert_eq!(numeric.food_id(), Some(7));
        let text = request(serde_json::json!({ "foodId": "12" }));
        assert_eq!(text.food_id(), Some(12));
        let zero = request(serde_json::json!({ "foodId": 0 }));
        assert_eq!(zero.food_id(), Some(0));
        let fractional = request(serde_json::json!({ "foodId": 1.5 }));
        assert_eq!(fractional.food_id(), None);
    }

    #[test]
    fn test_validation_names_missing_field() {
        let err = request(serde_json::json!({ "foodId": 1, "triedDate": "2024-01-01" }))
            .validate()
            .unwrap_err();
        assert_eq!(err.to_string(), "childId is required");

        let err = request(serde_json::json!({ "childId": "x", "foodId": null, "triedDate": "2024-01-01" }))
            .validate()
            .unwrap_err();
        assert_eq!(err.to_string(), "foodId is required");

        let err = request(serde_json::json!({ "childId": "x", "foodId": true, "triedDate": "2024-01-01" }))
            .validate()
            .unwrap_err();
        assert_eq!(err.to_string(), "foodId must be an integer");

        let err = request(serde_json::json!({ "childId": "x", "foodId": 1 }))
            .validate()
            .unwrap_err();
        assert_eq!(err.to_string(), "triedDate is required");
    }

    #[test]
    fn test_patch_distinguishes_absent_from_null() {
        let absent: UpdateFoodEntryRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.notes, None);

        let cleared: UpdateFoodEntryRequest = serde_json::from_str(r#"{"notes":null}"#).unwrap();
        assert_eq!(cleared.notes, Some(None));

        let set: UpdateFoodEntryRequest = serde_json::from_str(r#"{"notes":"x"}"#).unwrap();
        assert_eq!(set.notes, Some(Some("x".to_string())));
    }
}

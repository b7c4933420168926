use auth_ownership::ResourceKind;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use database_layer::Child;
use records_engine::{parse_id, ChildDetail, ChildInput};

use super::MessageResponse;
use crate::error::{api_list, api_success, ApiError, ApiResponse};
use crate::middleware::AuthContext;
use crate::server::FoodLogServer;

pub async fn create_child(
    State(server): State<FoodLogServer>,
    auth: AuthContext,
    payload: Result<Json<ChildInput>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<Child>>), ApiError> {
    let Json(input) = payload?;
    let child = server.records.create_child(&auth.principal, &input).await?;
    Ok((StatusCode::CREATED, Json(api_success(child))))
}

/// Every child of the caller, each with its food entries
pub async fn list_children(
    State(server): State<FoodLogServer>,
    auth: AuthContext,
) -> Result<Json<ApiResponse<Vec<ChildDetail>>>, ApiError> {
    let children = server.records.list_children(&auth.principal).await?;
    Ok(Json(api_list(children)))
}

pub async fn get_child(
    State(server): State<FoodLogServer>,
    auth: AuthContext,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ChildDetail>>, ApiError> {
    let child_id = parse_id(&id, ResourceKind::Child.name())?;
    let child = server.records.get_child(&auth.principal, child_id).await?;
    Ok(Json(api_success(child)))
}

/// Delete a child together with all of its food entries
pub async fn delete_child(
    State(server): State<FoodLogServer>,
    auth: AuthContext,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let child_id = parse_id(&id, ResourceKind::Child.name())?;
    server.records.delete_child(&auth.principal, child_id).await?;
    Ok(Json(api_success(MessageResponse::new(
        "Child deleted successfully",
    ))))
}

//! Equipment type endpoints (readable by any signed-in user)

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::{AuthenticatedUser, ValidatedJson};
use crate::{
    error::AppResult,
    models::equipment_type::{CreateEquipmentType, EquipmentType, UpdateEquipmentType},
    AppState,
};

/// List equipment types
#[utoipa::path(
    get,
    path = "/equipment/types",
    tag = "equipment-types",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Equipment types list", body = Vec<EquipmentType>)
    )
)]
pub async fn list_equipment_types(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
) -> AppResult<Json<Vec<EquipmentType>>> {
    let rows = state.services.equipment_types.list().await?;
    Ok(Json(rows))
}

/// Get equipment type by ID
#[utoipa::path(
    get,
    path = "/equipment/types/{id}",
    tag = "equipment-types",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Equipment type ID")),
    responses(
        (status = 200, description = "Equipment type details", body = EquipmentType),
        (status = 404, description = "Equipment type not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_equipment_type(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<EquipmentType>> {
    let row = state.services.equipment_types.get_by_id(id).await?;
    Ok(Json(row))
}

/// Create equipment type
#[utoipa::path(
    post,
    path = "/equipment/types",
    tag = "equipment-types",
    security(("bearer_auth" = [])),
    request_body = CreateEquipmentType,
    responses(
        (status = 201, description = "Equipment type created", body = EquipmentType),
        (status = 409, description = "Name already in use", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_equipment_type(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    ValidatedJson(data): ValidatedJson<CreateEquipmentType>,
) -> AppResult<(StatusCode, Json<EquipmentType>)> {
    claims.require_admin()?;
    let row = state.services.equipment_types.create(&data).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// Update equipment type
#[utoipa::path(
    patch,
    path = "/equipment/types/{id}",
    tag = "equipment-types",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Equipment type ID")),
    request_body = UpdateEquipmentType,
    responses(
        (status = 200, description = "Equipment type updated", body = EquipmentType),
        (status = 404, description = "Equipment type not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Name already in use", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_equipment_type(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    ValidatedJson(data): ValidatedJson<UpdateEquipmentType>,
) -> AppResult<Json<EquipmentType>> {
    claims.require_admin()?;
    let row = state.services.equipment_types.update(id, &data).await?;
    Ok(Json(row))
}

/// Delete equipment type (soft delete)
#[utoipa::path(
    delete,
    path = "/equipment/types/{id}",
    tag = "equipment-types",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Equipment type ID")),
    responses(
        (status = 204, description = "Equipment type deleted"),
        (status = 404, description = "Equipment type not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Type still used by equipment", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_equipment_type(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    claims.require_admin()?;
    state.services.equipment_types.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

//! Equipment unit endpoints
//!
//! Creating a unit, changing its location, registering maintenance and
//! delivering it each record a movement authored by the caller.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use super::{AuthenticatedUser, ValidatedJson};
use crate::{
    error::AppResult,
    models::{
        equipment_unit::{
            CreateEquipmentUnit, EquipmentUnit, RegisterMaintenance, UnitQuery, UpdateEquipmentUnit,
        },
        movement::Movement,
    },
    repository::page_bounds,
    AppState,
};

/// Page of units
#[derive(Serialize, ToSchema)]
pub struct UnitListResponse {
    pub units: Vec<EquipmentUnit>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
}

/// List units
#[utoipa::path(
    get,
    path = "/equipment/units",
    tag = "equipment-units",
    security(("bearer_auth" = [])),
    params(UnitQuery),
    responses(
        (status = 200, description = "Page of units", body = UnitListResponse)
    )
)]
pub async fn list_units(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<UnitQuery>,
) -> AppResult<Json<UnitListResponse>> {
    claims.require_staff()?;
    let (units, total) = state.services.units.list(&query).await?;
    let (page, per_page, _) = page_bounds(query.page, query.per_page);

    Ok(Json(UnitListResponse {
        units,
        total,
        page,
        per_page,
    }))
}

/// Get unit by ID
#[utoipa::path(
    get,
    path = "/equipment/units/{id}",
    tag = "equipment-units",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Unit ID")),
    responses(
        (status = 200, description = "Unit details", body = EquipmentUnit),
        (status = 404, description = "Unit not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_unit(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<EquipmentUnit>> {
    claims.require_staff()?;
    let unit = state.services.units.get_by_id(id).await?;
    Ok(Json(unit))
}

/// Register a unit (records an entry movement)
#[utoipa::path(
    post,
    path = "/equipment/units",
    tag = "equipment-units",
    security(("bearer_auth" = [])),
    request_body = CreateEquipmentUnit,
    responses(
        (status = 201, description = "Unit created", body = EquipmentUnit),
        (status = 404, description = "Equipment or organization not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_unit(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    ValidatedJson(data): ValidatedJson<CreateEquipmentUnit>,
) -> AppResult<(StatusCode, Json<EquipmentUnit>)> {
    claims.require_staff()?;
    let unit = state.services.units.create(&data, claims.user_id).await?;
    Ok((StatusCode::CREATED, Json(unit)))
}

/// Update a unit; a new location records a transport movement
#[utoipa::path(
    patch,
    path = "/equipment/units/{id}",
    tag = "equipment-units",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Unit ID")),
    request_body = UpdateEquipmentUnit,
    responses(
        (status = 200, description = "Unit updated", body = EquipmentUnit),
        (status = 404, description = "Unit, equipment or organization not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_unit(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    ValidatedJson(data): ValidatedJson<UpdateEquipmentUnit>,
) -> AppResult<Json<EquipmentUnit>> {
    claims.require_staff()?;
    let unit = state.services.units.update(id, &data, claims.user_id).await?;
    Ok(Json(unit))
}

/// Delete a unit (soft delete)
#[utoipa::path(
    delete,
    path = "/equipment/units/{id}",
    tag = "equipment-units",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Unit ID")),
    responses(
        (status = 204, description = "Unit deleted"),
        (status = 404, description = "Unit not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_unit(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    claims.require_staff()?;
    state.services.units.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Register a maintenance period
#[utoipa::path(
    post,
    path = "/equipment/units/{id}/maintenance",
    tag = "equipment-units",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Unit ID")),
    request_body = RegisterMaintenance,
    responses(
        (status = 201, description = "Maintenance movement recorded", body = Movement),
        (status = 400, description = "End date not after start date", body = crate::error::ErrorResponse),
        (status = 404, description = "Unit not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn register_maintenance(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    ValidatedJson(data): ValidatedJson<RegisterMaintenance>,
) -> AppResult<(StatusCode, Json<Movement>)> {
    claims.require_staff()?;
    let movement = state
        .services
        .units
        .register_maintenance(id, claims.user_id, &data)
        .await?;
    Ok((StatusCode::CREATED, Json(movement)))
}

/// Deliver a unit to its organization
#[utoipa::path(
    post,
    path = "/equipment/units/{id}/deliver",
    tag = "equipment-units",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Unit ID")),
    responses(
        (status = 201, description = "Delivery movement recorded", body = Movement),
        (status = 404, description = "Unit not found", body = crate::error::ErrorResponse),
        (status = 422, description = "Unit has no organization", body = crate::error::ErrorResponse)
    )
)]
pub async fn register_delivery(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<(StatusCode, Json<Movement>)> {
    claims.require_staff()?;
    let movement = state
        .services
        .units
        .register_delivery(id, claims.user_id)
        .await?;
    Ok((StatusCode::CREATED, Json(movement)))
}

/// Movement history of a unit, newest first
#[utoipa::path(
    get,
    path = "/equipment/units/{id}/movements",
    tag = "equipment-units",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Unit ID")),
    responses(
        (status = 200, description = "Unit movements", body = Vec<Movement>),
        (status = 404, description = "Unit not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_unit_movements(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Vec<Movement>>> {
    claims.require_staff()?;
    let movements = state.services.movements.list_for_unit(id).await?;
    Ok(Json(movements))
}

//! Makes (manufacturers) API endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::{AuthenticatedUser, ValidatedJson};
use crate::{
    error::AppResult,
    models::make::{CreateMake, Make, UpdateMake},
    AppState,
};

/// List makes
#[utoipa::path(
    get,
    path = "/makes",
    tag = "makes",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Makes list", body = Vec<Make>)
    )
)]
pub async fn list_makes(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<Make>>> {
    claims.require_staff()?;
    let rows = state.services.makes.list().await?;
    Ok(Json(rows))
}

/// Get make by ID
#[utoipa::path(
    get,
    path = "/makes/{id}",
    tag = "makes",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Make ID")),
    responses(
        (status = 200, description = "Make details", body = Make),
        (status = 404, description = "Make not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_make(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Make>> {
    claims.require_staff()?;
    let row = state.services.makes.get_by_id(id).await?;
    Ok(Json(row))
}

/// Create make
#[utoipa::path(
    post,
    path = "/makes",
    tag = "makes",
    security(("bearer_auth" = [])),
    request_body = CreateMake,
    responses(
        (status = 201, description = "Make created", body = Make),
        (status = 409, description = "Name already in use", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_make(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    ValidatedJson(data): ValidatedJson<CreateMake>,
) -> AppResult<(StatusCode, Json<Make>)> {
    claims.require_staff()?;
    let row = state.services.makes.create(&data).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// Update make
#[utoipa::path(
    patch,
    path = "/makes/{id}",
    tag = "makes",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Make ID")),
    request_body = UpdateMake,
    responses(
        (status = 200, description = "Make updated", body = Make),
        (status = 404, description = "Make not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Name already in use", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_make(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    ValidatedJson(data): ValidatedJson<UpdateMake>,
) -> AppResult<Json<Make>> {
    claims.require_staff()?;
    let row = state.services.makes.update(id, &data).await?;
    Ok(Json(row))
}

/// Delete make (soft delete)
#[utoipa::path(
    delete,
    path = "/makes/{id}",
    tag = "makes",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Make ID")),
    responses(
        (status = 204, description = "Make deleted"),
        (status = 404, description = "Make not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Make still used by equipment", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_make(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    claims.require_staff()?;
    state.services.makes.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

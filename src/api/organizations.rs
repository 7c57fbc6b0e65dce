//! Organization endpoints
//!
//! Organizations receive equipment units through deliveries; managing them
//! is reserved to administrators.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::{AuthenticatedUser, ValidatedJson};
use crate::{
    error::AppResult,
    models::organization::{CreateOrganization, Organization, UpdateOrganization},
    AppState,
};

/// List organizations
#[utoipa::path(
    get,
    path = "/organizations",
    tag = "organizations",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Organizations list", body = Vec<Organization>)
    )
)]
pub async fn list_organizations(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<Organization>>> {
    claims.require_admin()?;
    let rows = state.services.organizations.list().await?;
    Ok(Json(rows))
}

/// Get organization by ID
#[utoipa::path(
    get,
    path = "/organizations/{id}",
    tag = "organizations",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Organization ID")),
    responses(
        (status = 200, description = "Organization details", body = Organization),
        (status = 404, description = "Organization not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_organization(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Organization>> {
    claims.require_admin()?;
    let row = state.services.organizations.get_by_id(id).await?;
    Ok(Json(row))
}

/// Create organization
#[utoipa::path(
    post,
    path = "/organizations",
    tag = "organizations",
    security(("bearer_auth" = [])),
    request_body = CreateOrganization,
    responses(
        (status = 201, description = "Organization created", body = Organization),
        (status = 409, description = "Name already in use", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_organization(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    ValidatedJson(data): ValidatedJson<CreateOrganization>,
) -> AppResult<(StatusCode, Json<Organization>)> {
    claims.require_admin()?;
    let row = state.services.organizations.create(&data).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// Update organization
#[utoipa::path(
    patch,
    path = "/organizations/{id}",
    tag = "organizations",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Organization ID")),
    request_body = UpdateOrganization,
    responses(
        (status = 200, description = "Organization updated", body = Organization),
        (status = 404, description = "Organization not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Name already in use", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_organization(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    ValidatedJson(data): ValidatedJson<UpdateOrganization>,
) -> AppResult<Json<Organization>> {
    claims.require_admin()?;
    let row = state.services.organizations.update(id, &data).await?;
    Ok(Json(row))
}

/// Delete organization (soft delete)
#[utoipa::path(
    delete,
    path = "/organizations/{id}",
    tag = "organizations",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Organization ID")),
    responses(
        (status = 204, description = "Organization deleted"),
        (status = 404, description = "Organization not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Organization still has units", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_organization(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    claims.require_admin()?;
    state.services.organizations.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

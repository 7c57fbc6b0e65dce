//! Movement history endpoints

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use super::AuthenticatedUser;
use crate::{
    error::AppResult,
    models::movement::{Movement, MovementQuery},
    repository::page_bounds,
    AppState,
};

/// Page of movements
#[derive(Serialize, ToSchema)]
pub struct MovementListResponse {
    pub movements: Vec<Movement>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
}

/// List movements, newest first
#[utoipa::path(
    get,
    path = "/movements",
    tag = "movements",
    security(("bearer_auth" = [])),
    params(MovementQuery),
    responses(
        (status = 200, description = "Page of movements", body = MovementListResponse)
    )
)]
pub async fn list_movements(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<MovementQuery>,
) -> AppResult<Json<MovementListResponse>> {
    claims.require_staff()?;
    let (movements, total) = state.services.movements.list(&query).await?;
    let (page, per_page, _) = page_bounds(query.page, query.per_page);

    Ok(Json(MovementListResponse {
        movements,
        total,
        page,
        per_page,
    }))
}

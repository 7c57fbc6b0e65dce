//! Authentication endpoints: registration, login and own profile

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;

use super::{AuthenticatedUser, ValidatedJson};
use crate::{
    error::AppResult,
    models::user::{CreateUser, SignIn, UpdateProfile, User},
    AppState,
};

/// User together with a freshly issued bearer token
#[derive(Serialize, ToSchema)]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
    pub token_type: String,
}

impl AuthResponse {
    fn new(user: User, token: String) -> Self {
        Self {
            user,
            token,
            token_type: "Bearer".to_string(),
        }
    }
}

/// Register a new account
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "auth",
    request_body = CreateUser,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 400, description = "Invalid data or role", body = crate::error::ErrorResponse),
        (status = 409, description = "Username or email in use", body = crate::error::ErrorResponse)
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(data): ValidatedJson<CreateUser>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    let (user, token) = state.services.users.sign_up(&data).await?;
    Ok((StatusCode::CREATED, Json(AuthResponse::new(user, token))))
}

/// Authenticate with username and password
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = SignIn,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials", body = crate::error::ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(data): ValidatedJson<SignIn>,
) -> AppResult<Json<AuthResponse>> {
    let (user, token) = state
        .services
        .users
        .sign_in(&data.username, &data.password)
        .await?;
    Ok(Json(AuthResponse::new(user, token)))
}

/// Get current user profile
#[utoipa::path(
    get,
    path = "/auth/profile",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = User),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse)
    )
)]
pub async fn profile(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<User>> {
    let user = state.services.users.profile(claims.user_id).await?;
    Ok(Json(user))
}

/// Update current user profile (username, email, password)
#[utoipa::path(
    patch,
    path = "/auth/profile",
    tag = "auth",
    security(("bearer_auth" = [])),
    request_body = UpdateProfile,
    responses(
        (status = 200, description = "Profile updated", body = User),
        (status = 400, description = "Invalid data, or roles sent", body = crate::error::ErrorResponse),
        (status = 409, description = "Username or email in use", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_profile(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    ValidatedJson(data): ValidatedJson<UpdateProfile>,
) -> AppResult<Json<User>> {
    let user = state
        .services
        .users
        .update_profile(claims.user_id, &data)
        .await?;
    Ok(Json(user))
}

//! API handlers for the inventory REST endpoints

pub mod auth;
pub mod equipment;
pub mod equipment_types;
pub mod equipment_units;
pub mod health;
pub mod makes;
pub mod movements;
pub mod openapi;
pub mod organizations;
pub mod users;

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, FromRequestParts, Request},
    http::request::Parts,
    routing::{get, post, put},
    Json, Router,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use serde::de::DeserializeOwned;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use validator::Validate;

use crate::{error::AppError, models::user::UserClaims, AppState};

/// Extractor for authenticated user from JWT token
pub struct AuthenticatedUser(pub UserClaims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| AppError::Authentication("Missing or malformed bearer token".to_string()))?;

        let claims = UserClaims::from_token(bearer.token(), &state.config.auth.jwt_secret)
            .map_err(|e| AppError::Authentication(e.to_string()))?;

        Ok(AuthenticatedUser(claims))
    }
}

/// JSON body that is deserialized and validated before reaching the handler
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::Validation(e.body_text()))?;

        value
            .validate()
            .map_err(|e| AppError::Validation(format_validation_errors(&e)))?;

        Ok(ValidatedJson(value))
    }
}

/// Flatten field messages; nested errors fall back to their Display form
fn format_validation_errors(errors: &validator::ValidationErrors) -> String {
    let messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field))
            })
        })
        .collect();

    if messages.is_empty() {
        errors.to_string()
    } else {
        messages.join(", ")
    }
}

/// Build the application router: `/api/v1` routes plus the OpenAPI UI
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        // Health
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Authentication
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/profile", get(auth::profile).patch(auth::update_profile))
        // Users
        .route("/users", get(users::list_users).post(users::create_user))
        .route(
            "/users/:id",
            get(users::get_user)
                .patch(users::update_user)
                .delete(users::delete_user),
        )
        .route("/users/:id/roles", put(users::assign_roles))
        // Makes
        .route("/makes", get(makes::list_makes).post(makes::create_make))
        .route(
            "/makes/:id",
            get(makes::get_make)
                .patch(makes::update_make)
                .delete(makes::delete_make),
        )
        // Equipment types
        .route(
            "/equipment/types",
            get(equipment_types::list_equipment_types).post(equipment_types::create_equipment_type),
        )
        .route(
            "/equipment/types/:id",
            get(equipment_types::get_equipment_type)
                .patch(equipment_types::update_equipment_type)
                .delete(equipment_types::delete_equipment_type),
        )
        // Equipment units
        .route(
            "/equipment/units",
            get(equipment_units::list_units).post(equipment_units::create_unit),
        )
        .route(
            "/equipment/units/:id",
            get(equipment_units::get_unit)
                .patch(equipment_units::update_unit)
                .delete(equipment_units::delete_unit),
        )
        .route(
            "/equipment/units/:id/maintenance",
            post(equipment_units::register_maintenance),
        )
        .route("/equipment/units/:id/deliver", post(equipment_units::register_delivery))
        .route("/equipment/units/:id/movements", get(equipment_units::list_unit_movements))
        // Equipment
        .route(
            "/equipment",
            get(equipment::list_equipment).post(equipment::create_equipment),
        )
        .route(
            "/equipment/:id",
            get(equipment::get_equipment)
                .patch(equipment::update_equipment)
                .delete(equipment::delete_equipment),
        )
        // Organizations
        .route(
            "/organizations",
            get(organizations::list_organizations).post(organizations::create_organization),
        )
        .route(
            "/organizations/:id",
            get(organizations::get_organization)
                .patch(organizations::update_organization)
                .delete(organizations::delete_organization),
        )
        // Movements
        .route("/movements", get(movements::list_movements))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
    };
    use chrono::{Duration, Utc};
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    use super::*;
    use crate::{
        config::AppConfig, models::user::RoleName, repository::Repository, services::Services,
    };

    /// Router over a pool that never connects: only requests rejected before
    /// any database access can be exercised here
    fn app() -> (Router, AppConfig) {
        let config = AppConfig::default();
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://inventory@localhost/inventory_test")
            .unwrap();
        let services = Services::new(Repository::new(pool), config.auth.clone());
        let state = AppState {
            config: Arc::new(config.clone()),
            services: Arc::new(services),
        };
        (create_router(state), config)
    }

    fn token(config: &AppConfig, roles: Vec<RoleName>) -> String {
        let now = Utc::now().timestamp();
        UserClaims {
            sub: "tester".to_string(),
            user_id: 1,
            roles,
            exp: now + 3600,
            iat: now,
        }
        .create_token(&config.auth.jwt_secret)
        .unwrap()
    }

    fn request(method: Method, uri: &str, bearer: Option<&str>, body: Option<serde_json::Value>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(bearer) = bearer {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", bearer));
        }
        match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_health_is_public() {
        let (app, _) = app();
        let response = app
            .oneshot(request(Method::GET, "/api/v1/health", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_missing_token_is_unauthorized() {
        let (app, _) = app();
        let response = app
            .oneshot(request(Method::GET, "/api/v1/makes", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_token_signed_with_other_secret_is_unauthorized() {
        let (app, _) = app();
        let forged = UserClaims {
            sub: "mallory".to_string(),
            user_id: 9,
            roles: vec![RoleName::Admin],
            exp: Utc::now().timestamp() + 3600,
            iat: Utc::now().timestamp(),
        }
        .create_token("not-the-server-secret")
        .unwrap();

        let response = app
            .oneshot(request(Method::GET, "/api/v1/users", Some(&forged), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_employee_cannot_manage_users() {
        let (app, config) = app();
        let employee = token(&config, vec![RoleName::Employee]);
        let response = app
            .oneshot(request(Method::GET, "/api/v1/users", Some(&employee), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_user_without_role_cannot_touch_units() {
        let (app, config) = app();
        let nobody = token(&config, vec![]);
        let response = app
            .oneshot(request(Method::GET, "/api/v1/equipment/units", Some(&nobody), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_maintenance_window_is_validated_before_storage() {
        let (app, config) = app();
        let employee = token(&config, vec![RoleName::Employee]);
        let started_at = Utc::now();
        let body = serde_json::json!({
            "started_at": started_at,
            "ended_at": started_at - Duration::hours(1),
            "maintenance_location": "Workshop",
        });

        let response = app
            .oneshot(request(
                Method::POST,
                "/api/v1/equipment/units/1/maintenance",
                Some(&employee),
                Some(body),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_weak_password_is_rejected_at_registration() {
        let (app, _) = app();
        let body = serde_json::json!({
            "username": "carol",
            "email": "carol@example.com",
            "password": "password",
        });
        let response = app
            .oneshot(request(Method::POST, "/api/v1/auth/register", None, Some(body)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let (app, config) = app();
        let employee = token(&config, vec![RoleName::Employee]);
        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/api/v1/makes")
                    .header(header::AUTHORIZATION, format!("Bearer {}", employee))
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("{ not json"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

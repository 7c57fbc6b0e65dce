//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{
    auth, equipment, equipment_types, equipment_units, health, makes, movements, organizations,
    users,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Inventory API",
        version = "0.1.0",
        description = "Equipment inventory REST API: catalog, units, organizations and movement history"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::register,
        auth::login,
        auth::profile,
        auth::update_profile,
        // Users
        users::list_users,
        users::get_user,
        users::create_user,
        users::update_user,
        users::assign_roles,
        users::delete_user,
        // Makes
        makes::list_makes,
        makes::get_make,
        makes::create_make,
        makes::update_make,
        makes::delete_make,
        // Equipment types
        equipment_types::list_equipment_types,
        equipment_types::get_equipment_type,
        equipment_types::create_equipment_type,
        equipment_types::update_equipment_type,
        equipment_types::delete_equipment_type,
        // Equipment
        equipment::list_equipment,
        equipment::get_equipment,
        equipment::create_equipment,
        equipment::update_equipment,
        equipment::delete_equipment,
        // Equipment units
        equipment_units::list_units,
        equipment_units::get_unit,
        equipment_units::create_unit,
        equipment_units::update_unit,
        equipment_units::delete_unit,
        equipment_units::register_maintenance,
        equipment_units::register_delivery,
        equipment_units::list_unit_movements,
        // Organizations
        organizations::list_organizations,
        organizations::get_organization,
        organizations::create_organization,
        organizations::update_organization,
        organizations::delete_organization,
        // Movements
        movements::list_movements,
    ),
    components(
        schemas(
            // Auth
            auth::AuthResponse,
            crate::models::user::SignIn,
            // Users
            crate::models::user::User,
            crate::models::user::RoleName,
            crate::models::user::CreateUser,
            crate::models::user::UpdateProfile,
            crate::models::user::UpdateUserByAdmin,
            crate::models::user::AssignRoles,
            // Catalog
            crate::models::make::Make,
            crate::models::make::CreateMake,
            crate::models::make::UpdateMake,
            crate::models::equipment_type::EquipmentType,
            crate::models::equipment_type::CreateEquipmentType,
            crate::models::equipment_type::UpdateEquipmentType,
            crate::models::equipment::Equipment,
            crate::models::equipment::CreateEquipment,
            crate::models::equipment::UpdateEquipment,
            crate::models::organization::Organization,
            crate::models::organization::CreateOrganization,
            crate::models::organization::UpdateOrganization,
            // Units
            crate::models::equipment_unit::EquipmentUnit,
            crate::models::equipment_unit::UnitState,
            crate::models::equipment_unit::CreateEquipmentUnit,
            crate::models::equipment_unit::UnitTemplate,
            crate::models::equipment_unit::UpdateEquipmentUnit,
            crate::models::equipment_unit::RegisterMaintenance,
            equipment_units::UnitListResponse,
            // Movements
            crate::models::movement::Movement,
            crate::models::movement::MovementKind,
            movements::MovementListResponse,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Registration, login and own profile"),
        (name = "users", description = "User and role management"),
        (name = "makes", description = "Equipment manufacturers"),
        (name = "equipment-types", description = "Equipment categories"),
        (name = "equipment", description = "Equipment models"),
        (name = "equipment-units", description = "Serial-numbered units and their lifecycle"),
        (name = "organizations", description = "Organizations units are delivered to"),
        (name = "movements", description = "Movement history")
    )
)]
pub struct ApiDoc;

/// Registers the `bearer_auth` scheme referenced by secured paths
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Token returned by /auth/login"))
                        .build(),
                ),
            );
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

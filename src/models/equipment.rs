//! Equipment model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::equipment_unit::UnitTemplate;

/// Equipment record (a model of device; physical instances are units)
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Equipment {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub make_id: i32,
    pub type_id: i32,
    /// Joined from makes
    pub make_name: Option<String>,
    /// Joined from equipment_types
    pub type_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create equipment request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateEquipment {
    #[validate(length(min = 1, max = 255, message = "Equipment name is required (max 255 characters)"))]
    pub name: String,
    #[validate(length(min = 1, message = "Equipment description is required"))]
    pub description: String,
    pub make_id: i32,
    pub type_id: i32,
    /// Units to register together with the equipment
    #[validate(nested)]
    pub units: Option<Vec<UnitTemplate>>,
}

/// Update equipment request
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateEquipment {
    #[validate(length(min = 1, max = 255, message = "Equipment name cannot be empty (max 255 characters)"))]
    pub name: Option<String>,
    #[validate(length(min = 1, message = "Equipment description cannot be empty"))]
    pub description: Option<String>,
    pub make_id: Option<i32>,
    pub type_id: Option<i32>,
}

/// Query parameters for equipment listing
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct EquipmentQuery {
    pub make_id: Option<i32>,
    pub type_id: Option<i32>,
}

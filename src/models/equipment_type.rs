//! Equipment type model (laptop, printer, router...)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct EquipmentType {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateEquipmentType {
    #[validate(length(min = 1, max = 255, message = "Type name is required (max 255 characters)"))]
    pub name: String,
    #[validate(length(min = 1, message = "Type description is required"))]
    pub description: String,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateEquipmentType {
    #[validate(length(min = 1, max = 255, message = "Type name cannot be empty (max 255 characters)"))]
    pub name: Option<String>,
    #[validate(length(min = 1, message = "Type description cannot be empty"))]
    pub description: Option<String>,
}

//! Make (manufacturer) model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Make {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateMake {
    #[validate(length(min = 1, max = 255, message = "Make name is required (max 255 characters)"))]
    pub name: String,
    #[validate(length(min = 1, message = "Make description is required"))]
    pub description: String,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateMake {
    #[validate(length(min = 1, max = 255, message = "Make name cannot be empty (max 255 characters)"))]
    pub name: Option<String>,
    #[validate(length(min = 1, message = "Make description cannot be empty"))]
    pub description: Option<String>,
}

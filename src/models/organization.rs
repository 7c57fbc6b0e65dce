//! Organization model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Organization that equipment units are delivered to
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Organization {
    pub id: i32,
    pub name: String,
    pub location: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create organization request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateOrganization {
    #[validate(length(min = 1, max = 255, message = "Organization name is required (max 255 characters)"))]
    pub name: String,
    #[validate(length(min = 1, max = 255, message = "Organization location is required (max 255 characters)"))]
    pub location: String,
}

/// Update organization request
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateOrganization {
    #[validate(length(min = 1, max = 255, message = "Organization name cannot be empty (max 255 characters)"))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 255, message = "Organization location cannot be empty (max 255 characters)"))]
    pub location: Option<String>,
}

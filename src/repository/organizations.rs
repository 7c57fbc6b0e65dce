//! Organizations repository

use sqlx::{Pool, Postgres};

use super::live_name_taken;
use crate::{
    error::{AppError, AppResult},
    models::organization::{CreateOrganization, Organization, UpdateOrganization},
};

#[derive(Clone)]
pub struct OrganizationsRepository {
    pool: Pool<Postgres>,
}

impl OrganizationsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List all live organizations
    pub async fn list(&self) -> AppResult<Vec<Organization>> {
        let rows = sqlx::query_as::<_, Organization>(
            "SELECT * FROM organizations WHERE deleted_at IS NULL ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Organization> {
        sqlx::query_as::<_, Organization>(
            "SELECT * FROM organizations WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Organization {} not found", id)))
    }

    pub async fn name_taken(&self, name: &str, exclude_id: Option<i32>) -> AppResult<bool> {
        live_name_taken(&self.pool, "organizations", name, exclude_id).await
    }

    pub async fn create(&self, data: &CreateOrganization) -> AppResult<Organization> {
        let row = sqlx::query_as::<_, Organization>(
            r#"
            INSERT INTO organizations (name, location)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(&data.name)
        .bind(&data.location)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn update(&self, id: i32, data: &UpdateOrganization) -> AppResult<Organization> {
        sqlx::query_as::<_, Organization>(
            r#"
            UPDATE organizations
            SET name = COALESCE($2, name),
                location = COALESCE($3, location),
                updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&data.name)
        .bind(&data.location)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Organization {} not found", id)))
    }

    /// Whether live units are assigned to this organization
    pub async fn has_units(&self, id: i32) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM equipment_units WHERE organization_id = $1 AND deleted_at IS NULL)",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    pub async fn soft_delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE organizations SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Organization {} not found", id)));
        }
        Ok(())
    }
}

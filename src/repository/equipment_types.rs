//! Equipment types repository

use sqlx::{Pool, Postgres};

use super::live_name_taken;
use crate::{
    error::{AppError, AppResult},
    models::equipment_type::{CreateEquipmentType, EquipmentType, UpdateEquipmentType},
};

#[derive(Clone)]
pub struct EquipmentTypesRepository {
    pool: Pool<Postgres>,
}

impl EquipmentTypesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> AppResult<Vec<EquipmentType>> {
        let rows = sqlx::query_as::<_, EquipmentType>(
            "SELECT * FROM equipment_types WHERE deleted_at IS NULL ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<EquipmentType> {
        sqlx::query_as::<_, EquipmentType>(
            "SELECT * FROM equipment_types WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Equipment type {} not found", id)))
    }

    pub async fn name_taken(&self, name: &str, exclude_id: Option<i32>) -> AppResult<bool> {
        live_name_taken(&self.pool, "equipment_types", name, exclude_id).await
    }

    pub async fn create(&self, data: &CreateEquipmentType) -> AppResult<EquipmentType> {
        let row = sqlx::query_as::<_, EquipmentType>(
            "INSERT INTO equipment_types (name, description) VALUES ($1, $2) RETURNING *",
        )
        .bind(&data.name)
        .bind(&data.description)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn update(&self, id: i32, data: &UpdateEquipmentType) -> AppResult<EquipmentType> {
        sqlx::query_as::<_, EquipmentType>(
            r#"
            UPDATE equipment_types
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&data.name)
        .bind(&data.description)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Equipment type {} not found", id)))
    }

    /// Whether live equipment references this type
    pub async fn has_equipment(&self, id: i32) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM equipment WHERE type_id = $1 AND deleted_at IS NULL)",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    pub async fn soft_delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE equipment_types SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Equipment type {} not found", id)));
        }
        Ok(())
    }
}

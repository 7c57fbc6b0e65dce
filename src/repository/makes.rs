//! Makes repository

use sqlx::{Pool, Postgres};

use super::live_name_taken;
use crate::{
    error::{AppError, AppResult},
    models::make::{CreateMake, Make, UpdateMake},
};

#[derive(Clone)]
pub struct MakesRepository {
    pool: Pool<Postgres>,
}

impl MakesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> AppResult<Vec<Make>> {
        let rows = sqlx::query_as::<_, Make>(
            "SELECT * FROM makes WHERE deleted_at IS NULL ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Make> {
        sqlx::query_as::<_, Make>("SELECT * FROM makes WHERE id = $1 AND deleted_at IS NULL")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Make {} not found", id)))
    }

    pub async fn name_taken(&self, name: &str, exclude_id: Option<i32>) -> AppResult<bool> {
        live_name_taken(&self.pool, "makes", name, exclude_id).await
    }

    pub async fn create(&self, data: &CreateMake) -> AppResult<Make> {
        let row = sqlx::query_as::<_, Make>(
            "INSERT INTO makes (name, description) VALUES ($1, $2) RETURNING *",
        )
        .bind(&data.name)
        .bind(&data.description)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn update(&self, id: i32, data: &UpdateMake) -> AppResult<Make> {
        sqlx::query_as::<_, Make>(
            r#"
            UPDATE makes
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
        .ok_or_else(|| AppError::NotFound(format!("Make {} not found", id)))
    }

    /// Whether live equipment references this make
    pub async fn has_equipment(&self, id: i32) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM equipment WHERE make_id = $1 AND deleted_at IS NULL)",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    pub async fn soft_delete(&self, id: i32) -> AppResult<()> {
        let result =
            sqlx::query("UPDATE makes SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL")
                .bind(id)
                .execute(&self.pool)
                .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Make {} not found", id)));
        }
        Ok(())
    }
}

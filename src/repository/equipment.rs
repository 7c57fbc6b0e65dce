//! Equipment repository

use sqlx::{PgConnection, Pool, Postgres};

use super::live_name_taken;
use crate::{
    error::{AppError, AppResult},
    models::equipment::{CreateEquipment, Equipment, EquipmentQuery, UpdateEquipment},
};

const SELECT_EQUIPMENT: &str = r#"
    SELECT e.id, e.name, e.description, e.make_id, e.type_id,
           m.name AS make_name, t.name AS type_name,
           e.created_at, e.updated_at
    FROM equipment e
    LEFT JOIN makes m ON m.id = e.make_id
    LEFT JOIN equipment_types t ON t.id = e.type_id
"#;

#[derive(Clone)]
pub struct EquipmentRepository {
    pool: Pool<Postgres>,
}

impl EquipmentRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List live equipment, optionally filtered by make and type
    pub async fn list(&self, query: &EquipmentQuery) -> AppResult<Vec<Equipment>> {
        let sql = format!(
            r#"{}
            WHERE e.deleted_at IS NULL
              AND ($1::int IS NULL OR e.make_id = $1)
              AND ($2::int IS NULL OR e.type_id = $2)
            ORDER BY e.name
            "#,
            SELECT_EQUIPMENT
        );
        let rows = sqlx::query_as::<_, Equipment>(&sql)
            .bind(query.make_id)
            .bind(query.type_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Equipment> {
        let mut conn = self.pool.acquire().await?;
        self.find_in(&mut conn, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Equipment {} not found", id)))
    }

    /// Fetch a live equipment on the given connection
    pub async fn find_in(&self, conn: &mut PgConnection, id: i32) -> AppResult<Option<Equipment>> {
        let sql = format!("{} WHERE e.id = $1 AND e.deleted_at IS NULL", SELECT_EQUIPMENT);
        let row = sqlx::query_as::<_, Equipment>(&sql)
            .bind(id)
            .fetch_optional(conn)
            .await?;
        Ok(row)
    }

    pub async fn name_taken(&self, name: &str, exclude_id: Option<i32>) -> AppResult<bool> {
        live_name_taken(&self.pool, "equipment", name, exclude_id).await
    }

    /// Insert the equipment row; units are handled by the caller
    pub async fn insert(&self, conn: &mut PgConnection, data: &CreateEquipment) -> AppResult<i32> {
        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO equipment (name, description, make_id, type_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&data.name)
        .bind(&data.description)
        .bind(data.make_id)
        .bind(data.type_id)
        .fetch_one(conn)
        .await?;
        Ok(id)
    }

    pub async fn update(&self, id: i32, data: &UpdateEquipment) -> AppResult<Equipment> {
        let result = sqlx::query(
            r#"
            UPDATE equipment
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                make_id = COALESCE($4, make_id),
                type_id = COALESCE($5, type_id),
                updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .bind(&data.name)
        .bind(&data.description)
        .bind(data.make_id)
        .bind(data.type_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Equipment {} not found", id)));
        }
        self.get_by_id(id).await
    }

    /// Whether live units are instances of this equipment
    pub async fn has_units(&self, id: i32) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM equipment_units WHERE equipment_id = $1 AND deleted_at IS NULL)",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    pub async fn soft_delete(&self, id: i32) -> AppResult<()> {
        let result =
            sqlx::query("UPDATE equipment SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL")
                .bind(id)
                .execute(&self.pool)
                .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Equipment {} not found", id)));
        }
        Ok(())
    }
}

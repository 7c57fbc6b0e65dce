//! Equipment units repository

use sqlx::{PgConnection, Pool, Postgres};

use super::page_bounds;
use crate::{
    error::{AppError, AppResult},
    models::equipment_unit::{CreateEquipmentUnit, EquipmentUnit, UnitQuery, UpdateEquipmentUnit},
};

const SELECT_UNIT: &str = r#"
    SELECT u.id, u.serial_number, u.location, u.state, u.acquired_at,
           u.equipment_id, u.organization_id,
           e.name AS equipment_name, o.name AS organization_name,
           u.created_at, u.updated_at
    FROM equipment_units u
    LEFT JOIN equipment e ON e.id = u.equipment_id
    LEFT JOIN organizations o ON o.id = u.organization_id
"#;

const UNIT_FILTERS: &str = r#"
    WHERE u.deleted_at IS NULL
      AND ($1::int IS NULL OR u.equipment_id = $1)
      AND ($2::int IS NULL OR u.organization_id = $2)
      AND ($3::unit_state IS NULL OR u.state = $3)
"#;

#[derive(Clone)]
pub struct EquipmentUnitsRepository {
    pool: Pool<Postgres>,
}

impl EquipmentUnitsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List live units with filters and pagination, returns (units, total)
    pub async fn list(&self, query: &UnitQuery) -> AppResult<(Vec<EquipmentUnit>, i64)> {
        let (_, per_page, offset) = page_bounds(query.page, query.per_page);

        let count_sql = format!("SELECT COUNT(*) FROM equipment_units u {}", UNIT_FILTERS);
        let total: i64 = sqlx::query_scalar(&count_sql)
            .bind(query.equipment_id)
            .bind(query.organization_id)
            .bind(query.state)
            .fetch_one(&self.pool)
            .await?;

        let sql = format!(
            "{} {} ORDER BY u.id LIMIT $4 OFFSET $5",
            SELECT_UNIT, UNIT_FILTERS
        );
        let units = sqlx::query_as::<_, EquipmentUnit>(&sql)
            .bind(query.equipment_id)
            .bind(query.organization_id)
            .bind(query.state)
            .bind(per_page)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok((units, total))
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<EquipmentUnit> {
        let mut conn = self.pool.acquire().await?;
        self.find_in(&mut conn, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Equipment unit {} not found", id)))
    }

    /// Fetch a live unit on the given connection
    pub async fn find_in(&self, conn: &mut PgConnection, id: i32) -> AppResult<Option<EquipmentUnit>> {
        let sql = format!("{} WHERE u.id = $1 AND u.deleted_at IS NULL", SELECT_UNIT);
        let unit = sqlx::query_as::<_, EquipmentUnit>(&sql)
            .bind(id)
            .fetch_optional(conn)
            .await?;
        Ok(unit)
    }

    /// Fetch a live unit and lock its row until the transaction ends
    pub async fn lock(&self, conn: &mut PgConnection, id: i32) -> AppResult<EquipmentUnit> {
        let sql = format!(
            "{} WHERE u.id = $1 AND u.deleted_at IS NULL FOR UPDATE OF u",
            SELECT_UNIT
        );
        sqlx::query_as::<_, EquipmentUnit>(&sql)
            .bind(id)
            .fetch_optional(conn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Equipment unit {} not found", id)))
    }

    pub async fn insert(&self, conn: &mut PgConnection, data: &CreateEquipmentUnit) -> AppResult<i32> {
        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO equipment_units
                (serial_number, location, state, acquired_at, equipment_id, organization_id)
            VALUES ($1, $2, $3, COALESCE($4, NOW()), $5, $6)
            RETURNING id
            "#,
        )
        .bind(data.serial_number)
        .bind(&data.location)
        .bind(data.state)
        .bind(data.acquired_at)
        .bind(data.equipment_id)
        .bind(data.organization_id)
        .fetch_one(conn)
        .await?;
        Ok(id)
    }

    pub async fn update(
        &self,
        conn: &mut PgConnection,
        id: i32,
        data: &UpdateEquipmentUnit,
    ) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE equipment_units
            SET serial_number = COALESCE($2, serial_number),
                location = COALESCE($3, location),
                state = COALESCE($4, state),
                acquired_at = COALESCE($5, acquired_at),
                equipment_id = COALESCE($6, equipment_id),
                organization_id = COALESCE($7, organization_id),
                updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .bind(data.serial_number)
        .bind(&data.location)
        .bind(data.state)
        .bind(data.acquired_at)
        .bind(data.equipment_id)
        .bind(data.organization_id)
        .execute(conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Equipment unit {} not found", id)));
        }
        Ok(())
    }

    pub async fn soft_delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE equipment_units SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Equipment unit {} not found", id)));
        }
        Ok(())
    }
}

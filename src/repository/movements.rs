//! Movements repository
//!
//! Movements are append-only: there is no update or delete here.

use sqlx::{PgConnection, Pool, Postgres};

use super::page_bounds;
use crate::{
    error::{AppError, AppResult},
    models::movement::{Movement, MovementDetail, MovementKind, MovementQuery, MovementRow},
};

const SELECT_MOVEMENT: &str = r#"
    SELECT m.id, m.equipment_unit_id, m.author_id, m.movement_type_id, m.kind, m.created_at,
           a.username AS author_username,
           u.serial_number AS unit_serial_number,
           e.name AS equipment_name,
           tm.origin_location, tm.target_location,
           mm.started_at, mm.ended_at, mm.maintenance_location,
           dm.organization_id AS delivery_organization_id
    FROM movements m
    LEFT JOIN users a ON a.id = m.author_id
    LEFT JOIN equipment_units u ON u.id = m.equipment_unit_id
    LEFT JOIN equipment e ON e.id = u.equipment_id
    LEFT JOIN transport_movements tm ON tm.movement_id = m.id
    LEFT JOIN maintenance_movements mm ON mm.movement_id = m.id
    LEFT JOIN delivery_movements dm ON dm.movement_id = m.id
"#;

const MOVEMENT_FILTERS: &str = r#"
    WHERE ($1::movement_kind IS NULL OR m.kind = $1)
      AND ($2::int IS NULL OR m.equipment_unit_id = $2)
"#;

#[derive(Clone)]
pub struct MovementsRepository {
    pool: Pool<Postgres>,
}

impl MovementsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Registry id for a movement kind
    async fn type_id(&self, conn: &mut PgConnection, kind: MovementKind) -> AppResult<i32> {
        sqlx::query_scalar::<_, i32>(
            "SELECT id FROM movement_types WHERE name = $1 AND deleted_at IS NULL",
        )
        .bind(kind)
        .fetch_optional(conn)
        .await?
        .ok_or_else(|| AppError::MovementTypeNotConfigured(kind.to_string()))
    }

    /// Insert a movement and its detail row on the caller's connection
    pub async fn record(
        &self,
        conn: &mut PgConnection,
        unit_id: i32,
        author_id: i32,
        detail: &MovementDetail,
    ) -> AppResult<Movement> {
        let kind = detail.kind();
        let type_id = self.type_id(&mut *conn, kind).await?;

        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO movements (equipment_unit_id, author_id, movement_type_id, kind)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(unit_id)
        .bind(author_id)
        .bind(type_id)
        .bind(kind)
        .fetch_one(&mut *conn)
        .await?;

        match detail {
            MovementDetail::Entry => {}
            MovementDetail::Transport {
                origin_location,
                target_location,
            } => {
                sqlx::query(
                    "INSERT INTO transport_movements (movement_id, origin_location, target_location) VALUES ($1, $2, $3)",
                )
                .bind(id)
                .bind(origin_location)
                .bind(target_location)
                .execute(&mut *conn)
                .await?;
            }
            MovementDetail::Maintenance {
                started_at,
                ended_at,
                maintenance_location,
            } => {
                sqlx::query(
                    r#"
                    INSERT INTO maintenance_movements (movement_id, started_at, ended_at, maintenance_location)
                    VALUES ($1, $2, $3, $4)
                    "#,
                )
                .bind(id)
                .bind(started_at)
                .bind(ended_at)
                .bind(maintenance_location)
                .execute(&mut *conn)
                .await?;
            }
            MovementDetail::Delivery { organization_id } => {
                sqlx::query(
                    "INSERT INTO delivery_movements (movement_id, organization_id) VALUES ($1, $2)",
                )
                .bind(id)
                .bind(organization_id)
                .execute(&mut *conn)
                .await?;
            }
        }

        let sql = format!("{} WHERE m.id = $1", SELECT_MOVEMENT);
        let row = sqlx::query_as::<_, MovementRow>(&sql)
            .bind(id)
            .fetch_one(&mut *conn)
            .await?;
        Movement::try_from(row)
    }

    /// List movements newest first, returns (movements, total)
    pub async fn list(&self, query: &MovementQuery) -> AppResult<(Vec<Movement>, i64)> {
        let (_, per_page, offset) = page_bounds(query.page, query.per_page);

        let count_sql = format!("SELECT COUNT(*) FROM movements m {}", MOVEMENT_FILTERS);
        let total: i64 = sqlx::query_scalar(&count_sql)
            .bind(query.kind)
            .bind(query.equipment_unit_id)
            .fetch_one(&self.pool)
            .await?;

        let sql = format!(
            "{} {} ORDER BY m.created_at DESC, m.id DESC LIMIT $3 OFFSET $4",
            SELECT_MOVEMENT, MOVEMENT_FILTERS
        );
        let rows = sqlx::query_as::<_, MovementRow>(&sql)
            .bind(query.kind)
            .bind(query.equipment_unit_id)
            .bind(per_page)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        let movements = rows
            .into_iter()
            .map(Movement::try_from)
            .collect::<AppResult<Vec<_>>>()?;
        Ok((movements, total))
    }

    /// Full history of a unit, newest first
    pub async fn list_for_unit(&self, unit_id: i32) -> AppResult<Vec<Movement>> {
        let sql = format!(
            "{} WHERE m.equipment_unit_id = $1 ORDER BY m.created_at DESC, m.id DESC",
            SELECT_MOVEMENT
        );
        let rows = sqlx::query_as::<_, MovementRow>(&sql)
            .bind(unit_id)
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(Movement::try_from).collect()
    }
}

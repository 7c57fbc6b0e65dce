//! Repository layer for database operations
//!
//! Reads go through the pool. Writes that belong to a larger unit of work
//! take a `&mut PgConnection` so services can run them inside one
//! transaction (`Repository::begin`).

pub mod equipment;
pub mod equipment_types;
pub mod equipment_units;
pub mod makes;
pub mod movements;
pub mod organizations;
pub mod users;

use sqlx::{PgConnection, Pool, Postgres, Transaction};

use crate::error::AppResult;

/// Default page size for paginated listings
pub const DEFAULT_PER_PAGE: i64 = 10;

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub organizations: organizations::OrganizationsRepository,
    pub makes: makes::MakesRepository,
    pub equipment_types: equipment_types::EquipmentTypesRepository,
    pub equipment: equipment::EquipmentRepository,
    pub units: equipment_units::EquipmentUnitsRepository,
    pub movements: movements::MovementsRepository,
    pub users: users::UsersRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            organizations: organizations::OrganizationsRepository::new(pool.clone()),
            makes: makes::MakesRepository::new(pool.clone()),
            equipment_types: equipment_types::EquipmentTypesRepository::new(pool.clone()),
            equipment: equipment::EquipmentRepository::new(pool.clone()),
            units: equipment_units::EquipmentUnitsRepository::new(pool.clone()),
            movements: movements::MovementsRepository::new(pool.clone()),
            users: users::UsersRepository::new(pool.clone()),
            pool,
        }
    }

    /// Start a transaction; dropping it without `commit` rolls back
    pub async fn begin(&self) -> AppResult<Transaction<'static, Postgres>> {
        Ok(self.pool.begin().await?)
    }

    /// Round-trip to the database (readiness check)
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Whether a live (not soft-deleted) row with this id exists in `table`
pub(crate) async fn live_row_exists(
    conn: &mut PgConnection,
    table: &'static str,
    id: i32,
) -> AppResult<bool> {
    let query = format!(
        "SELECT EXISTS(SELECT 1 FROM {} WHERE id = $1 AND deleted_at IS NULL)",
        table
    );
    let exists: bool = sqlx::query_scalar(&query).bind(id).fetch_one(conn).await?;
    Ok(exists)
}

/// Whether a live row other than `exclude_id` already uses `name` (case-insensitive)
pub(crate) async fn live_name_taken(
    pool: &Pool<Postgres>,
    table: &'static str,
    name: &str,
    exclude_id: Option<i32>,
) -> AppResult<bool> {
    let query = format!(
        "SELECT EXISTS(SELECT 1 FROM {} WHERE LOWER(name) = LOWER($1) AND deleted_at IS NULL AND ($2::int IS NULL OR id != $2))",
        table
    );
    let exists: bool = sqlx::query_scalar(&query)
        .bind(name)
        .bind(exclude_id)
        .fetch_one(pool)
        .await?;
    Ok(exists)
}

/// Normalize 1-based page parameters into (page, per_page, offset)
pub fn page_bounds(page: Option<i64>, per_page: Option<i64>) -> (i64, i64, i64) {
    let page = page.unwrap_or(1).max(1);
    let per_page = per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, 100);
    (page, per_page, (page - 1).saturating_mul(per_page))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_bounds_defaults() {
        assert_eq!(page_bounds(None, None), (1, DEFAULT_PER_PAGE, 0));
    }

    #[test]
    fn test_page_bounds_clamps_bad_input() {
        assert_eq!(page_bounds(Some(0), Some(0)), (1, 1, 0));
        assert_eq!(page_bounds(Some(3), Some(500)), (3, 100, 200));
    }

    #[test]
    fn test_page_bounds_huge_page() {
        let (page, per_page, offset) = page_bounds(Some(i64::MAX), Some(10));
        assert_eq!((page, per_page), (i64::MAX, 10));
        assert_eq!(offset, i64::MAX);
    }
}

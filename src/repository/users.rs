//! Users repository for database operations

use sqlx::{PgConnection, Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::user::{RoleName, User, UserChanges, UserRow},
};

/// Users with their role names aggregated into a text array
const SELECT_USER: &str = r#"
    SELECT u.id, u.username, u.email, u.password,
           COALESCE(array_agg(r.name ORDER BY r.name) FILTER (WHERE r.name IS NOT NULL), '{}') AS roles,
           u.created_at, u.updated_at
    FROM users u
    LEFT JOIN user_roles ur ON ur.user_id = u.id
    LEFT JOIN roles r ON r.id = ur.role_id
"#;

#[derive(Clone)]
pub struct UsersRepository {
    pool: Pool<Postgres>,
}

impl UsersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> AppResult<Vec<User>> {
        let sql = format!(
            "{} WHERE u.deleted_at IS NULL GROUP BY u.id ORDER BY u.username",
            SELECT_USER
        );
        let rows = sqlx::query_as::<_, UserRow>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(User::from).collect())
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<User> {
        let mut conn = self.pool.acquire().await?;
        self.find_in(&mut conn, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))
    }

    /// Fetch a live user on the given connection
    pub async fn find_in(&self, conn: &mut PgConnection, id: i32) -> AppResult<Option<User>> {
        let sql = format!(
            "{} WHERE u.id = $1 AND u.deleted_at IS NULL GROUP BY u.id",
            SELECT_USER
        );
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .fetch_optional(conn)
            .await?;
        Ok(row.map(User::from))
    }

    /// Get a live user by username (case-insensitive)
    pub async fn get_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let sql = format!(
            "{} WHERE LOWER(u.username) = LOWER($1) AND u.deleted_at IS NULL GROUP BY u.id",
            SELECT_USER
        );
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(User::from))
    }

    /// Check if a live user other than `exclude_id` uses this username
    pub async fn username_taken(&self, username: &str, exclude_id: Option<i32>) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM users
                WHERE LOWER(username) = LOWER($1) AND deleted_at IS NULL
                  AND ($2::int IS NULL OR id != $2)
            )
            "#,
        )
        .bind(username)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    /// Check if a live user other than `exclude_id` uses this email
    pub async fn email_taken(&self, email: &str, exclude_id: Option<i32>) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM users
                WHERE LOWER(email) = LOWER($1) AND deleted_at IS NULL
                  AND ($2::int IS NULL OR id != $2)
            )
            "#,
        )
        .bind(email)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    /// Insert a user row; roles are written separately with `replace_roles`
    pub async fn insert(
        &self,
        conn: &mut PgConnection,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> AppResult<i32> {
        let id: i32 = sqlx::query_scalar(
            "INSERT INTO users (username, email, password) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .fetch_one(conn)
        .await?;
        Ok(id)
    }

    pub async fn update(&self, conn: &mut PgConnection, id: i32, changes: &UserChanges) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET username = COALESCE($2, username),
                email = COALESCE($3, email),
                password = COALESCE($4, password),
                updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .bind(&changes.username)
        .bind(&changes.email)
        .bind(&changes.password_hash)
        .execute(conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("User {} not found", id)));
        }
        Ok(())
    }

    /// Replace the full role set of a user
    pub async fn replace_roles(
        &self,
        conn: &mut PgConnection,
        user_id: i32,
        roles: &[RoleName],
    ) -> AppResult<()> {
        sqlx::query("DELETE FROM user_roles WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *conn)
            .await?;

        let names: Vec<&str> = roles.iter().map(RoleName::as_str).collect();
        sqlx::query(
            "INSERT INTO user_roles (user_id, role_id) SELECT $1, id FROM roles WHERE name = ANY($2)",
        )
        .bind(user_id)
        .bind(&names)
        .execute(&mut *conn)
        .await?;
        Ok(())
    }

    pub async fn soft_delete(&self, id: i32) -> AppResult<()> {
        let result =
            sqlx::query("UPDATE users SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL")
                .bind(id)
                .execute(&self.pool)
                .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("User {} not found", id)));
        }
        Ok(())
    }
}

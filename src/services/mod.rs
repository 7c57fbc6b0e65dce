//! Business logic services

pub mod equipment;
pub mod equipment_types;
pub mod equipment_units;
pub mod makes;
pub mod movements;
pub mod organizations;
pub mod users;

use sqlx::PgConnection;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    repository::{self, Repository},
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    repository: Repository,
    pub organizations: organizations::OrganizationsService,
    pub makes: makes::MakesService,
    pub equipment_types: equipment_types::EquipmentTypesService,
    pub equipment: equipment::EquipmentService,
    pub units: equipment_units::EquipmentUnitsService,
    pub movements: movements::MovementsService,
    pub users: users::UsersService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, auth_config: AuthConfig) -> Self {
        Self {
            organizations: organizations::OrganizationsService::new(repository.clone()),
            makes: makes::MakesService::new(repository.clone()),
            equipment_types: equipment_types::EquipmentTypesService::new(repository.clone()),
            equipment: equipment::EquipmentService::new(repository.clone()),
            units: equipment_units::EquipmentUnitsService::new(repository.clone()),
            movements: movements::MovementsService::new(repository.clone()),
            users: users::UsersService::new(repository.clone(), auth_config),
            repository,
        }
    }

    /// Check that the database answers
    pub async fn ping(&self) -> AppResult<()> {
        self.repository.ping().await
    }
}

/// Fail with `NotFound` unless a live row `id` exists in `table`
pub(crate) async fn require_live(
    conn: &mut PgConnection,
    table: &'static str,
    what: &str,
    id: i32,
) -> AppResult<()> {
    if repository::live_row_exists(conn, table, id).await? {
        Ok(())
    } else {
        Err(AppError::NotFound(format!("{} {} not found", what, id)))
    }
}

/// Movements are authored by live accounts only; a deleted user's token is refused
pub(crate) async fn require_actor(conn: &mut PgConnection, actor_id: i32) -> AppResult<()> {
    if repository::live_row_exists(conn, "users", actor_id).await? {
        Ok(())
    } else {
        Err(AppError::Authentication("Account no longer exists".to_string()))
    }
}

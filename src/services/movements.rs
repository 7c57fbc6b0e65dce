//! Movements service (read side; writes happen inside unit operations)

use crate::{
    error::AppResult,
    models::movement::{Movement, MovementQuery},
    repository::Repository,
};

#[derive(Clone)]
pub struct MovementsService {
    repository: Repository,
}

impl MovementsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List movements newest first, returns (movements, total)
    pub async fn list(&self, query: &MovementQuery) -> AppResult<(Vec<Movement>, i64)> {
        self.repository.movements.list(query).await
    }

    /// History of one unit; `NotFound` when the unit does not exist
    pub async fn list_for_unit(&self, unit_id: i32) -> AppResult<Vec<Movement>> {
        self.repository.units.get_by_id(unit_id).await?;
        self.repository.movements.list_for_unit(unit_id).await
    }
}

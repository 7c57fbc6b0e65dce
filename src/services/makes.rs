//! Makes (manufacturers) service

use crate::{
    error::{AppError, AppResult},
    models::make::{CreateMake, Make, UpdateMake},
    repository::Repository,
};

#[derive(Clone)]
pub struct MakesService {
    repository: Repository,
}

impl MakesService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<Make>> {
        self.repository.makes.list().await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Make> {
        self.repository.makes.get_by_id(id).await
    }

    pub async fn create(&self, data: &CreateMake) -> AppResult<Make> {
        if self.repository.makes.name_taken(&data.name, None).await? {
            return Err(AppError::Conflict(format!("Make '{}' already exists", data.name)));
        }
        let make = self.repository.makes.create(data).await?;
        tracing::info!("Created make {} ({})", make.id, make.name);
        Ok(make)
    }

    pub async fn update(&self, id: i32, data: &UpdateMake) -> AppResult<Make> {
        if let Some(ref name) = data.name {
            if self.repository.makes.name_taken(name, Some(id)).await? {
                return Err(AppError::Conflict(format!("Make '{}' already exists", name)));
            }
        }
        self.repository.makes.update(id, data).await
    }

    /// Soft delete, refused while live equipment uses the make
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.makes.get_by_id(id).await?;
        if self.repository.makes.has_equipment(id).await? {
            return Err(AppError::Conflict(
                "Make is still referenced by equipment".to_string(),
            ));
        }
        self.repository.makes.soft_delete(id).await
    }
}

//! Equipment types service

use crate::{
    error::{AppError, AppResult},
    models::equipment_type::{CreateEquipmentType, EquipmentType, UpdateEquipmentType},
    repository::Repository,
};

#[derive(Clone)]
pub struct EquipmentTypesService {
    repository: Repository,
}

impl EquipmentTypesService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<EquipmentType>> {
        self.repository.equipment_types.list().await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<EquipmentType> {
        self.repository.equipment_types.get_by_id(id).await
    }

    pub async fn create(&self, data: &CreateEquipmentType) -> AppResult<EquipmentType> {
        if self.repository.equipment_types.name_taken(&data.name, None).await? {
            return Err(AppError::Conflict(format!(
                "Equipment type '{}' already exists",
                data.name
            )));
        }
        let equipment_type = self.repository.equipment_types.create(data).await?;
        tracing::info!("Created equipment type {} ({})", equipment_type.id, equipment_type.name);
        Ok(equipment_type)
    }

    pub async fn update(&self, id: i32, data: &UpdateEquipmentType) -> AppResult<EquipmentType> {
        if let Some(ref name) = data.name {
            if self.repository.equipment_types.name_taken(name, Some(id)).await? {
                return Err(AppError::Conflict(format!(
                    "Equipment type '{}' already exists",
                    name
                )));
            }
        }
        self.repository.equipment_types.update(id, data).await
    }

    /// Soft delete, refused while live equipment has this type
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.equipment_types.get_by_id(id).await?;
        if self.repository.equipment_types.has_equipment(id).await? {
            return Err(AppError::Conflict(
                "Equipment type is still referenced by equipment".to_string(),
            ));
        }
        self.repository.equipment_types.soft_delete(id).await
    }
}

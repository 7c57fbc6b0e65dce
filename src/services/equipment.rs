//! Equipment service

use super::{equipment_units::insert_unit, require_live};
use crate::{
    error::{AppError, AppResult},
    models::equipment::{CreateEquipment, Equipment, EquipmentQuery, UpdateEquipment},
    repository::Repository,
};

#[derive(Clone)]
pub struct EquipmentService {
    repository: Repository,
}

impl EquipmentService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self, query: &EquipmentQuery) -> AppResult<Vec<Equipment>> {
        self.repository.equipment.list(query).await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Equipment> {
        self.repository.equipment.get_by_id(id).await
    }

    /// Create an equipment and, in the same transaction, its initial units
    /// (each with an entry movement authored by `actor_id`)
    pub async fn create(&self, data: &CreateEquipment, actor_id: i32) -> AppResult<Equipment> {
        if self.repository.equipment.name_taken(&data.name, None).await? {
            return Err(AppError::Conflict(format!(
                "Equipment '{}' already exists",
                data.name
            )));
        }

        let mut tx = self.repository.begin().await?;
        require_live(&mut *tx, "makes", "Make", data.make_id).await?;
        require_live(&mut *tx, "equipment_types", "Equipment type", data.type_id).await?;

        let id = self.repository.equipment.insert(&mut *tx, data).await?;
        let templates = data.units.as_deref().unwrap_or_default();
        for template in templates {
            insert_unit(&self.repository, &mut *tx, &template.for_equipment(id), actor_id).await?;
        }

        let equipment = self
            .repository
            .equipment
            .find_in(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::Internal(format!("Equipment {} vanished after insert", id)))?;
        tx.commit().await?;

        tracing::info!(
            "Created equipment {} ({}) with {} unit(s)",
            equipment.id,
            equipment.name,
            templates.len()
        );
        Ok(equipment)
    }

    pub async fn update(&self, id: i32, data: &UpdateEquipment) -> AppResult<Equipment> {
        if let Some(ref name) = data.name {
            if self.repository.equipment.name_taken(name, Some(id)).await? {
                return Err(AppError::Conflict(format!("Equipment '{}' already exists", name)));
            }
        }

        if data.make_id.is_some() || data.type_id.is_some() {
            let mut conn = self.repository.pool.acquire().await?;
            if let Some(make_id) = data.make_id {
                require_live(&mut *conn, "makes", "Make", make_id).await?;
            }
            if let Some(type_id) = data.type_id {
                require_live(&mut *conn, "equipment_types", "Equipment type", type_id).await?;
            }
        }

        self.repository.equipment.update(id, data).await
    }

    /// Soft delete, refused while live units exist
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.equipment.get_by_id(id).await?;
        if self.repository.equipment.has_units(id).await? {
            return Err(AppError::Conflict(
                "Equipment still has live units".to_string(),
            ));
        }
        self.repository.equipment.soft_delete(id).await
    }
}

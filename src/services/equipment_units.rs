//! Equipment units service
//!
//! Every unit operation that changes location, custody or maintenance status
//! writes its movement in the same transaction as the unit itself.

use sqlx::PgConnection;

use super::{require_actor, require_live};
use crate::{
    error::{AppError, AppResult},
    models::{
        equipment_unit::{
            CreateEquipmentUnit, EquipmentUnit, RegisterMaintenance, UnitQuery, UpdateEquipmentUnit,
        },
        movement::{Movement, MovementDetail},
    },
    repository::Repository,
};

/// Transport movement implied by a location patch, if the location changes
pub fn relocation(current: &str, requested: Option<&str>) -> Option<MovementDetail> {
    match requested {
        Some(target) if target != current => Some(MovementDetail::Transport {
            origin_location: current.to_string(),
            target_location: target.to_string(),
        }),
        _ => None,
    }
}

/// Validate references, insert the unit and record its entry movement
pub(crate) async fn insert_unit(
    repository: &Repository,
    conn: &mut PgConnection,
    data: &CreateEquipmentUnit,
    actor_id: i32,
) -> AppResult<i32> {
    require_actor(&mut *conn, actor_id).await?;
    require_live(&mut *conn, "equipment", "Equipment", data.equipment_id).await?;
    if let Some(organization_id) = data.organization_id {
        require_live(&mut *conn, "organizations", "Organization", organization_id).await?;
    }

    let id = repository.units.insert(&mut *conn, data).await?;
    repository
        .movements
        .record(&mut *conn, id, actor_id, &MovementDetail::Entry)
        .await?;
    Ok(id)
}

#[derive(Clone)]
pub struct EquipmentUnitsService {
    repository: Repository,
}

impl EquipmentUnitsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self, query: &UnitQuery) -> AppResult<(Vec<EquipmentUnit>, i64)> {
        self.repository.units.list(query).await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<EquipmentUnit> {
        self.repository.units.get_by_id(id).await
    }

    pub async fn create(&self, data: &CreateEquipmentUnit, actor_id: i32) -> AppResult<EquipmentUnit> {
        let mut tx = self.repository.begin().await?;
        let id = insert_unit(&self.repository, &mut *tx, data, actor_id).await?;
        let unit = self.reload(&mut *tx, id).await?;
        tx.commit().await?;

        tracing::info!("Unit {} (serial {}) entered inventory", unit.id, unit.serial_number);
        Ok(unit)
    }

    /// Apply a patch; a location change records a transport movement first
    pub async fn update(
        &self,
        id: i32,
        data: &UpdateEquipmentUnit,
        actor_id: i32,
    ) -> AppResult<EquipmentUnit> {
        let mut tx = self.repository.begin().await?;
        require_actor(&mut *tx, actor_id).await?;
        let current = self.repository.units.lock(&mut *tx, id).await?;

        if let Some(equipment_id) = data.equipment_id {
            require_live(&mut *tx, "equipment", "Equipment", equipment_id).await?;
        }
        if let Some(organization_id) = data.organization_id {
            require_live(&mut *tx, "organizations", "Organization", organization_id).await?;
        }

        if let Some(transport) = relocation(&current.location, data.location.as_deref()) {
            self.repository
                .movements
                .record(&mut *tx, id, actor_id, &transport)
                .await?;
            tracing::info!(
                "Unit {} moved from '{}' to '{}'",
                id,
                current.location,
                data.location.as_deref().unwrap_or_default()
            );
        }

        self.repository.units.update(&mut *tx, id, data).await?;
        let unit = self.reload(&mut *tx, id).await?;
        tx.commit().await?;
        Ok(unit)
    }

    pub async fn register_maintenance(
        &self,
        id: i32,
        actor_id: i32,
        data: &RegisterMaintenance,
    ) -> AppResult<Movement> {
        let mut tx = self.repository.begin().await?;
        require_actor(&mut *tx, actor_id).await?;
        self.repository.units.lock(&mut *tx, id).await?;

        let detail = MovementDetail::Maintenance {
            started_at: data.started_at,
            ended_at: data.ended_at,
            maintenance_location: data.maintenance_location.clone(),
        };
        let movement = self
            .repository
            .movements
            .record(&mut *tx, id, actor_id, &detail)
            .await?;
        tx.commit().await?;

        tracing::info!("Maintenance registered for unit {}", id);
        Ok(movement)
    }

    /// Deliver the unit to the organization it is assigned to
    pub async fn register_delivery(&self, id: i32, actor_id: i32) -> AppResult<Movement> {
        let mut tx = self.repository.begin().await?;
        require_actor(&mut *tx, actor_id).await?;
        let unit = self.repository.units.lock(&mut *tx, id).await?;

        let organization_id = unit.organization_id.ok_or_else(|| {
            AppError::BusinessRule(format!(
                "Unit {} is not assigned to an organization",
                id
            ))
        })?;

        let movement = self
            .repository
            .movements
            .record(&mut *tx, id, actor_id, &MovementDetail::Delivery { organization_id })
            .await?;
        tx.commit().await?;

        tracing::info!("Unit {} delivered to organization {}", id, organization_id);
        Ok(movement)
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.units.soft_delete(id).await
    }

    async fn reload(&self, conn: &mut PgConnection, id: i32) -> AppResult<EquipmentUnit> {
        self.repository
            .units
            .find_in(conn, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Equipment unit {} not found", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relocation_to_new_location() {
        assert_eq!(
            relocation("Warehouse A", Some("Office 12")),
            Some(MovementDetail::Transport {
                origin_location: "Warehouse A".to_string(),
                target_location: "Office 12".to_string(),
            })
        );
    }

    #[test]
    fn test_no_relocation_when_location_unchanged_or_omitted() {
        assert_eq!(relocation("Warehouse A", Some("Warehouse A")), None);
        assert_eq!(relocation("Warehouse A", None), None);
    }

    #[test]
    fn test_relocation_is_case_sensitive() {
        assert!(relocation("warehouse a", Some("Warehouse A")).is_some());
    }
}

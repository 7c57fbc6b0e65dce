//! Equipment unit model and unit actions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

/// Physical condition of a unit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "unit_state", rename_all = "snake_case")]
pub enum UnitState {
    #[default]
    Ok,
    NeedsRepair,
}

/// Serial-numbered instance of an equipment
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct EquipmentUnit {
    pub id: i32,
    pub serial_number: i64,
    pub location: String,
    pub state: UnitState,
    pub acquired_at: DateTime<Utc>,
    pub equipment_id: i32,
    /// Unset until the unit is assigned to an organization
    pub organization_id: Option<i32>,
    pub equipment_name: Option<String>,
    pub organization_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create unit request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateEquipmentUnit {
    pub equipment_id: i32,
    pub organization_id: Option<i32>,
    #[validate(range(min = 1, message = "Serial number must be positive"))]
    pub serial_number: i64,
    #[validate(length(min = 1, max = 255, message = "Location is required (max 255 characters)"))]
    pub location: String,
    #[serde(default)]
    pub state: UnitState,
    /// Defaults to the creation time
    pub acquired_at: Option<DateTime<Utc>>,
}

/// Unit registered together with a new equipment
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UnitTemplate {
    pub organization_id: Option<i32>,
    #[validate(range(min = 1, message = "Serial number must be positive"))]
    pub serial_number: i64,
    #[validate(length(min = 1, max = 255, message = "Location is required (max 255 characters)"))]
    pub location: String,
    #[serde(default)]
    pub state: UnitState,
    pub acquired_at: Option<DateTime<Utc>>,
}

impl UnitTemplate {
    pub fn for_equipment(&self, equipment_id: i32) -> CreateEquipmentUnit {
        CreateEquipmentUnit {
            equipment_id,
            organization_id: self.organization_id,
            serial_number: self.serial_number,
            location: self.location.clone(),
            state: self.state,
            acquired_at: self.acquired_at,
        }
    }
}

/// Update unit request
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateEquipmentUnit {
    pub equipment_id: Option<i32>,
    pub organization_id: Option<i32>,
    #[validate(range(min = 1, message = "Serial number must be positive"))]
    pub serial_number: Option<i64>,
    /// A new location records a transport movement
    #[validate(length(min = 1, max = 255, message = "Location cannot be empty (max 255 characters)"))]
    pub location: Option<String>,
    pub state: Option<UnitState>,
    pub acquired_at: Option<DateTime<Utc>>,
}

/// Query parameters for unit listing
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct UnitQuery {
    pub equipment_id: Option<i32>,
    pub organization_id: Option<i32>,
    pub state: Option<UnitState>,
    /// Page number (1-based)
    pub page: Option<i64>,
    /// Units per page (default: 10)
    pub per_page: Option<i64>,
}

/// Register maintenance request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_maintenance_window"))]
pub struct RegisterMaintenance {
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    #[validate(length(min = 1, max = 255, message = "Maintenance location is required (max 255 characters)"))]
    pub maintenance_location: String,
}

fn validate_maintenance_window(data: &RegisterMaintenance) -> Result<(), ValidationError> {
    if data.ended_at <= data.started_at {
        let mut err = ValidationError::new("maintenance_window");
        err.message = Some("Maintenance end date must be after its start date".into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn maintenance(hours: i64) -> RegisterMaintenance {
        let started_at = Utc::now();
        RegisterMaintenance {
            started_at,
            ended_at: started_at + Duration::hours(hours),
            maintenance_location: "Workshop".to_string(),
        }
    }

    #[test]
    fn test_maintenance_window_must_move_forward() {
        assert!(maintenance(4).validate().is_ok());
        assert!(maintenance(0).validate().is_err());
        assert!(maintenance(-2).validate().is_err());
    }

    #[test]
    fn test_unit_state_wire_names() {
        assert_eq!(serde_json::to_string(&UnitState::NeedsRepair).unwrap(), "\"needs_repair\"");
        let state: UnitState = serde_json::from_str("\"ok\"").unwrap();
        assert_eq!(state, UnitState::Ok);
    }

    #[test]
    fn test_create_unit_defaults_state_to_ok() {
        let data: CreateEquipmentUnit = serde_json::from_value(serde_json::json!({
            "organization_id": 1,
            "equipment_id": 5,
            "serial_number": 1001,
            "location": "Warehouse A"
        }))
        .unwrap();
        assert_eq!(data.state, UnitState::Ok);
        assert!(data.validate().is_ok());
    }

    #[test]
    fn test_serial_number_zero_is_rejected() {
        let data: CreateEquipmentUnit = serde_json::from_value(serde_json::json!({
            "equipment_id": 5,
            "serial_number": 0,
            "location": "Warehouse A"
        }))
        .unwrap();
        assert!(data.validate().is_err());

        let update = UpdateEquipmentUnit {
            serial_number: Some(0),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }

    #[test]
    fn test_template_keeps_unit_fields() {
        let template = UnitTemplate {
            organization_id: None,
            serial_number: 42,
            location: "Shelf 3".to_string(),
            state: UnitState::NeedsRepair,
            acquired_at: None,
        };
        let unit = template.for_equipment(9);
        assert_eq!(unit.equipment_id, 9);
        assert_eq!(unit.serial_number, 42);
        assert_eq!(unit.state, UnitState::NeedsRepair);
    }
}

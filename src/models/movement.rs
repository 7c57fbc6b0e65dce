//! Movement history of equipment units
//!
//! Every change of location, custody or maintenance status of a unit is an
//! immutable [`Movement`]. Kind-specific fields live in [`MovementDetail`];
//! in the database each non-entry kind has its own detail table keyed by the
//! movement id.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

use crate::error::AppError;

/// Movement kind, also the name of its `movement_types` registry row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "movement_kind", rename_all = "snake_case")]
pub enum MovementKind {
    Entry,
    Transport,
    Maintenance,
    Delivery,
}

impl MovementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementKind::Entry => "entry",
            MovementKind::Transport => "transport",
            MovementKind::Maintenance => "maintenance",
            MovementKind::Delivery => "delivery",
        }
    }
}

impl std::fmt::Display for MovementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind-specific payload of a movement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MovementDetail {
    /// Unit entered the inventory
    Entry,
    Transport {
        origin_location: String,
        target_location: String,
    },
    Maintenance {
        started_at: DateTime<Utc>,
        ended_at: DateTime<Utc>,
        maintenance_location: String,
    },
    Delivery {
        organization_id: i32,
    },
}

impl MovementDetail {
    pub fn kind(&self) -> MovementKind {
        match self {
            MovementDetail::Entry => MovementKind::Entry,
            MovementDetail::Transport { .. } => MovementKind::Transport,
            MovementDetail::Maintenance { .. } => MovementKind::Maintenance,
            MovementDetail::Delivery { .. } => MovementKind::Delivery,
        }
    }
}

/// Recorded movement
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Movement {
    pub id: i32,
    pub equipment_unit_id: i32,
    pub author_id: i32,
    pub movement_type_id: i32,
    #[schema(value_type = Object)]
    pub detail: MovementDetail,
    pub author_username: Option<String>,
    pub unit_serial_number: Option<i64>,
    pub equipment_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Movement {
    pub fn kind(&self) -> MovementKind {
        self.detail.kind()
    }
}

/// Flat row of a movement joined with all detail tables
#[derive(Debug, Clone, FromRow)]
pub struct MovementRow {
    pub id: i32,
    pub equipment_unit_id: i32,
    pub author_id: i32,
    pub movement_type_id: i32,
    pub kind: MovementKind,
    pub created_at: DateTime<Utc>,
    pub author_username: Option<String>,
    pub unit_serial_number: Option<i64>,
    pub equipment_name: Option<String>,
    pub origin_location: Option<String>,
    pub target_location: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
    pub maintenance_location: Option<String>,
    pub delivery_organization_id: Option<i32>,
}

impl TryFrom<MovementRow> for Movement {
    type Error = AppError;

    fn try_from(row: MovementRow) -> Result<Self, Self::Error> {
        let missing =
            || AppError::Internal(format!("Movement {} has no {} detail row", row.id, row.kind));

        let detail = match row.kind {
            MovementKind::Entry => MovementDetail::Entry,
            MovementKind::Transport => MovementDetail::Transport {
                origin_location: row.origin_location.clone().ok_or_else(missing)?,
                target_location: row.target_location.clone().ok_or_else(missing)?,
            },
            MovementKind::Maintenance => MovementDetail::Maintenance {
                started_at: row.started_at.ok_or_else(missing)?,
                ended_at: row.ended_at.ok_or_else(missing)?,
                maintenance_location: row.maintenance_location.clone().ok_or_else(missing)?,
            },
            MovementKind::Delivery => MovementDetail::Delivery {
                organization_id: row.delivery_organization_id.ok_or_else(missing)?,
            },
        };

        Ok(Movement {
            id: row.id,
            equipment_unit_id: row.equipment_unit_id,
            author_id: row.author_id,
            movement_type_id: row.movement_type_id,
            detail,
            author_username: row.author_username,
            unit_serial_number: row.unit_serial_number,
            equipment_name: row.equipment_name,
            created_at: row.created_at,
        })
    }
}

/// Query parameters for movement listing
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct MovementQuery {
    /// Filter by movement kind
    #[serde(rename = "type")]
    pub kind: Option<MovementKind>,
    pub equipment_unit_id: Option<i32>,
    /// Page number (1-based)
    pub page: Option<i64>,
    /// Movements per page (default: 10)
    pub per_page: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(kind: MovementKind) -> MovementRow {
        MovementRow {
            id: 7,
            equipment_unit_id: 3,
            author_id: 1,
            movement_type_id: 2,
            kind,
            created_at: Utc::now(),
            author_username: Some("alice".to_string()),
            unit_serial_number: Some(1001),
            equipment_name: Some("ThinkPad T14".to_string()),
            origin_location: None,
            target_location: None,
            started_at: None,
            ended_at: None,
            maintenance_location: None,
            delivery_organization_id: None,
        }
    }

    #[test]
    fn test_entry_row_needs_no_detail() {
        let movement = Movement::try_from(row(MovementKind::Entry)).unwrap();
        assert_eq!(movement.detail, MovementDetail::Entry);
        assert_eq!(movement.kind(), MovementKind::Entry);
    }

    #[test]
    fn test_transport_row_rebuilds_locations() {
        let mut r = row(MovementKind::Transport);
        r.origin_location = Some("Warehouse A".to_string());
        r.target_location = Some("Warehouse B".to_string());
        let movement = Movement::try_from(r).unwrap();
        assert_eq!(
            movement.detail,
            MovementDetail::Transport {
                origin_location: "Warehouse A".to_string(),
                target_location: "Warehouse B".to_string(),
            }
        );
    }

    #[test]
    fn test_delivery_row_without_detail_is_an_error() {
        let result = Movement::try_from(row(MovementKind::Delivery));
        assert!(matches!(result, Err(AppError::Internal(_))));
    }

    #[test]
    fn test_detail_serializes_with_kind_tag() {
        let json = serde_json::to_value(MovementDetail::Delivery { organization_id: 4 }).unwrap();
        assert_eq!(json["kind"], "delivery");
        assert_eq!(json["organization_id"], 4);

        let json = serde_json::to_value(MovementDetail::Entry).unwrap();
        assert_eq!(json, serde_json::json!({ "kind": "entry" }));
    }

    #[test]
    fn test_query_accepts_type_filter() {
        let query: MovementQuery = serde_json::from_value(serde_json::json!({ "type": "maintenance" })).unwrap();
        assert_eq!(query.kind, Some(MovementKind::Maintenance));
    }
}

//! Data models for the inventory server

pub mod equipment;
pub mod equipment_type;
pub mod equipment_unit;
pub mod make;
pub mod movement;
pub mod organization;
pub mod user;

// Re-export commonly used types
pub use equipment::Equipment;
pub use equipment_type::EquipmentType;
pub use equipment_unit::{EquipmentUnit, UnitState};
pub use make::Make;
pub use movement::{Movement, MovementDetail, MovementKind};
pub use organization::Organization;
pub use user::{RoleName, User, UserClaims};

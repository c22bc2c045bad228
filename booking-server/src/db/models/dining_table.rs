//! Dining Table Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Dining table entity (桌台)
///
/// Owned by tenant configuration; read-mostly from the booking engine's
/// perspective. `is_active = false` hides the table entirely,
/// `out_of_service = true` keeps it visible but unbookable (maintenance).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiningTable {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub tenant_id: String,
    pub name: String,
    pub capacity: i32,
    pub section: String,
    #[serde(
        default = "default_true",
        deserialize_with = "serde_helpers::bool_true"
    )]
    pub is_active: bool,
    #[serde(default)]
    pub out_of_service: bool,
}

fn default_true() -> bool {
    true
}

/// Create dining table payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiningTableCreate {
    pub tenant_id: String,
    pub name: String,
    pub capacity: i32,
    pub section: String,
}

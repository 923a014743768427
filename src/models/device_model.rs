//! Device model (manufacturer + model number) catalogue entries

use serde::{Deserialize, Serialize};

/// Catalogue entry for a device type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct DeviceModel {
    pub manufacturer: String,
    pub model_number: String,
    pub description: String,
    pub weight: i64,
}

/// Maximum number of devices of a model a department may hold
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ModelAllocation {
    pub manufacturer: String,
    pub model_number: String,
    pub max_number: i64,
}

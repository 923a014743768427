//! Repair and service provider models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Repair as listed in a device's history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct RepairSummary {
    pub repair_id: i64,
    pub fault_report: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub cost: f64,
}

/// Repair service provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ServiceProvider {
    pub abn: String,
    pub service_name: String,
    pub email: String,
}

/// Repair with the service that performed it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepairDetails {
    pub repair_id: i64,
    pub fault_report: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub cost: f64,
    pub done_by: ServiceProvider,
    pub done_to: i64,
}

/// Request to record a repair
#[derive(Debug, Clone, Deserialize)]
pub struct NewRepair {
    pub repair_id: i64,
    pub fault_report: String,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    pub cost: f64,
    pub done_to: i64,
    pub done_by: String,
}

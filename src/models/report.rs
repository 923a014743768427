//! Reporting roll-ups

use serde::{Deserialize, Serialize};

/// One department's place in the productivity ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct DepartmentProductivity {
    pub rank: i64,
    pub department: String,
    /// Mean worked fraction, rounded to two places
    pub average_worked_fraction: f64,
    pub most_worked_fraction: f64,
    pub least_worked_fraction: f64,
}

/// The service that was paid the most in one calendar month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyServiceSpend {
    pub month: u32,
    pub year: i32,
    /// Sum of that service's repair costs in the month
    pub total_cost: f64,
    /// Repairs contributing to the total, ascending
    pub repair_ids: Vec<i64>,
    pub abn: String,
    pub service_name: String,
    /// Most expensive single repair by that service in the month
    pub max_cost: f64,
}

/// A department manager's phone number
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct DepartmentManagerPhone {
    pub department: String,
    pub manager_id: i64,
    pub manager_name: String,
    pub phone_number: String,
}

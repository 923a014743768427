//! Employee models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Employee profile returned by a successful login
///
/// Never carries the stored password hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Employee {
    #[serde(rename = "empid")]
    pub emp_id: i64,
    pub name: String,
    pub home_address: String,
    pub date_of_birth: NaiveDate,
}

/// Employee id and name, as listed for a department
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct EmployeeSummary {
    #[serde(rename = "empid")]
    pub emp_id: i64,
    pub name: String,
}

/// Number of matching devices issued to one employee
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct EmployeeDeviceCount {
    #[serde(rename = "empid")]
    pub emp_id: i64,
    pub name: String,
    pub device_count: i64,
}

/// Request to create an employee
///
/// The password is hashed before it is stored.
#[derive(Debug, Clone, Deserialize)]
pub struct NewEmployee {
    pub emp_id: i64,
    pub name: String,
    pub home_address: String,
    pub date_of_birth: NaiveDate,
    pub password: String,
}

//! Device and issuance models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Full device record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct DeviceInfo {
    pub device_id: i64,
    pub serial_number: String,
    pub purchase_date: NaiveDate,
    pub purchase_cost: f64,
    pub manufacturer: String,
    pub model_number: String,
    /// `None` when the device is unassigned
    pub issued_to: Option<i64>,
}

/// Device used by an employee
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct DeviceSummary {
    pub device_id: i64,
    pub manufacturer: String,
    pub model_number: String,
}

/// Device issued to an employee, with its purchase date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct IssuedDevice {
    pub device_id: i64,
    pub purchase_date: NaiveDate,
    pub manufacturer: String,
    pub model_number: String,
}

/// Device of a model and whether a given employee holds it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceAssignment {
    pub device_id: i64,
    pub issued: bool,
}

/// Request to register a device
#[derive(Debug, Clone, Deserialize)]
pub struct NewDevice {
    pub device_id: i64,
    pub serial_number: String,
    pub purchase_date: NaiveDate,
    pub purchase_cost: f64,
    pub manufacturer: String,
    pub model_number: String,
    #[serde(default)]
    pub issued_to: Option<i64>,
}

/// Why an issue or revoke request was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentRejection {
    /// Device is held by someone already
    AlreadyIssued,
    /// Device is not held by anyone
    AlreadyRevoked,
    /// Device is held by a different employee
    NotAssigned,
    UnknownDevice,
    UnknownEmployee,
}

impl AssignmentRejection {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssignmentRejection::AlreadyIssued => "already_issued",
            AssignmentRejection::AlreadyRevoked => "already_revoked",
            AssignmentRejection::NotAssigned => "not_assigned",
            AssignmentRejection::UnknownDevice => "unknown_device",
            AssignmentRejection::UnknownEmployee => "unknown_employee",
        }
    }

    /// Reason shown to the requesting employee
    pub fn description(&self) -> &'static str {
        match self {
            AssignmentRejection::AlreadyIssued => "Device already issued",
            AssignmentRejection::AlreadyRevoked => "Device already revoked",
            AssignmentRejection::NotAssigned => "Employee not assigned to device",
            AssignmentRejection::UnknownDevice => "Device not found",
            AssignmentRejection::UnknownEmployee => "Employee not found",
        }
    }
}

impl std::fmt::Display for AssignmentRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Result of an issue or revoke request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum AssignmentOutcome {
    Applied,
    Rejected(AssignmentRejection),
}

impl AssignmentOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, AssignmentOutcome::Applied)
    }

    /// Rejection reason, `None` on success
    pub fn reason(&self) -> Option<&'static str> {
        match self {
            AssignmentOutcome::Applied => None,
            AssignmentOutcome::Rejected(rejection) => Some(rejection.description()),
        }
    }

    pub fn rejection(&self) -> Option<AssignmentRejection> {
        match self {
            AssignmentOutcome::Applied => None,
            AssignmentOutcome::Rejected(rejection) => Some(*rejection),
        }
    }
}

//! Device Management Library
//!
//! Data access layer for the device management application: employees,
//! departments, devices and their issuance, repairs, and reporting roll-ups.

pub mod config;
pub mod db;
pub mod models;
pub mod services;
pub mod utils;

pub use config::AppConfig;
pub use db::{Database, DbPool};
pub use services::DeviceManagementService;
pub use utils::{AppError, AppResult};

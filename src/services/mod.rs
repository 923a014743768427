//! Business logic services

pub mod device_management;

pub use device_management::DeviceManagementService;

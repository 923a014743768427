//! Data models

mod device;
mod device_model;
mod employee;
mod repair;
mod report;

pub use device::*;
pub use device_model::*;
pub use employee::*;
pub use repair::*;
pub use report::*;

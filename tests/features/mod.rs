//! Cucumber features for device issuance

pub mod step_definitions;

pub use support::world::TestWorld;

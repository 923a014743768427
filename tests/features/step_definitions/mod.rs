//! Step definitions for Cucumber scenarios

pub mod report_steps;

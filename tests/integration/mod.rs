//! Integration tests for the device management data access layer
//!
//! These tests run the service against a real (in-memory) SQLite store
//! seeded with the fixture company.

mod availability_tests;
mod issuance_tests;

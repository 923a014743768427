//! Database migrations
//!
//! Migrations are handled by SQLx and stored in the `migrations/` directory.
//! This module provides utilities for checking the schema programmatically.

use super::Database;
use crate::utils::AppResult;

/// Tables every operation of the data access layer relies on
pub const REQUIRED_TABLES: &[&str] = &[
    "employee",
    "department",
    "employee_departments",
    "employee_phone_numbers",
    "model",
    "model_allocations",
    "device",
    "service",
    "repair",
];

/// List the user tables present in the store
pub async fn list_tables(db: &Database) -> AppResult<Vec<String>> {
    let mut conn = db.acquire().await?;
    let tables: Vec<String> = sqlx::query_scalar(
        r#"
        SELECT name FROM sqlite_master
        WHERE type = 'table'
          AND name NOT LIKE 'sqlite_%'
          AND name NOT LIKE '_sqlx_%'
        ORDER BY name
        "#,
    )
    .fetch_all(&mut *conn)
    .await?;

    Ok(tables)
}

/// Return the required tables that are missing, empty when the schema is complete
pub async fn check_schema(db: &Database) -> AppResult<Vec<&'static str>> {
    let existing = list_tables(db).await?;

    Ok(REQUIRED_TABLES
        .iter()
        .copied()
        .filter(|table| !existing.iter().any(|t| t == table))
        .collect())
}

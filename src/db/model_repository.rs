//! Device model catalogue and department allocation queries

use tracing::debug;

use super::Database;
use crate::models::{DeviceModel, EmployeeDeviceCount, ModelAllocation};
use crate::utils::AppResult;

pub struct ModelRepository<'a> {
    db: &'a Database,
}

impl<'a> ModelRepository<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    pub async fn get_all_models(&self) -> AppResult<Vec<DeviceModel>> {
        debug!("Listing device models");

        let mut conn = self.db.acquire().await?;
        let models = sqlx::query_as::<_, DeviceModel>(
            r#"
            SELECT manufacturer, model_number, description, weight
            FROM model
            ORDER BY manufacturer, model_number
            "#,
        )
        .fetch_all(&mut *conn)
        .await?;

        Ok(models)
    }

    /// Catalogue entry for the model a device belongs to
    pub async fn get_device_model(&self, device_id: i64) -> AppResult<Option<DeviceModel>> {
        debug!(device_id, "Fetching model for device");

        let mut conn = self.db.acquire().await?;
        let model = sqlx::query_as::<_, DeviceModel>(
            r#"
            SELECT m.manufacturer, m.model_number, m.description, m.weight
            FROM device d
            JOIN model m
              ON m.manufacturer = d.manufacturer
             AND m.model_number = d.model_number
            WHERE d.device_id = ?
            "#,
        )
        .bind(device_id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(model)
    }

    /// Models a department is allocated, with the maximum it may hold
    pub async fn get_department_models(&self, department: &str) -> AppResult<Vec<ModelAllocation>> {
        debug!(department, "Listing department model allocations");

        let mut conn = self.db.acquire().await?;
        let allocations = sqlx::query_as::<_, ModelAllocation>(
            r#"
            SELECT manufacturer, model_number, max_number
            FROM model_allocations
            WHERE department = ?
            ORDER BY manufacturer, model_number
            "#,
        )
        .bind(department)
        .fetch_all(&mut *conn)
        .await?;

        Ok(allocations)
    }

    /// Employees of the department holding devices of the model, with their counts
    ///
    /// Employees holding none of the model are not listed.
    pub async fn get_employee_department_model_device(
        &self,
        department: &str,
        manufacturer: &str,
        model_number: &str,
    ) -> AppResult<Vec<EmployeeDeviceCount>> {
        debug!(department, manufacturer, model_number, "Counting model devices per employee");

        let mut conn = self.db.acquire().await?;
        let counts = sqlx::query_as::<_, EmployeeDeviceCount>(
            r#"
            SELECT e.emp_id, e.name, COUNT(d.device_id) AS device_count
            FROM employee_departments ed
            JOIN employee e ON e.emp_id = ed.emp_id
            JOIN device d
              ON d.issued_to = e.emp_id
             AND d.manufacturer = ?
             AND d.model_number = ?
            WHERE ed.department = ?
            GROUP BY e.emp_id, e.name
            ORDER BY e.emp_id
            "#,
        )
        .bind(manufacturer)
        .bind(model_number)
        .bind(department)
        .fetch_all(&mut *conn)
        .await?;

        Ok(counts)
    }

    pub async fn create_model(&self, model: &DeviceModel) -> AppResult<()> {
        let mut conn = self.db.acquire().await?;
        sqlx::query(
            r#"
            INSERT INTO model (manufacturer, model_number, description, weight)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&model.manufacturer)
        .bind(&model.model_number)
        .bind(&model.description)
        .bind(model.weight)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    /// Insert or replace a department's allocation for a model
    pub async fn set_model_allocation(
        &self,
        department: &str,
        allocation: &ModelAllocation,
    ) -> AppResult<()> {
        let mut conn = self.db.acquire().await?;
        sqlx::query(
            r#"
            INSERT INTO model_allocations (department, manufacturer, model_number, max_number)
            VALUES (?, ?, ?, ?)
            ON CONFLICT (department, manufacturer, model_number)
            DO UPDATE SET max_number = excluded.max_number
            "#,
        )
        .bind(department)
        .bind(&allocation.manufacturer)
        .bind(&allocation.model_number)
        .bind(allocation.max_number)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }
}

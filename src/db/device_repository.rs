//! Device queries and issuance

use sqlx::{Sqlite, SqliteConnection};
use tracing::debug;

use super::Database;
use crate::models::{
    AssignmentOutcome, AssignmentRejection, DeviceAssignment, DeviceInfo, DeviceSummary,
    IssuedDevice, NewDevice,
};
use crate::utils::AppResult;

pub struct DeviceRepository<'a> {
    db: &'a Database,
}

impl<'a> DeviceRepository<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Devices currently issued to the employee
    pub async fn get_devices_used_by(&self, emp_id: i64) -> AppResult<Vec<DeviceSummary>> {
        debug!(emp_id, "Listing devices used by employee");

        let mut conn = self.db.acquire().await?;
        let devices = sqlx::query_as::<_, DeviceSummary>(
            r#"
            SELECT device_id, manufacturer, model_number
            FROM device
            WHERE issued_to = ?
            ORDER BY device_id
            "#,
        )
        .bind(emp_id)
        .fetch_all(&mut *conn)
        .await?;

        Ok(devices)
    }

    /// Devices issued to the employee, with purchase dates
    pub async fn get_issued_devices_for_user(&self, emp_id: i64) -> AppResult<Vec<IssuedDevice>> {
        debug!(emp_id, "Listing issued devices for employee");

        let mut conn = self.db.acquire().await?;
        let devices = sqlx::query_as::<_, IssuedDevice>(
            r#"
            SELECT device_id, purchase_date, manufacturer, model_number
            FROM device
            WHERE issued_to = ?
            ORDER BY device_id
            "#,
        )
        .bind(emp_id)
        .fetch_all(&mut *conn)
        .await?;

        Ok(devices)
    }

    pub async fn get_device_information(&self, device_id: i64) -> AppResult<Option<DeviceInfo>> {
        debug!(device_id, "Fetching device");

        let mut conn = self.db.acquire().await?;
        let device = sqlx::query_as::<_, DeviceInfo>(
            r#"
            SELECT device_id, serial_number, purchase_date, purchase_cost,
                   manufacturer, model_number, issued_to
            FROM device
            WHERE device_id = ?
            "#,
        )
        .bind(device_id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(device)
    }

    /// Every device of a model, flagged when it is issued to the employee
    ///
    /// Empty when the employee does not exist.
    pub async fn get_model_device_assigned(
        &self,
        model_number: &str,
        manufacturer: &str,
        emp_id: i64,
    ) -> AppResult<Vec<DeviceAssignment>> {
        debug!(model_number, manufacturer, emp_id, "Listing model devices for employee");

        let mut conn = self.db.acquire().await?;
        if !employee_exists(&mut conn, emp_id).await? {
            return Ok(Vec::new());
        }

        let rows: Vec<(i64, i64)> = sqlx::query_as(
            r#"
            SELECT device_id,
                   CASE WHEN issued_to = ? THEN 1 ELSE 0 END AS issued
            FROM device
            WHERE model_number = ? AND manufacturer = ?
            ORDER BY device_id
            "#,
        )
        .bind(emp_id)
        .bind(model_number)
        .bind(manufacturer)
        .fetch_all(&mut *conn)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(device_id, issued)| DeviceAssignment {
                device_id,
                issued: issued != 0,
            })
            .collect())
    }

    pub async fn get_unassigned_devices_for_model(
        &self,
        model_number: &str,
        manufacturer: &str,
    ) -> AppResult<Vec<i64>> {
        debug!(model_number, manufacturer, "Listing unassigned devices");

        let mut conn = self.db.acquire().await?;
        let ids: Vec<i64> = sqlx::query_scalar(
            r#"
            SELECT device_id
            FROM device
            WHERE model_number = ? AND manufacturer = ? AND issued_to IS NULL
            ORDER BY device_id
            "#,
        )
        .bind(model_number)
        .bind(manufacturer)
        .fetch_all(&mut *conn)
        .await?;

        Ok(ids)
    }

    /// Assign an unassigned device to the employee
    pub async fn issue_device_to_employee(
        &self,
        emp_id: i64,
        device_id: i64,
    ) -> AppResult<AssignmentOutcome> {
        debug!(emp_id, device_id, "Issuing device");

        let mut tx = self.db.begin_immediate().await?;

        let Some(holder) = current_holder(&mut tx, device_id).await? else {
            return Ok(AssignmentOutcome::Rejected(AssignmentRejection::UnknownDevice));
        };
        if !employee_exists(&mut tx, emp_id).await? {
            return Ok(AssignmentOutcome::Rejected(AssignmentRejection::UnknownEmployee));
        }
        if holder.is_some() {
            return Ok(AssignmentOutcome::Rejected(AssignmentRejection::AlreadyIssued));
        }

        let result = sqlx::query(
            r#"
            UPDATE device
            SET issued_to = ?
            WHERE device_id = ? AND issued_to IS NULL
            "#,
        )
        .bind(emp_id)
        .bind(device_id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(AssignmentOutcome::Rejected(AssignmentRejection::AlreadyIssued));
        }

        tx.commit().await?;
        Ok(AssignmentOutcome::Applied)
    }

    /// Return a device held by the employee to the unassigned pool
    pub async fn revoke_device_from_employee(
        &self,
        emp_id: i64,
        device_id: i64,
    ) -> AppResult<AssignmentOutcome> {
        debug!(emp_id, device_id, "Revoking device");

        let mut tx = self.db.begin_immediate().await?;

        let holder = match current_holder(&mut tx, device_id).await? {
            None => return Ok(AssignmentOutcome::Rejected(AssignmentRejection::UnknownDevice)),
            Some(None) => {
                return Ok(AssignmentOutcome::Rejected(AssignmentRejection::AlreadyRevoked))
            }
            Some(Some(holder)) => holder,
        };
        if holder != emp_id {
            return Ok(AssignmentOutcome::Rejected(AssignmentRejection::NotAssigned));
        }

        let result = sqlx::query(
            r#"
            UPDATE device
            SET issued_to = NULL
            WHERE device_id = ? AND issued_to = ?
            "#,
        )
        .bind(device_id)
        .bind(emp_id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(AssignmentOutcome::Rejected(AssignmentRejection::AlreadyRevoked));
        }

        tx.commit().await?;
        Ok(AssignmentOutcome::Applied)
    }

    pub async fn create_device(&self, req: &NewDevice) -> AppResult<()> {
        let mut conn = self.db.acquire().await?;
        sqlx::query(
            r#"
            INSERT INTO device (device_id, serial_number, purchase_date, purchase_cost,
                                manufacturer, model_number, issued_to)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(req.device_id)
        .bind(&req.serial_number)
        .bind(req.purchase_date)
        .bind(req.purchase_cost)
        .bind(&req.manufacturer)
        .bind(&req.model_number)
        .bind(req.issued_to)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }
}

/// `None` for an unknown device, `Some(None)` for an unassigned one
async fn current_holder(
    conn: &mut SqliteConnection,
    device_id: i64,
) -> Result<Option<Option<i64>>, sqlx::Error> {
    sqlx::query_scalar::<Sqlite, Option<i64>>("SELECT issued_to FROM device WHERE device_id = ?")
        .bind(device_id)
        .fetch_optional(conn)
        .await
}

async fn employee_exists(conn: &mut SqliteConnection, emp_id: i64) -> Result<bool, sqlx::Error> {
    let found: Option<i64> = sqlx::query_scalar("SELECT emp_id FROM employee WHERE emp_id = ?")
        .bind(emp_id)
        .fetch_optional(conn)
        .await?;

    Ok(found.is_some())
}

//! Repair history and service provider queries

use chrono::NaiveDate;
use sqlx::FromRow;
use tracing::debug;

use super::Database;
use crate::models::{NewRepair, RepairDetails, RepairSummary, ServiceProvider};
use crate::utils::AppResult;

#[derive(Debug, FromRow)]
struct RepairDetailsRow {
    repair_id: i64,
    fault_report: String,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
    cost: f64,
    abn: String,
    service_name: String,
    email: String,
    done_to: i64,
}

impl From<RepairDetailsRow> for RepairDetails {
    fn from(row: RepairDetailsRow) -> Self {
        RepairDetails {
            repair_id: row.repair_id,
            fault_report: row.fault_report,
            start_date: row.start_date,
            end_date: row.end_date,
            cost: row.cost,
            done_by: ServiceProvider {
                abn: row.abn,
                service_name: row.service_name,
                email: row.email,
            },
            done_to: row.done_to,
        }
    }
}

pub struct RepairRepository<'a> {
    db: &'a Database,
}

impl<'a> RepairRepository<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    pub async fn get_device_repairs(&self, device_id: i64) -> AppResult<Vec<RepairSummary>> {
        debug!(device_id, "Listing repairs for device");

        let mut conn = self.db.acquire().await?;
        let repairs = sqlx::query_as::<_, RepairSummary>(
            r#"
            SELECT repair_id, fault_report, start_date, end_date, cost
            FROM repair
            WHERE done_to = ?
            ORDER BY repair_id
            "#,
        )
        .bind(device_id)
        .fetch_all(&mut *conn)
        .await?;

        Ok(repairs)
    }

    /// Repair with the service provider that performed it
    pub async fn get_repair_details(&self, repair_id: i64) -> AppResult<Option<RepairDetails>> {
        debug!(repair_id, "Fetching repair");

        let mut conn = self.db.acquire().await?;
        let row = sqlx::query_as::<_, RepairDetailsRow>(
            r#"
            SELECT r.repair_id, r.fault_report, r.start_date, r.end_date, r.cost,
                   s.abn, s.service_name, s.email, r.done_to
            FROM repair r
            JOIN service s ON s.abn = r.done_by
            WHERE r.repair_id = ?
            "#,
        )
        .bind(repair_id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(row.map(RepairDetails::from))
    }

    pub async fn create_service(&self, service: &ServiceProvider) -> AppResult<()> {
        let mut conn = self.db.acquire().await?;
        sqlx::query("INSERT INTO service (abn, service_name, email) VALUES (?, ?, ?)")
            .bind(&service.abn)
            .bind(&service.service_name)
            .bind(&service.email)
            .execute(&mut *conn)
            .await?;

        Ok(())
    }

    pub async fn create_repair(&self, req: &NewRepair) -> AppResult<()> {
        let mut conn = self.db.acquire().await?;
        sqlx::query(
            r#"
            INSERT INTO repair (repair_id, fault_report, start_date, end_date, cost, done_to, done_by)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(req.repair_id)
        .bind(&req.fault_report)
        .bind(req.start_date)
        .bind(req.end_date)
        .bind(req.cost)
        .bind(req.done_to)
        .bind(&req.done_by)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }
}

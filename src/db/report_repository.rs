//! Reporting roll-ups computed by the store

use sqlx::FromRow;
use tracing::debug;

use super::Database;
use crate::models::{DepartmentManagerPhone, DepartmentProductivity, MonthlyServiceSpend};
use crate::utils::{AppError, AppResult};

#[derive(Debug, FromRow)]
struct MonthlySpendRow {
    month: i64,
    year: i64,
    total_cost: f64,
    repair_ids: String,
    abn: String,
    service_name: String,
    max_cost: f64,
}

impl TryFrom<MonthlySpendRow> for MonthlyServiceSpend {
    type Error = AppError;

    fn try_from(row: MonthlySpendRow) -> Result<Self, Self::Error> {
        let month = u32::try_from(row.month)
            .map_err(|_| AppError::Database(format!("Invalid month {}", row.month)))?;
        let year = i32::try_from(row.year)
            .map_err(|_| AppError::Database(format!("Invalid year {}", row.year)))?;

        Ok(MonthlyServiceSpend {
            month,
            year,
            total_cost: row.total_cost,
            repair_ids: parse_id_list(&row.repair_ids)?,
            abn: row.abn,
            service_name: row.service_name,
            max_cost: row.max_cost,
        })
    }
}

/// Parse a `group_concat` id list into ascending ids
fn parse_id_list(raw: &str) -> AppResult<Vec<i64>> {
    let mut ids = raw
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<i64>()
                .map_err(|_| AppError::Database(format!("Invalid repair id {:?}", part)))
        })
        .collect::<AppResult<Vec<i64>>>()?;
    ids.sort_unstable();
    Ok(ids)
}

pub struct ReportRepository<'a> {
    db: &'a Database,
}

impl<'a> ReportRepository<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Departments ranked by mean worked fraction, highest first
    pub async fn productivity_rank(&self) -> AppResult<Vec<DepartmentProductivity>> {
        debug!("Computing productivity ranking");

        let mut conn = self.db.acquire().await?;
        let rows = sqlx::query_as::<_, DepartmentProductivity>(
            r#"
            SELECT RANK() OVER (ORDER BY AVG(fraction) DESC) AS rank,
                   department,
                   ROUND(AVG(fraction), 2) AS average_worked_fraction,
                   MAX(fraction) AS most_worked_fraction,
                   MIN(fraction) AS least_worked_fraction
            FROM employee_departments
            GROUP BY department
            ORDER BY rank, most_worked_fraction, department
            "#,
        )
        .fetch_all(&mut *conn)
        .await?;

        Ok(rows)
    }

    /// For each month with repairs, the service paid the most that month
    ///
    /// Ties on the monthly total go to the lower ABN.
    pub async fn most_spent_per_month(&self) -> AppResult<Vec<MonthlyServiceSpend>> {
        debug!("Computing monthly service spend");

        let mut conn = self.db.acquire().await?;
        let rows = sqlx::query_as::<_, MonthlySpendRow>(
            r#"
            WITH monthly AS (
                SELECT CAST(strftime('%Y', start_date) AS INTEGER) AS year,
                       CAST(strftime('%m', start_date) AS INTEGER) AS month,
                       done_by AS abn,
                       SUM(cost) AS total_cost,
                       MAX(cost) AS max_cost,
                       group_concat(repair_id) AS repair_ids
                FROM repair
                GROUP BY year, month, done_by
            ),
            ranked AS (
                SELECT monthly.*,
                       ROW_NUMBER() OVER (
                           PARTITION BY year, month
                           ORDER BY total_cost DESC, abn ASC
                       ) AS position
                FROM monthly
            )
            SELECT k.month, k.year,
                   k.total_cost,
                   k.repair_ids, k.abn, s.service_name, k.max_cost
            FROM ranked k
            JOIN service s ON s.abn = k.abn
            WHERE k.position = 1
            ORDER BY k.year, k.month
            "#,
        )
        .fetch_all(&mut *conn)
        .await?;
        drop(conn);

        rows.into_iter().map(MonthlyServiceSpend::try_from).collect()
    }

    /// Phone numbers of department managers
    pub async fn manager_department_phone(&self) -> AppResult<Vec<DepartmentManagerPhone>> {
        debug!("Listing manager phone numbers");

        let mut conn = self.db.acquire().await?;
        let rows = sqlx::query_as::<_, DepartmentManagerPhone>(
            r#"
            SELECT d.name AS department,
                   d.manager AS manager_id,
                   e.name AS manager_name,
                   p.phone_number
            FROM department d
            JOIN employee e ON e.emp_id = d.manager
            JOIN employee_phone_numbers p ON p.emp_id = d.manager
            ORDER BY d.name, e.name, p.phone_number
            "#,
        )
        .fetch_all(&mut *conn)
        .await?;

        Ok(rows)
    }
}

//! Employee, department membership and credential queries

use sqlx::FromRow;
use tracing::debug;

use super::Database;
use crate::models::{Employee, EmployeeSummary, NewEmployee};
use crate::utils::password::{hash_password, verify_password};
use crate::utils::AppResult;

#[derive(Debug, FromRow)]
struct CredentialRow {
    emp_id: i64,
    name: String,
    home_address: String,
    date_of_birth: chrono::NaiveDate,
    password: String,
}

pub struct EmployeeRepository<'a> {
    db: &'a Database,
}

impl<'a> EmployeeRepository<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Return the employee profile when the password matches the stored hash
    ///
    /// An unknown employee and a wrong password both yield `None`.
    pub async fn check_login(&self, emp_id: i64, password: &str) -> AppResult<Option<Employee>> {
        debug!(emp_id, "Checking login");

        let mut conn = self.db.acquire().await?;
        let row = sqlx::query_as::<_, CredentialRow>(
            r#"
            SELECT emp_id, name, home_address, date_of_birth, password
            FROM employee
            WHERE emp_id = ?
            "#,
        )
        .bind(emp_id)
        .fetch_optional(&mut *conn)
        .await?;
        drop(conn);

        let Some(row) = row else {
            return Ok(None);
        };

        if !verify_password(password, &row.password) {
            return Ok(None);
        }

        Ok(Some(Employee {
            emp_id: row.emp_id,
            name: row.name,
            home_address: row.home_address,
            date_of_birth: row.date_of_birth,
        }))
    }

    /// First department (by name) the employee manages
    pub async fn is_manager(&self, emp_id: i64) -> AppResult<Option<String>> {
        debug!(emp_id, "Checking manager status");

        let mut conn = self.db.acquire().await?;
        let department: Option<String> = sqlx::query_scalar(
            r#"
            SELECT name FROM department
            WHERE manager = ?
            ORDER BY name
            LIMIT 1
            "#,
        )
        .bind(emp_id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(department)
    }

    /// Names of the departments the employee works in
    pub async fn employee_works_in(&self, emp_id: i64) -> AppResult<Vec<String>> {
        debug!(emp_id, "Listing departments for employee");

        let mut conn = self.db.acquire().await?;
        let departments: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT department FROM employee_departments
            WHERE emp_id = ?
            ORDER BY department
            "#,
        )
        .bind(emp_id)
        .fetch_all(&mut *conn)
        .await?;

        Ok(departments)
    }

    pub async fn get_employees_in_department(
        &self,
        department: &str,
    ) -> AppResult<Vec<EmployeeSummary>> {
        debug!(department, "Listing employees in department");

        let mut conn = self.db.acquire().await?;
        let employees = sqlx::query_as::<_, EmployeeSummary>(
            r#"
            SELECT e.emp_id, e.name
            FROM employee e
            JOIN employee_departments ed ON ed.emp_id = e.emp_id
            WHERE ed.department = ?
            ORDER BY e.emp_id
            "#,
        )
        .bind(department)
        .fetch_all(&mut *conn)
        .await?;

        Ok(employees)
    }

    /// Insert an employee, storing an Argon2 hash of the password
    pub async fn create_employee(&self, req: &NewEmployee) -> AppResult<()> {
        let password_hash = hash_password(&req.password)?;

        let mut conn = self.db.acquire().await?;
        sqlx::query(
            r#"
            INSERT INTO employee (emp_id, name, home_address, date_of_birth, password)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(req.emp_id)
        .bind(&req.name)
        .bind(&req.home_address)
        .bind(req.date_of_birth)
        .bind(&password_hash)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    pub async fn create_department(&self, name: &str, manager: Option<i64>) -> AppResult<()> {
        let mut conn = self.db.acquire().await?;
        sqlx::query("INSERT INTO department (name, manager) VALUES (?, ?)")
            .bind(name)
            .bind(manager)
            .execute(&mut *conn)
            .await?;

        Ok(())
    }

    pub async fn add_employee_to_department(
        &self,
        emp_id: i64,
        department: &str,
        fraction: f64,
    ) -> AppResult<()> {
        let mut conn = self.db.acquire().await?;
        sqlx::query(
            r#"
            INSERT INTO employee_departments (emp_id, department, fraction)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(emp_id)
        .bind(department)
        .bind(fraction)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    pub async fn add_phone_number(&self, emp_id: i64, phone_number: &str) -> AppResult<()> {
        let mut conn = self.db.acquire().await?;
        sqlx::query("INSERT INTO employee_phone_numbers (emp_id, phone_number) VALUES (?, ?)")
            .bind(emp_id)
            .bind(phone_number)
            .execute(&mut *conn)
            .await?;

        Ok(())
    }
}

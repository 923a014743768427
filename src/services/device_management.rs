//! Device management service
//!
//! The single surface the web layer calls. Every operation is a leaf against
//! the store: it borrows the repository it needs, turns a missing row into
//! `AppError::NotFound`, and logs failures that point at the store rather
//! than at the caller.

use tracing::{error, info, warn};

use crate::db::{
    Database, DeviceRepository, EmployeeRepository, ModelRepository, RepairRepository,
    ReportRepository,
};
use crate::models::{
    AssignmentOutcome, DepartmentManagerPhone, DepartmentProductivity, DeviceAssignment,
    DeviceInfo, DeviceModel, DeviceSummary, Employee, EmployeeDeviceCount, EmployeeSummary,
    IssuedDevice, ModelAllocation, MonthlyServiceSpend, NewDevice, NewEmployee, NewRepair,
    RepairDetails, RepairSummary, ServiceProvider,
};
use crate::utils::validation::{
    ensure_department_name, ensure_id, ensure_model_key, validate_abn, validate_email,
};
use crate::utils::{AppError, AppResult};

/// Log server-side failures once, at the service boundary
fn observe<T>(operation: &'static str, result: AppResult<T>) -> AppResult<T> {
    if let Err(err) = &result {
        if err.is_server_error() {
            error!(operation, kind = err.kind(), error = %err, "Data access failed");
        }
    }
    result
}

fn require<T>(found: Option<T>, what: &str, id: i64) -> AppResult<T> {
    found.ok_or_else(|| AppError::NotFound(format!("{} {} not found", what, id)))
}

fn ensure_abn(abn: &str) -> AppResult<()> {
    if validate_abn(abn) {
        Ok(())
    } else {
        Err(AppError::BadRequest(format!("Invalid ABN: {:?}", abn)))
    }
}

fn ensure_non_empty(field: &str, value: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        Err(AppError::BadRequest(format!("{} must not be empty", field)))
    } else {
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct DeviceManagementService {
    db: Database,
}

impl DeviceManagementService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    // ---- Employees ----

    /// Verify credentials and return the employee profile
    ///
    /// Unknown employees and wrong passwords are both `NotFound`.
    pub async fn check_login(&self, emp_id: i64, password: &str) -> AppResult<Employee> {
        let result = EmployeeRepository::new(&self.db)
            .check_login(emp_id, password)
            .await
            .and_then(|found| {
                found.ok_or_else(|| AppError::NotFound("Invalid employee id or password".into()))
            });
        if let Err(AppError::NotFound(_)) = &result {
            warn!(emp_id, "Login rejected");
        }
        observe("check_login", result)
    }

    /// Name of a department the employee manages, if any
    pub async fn is_manager(&self, emp_id: i64) -> AppResult<Option<String>> {
        observe("is_manager", EmployeeRepository::new(&self.db).is_manager(emp_id).await)
    }

    pub async fn employee_works_in(&self, emp_id: i64) -> AppResult<Vec<String>> {
        observe(
            "employee_works_in",
            EmployeeRepository::new(&self.db).employee_works_in(emp_id).await,
        )
    }

    pub async fn get_employees_in_department(
        &self,
        department: &str,
    ) -> AppResult<Vec<EmployeeSummary>> {
        observe(
            "get_employees_in_department",
            EmployeeRepository::new(&self.db)
                .get_employees_in_department(department)
                .await,
        )
    }

    // ---- Devices ----

    pub async fn get_devices_used_by(&self, emp_id: i64) -> AppResult<Vec<DeviceSummary>> {
        observe(
            "get_devices_used_by",
            DeviceRepository::new(&self.db).get_devices_used_by(emp_id).await,
        )
    }

    pub async fn get_issued_devices_for_user(&self, emp_id: i64) -> AppResult<Vec<IssuedDevice>> {
        observe(
            "get_issued_devices_for_user",
            DeviceRepository::new(&self.db)
                .get_issued_devices_for_user(emp_id)
                .await,
        )
    }

    pub async fn get_device_information(&self, device_id: i64) -> AppResult<DeviceInfo> {
        let result = DeviceRepository::new(&self.db)
            .get_device_information(device_id)
            .await
            .and_then(|found| require(found, "Device", device_id));
        observe("get_device_information", result)
    }

    pub async fn get_model_device_assigned(
        &self,
        model_number: &str,
        manufacturer: &str,
        emp_id: i64,
    ) -> AppResult<Vec<DeviceAssignment>> {
        observe(
            "get_model_device_assigned",
            DeviceRepository::new(&self.db)
                .get_model_device_assigned(model_number, manufacturer, emp_id)
                .await,
        )
    }

    pub async fn get_unassigned_devices_for_model(
        &self,
        model_number: &str,
        manufacturer: &str,
    ) -> AppResult<Vec<i64>> {
        observe(
            "get_unassigned_devices_for_model",
            DeviceRepository::new(&self.db)
                .get_unassigned_devices_for_model(model_number, manufacturer)
                .await,
        )
    }

    pub async fn issue_device_to_employee(
        &self,
        emp_id: i64,
        device_id: i64,
    ) -> AppResult<AssignmentOutcome> {
        let result = DeviceRepository::new(&self.db)
            .issue_device_to_employee(emp_id, device_id)
            .await;
        match &result {
            Ok(AssignmentOutcome::Applied) => info!(emp_id, device_id, "Device issued"),
            Ok(AssignmentOutcome::Rejected(reason)) => {
                warn!(emp_id, device_id, reason = reason.as_str(), "Device issue rejected")
            }
            Err(_) => {}
        }
        observe("issue_device_to_employee", result)
    }

    pub async fn revoke_device_from_employee(
        &self,
        emp_id: i64,
        device_id: i64,
    ) -> AppResult<AssignmentOutcome> {
        let result = DeviceRepository::new(&self.db)
            .revoke_device_from_employee(emp_id, device_id)
            .await;
        match &result {
            Ok(AssignmentOutcome::Applied) => info!(emp_id, device_id, "Device revoked"),
            Ok(AssignmentOutcome::Rejected(reason)) => {
                warn!(emp_id, device_id, reason = reason.as_str(), "Device revoke rejected")
            }
            Err(_) => {}
        }
        observe("revoke_device_from_employee", result)
    }

    // ---- Models ----

    pub async fn get_all_models(&self) -> AppResult<Vec<DeviceModel>> {
        observe("get_all_models", ModelRepository::new(&self.db).get_all_models().await)
    }

    pub async fn get_device_model(&self, device_id: i64) -> AppResult<DeviceModel> {
        let result = ModelRepository::new(&self.db)
            .get_device_model(device_id)
            .await
            .and_then(|found| require(found, "Device", device_id));
        observe("get_device_model", result)
    }

    pub async fn get_department_models(&self, department: &str) -> AppResult<Vec<ModelAllocation>> {
        observe(
            "get_department_models",
            ModelRepository::new(&self.db)
                .get_department_models(department)
                .await,
        )
    }

    pub async fn get_employee_department_model_device(
        &self,
        department: &str,
        manufacturer: &str,
        model_number: &str,
    ) -> AppResult<Vec<EmployeeDeviceCount>> {
        observe(
            "get_employee_department_model_device",
            ModelRepository::new(&self.db)
                .get_employee_department_model_device(department, manufacturer, model_number)
                .await,
        )
    }

    // ---- Repairs ----

    pub async fn get_device_repairs(&self, device_id: i64) -> AppResult<Vec<RepairSummary>> {
        observe(
            "get_device_repairs",
            RepairRepository::new(&self.db)
                .get_device_repairs(device_id)
                .await,
        )
    }

    pub async fn get_repair_details(&self, repair_id: i64) -> AppResult<RepairDetails> {
        let result = RepairRepository::new(&self.db)
            .get_repair_details(repair_id)
            .await
            .and_then(|found| require(found, "Repair", repair_id));
        observe("get_repair_details", result)
    }

    // ---- Reports ----

    pub async fn productivity_rank(&self) -> AppResult<Vec<DepartmentProductivity>> {
        observe(
            "productivity_rank",
            ReportRepository::new(&self.db).productivity_rank().await,
        )
    }

    pub async fn most_spent_per_month(&self) -> AppResult<Vec<MonthlyServiceSpend>> {
        observe(
            "most_spent_per_month",
            ReportRepository::new(&self.db).most_spent_per_month().await,
        )
    }

    pub async fn manager_department_phone(&self) -> AppResult<Vec<DepartmentManagerPhone>> {
        observe(
            "manager_department_phone",
            ReportRepository::new(&self.db)
                .manager_department_phone()
                .await,
        )
    }

    // ---- Store maintenance ----

    pub async fn create_employee(&self, req: &NewEmployee) -> AppResult<()> {
        ensure_id("employee", req.emp_id)?;
        ensure_non_empty("Employee name", &req.name)?;
        ensure_non_empty("Password", &req.password)?;

        observe(
            "create_employee",
            EmployeeRepository::new(&self.db).create_employee(req).await,
        )?;
        info!(emp_id = req.emp_id, "Employee created");
        Ok(())
    }

    pub async fn create_department(&self, name: &str, manager: Option<i64>) -> AppResult<()> {
        ensure_department_name(name)?;
        if let Some(manager) = manager {
            ensure_id("manager", manager)?;
        }

        observe(
            "create_department",
            EmployeeRepository::new(&self.db)
                .create_department(name, manager)
                .await,
        )?;
        info!(department = name, "Department created");
        Ok(())
    }

    pub async fn add_employee_to_department(
        &self,
        emp_id: i64,
        department: &str,
        fraction: f64,
    ) -> AppResult<()> {
        ensure_id("employee", emp_id)?;
        ensure_department_name(department)?;
        if !fraction.is_finite() || fraction < 0.0 {
            return Err(AppError::BadRequest(format!(
                "Invalid worked fraction: {}",
                fraction
            )));
        }

        observe(
            "add_employee_to_department",
            EmployeeRepository::new(&self.db)
                .add_employee_to_department(emp_id, department, fraction)
                .await,
        )
    }

    pub async fn add_phone_number(&self, emp_id: i64, phone_number: &str) -> AppResult<()> {
        ensure_id("employee", emp_id)?;
        ensure_non_empty("Phone number", phone_number)?;

        observe(
            "add_phone_number",
            EmployeeRepository::new(&self.db)
                .add_phone_number(emp_id, phone_number)
                .await,
        )
    }

    pub async fn create_model(&self, model: &DeviceModel) -> AppResult<()> {
        ensure_model_key(&model.manufacturer, &model.model_number)?;
        if model.weight < 0 {
            return Err(AppError::BadRequest(format!("Invalid weight: {}", model.weight)));
        }

        observe("create_model", ModelRepository::new(&self.db).create_model(model).await)
    }

    pub async fn set_model_allocation(
        &self,
        department: &str,
        allocation: &ModelAllocation,
    ) -> AppResult<()> {
        ensure_department_name(department)?;
        ensure_model_key(&allocation.manufacturer, &allocation.model_number)?;
        if allocation.max_number < 0 {
            return Err(AppError::BadRequest(format!(
                "Invalid allocation: {}",
                allocation.max_number
            )));
        }

        observe(
            "set_model_allocation",
            ModelRepository::new(&self.db)
                .set_model_allocation(department, allocation)
                .await,
        )
    }

    pub async fn create_device(&self, req: &NewDevice) -> AppResult<()> {
        ensure_id("device", req.device_id)?;
        ensure_model_key(&req.manufacturer, &req.model_number)?;
        if let Some(holder) = req.issued_to {
            ensure_id("employee", holder)?;
        }

        observe("create_device", DeviceRepository::new(&self.db).create_device(req).await)?;
        info!(device_id = req.device_id, "Device registered");
        Ok(())
    }

    pub async fn create_service(&self, service: &ServiceProvider) -> AppResult<()> {
        ensure_abn(&service.abn)?;
        ensure_non_empty("Service name", &service.service_name)?;
        if !validate_email(&service.email) {
            return Err(AppError::BadRequest(format!(
                "Invalid email: {:?}",
                service.email
            )));
        }

        observe(
            "create_service",
            RepairRepository::new(&self.db).create_service(service).await,
        )
    }

    pub async fn create_repair(&self, req: &NewRepair) -> AppResult<()> {
        ensure_id("repair", req.repair_id)?;
        ensure_id("device", req.done_to)?;
        ensure_abn(&req.done_by)?;
        if let Some(end_date) = req.end_date {
            if end_date < req.start_date {
                return Err(AppError::BadRequest(format!(
                    "Repair {} ends before it starts",
                    req.repair_id
                )));
            }
        }

        observe("create_repair", RepairRepository::new(&self.db).create_repair(req).await)
    }
}

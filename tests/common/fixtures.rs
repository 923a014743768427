//! Test fixtures for common test data
//!
//! `seed` fills a store with a small company: four employees across three
//! departments, three device models, seven devices and a few months of
//! repairs. Integration tests and Cucumber scenarios assert against it.

use device_management::models::{
    DeviceModel, ModelAllocation, NewDevice, NewEmployee, NewRepair, ServiceProvider,
};
use device_management::DeviceManagementService;

use super::test_store::{date, empty_service, file_service, FileStore};

/// Fixed identifiers used by the seeded store
pub mod ids {
    pub const ALICE: i64 = 1;
    pub const BOB: i64 = 2;
    pub const CAROL: i64 = 3;
    pub const DAVE: i64 = 4;

    pub const ZOOMZONE: &str = "Zoomzone";
    pub const ACME: &str = "Acme";
    pub const PHONE_MODEL: &str = "9854941272";
    pub const TABLET_MODEL: &str = "0288809602";
    pub const LAPTOP_MODEL: &str = "100";

    /// Phones held by Alice
    pub const ALICE_PHONE_1: i64 = 10;
    pub const ALICE_PHONE_2: i64 = 11;
    /// Unassigned phone
    pub const SPARE_PHONE: i64 = 12;
    /// Phone held by Carol
    pub const CAROL_PHONE: i64 = 13;
    /// Laptop held by Bob
    pub const BOB_LAPTOP: i64 = 20;
    pub const SPARE_LAPTOP: i64 = 21;
    pub const SPARE_TABLET: i64 = 30;

    pub const ALPHA_ABN: &str = "11111111111";
    pub const BETA_ABN: &str = "22222222222";
}

/// Password for an employee in the seeded store
pub fn password_for(emp_id: i64) -> String {
    format!("secret-{}", emp_id)
}

fn employee(emp_id: i64, name: &str, dob: (i32, u32, u32)) -> NewEmployee {
    NewEmployee {
        emp_id,
        name: name.to_string(),
        home_address: format!("{} {} Street, Sydney", emp_id, name),
        date_of_birth: date(dob.0, dob.1, dob.2),
        password: password_for(emp_id),
    }
}

fn device(device_id: i64, manufacturer: &str, model_number: &str, cost: f64) -> NewDevice {
    NewDevice {
        device_id,
        serial_number: format!("SN-{:05}", device_id),
        purchase_date: date(2019, 3, 14),
        purchase_cost: cost,
        manufacturer: manufacturer.to_string(),
        model_number: model_number.to_string(),
        issued_to: None,
    }
}

fn repair(
    repair_id: i64,
    done_to: i64,
    done_by: &str,
    start: (i32, u32, u32),
    cost: f64,
) -> NewRepair {
    NewRepair {
        repair_id,
        fault_report: format!("Fault #{}", repair_id),
        start_date: date(start.0, start.1, start.2),
        end_date: None,
        cost,
        done_to,
        done_by: done_by.to_string(),
    }
}

/// Service over an in-memory store populated with the fixture company
pub async fn seeded_service() -> DeviceManagementService {
    let svc = empty_service().await;
    seed(&svc).await;
    svc
}

/// File-backed fixture company for tests that race several connections
pub async fn seeded_file_service(label: &str, max_connections: u32) -> FileStore {
    let store = file_service(label, max_connections).await;
    seed(&store.service).await;
    store
}

/// Populate an empty store with the fixture company
pub async fn seed(svc: &DeviceManagementService) {
    use ids::*;

    for employee in [
        employee(ALICE, "Alice", (1988, 2, 11)),
        employee(BOB, "Bob", (1990, 7, 30)),
        employee(CAROL, "Carol", (1979, 11, 2)),
        employee(DAVE, "Dave", (2001, 5, 19)),
    ] {
        svc.create_employee(&employee).await.expect("seed employee");
    }

    svc.create_department("Accounts", Some(ALICE)).await.expect("seed department");
    svc.create_department("Engineering", Some(BOB)).await.expect("seed department");
    svc.create_department("Sales", None).await.expect("seed department");

    for (emp_id, department, fraction) in [
        (ALICE, "Accounts", 0.60),
        (ALICE, "Engineering", 0.40),
        (BOB, "Engineering", 0.90),
        (CAROL, "Accounts", 0.50),
        (CAROL, "Sales", 0.25),
        (DAVE, "Sales", 0.75),
    ] {
        svc.add_employee_to_department(emp_id, department, fraction)
            .await
            .expect("seed membership");
    }

    for (emp_id, phone) in [
        (ALICE, "0400 000 002"),
        (ALICE, "0400 000 001"),
        (BOB, "0400 000 003"),
        (DAVE, "0400 000 004"),
    ] {
        svc.add_phone_number(emp_id, phone).await.expect("seed phone");
    }

    for model in [
        DeviceModel {
            manufacturer: ZOOMZONE.to_string(),
            model_number: PHONE_MODEL.to_string(),
            description: "Phone".to_string(),
            weight: 180,
        },
        DeviceModel {
            manufacturer: ZOOMZONE.to_string(),
            model_number: TABLET_MODEL.to_string(),
            description: "Tablet".to_string(),
            weight: 450,
        },
        DeviceModel {
            manufacturer: ACME.to_string(),
            model_number: LAPTOP_MODEL.to_string(),
            description: "Laptop".to_string(),
            weight: 1400,
        },
    ] {
        svc.create_model(&model).await.expect("seed model");
    }

    for (department, manufacturer, model_number, max_number) in [
        ("Accounts", ZOOMZONE, PHONE_MODEL, 3),
        ("Accounts", ACME, LAPTOP_MODEL, 1),
        ("Engineering", ACME, LAPTOP_MODEL, 5),
    ] {
        svc.set_model_allocation(
            department,
            &ModelAllocation {
                manufacturer: manufacturer.to_string(),
                model_number: model_number.to_string(),
                max_number,
            },
        )
        .await
        .expect("seed allocation");
    }

    for (mut new_device, holder) in [
        (device(ALICE_PHONE_1, ZOOMZONE, PHONE_MODEL, 799.99), Some(ALICE)),
        (device(ALICE_PHONE_2, ZOOMZONE, PHONE_MODEL, 799.99), Some(ALICE)),
        (device(SPARE_PHONE, ZOOMZONE, PHONE_MODEL, 749.5), None),
        (device(CAROL_PHONE, ZOOMZONE, PHONE_MODEL, 799.99), Some(CAROL)),
        (device(BOB_LAPTOP, ACME, LAPTOP_MODEL, 1999.5), Some(BOB)),
        (device(SPARE_LAPTOP, ACME, LAPTOP_MODEL, 1999.5), None),
        (device(SPARE_TABLET, ZOOMZONE, TABLET_MODEL, 329.0), None),
    ] {
        new_device.issued_to = holder;
        svc.create_device(&new_device).await.expect("seed device");
    }

    svc.create_service(&ServiceProvider {
        abn: ALPHA_ABN.to_string(),
        service_name: "Alpha Repairs".to_string(),
        email: "alpha@repairs.example".to_string(),
    })
    .await
    .expect("seed service");
    svc.create_service(&ServiceProvider {
        abn: BETA_ABN.to_string(),
        service_name: "Beta Fixes".to_string(),
        email: "beta@fixes.example".to_string(),
    })
    .await
    .expect("seed service");

    let mut first = repair(1, ALICE_PHONE_1, ALPHA_ABN, (2021, 1, 5), 100.0);
    first.end_date = Some(date(2021, 1, 9));
    first.fault_report = "Screen cracked; touch unresponsive".to_string();

    for new_repair in [
        first,
        repair(3, BOB_LAPTOP, ALPHA_ABN, (2021, 1, 25), 80.0),
        repair(2, ALICE_PHONE_1, BETA_ABN, (2021, 1, 20), 150.0),
        repair(7, CAROL_PHONE, BETA_ABN, (2021, 1, 28), 20.0),
        repair(4, ALICE_PHONE_2, BETA_ABN, (2021, 2, 2), 60.0),
        repair(5, SPARE_PHONE, ALPHA_ABN, (2021, 2, 10), 60.0),
        repair(6, BOB_LAPTOP, BETA_ABN, (2020, 12, 30), 300.0),
    ] {
        svc.create_repair(&new_repair).await.expect("seed repair");
    }
}

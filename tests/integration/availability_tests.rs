//! Store availability and seeding constraint tests

use device_management::config::DatabaseConfig;
use device_management::models::{NewDevice, ServiceProvider};
use device_management::{AppError, Database, DeviceManagementService};

use crate::common::ids::*;
use crate::common::{date, empty_service, seeded_service};

#[tokio::test]
async fn test_unassigned_devices_never_have_an_assignee() {
    let svc = seeded_service().await;

    let ids = svc
        .get_unassigned_devices_for_model(PHONE_MODEL, ZOOMZONE)
        .await
        .unwrap();
    assert_eq!(ids, vec![SPARE_PHONE]);

    svc.issue_device_to_employee(DAVE, SPARE_PHONE).await.unwrap();
    svc.revoke_device_from_employee(ALICE, ALICE_PHONE_1)
        .await
        .unwrap();

    let ids = svc
        .get_unassigned_devices_for_model(PHONE_MODEL, ZOOMZONE)
        .await
        .unwrap();
    assert_eq!(ids, vec![ALICE_PHONE_1]);
    for id in ids {
        let device = svc.get_device_information(id).await.unwrap();
        assert_eq!(device.issued_to, None);
    }
}

#[tokio::test]
async fn test_file_store_persists_across_connections() {
    let dir = std::env::temp_dir().join(format!("devicemgmt-test-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let config = DatabaseConfig {
        data_dir: dir.clone(),
        name: Some("persist".to_string()),
        ..DatabaseConfig::default()
    };
    let _ = std::fs::remove_file(dir.join("persist.db"));

    let db = Database::connect(&config).await.unwrap();
    db.migrate().await.unwrap();
    let svc = DeviceManagementService::new(db.clone());
    svc.create_service(&ServiceProvider {
        abn: ALPHA_ABN.to_string(),
        service_name: "Alpha Repairs".to_string(),
        email: "alpha@repairs.example".to_string(),
    })
    .await
    .unwrap();
    db.close().await;

    let db = Database::connect(&config).await.unwrap();
    let mut conn = db.acquire().await.unwrap();
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM service")
        .fetch_one(&mut *conn)
        .await
        .unwrap();
    drop(conn);
    db.close().await;

    assert_eq!(count, 1);
    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn test_closed_store_is_unavailable_not_not_found() {
    let svc = seeded_service().await;
    svc.database().close().await;

    for result in [
        svc.get_device_information(ALICE_PHONE_1).await.map(|_| ()),
        svc.get_all_models().await.map(|_| ()),
        svc.productivity_rank().await.map(|_| ()),
        svc.check_login(ALICE, "secret-1").await.map(|_| ()),
    ] {
        assert!(matches!(result, Err(AppError::Unavailable(_))), "got {:?}", result);
    }
}

#[tokio::test]
async fn test_device_for_unknown_model_is_conflict() {
    let svc = empty_service().await;

    let err = svc
        .create_device(&NewDevice {
            device_id: 1,
            serial_number: "SN".to_string(),
            purchase_date: date(2022, 8, 1),
            purchase_cost: 10.0,
            manufacturer: "Nobody".to_string(),
            model_number: "0".to_string(),
            issued_to: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}

#[tokio::test]
async fn test_duplicate_department_is_conflict() {
    let svc = seeded_service().await;

    let err = svc.create_department("Sales", None).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
    assert_eq!(err.kind(), "conflict");
    assert!(!err.is_server_error());
}

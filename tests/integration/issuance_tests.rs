//! Device issuance integration tests

use rstest::rstest;

use device_management::models::{AssignmentOutcome, AssignmentRejection};
use device_management::{AppResult, DeviceManagementService};

use crate::common::ids::*;
use crate::common::{seeded_file_service, seeded_service};

#[tokio::test]
async fn test_issue_unassigned_device() {
    let svc = seeded_service().await;

    let outcome = svc.issue_device_to_employee(DAVE, SPARE_PHONE).await.unwrap();
    assert!(outcome.is_success());
    assert_eq!(outcome.reason(), None);

    let device = svc.get_device_information(SPARE_PHONE).await.unwrap();
    assert_eq!(device.issued_to, Some(DAVE));
    assert!(svc
        .get_devices_used_by(DAVE)
        .await
        .unwrap()
        .iter()
        .any(|d| d.device_id == SPARE_PHONE));
}

#[tokio::test]
async fn test_second_issue_is_rejected() {
    let svc = seeded_service().await;

    svc.issue_device_to_employee(DAVE, SPARE_PHONE).await.unwrap();
    let outcome = svc.issue_device_to_employee(CAROL, SPARE_PHONE).await.unwrap();

    assert_eq!(
        outcome,
        AssignmentOutcome::Rejected(AssignmentRejection::AlreadyIssued)
    );
    assert_eq!(outcome.reason(), Some("Device already issued"));

    let device = svc.get_device_information(SPARE_PHONE).await.unwrap();
    assert_eq!(device.issued_to, Some(DAVE));
}

#[rstest]
#[case::already_held_by_other(DAVE, ALICE_PHONE_1, AssignmentRejection::AlreadyIssued)]
#[case::already_held_by_self(ALICE, ALICE_PHONE_1, AssignmentRejection::AlreadyIssued)]
#[case::unknown_device(DAVE, 999, AssignmentRejection::UnknownDevice)]
#[case::unknown_employee(404, SPARE_PHONE, AssignmentRejection::UnknownEmployee)]
#[tokio::test]
async fn test_issue_rejections(
    #[case] emp_id: i64,
    #[case] device_id: i64,
    #[case] expected: AssignmentRejection,
) {
    let svc = seeded_service().await;

    let outcome = svc.issue_device_to_employee(emp_id, device_id).await.unwrap();
    assert_eq!(outcome.rejection(), Some(expected));
}

#[tokio::test]
async fn test_revoke_then_reissue() {
    let svc = seeded_service().await;

    let outcome = svc
        .revoke_device_from_employee(ALICE, ALICE_PHONE_2)
        .await
        .unwrap();
    assert!(outcome.is_success());
    assert_eq!(
        svc.get_device_information(ALICE_PHONE_2).await.unwrap().issued_to,
        None
    );

    let outcome = svc.issue_device_to_employee(CAROL, ALICE_PHONE_2).await.unwrap();
    assert!(outcome.is_success());
    assert_eq!(
        svc.get_device_information(ALICE_PHONE_2).await.unwrap().issued_to,
        Some(CAROL)
    );
}

#[rstest]
#[case::not_issued(DAVE, SPARE_LAPTOP, "Device already revoked")]
#[case::held_by_other(DAVE, BOB_LAPTOP, "Employee not assigned to device")]
#[case::unknown_device(DAVE, 999, "Device not found")]
#[tokio::test]
async fn test_revoke_rejections(
    #[case] emp_id: i64,
    #[case] device_id: i64,
    #[case] expected_reason: &str,
) {
    let svc = seeded_service().await;
    let before = svc.get_device_information(device_id).await.ok();

    let outcome = svc
        .revoke_device_from_employee(emp_id, device_id)
        .await
        .unwrap();
    assert!(!outcome.is_success());
    assert_eq!(outcome.reason(), Some(expected_reason));

    let after = svc.get_device_information(device_id).await.ok();
    assert_eq!(before, after);
}

#[tokio::test]
async fn test_double_revoke_is_rejected() {
    let svc = seeded_service().await;

    assert!(svc
        .revoke_device_from_employee(BOB, BOB_LAPTOP)
        .await
        .unwrap()
        .is_success());
    assert_eq!(
        svc.revoke_device_from_employee(BOB, BOB_LAPTOP)
            .await
            .unwrap()
            .rejection(),
        Some(AssignmentRejection::AlreadyRevoked)
    );
}

/// Run the same request from many tasks against a multi-connection pool
async fn race<F, Fut>(label: &str, tasks: usize, request: F) -> Vec<AssignmentOutcome>
where
    F: Fn(DeviceManagementService, usize) -> Fut,
    Fut: std::future::Future<Output = AppResult<AssignmentOutcome>> + Send + 'static,
{
    let store = seeded_file_service(label, 16).await;

    let handles: Vec<_> = (0..tasks)
        .map(|i| tokio::spawn(request(store.service.clone(), i)))
        .collect();

    let mut outcomes = Vec::with_capacity(tasks);
    for handle in handles {
        match handle.await.expect("task panicked") {
            Ok(outcome) => outcomes.push(outcome),
            Err(err) => panic!("lost race surfaced as an error: {:?}", err),
        }
    }

    store.service.database().close().await;
    outcomes
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_issues_have_one_winner() {
    let employees = [ALICE, BOB, CAROL, DAVE];
    let outcomes = race("issue-race", 16, move |svc, i| async move {
        svc.issue_device_to_employee(employees[i % employees.len()], SPARE_LAPTOP)
            .await
    })
    .await;

    assert_eq!(outcomes.iter().filter(|o| o.is_success()).count(), 1);
    assert!(outcomes
        .iter()
        .filter(|o| !o.is_success())
        .all(|o| o.rejection() == Some(AssignmentRejection::AlreadyIssued)));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_revokes_have_one_winner() {
    let outcomes = race("revoke-race", 16, |svc, _| async move {
        svc.revoke_device_from_employee(ALICE, ALICE_PHONE_1).await
    })
    .await;

    assert_eq!(outcomes.iter().filter(|o| o.is_success()).count(), 1);
    assert!(outcomes
        .iter()
        .filter(|o| !o.is_success())
        .all(|o| o.rejection() == Some(AssignmentRejection::AlreadyRevoked)));
}

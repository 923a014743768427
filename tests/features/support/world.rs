//! Test world for Cucumber scenarios

use cucumber::World;

use device_management::models::{AssignmentOutcome, DepartmentProductivity};
use device_management::DeviceManagementService;

/// Test world that maintains state across scenario steps
#[derive(Debug, Default, World)]
pub struct TestWorld {
    /// Service over the scenario's own in-memory store
    pub service: Option<DeviceManagementService>,

    /// Outcome of the last issue or revoke request
    pub last_outcome: Option<AssignmentOutcome>,

    /// Rows of the last productivity report
    pub productivity: Vec<DepartmentProductivity>,
}

impl TestWorld {
    pub fn service(&self) -> &DeviceManagementService {
        self.service
            .as_ref()
            .expect("scenario must start from a seeded store")
    }

    pub fn last_outcome(&self) -> AssignmentOutcome {
        self.last_outcome
            .expect("no issue or revoke request was made")
    }
}

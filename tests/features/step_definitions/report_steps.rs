//! Report step definitions

use cucumber::{then, when};

use crate::features::TestWorld;

#[when("I request the productivity ranking")]
async fn request_productivity(world: &mut TestWorld) {
    world.productivity = world
        .service()
        .productivity_rank()
        .await
        .expect("productivity report failed");
}

#[then(expr = "department {string} is ranked {int}")]
async fn department_ranked(world: &mut TestWorld, department: String, rank: i64) {
    let row = world
        .productivity
        .iter()
        .find(|row| row.department == department)
        .unwrap_or_else(|| panic!("{} missing from ranking", department));
    assert_eq!(row.rank, rank);
}

#[then("every department's average lies between its least and most worked fraction")]
async fn averages_are_bounded(world: &mut TestWorld) {
    assert!(!world.productivity.is_empty());
    for row in &world.productivity {
        assert!(row.least_worked_fraction <= row.average_worked_fraction);
        assert!(row.average_worked_fraction <= row.most_worked_fraction);
    }
}

//! When steps for pull request synchronization BDD scenarios.

use super::world::{SyncWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::when;

fn run_pass(world: &mut SyncWorld) -> Result<(), eyre::Report> {
    world.writes_before_last_pass = world.host.writes().len();
    let report = run_async(world.synchronizer.sync("main", "zh"))
        .wrap_err("synchronize pull requests")?;
    world.reports.push(report);
    Ok(())
}

#[when("the pull requests are synchronized")]
fn synchronize(world: &mut SyncWorld) -> Result<(), eyre::Report> {
    run_pass(world)
}

#[when("the pull requests are synchronized again")]
fn synchronize_again(world: &mut SyncWorld) -> Result<(), eyre::Report> {
    run_pass(world)
}

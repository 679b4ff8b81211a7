//! When steps for auto-close BDD scenarios.

use super::world::{AutoCloseWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::when;

#[when("the auto-close sweep runs")]
fn sweep_runs(world: &mut AutoCloseWorld) -> Result<(), eyre::Report> {
    let report = run_async(world.job.tick()).wrap_err("run auto-close sweep")?;
    world.last_report = Some(report);
    Ok(())
}

#[when("the auto-close sweep runs again")]
fn sweep_runs_again(world: &mut AutoCloseWorld) -> Result<(), eyre::Report> {
    sweep_runs(world)
}

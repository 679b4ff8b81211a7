//! Then steps for auto-close BDD scenarios.

use super::world::{AutoCloseWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::then;
use taskforge::domain::TaskStatus;

#[then(r#"the task "{title}" is cancelled"#)]
fn task_is_cancelled(world: &AutoCloseWorld, title: String) -> Result<(), eyre::Report> {
    expect_status(world, &title, TaskStatus::Cancelled)
}

#[then(r#"the task "{title}" keeps its "{status}" status"#)]
fn task_keeps_status(
    world: &AutoCloseWorld,
    title: String,
    status: String,
) -> Result<(), eyre::Report> {
    let expected = TaskStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid expected status in scenario: {err}"))?;
    expect_status(world, &title, expected)
}

#[then("the sweep reports one closed task")]
fn sweep_reports_one_closed(world: &AutoCloseWorld) -> Result<(), eyre::Report> {
    expect_closed_count(world, 1)
}

#[then("the sweep reports no closed tasks")]
fn sweep_reports_no_closed(world: &AutoCloseWorld) -> Result<(), eyre::Report> {
    expect_closed_count(world, 0)
}

fn expect_status(
    world: &AutoCloseWorld,
    title: &str,
    expected: TaskStatus,
) -> Result<(), eyre::Report> {
    let project_id = world
        .project
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing project in scenario world"))?
        .id();
    let task_id = world.task_named(title)?.id();

    let current = run_async(world.tasks.get(project_id, task_id))
        .wrap_err("fetch task for status assertion")?;
    if current.status() != expected {
        return Err(eyre::eyre!(
            "expected status {}, found {}",
            expected.as_str(),
            current.status().as_str()
        ));
    }
    Ok(())
}

fn expect_closed_count(world: &AutoCloseWorld, expected: u64) -> Result<(), eyre::Report> {
    let report = world
        .last_report
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing sweep report in scenario world"))?;
    if report.closed != expected {
        return Err(eyre::eyre!(
            "expected {expected} closed tasks, found {}",
            report.closed
        ));
    }
    Ok(())
}

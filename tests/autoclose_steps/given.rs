//! Given steps for auto-close BDD scenarios.

use super::world::{AutoCloseWorld, run_async};
use chrono::{Duration, Utc};
use eyre::WrapErr;
use rstest_bdd_macros::given;
use taskforge::services::{CreateProjectRequest, CreateTaskRequest, UpdateTaskRequest};

#[given(r#"a project named "{name}""#)]
fn project_named(world: &mut AutoCloseWorld, name: String) -> Result<(), eyre::Report> {
    let project = run_async(world.projects.create(CreateProjectRequest::new(name)))
        .wrap_err("create project for scenario")?;
    world.project = Some(project);
    Ok(())
}

#[given(r#"a task "{title}" with a deadline one hour in the past"#)]
fn overdue_task(world: &mut AutoCloseWorld, title: String) -> Result<(), eyre::Report> {
    let deadline = (Utc::now() - Duration::hours(1)).to_rfc3339();
    create_task(world, title, Some(deadline))
}

#[given(r#"a task "{title}" with no deadline"#)]
fn undated_task(world: &mut AutoCloseWorld, title: String) -> Result<(), eyre::Report> {
    create_task(world, title, None)
}

#[given(r#"the task "{title}" is marked "{status}""#)]
fn task_marked(
    world: &mut AutoCloseWorld,
    title: String,
    status: String,
) -> Result<(), eyre::Report> {
    let project_id = world
        .project
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing project in scenario world"))?
        .id();
    let task_id = world.task_named(&title)?.id();

    let updated = run_async(world.tasks.update(
        project_id,
        task_id,
        UpdateTaskRequest::new().with_status(status),
    ))
    .wrap_err("mark task for scenario")?;
    world.remember_task(updated);
    Ok(())
}

fn create_task(
    world: &mut AutoCloseWorld,
    title: String,
    deadline: Option<String>,
) -> Result<(), eyre::Report> {
    let project_id = world
        .project
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing project in scenario world"))?
        .id();

    let mut request = CreateTaskRequest::new(title);
    if let Some(deadline) = deadline {
        request = request.with_deadline(deadline);
    }

    let task = run_async(world.tasks.create(project_id, request))
        .wrap_err("create task for scenario")?;
    world.remember_task(task);
    Ok(())
}

//! Given steps for project lifecycle BDD scenarios.

use super::world::{ProjectLifecycleWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::given;
use taskforge::services::{CreateProjectRequest, CreateTaskRequest};

#[given(r#"a project named "{name}""#)]
fn project_named(world: &mut ProjectLifecycleWorld, name: String) -> Result<(), eyre::Report> {
    let project = run_async(world.projects.create(CreateProjectRequest::new(name.clone())))
        .wrap_err("create project for scenario")?;
    world.created.insert(name, project);
    Ok(())
}

#[given(r#"the project "{name}" has a task "{title}""#)]
fn project_has_task(
    world: &mut ProjectLifecycleWorld,
    name: String,
    title: String,
) -> Result<(), eyre::Report> {
    let project_id = world.project_named(&name)?.id();
    let task = run_async(world.tasks.create(project_id, CreateTaskRequest::new(title)))
        .wrap_err("create task for scenario")?;
    world.known_tasks.push(task);
    Ok(())
}

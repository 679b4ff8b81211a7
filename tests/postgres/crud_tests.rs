//! Round-trip tests for the `PostgreSQL` repositories.

use crate::postgres::helpers::{
    BoxError, PreparedRepos, prepared_repos, sample_project, sample_task,
};
use chrono::{TimeZone, Utc};
use mockable::{Clock, DefaultClock};
use rstest::rstest;
use taskforge::domain::{ProjectId, TaskStatus, TaskTitle};
use taskforge::error::RepositoryError;
use taskforge::ports::{ProjectFilter, ProjectRepository, TaskFilter, TaskRepository, TaskSort};

#[rstest]
#[tokio::test]
async fn project_round_trips_through_storage(
    #[future] prepared_repos: Result<PreparedRepos, BoxError>,
) -> Result<(), BoxError> {
    let ctx = prepared_repos.await?;
    let project = sample_project("Apollo")?;

    ctx.projects.insert(&project).await?;
    let fetched = ctx.projects.get(project.id()).await?;

    assert_eq!(fetched.id(), project.id());
    assert_eq!(fetched.name().as_str(), "Apollo");
    assert_eq!(fetched.description(), None);
    // timestamptz stores microseconds, so compare at that precision.
    assert_eq!(
        fetched.created_at().timestamp_micros(),
        project.created_at().timestamp_micros()
    );
    Ok(())
}

#[rstest]
#[tokio::test]
async fn project_update_persists_changes(
    #[future] prepared_repos: Result<PreparedRepos, BoxError>,
) -> Result<(), BoxError> {
    let ctx = prepared_repos.await?;
    let mut project = sample_project("Apollo")?;
    ctx.projects.insert(&project).await?;

    project.rename(
        taskforge::domain::ProjectName::new("Apollo 11", 100)?,
        &DefaultClock,
    );
    project.set_description(Some("First crewed landing".to_owned()), &DefaultClock);
    ctx.projects.update(&project).await?;

    let fetched = ctx.projects.get(project.id()).await?;
    assert_eq!(fetched.name().as_str(), "Apollo 11");
    assert_eq!(fetched.description(), Some("First crewed landing"));
    Ok(())
}

#[rstest]
#[tokio::test]
async fn listing_joins_task_counts(
    #[future] prepared_repos: Result<PreparedRepos, BoxError>,
) -> Result<(), BoxError> {
    let ctx = prepared_repos.await?;
    let apollo = sample_project("Apollo")?;
    let artemis = sample_project("Artemis")?;
    ctx.projects.insert(&apollo).await?;
    ctx.projects.insert(&artemis).await?;
    for title in ["Stack the rocket", "Fuel the rocket"] {
        let task = sample_task(&apollo, title, TaskStatus::Todo, None)?;
        ctx.tasks.insert(&task).await?;
    }

    let records = ctx.projects.list(&ProjectFilter::new()).await?;

    assert_eq!(records.len(), 2);
    for record in &records {
        let expected = if record.project.id() == apollo.id() { 2 } else { 0 };
        assert_eq!(record.task_count, expected);
    }
    Ok(())
}

#[rstest]
#[tokio::test]
async fn listing_matches_search_terms_in_either_column(
    #[future] prepared_repos: Result<PreparedRepos, BoxError>,
) -> Result<(), BoxError> {
    let ctx = prepared_repos.await?;
    let mut apollo = sample_project("Apollo")?;
    apollo.set_description(Some("Lunar landing program".to_owned()), &DefaultClock);
    let skylab = sample_project("Skylab")?;
    ctx.projects.insert(&apollo).await?;
    ctx.projects.insert(&skylab).await?;

    let by_description = ctx
        .projects
        .list(&ProjectFilter::new().with_search("LUNAR"))
        .await?;

    assert_eq!(by_description.len(), 1);
    let hit = by_description.first().ok_or("expected one search hit")?;
    assert_eq!(hit.project.id(), apollo.id());
    Ok(())
}

#[rstest]
#[tokio::test]
async fn missing_project_lookup_reports_not_found(
    #[future] prepared_repos: Result<PreparedRepos, BoxError>,
) -> Result<(), BoxError> {
    let ctx = prepared_repos.await?;

    let result = ctx.projects.get(ProjectId::new()).await;

    assert!(result.as_ref().is_err_and(RepositoryError::is_not_found));
    Ok(())
}

#[rstest]
#[tokio::test]
async fn count_tracks_inserts(
    #[future] prepared_repos: Result<PreparedRepos, BoxError>,
) -> Result<(), BoxError> {
    let ctx = prepared_repos.await?;
    assert_eq!(ctx.projects.count().await?, 0);

    ctx.projects.insert(&sample_project("Apollo")?).await?;

    assert_eq!(ctx.projects.count().await?, 1);
    Ok(())
}

#[rstest]
#[tokio::test]
async fn task_round_trips_through_storage(
    #[future] prepared_repos: Result<PreparedRepos, BoxError>,
) -> Result<(), BoxError> {
    let ctx = prepared_repos.await?;
    let project = sample_project("Apollo")?;
    ctx.projects.insert(&project).await?;
    let deadline = Utc
        .with_ymd_and_hms(2030, 6, 15, 9, 0, 0)
        .single()
        .ok_or("valid deadline timestamp")?;
    let task = sample_task(&project, "Stack the rocket", TaskStatus::InProgress, Some(deadline))?;

    ctx.tasks.insert(&task).await?;
    let fetched = ctx.tasks.get(task.id()).await?;

    assert_eq!(fetched.id(), task.id());
    assert_eq!(fetched.project_id(), project.id());
    assert_eq!(fetched.title().as_str(), "Stack the rocket");
    assert_eq!(fetched.status(), TaskStatus::InProgress);
    assert_eq!(fetched.deadline(), Some(deadline));
    Ok(())
}

#[rstest]
#[tokio::test]
async fn task_update_persists_changes(
    #[future] prepared_repos: Result<PreparedRepos, BoxError>,
) -> Result<(), BoxError> {
    let ctx = prepared_repos.await?;
    let project = sample_project("Apollo")?;
    ctx.projects.insert(&project).await?;
    let mut task = sample_task(&project, "Stack the rocket", TaskStatus::Todo, None)?;
    ctx.tasks.insert(&task).await?;

    task.retitle(TaskTitle::new("Stack and inspect the rocket", 255)?, &DefaultClock);
    task.set_status(TaskStatus::Done, &DefaultClock);
    task.set_deadline(Some(DefaultClock.utc()), &DefaultClock);
    ctx.tasks.update(&task).await?;

    let fetched = ctx.tasks.get(task.id()).await?;
    assert_eq!(fetched.title().as_str(), "Stack and inspect the rocket");
    assert_eq!(fetched.status(), TaskStatus::Done);
    assert!(fetched.deadline().is_some());
    Ok(())
}

#[rstest]
#[tokio::test]
async fn task_delete_removes_the_row(
    #[future] prepared_repos: Result<PreparedRepos, BoxError>,
) -> Result<(), BoxError> {
    let ctx = prepared_repos.await?;
    let project = sample_project("Apollo")?;
    ctx.projects.insert(&project).await?;
    let task = sample_task(&project, "Short-lived", TaskStatus::Todo, None)?;
    ctx.tasks.insert(&task).await?;

    ctx.tasks.delete(task.id()).await?;

    let lookup = ctx.tasks.get(task.id()).await;
    assert!(lookup.as_ref().is_err_and(RepositoryError::is_not_found));
    Ok(())
}

#[rstest]
#[tokio::test]
async fn task_listing_filters_by_status_and_orders_by_deadline(
    #[future] prepared_repos: Result<PreparedRepos, BoxError>,
) -> Result<(), BoxError> {
    let ctx = prepared_repos.await?;
    let project = sample_project("Apollo")?;
    ctx.projects.insert(&project).await?;
    let march = Utc.with_ymd_and_hms(2030, 3, 1, 0, 0, 0).single();
    let september = Utc.with_ymd_and_hms(2030, 9, 1, 0, 0, 0).single();
    let soonest = sample_task(&project, "Due in March", TaskStatus::Todo, march)?;
    let filtered = sample_task(&project, "Already done", TaskStatus::Done, march)?;
    let later = sample_task(&project, "Due in September", TaskStatus::Todo, september)?;
    let undated = sample_task(&project, "No deadline", TaskStatus::Todo, None)?;
    for task in [&soonest, &filtered, &later, &undated] {
        ctx.tasks.insert(task).await?;
    }

    let open = ctx
        .tasks
        .list(
            project.id(),
            &TaskFilter::new()
                .with_status(TaskStatus::Todo)
                .sort_by(TaskSort::Deadline),
        )
        .await?;

    // NULL deadlines sort after every concrete one.
    let ids: Vec<_> = open.iter().map(taskforge::domain::Task::id).collect();
    assert_eq!(ids, vec![soonest.id(), later.id(), undated.id()]);
    Ok(())
}

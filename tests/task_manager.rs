mod common;

use cohortdesk::backend::memory::Operation;
use cohortdesk::backend::InMemoryBackend;
use cohortdesk::ui::core::{Action, DashboardStage, TaskManager};
use common::{backend_with_group, roster};
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn test_create_group_reports_success() {
    let backend = InMemoryBackend::logged_in("6446", "Advisor");
    let (mut manager, mut rx) = TaskManager::new();

    manager.spawn_create_group(Arc::new(backend.clone()), "Cheap Tricks".to_string());

    match rx.recv().await {
        Some(Action::GroupCreated(group)) => assert_eq!(group.name, "Cheap Tricks"),
        other => panic!("unexpected action: {:?}", other),
    }
    assert_eq!(backend.call_count(Operation::CreateGroup), 1);
}

#[tokio::test]
async fn test_create_group_reports_server_message() {
    let backend = InMemoryBackend::logged_in("6446", "Advisor");
    backend.fail_next(Operation::CreateGroup, "Database unavailable");
    let (mut manager, mut rx) = TaskManager::new();

    manager.spawn_create_group(Arc::new(backend), "Cheap Tricks".to_string());

    assert_eq!(
        rx.recv().await,
        Some(Action::GroupCreateFailed("Database unavailable".to_string()))
    );
}

#[tokio::test]
async fn test_fetch_groups() {
    let (backend, group) = backend_with_group();
    let (mut manager, mut rx) = TaskManager::new();

    manager.spawn_fetch_groups(Arc::new(backend));

    assert_eq!(rx.recv().await, Some(Action::GroupsLoaded(vec![group])));
}

#[tokio::test(start_paused = true)]
async fn test_add_members_then_cooldown() {
    let (backend, group) = backend_with_group();
    let (mut manager, mut rx) = TaskManager::new();
    let members = roster(2);

    manager.spawn_add_members(
        Arc::new(backend.clone()),
        group.id,
        members.clone(),
        Some(Duration::from_millis(2000)),
    );

    assert_eq!(
        rx.recv().await,
        Some(Action::MembersAdded {
            group_id: group.id,
            members
        })
    );
    let started = tokio::time::Instant::now();
    assert_eq!(rx.recv().await, Some(Action::SelectorCooldownElapsed));
    assert!(started.elapsed() >= Duration::from_millis(2000));
    assert_eq!(backend.group(group.id).map(|g| g.students.len()), Some(2));
}

#[tokio::test]
async fn test_add_members_failure() {
    let (backend, group) = backend_with_group();
    backend.fail_next(Operation::AddMembers, "nope");
    let (mut manager, mut rx) = TaskManager::new();

    manager.spawn_add_members(Arc::new(backend), group.id, roster(1), None);

    assert_eq!(
        rx.recv().await,
        Some(Action::AddMembersFailed {
            group_id: group.id,
            message: "nope".to_string()
        })
    );
}

#[tokio::test]
async fn test_dashboard_stage_failure_names_stage() {
    let backend = InMemoryBackend::logged_in("6446", "Advisor");
    backend.fail_next(Operation::GetMyWatchlist, "gateway timeout");
    let (mut manager, mut rx) = TaskManager::new();

    manager.spawn_dashboard_stage(Arc::new(backend), DashboardStage::Watchlist);

    assert_eq!(
        rx.recv().await,
        Some(Action::DashboardLoadFailed {
            stage: DashboardStage::Watchlist,
            message: "gateway timeout".to_string()
        })
    );
}

#[tokio::test]
async fn test_finished_tasks_are_cleaned_up() {
    let backend = InMemoryBackend::logged_in("6446", "Advisor");
    let (mut manager, mut rx) = TaskManager::new();

    let id = manager.spawn_dashboard_stage(Arc::new(backend), DashboardStage::Teams);
    assert_eq!(manager.task_count(), 1);
    assert_eq!(manager.running(), ["Load dashboard Teams"]);

    assert!(matches!(rx.recv().await, Some(Action::TeamsLoaded(_))));
    // The send happens just before the task returns
    while manager.cleanup_finished_tasks().is_empty() {
        tokio::task::yield_now().await;
    }
    assert_eq!(manager.task_count(), 0);
    assert!(id > 0);
}

#[tokio::test]
async fn test_drop_cancels_pending_cooldown() {
    let (mut manager, mut rx) = TaskManager::new();
    manager.spawn_cooldown(Duration::from_secs(3600));
    drop(manager);

    assert_eq!(rx.recv().await, None);
}

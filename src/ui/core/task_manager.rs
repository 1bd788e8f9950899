use super::actions::{Action, DashboardStage};
use crate::backend::{DashboardDataSource, GroupId, GroupStore, Student};
use log::{info, warn};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub type TaskId = u64;

#[derive(Debug)]
pub struct BackgroundTask {
    pub id: TaskId,
    pub handle: JoinHandle<()>,
    pub description: String,
    pub started_at: Instant,
}

/// Runs collaborator calls off the UI loop.
///
/// Every spawned task reports back by sending exactly one completion
/// [`Action`] (two for an add-members call with a cooldown) over the channel
/// returned from [`TaskManager::new`]. Nothing here touches view state.
pub struct TaskManager {
    tasks: HashMap<TaskId, BackgroundTask>,
    next_task_id: TaskId,
    action_sender: mpsc::UnboundedSender<Action>,
}

impl TaskManager {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Action>) {
        let (tx, rx) = mpsc::unbounded_channel();

        (
            Self {
                tasks: HashMap::new(),
                next_task_id: 1,
                action_sender: tx,
            },
            rx,
        )
    }

    fn track<F>(&mut self, description: String, future: F) -> TaskId
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let task_id = self.next_task_id;
        self.next_task_id += 1;

        let task = BackgroundTask {
            id: task_id,
            handle: tokio::spawn(future),
            description,
            started_at: Instant::now(),
        };

        self.tasks.insert(task_id, task);
        task_id
    }

    /// Create a group with an already validated name
    pub fn spawn_create_group(&mut self, store: Arc<dyn GroupStore>, name: String) -> TaskId {
        let action_sender = self.action_sender.clone();
        let description = format!("Create group '{}'", name);

        self.track(description, async move {
            let action = match store.create_group(&name).await {
                Ok(group) => {
                    info!("Created group '{}' ({})", group.name, group.id);
                    Action::GroupCreated(group)
                }
                Err(e) => {
                    warn!("Failed to create group '{}': {}", name, e);
                    Action::GroupCreateFailed(e.server_message().to_string())
                }
            };
            let _ = action_sender.send(action);
        })
    }

    /// Fetch the advisor's groups for the list-view selector
    pub fn spawn_fetch_groups(&mut self, store: Arc<dyn GroupStore>) -> TaskId {
        let action_sender = self.action_sender.clone();

        self.track("Fetch my groups".to_string(), async move {
            let action = match store.get_my_groups().await {
                Ok(groups) => Action::GroupsLoaded(groups),
                Err(e) => {
                    warn!("Failed to fetch groups: {}", e);
                    Action::ShowError(e.server_message().to_string())
                }
            };
            let _ = action_sender.send(action);
        })
    }

    /// Add students to a group, then hold the selector busy for `cooldown` if given
    pub fn spawn_add_members(
        &mut self,
        store: Arc<dyn GroupStore>,
        group_id: GroupId,
        members: Vec<Student>,
        cooldown: Option<Duration>,
    ) -> TaskId {
        let action_sender = self.action_sender.clone();
        let description = format!("Add {} students to group {}", members.len(), group_id);

        self.track(description, async move {
            let action = match store.add_members_to_group(group_id, &members).await {
                Ok(()) => {
                    info!("Added {} students to group {}", members.len(), group_id);
                    Action::MembersAdded { group_id, members }
                }
                Err(e) => {
                    warn!("Failed to add students to group {}: {}", group_id, e);
                    Action::AddMembersFailed {
                        group_id,
                        message: e.server_message().to_string(),
                    }
                }
            };
            let _ = action_sender.send(action);

            if let Some(cooldown) = cooldown {
                tokio::time::sleep(cooldown).await;
                let _ = action_sender.send(Action::SelectorCooldownElapsed);
            }
        })
    }

    /// Hold the selector busy for `cooldown` when no call was needed
    pub fn spawn_cooldown(&mut self, cooldown: Duration) -> TaskId {
        let action_sender = self.action_sender.clone();

        self.track("Selector cooldown".to_string(), async move {
            tokio::time::sleep(cooldown).await;
            let _ = action_sender.send(Action::SelectorCooldownElapsed);
        })
    }

    /// Run one stage of the dashboard chain; the next stage is requested by the dashboard itself
    pub fn spawn_dashboard_stage(&mut self, source: Arc<dyn DashboardDataSource>, stage: DashboardStage) -> TaskId {
        let action_sender = self.action_sender.clone();
        let description = format!("Load dashboard {:?}", stage);

        self.track(description, async move {
            let result = match stage {
                DashboardStage::Teams => source.get_teams().await.map(Action::TeamsLoaded),
                DashboardStage::Cohorts => source.get_my_cohorts().await.map(Action::CohortsLoaded),
                DashboardStage::Watchlist => source.get_my_watchlist().await.map(Action::WatchlistLoaded),
            };
            let action = result.unwrap_or_else(|e| {
                warn!("Dashboard stage {:?} failed: {}", stage, e);
                Action::DashboardLoadFailed {
                    stage,
                    message: e.server_message().to_string(),
                }
            });
            let _ = action_sender.send(action);
        })
    }

    /// Drop bookkeeping for finished tasks; returns their ids
    pub fn cleanup_finished_tasks(&mut self) -> Vec<TaskId> {
        let finished: Vec<TaskId> = self
            .tasks
            .iter()
            .filter(|(_, task)| task.handle.is_finished())
            .map(|(id, _)| *id)
            .collect();

        for task_id in &finished {
            self.tasks.remove(task_id);
        }

        finished
    }

    /// Descriptions of running tasks, oldest first
    pub fn running(&self) -> Vec<String> {
        let mut tasks: Vec<&BackgroundTask> = self.tasks.values().collect();
        tasks.sort_by_key(|task| task.id);
        tasks.iter().map(|task| task.description.clone()).collect()
    }

    /// Cancel all running tasks
    pub fn cancel_all_tasks(&mut self) {
        for (_, task) in self.tasks.drain() {
            task.handle.abort();
        }
    }

    /// Get the number of active tasks
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }
}

impl Drop for TaskManager {
    fn drop(&mut self) {
        // Cancel all tasks when the manager is dropped
        self.cancel_all_tasks();
    }
}

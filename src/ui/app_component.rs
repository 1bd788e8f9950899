use crate::backend::{DashboardDataSource, GroupStore, InMemoryBackend, SessionInfo};
use crate::config::Config;
use crate::constants::{SUCCESS_GROUP_CREATED, SUCCESS_MEMBERS_ADDED};
use crate::logger::Logger;
use crate::ui::components::{Dashboard, GroupCreationDialog, GroupSelector, SelectorVariant};
use crate::ui::core::{
    actions::{Action, DashboardStage},
    notifications::{Notification, NotificationBus},
    task_manager::TaskManager,
    Component,
};
use crate::ui::layout::LayoutManager;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::mpsc;

/// The collaborators the UI layer talks to
#[derive(Clone)]
pub struct Services {
    pub groups: Arc<dyn GroupStore>,
    pub dashboard: Arc<dyn DashboardDataSource>,
    pub session: Arc<dyn SessionInfo>,
}

impl Services {
    /// Use one in-memory backend for every collaborator
    pub fn in_memory(backend: InMemoryBackend) -> Self {
        Self {
            groups: Arc::new(backend.clone()),
            dashboard: Arc::new(backend.clone()),
            session: Arc::new(backend),
        }
    }
}

pub struct AppComponent {
    // Component composition
    dialog: GroupCreationDialog,
    selector: GroupSelector,
    dashboard: Dashboard,

    // Services
    services: Services,
    bus: NotificationBus,
    task_manager: TaskManager,
    background_action_rx: mpsc::UnboundedReceiver<Action>,
    logger: Logger,

    // Simple UI state
    should_quit: bool,
    status_message: Option<String>,
}

impl AppComponent {
    pub fn new(services: Services, variant: SelectorVariant, bus: NotificationBus, logger: Logger) -> Self {
        let (task_manager, background_action_rx) = TaskManager::new();
        let selector = GroupSelector::new(variant, &bus);
        let dashboard = Dashboard::new(services.session.as_ref(), &bus);

        Self {
            dialog: GroupCreationDialog::new(),
            selector,
            dashboard,
            services,
            bus,
            task_manager,
            background_action_rx,
            logger,
            should_quit: false,
            status_message: None,
        }
    }

    pub fn from_config(services: Services, config: &Config, logger: Logger) -> Self {
        Self::new(services, config.selector_variant(), NotificationBus::new(), logger)
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn dialog(&self) -> &GroupCreationDialog {
        &self.dialog
    }

    pub fn selector(&self) -> &GroupSelector {
        &self.selector
    }

    pub fn selector_mut(&mut self) -> &mut GroupSelector {
        &mut self.selector
    }

    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    pub fn bus(&self) -> &NotificationBus {
        &self.bus
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    /// Get the number of active background tasks
    pub fn active_task_count(&self) -> usize {
        self.task_manager.task_count()
    }

    /// Kick off the dashboard chain
    pub fn start(&mut self) {
        self.logger.log("AppComponent: starting dashboard load".to_string());
        let action = self.dashboard.init();
        // No requests while logged out; the list view would fetch its groups
        if !self.dashboard.state().is_authenticated && matches!(self.selector.variant(), SelectorVariant::Inline { .. }) {
            self.selector.initialize(Vec::new(), self.services.session.as_ref());
        }
        self.dispatch(action);
    }

    /// Run `action` and every follow-up it produces, in order
    pub fn dispatch(&mut self, action: Action) {
        let mut queue = VecDeque::from([action]);
        while let Some(action) = queue.pop_front() {
            let follow_up = self.route(action);
            if follow_up != Action::None {
                queue.push_back(follow_up);
            }
            for action in self.selector.poll_notifications() {
                queue.push_back(action);
            }
            // The roster mirrors the watchlist
            for sid in self.dashboard.poll_notifications() {
                self.selector.remove_student(&sid);
            }
        }
    }

    fn route(&mut self, action: Action) -> Action {
        match action {
            Action::None => Action::None,
            Action::Quit => {
                self.logger.log("AppComponent: quit requested".to_string());
                self.should_quit = true;
                Action::None
            }
            Action::ShowError(message) => {
                self.logger.log(format!("AppComponent: error: {}", message));
                self.status_message = Some(message);
                Action::None
            }

            // Requests
            Action::CreateGroup { name } => {
                self.task_manager.spawn_create_group(self.services.groups.clone(), name);
                Action::None
            }
            Action::LoadMyGroups => {
                self.task_manager.spawn_fetch_groups(self.services.groups.clone());
                Action::None
            }
            Action::AddMembers {
                group_id,
                members,
                cooldown,
            } => {
                self.task_manager
                    .spawn_add_members(self.services.groups.clone(), group_id, members, cooldown);
                Action::None
            }
            Action::StartSelectorCooldown(cooldown) => {
                self.task_manager.spawn_cooldown(cooldown);
                Action::None
            }
            Action::LoadTeams => self.spawn_stage(DashboardStage::Teams),
            Action::LoadMyCohorts => self.spawn_stage(DashboardStage::Cohorts),
            Action::LoadMyWatchlist => self.spawn_stage(DashboardStage::Watchlist),

            // Completions
            Action::OpenCreateGroupDialog => self.dialog.update(Action::OpenCreateGroupDialog),
            Action::GroupCreated(group) => {
                self.logger
                    .log(format!("{}: '{}' ({})", SUCCESS_GROUP_CREATED, group.name, group.id));
                self.status_message = Some(format!("{}: {}", SUCCESS_GROUP_CREATED, group.name));
                self.dialog.update(Action::GroupCreated(group.clone()));
                self.bus.publish(Notification::GroupCreated { group });
                Action::None
            }
            action @ Action::GroupCreateFailed(_) => self.dialog.update(action),
            Action::MembersAdded { group_id, members } => {
                self.logger.log(format!(
                    "{}: {} to group {}",
                    SUCCESS_MEMBERS_ADDED,
                    members.len(),
                    group_id
                ));
                self.status_message = Some(SUCCESS_MEMBERS_ADDED.to_string());
                self.selector.update(Action::MembersAdded { group_id, members })
            }
            action @ (Action::GroupsLoaded(_) | Action::AddMembersFailed { .. } | Action::SelectorCooldownElapsed) => {
                self.selector.update(action)
            }
            Action::WatchlistLoaded(watchlist) => {
                let follow_up = self.selector.initialize(watchlist.clone(), self.services.session.as_ref());
                self.dashboard.update(Action::WatchlistLoaded(watchlist));
                follow_up
            }
            action @ (Action::TeamsLoaded(_) | Action::CohortsLoaded(_) | Action::DashboardLoadFailed { .. }) => {
                self.dashboard.update(action)
            }
        }
    }

    fn spawn_stage(&mut self, stage: DashboardStage) -> Action {
        self.task_manager
            .spawn_dashboard_stage(self.services.dashboard.clone(), stage);
        Action::None
    }

    /// Apply every completion that has already arrived, without waiting
    pub fn process_background_actions(&mut self) {
        while let Ok(action) = self.background_action_rx.try_recv() {
            self.dispatch(action);
        }
        // Notifications published by other parts of the process
        self.dispatch(Action::None);
        self.task_manager.cleanup_finished_tasks();
    }

    /// Wait for the next completion and apply it; returns what was applied
    pub async fn process_next_background_action(&mut self) -> Option<Action> {
        let action = self.background_action_rx.recv().await?;
        self.dispatch(action.clone());
        Some(action)
    }
}

impl Component for AppComponent {
    fn handle_key_events(&mut self, key: KeyEvent) -> Action {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Action::Quit;
        }
        if self.dialog.is_visible() {
            return self.dialog.handle_key_events(key);
        }

        match key.code {
            KeyCode::Char('q') => Action::Quit,
            KeyCode::Char('n') => Action::OpenCreateGroupDialog,
            KeyCode::Char('x') => {
                let reset = match self.selector.variant() {
                    SelectorVariant::Inline { .. } => Notification::ResetCuratedCohortSelector,
                    SelectorVariant::ListView => Notification::ResetStudentGroupsSelector,
                };
                self.bus.publish(reset);
                Action::None
            }
            _ => self.selector.handle_key_events(key),
        }
    }

    fn update(&mut self, action: Action) -> Action {
        self.dispatch(action);
        Action::None
    }

    fn render(&mut self, f: &mut Frame, rect: Rect) {
        let areas = LayoutManager::main_layout(rect);
        self.dashboard.render(f, areas.dashboard);
        self.selector.render(f, areas.roster);

        let status = match (&self.status_message, self.task_manager.task_count()) {
            (Some(message), 0) => message.clone(),
            (Some(message), n) => format!("{} | {} running", message, n),
            (None, 0) => "n: new group  space: select  a: all  tab: groups  enter: add  q: quit".to_string(),
            (None, n) => format!("{} running", n),
        };
        f.render_widget(
            Paragraph::new(status).style(Style::default().fg(Color::Gray)),
            areas.status,
        );

        self.dialog.render(f, rect);
    }
}

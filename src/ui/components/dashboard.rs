//! Advisor dashboard: teams, saved cohorts and the watchlist.
//!
//! The three fetches form a strict chain. Each completion requests the next
//! stage, so a stage never starts before the previous one has resolved.

use crate::backend::{Cohort, SessionInfo, Team, WatchlistEntry};
use crate::constants::{ALERT_LOGIN_FAILED, ERROR_DASHBOARD_LOAD_FAILED, LOADING_TEXT};
use crate::ui::core::notifications::{Notification, NotificationBus, NotificationKind};
use crate::ui::core::{actions::Action, Component};
use crossterm::event::KeyEvent;
use log::{info, warn};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};
use tokio::sync::mpsc;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DashboardViewState {
    pub is_authenticated: bool,
    pub teams: Option<Vec<Team>>,
    pub my_cohorts: Option<Vec<Cohort>>,
    pub my_watchlist: Option<Vec<WatchlistEntry>>,
    pub is_loading: bool,
    pub alert_message: Option<String>,
    pub error_message: Option<String>,
}

pub struct Dashboard {
    state: DashboardViewState,
    notifications: mpsc::UnboundedReceiver<Notification>,
}

impl Dashboard {
    pub fn new(session: &dyn SessionInfo, bus: &NotificationBus) -> Self {
        let notifications = bus.subscribe(
            "dashboard",
            &[NotificationKind::DevAuthFailure, NotificationKind::WatchlistRemoval],
        );
        Self {
            state: DashboardViewState {
                is_authenticated: session.is_authenticated_user(),
                is_loading: true,
                ..Default::default()
            },
            notifications,
        }
    }

    pub fn state(&self) -> &DashboardViewState {
        &self.state
    }

    /// Start the fetch chain, or settle immediately when nobody is logged in.
    pub fn init(&mut self) -> Action {
        if self.state.is_authenticated {
            self.state.is_loading = true;
            Action::LoadTeams
        } else {
            info!("Dashboard: not authenticated, skipping data load");
            self.state.is_loading = false;
            Action::None
        }
    }

    /// Apply one notification; returns the `sid` it removed from the watchlist, if any.
    pub fn handle_notification(&mut self, notification: Notification) -> Option<String> {
        match notification {
            Notification::DevAuthFailure => {
                self.state.alert_message = Some(ALERT_LOGIN_FAILED.to_string());
                None
            }
            Notification::WatchlistRemoval { sid } => {
                let watchlist = self.state.my_watchlist.as_mut()?;
                let before = watchlist.len();
                watchlist.retain(|entry| entry.sid != sid);
                (watchlist.len() < before).then_some(sid)
            }
            _ => None,
        }
    }

    /// Drain queued notifications; returns the removed watchlist `sid`s.
    pub fn poll_notifications(&mut self) -> Vec<String> {
        let mut removed = Vec::new();
        while let Ok(notification) = self.notifications.try_recv() {
            removed.extend(self.handle_notification(notification));
        }
        removed
    }
}

impl Component for Dashboard {
    fn handle_key_events(&mut self, _key: KeyEvent) -> Action {
        Action::None
    }

    fn update(&mut self, action: Action) -> Action {
        match action {
            Action::TeamsLoaded(teams) => {
                self.state.teams = Some(teams);
                Action::LoadMyCohorts
            }
            Action::CohortsLoaded(cohorts) => {
                self.state.my_cohorts = Some(cohorts);
                Action::LoadMyWatchlist
            }
            Action::WatchlistLoaded(watchlist) => {
                info!("Dashboard: loaded {} watchlist entries", watchlist.len());
                self.state.my_watchlist = Some(watchlist);
                self.state.is_loading = false;
                Action::None
            }
            Action::DashboardLoadFailed { stage, message } => {
                warn!("Dashboard: {:?} stage failed, stopping: {}", stage, message);
                self.state.error_message = Some(format!("{}: {}", ERROR_DASHBOARD_LOAD_FAILED, message));
                self.state.is_loading = false;
                Action::None
            }
            other => other,
        }
    }

    fn render(&mut self, f: &mut Frame, rect: Rect) {
        let block = Block::default().borders(Borders::ALL).title("Dashboard");
        let inner = block.inner(rect);
        f.render_widget(block, rect);

        let mut header = Vec::new();
        if let Some(alert) = &self.state.alert_message {
            header.push(Line::styled(alert.as_str(), Style::default().fg(Color::Red)));
        }
        if let Some(error) = &self.state.error_message {
            header.push(Line::styled(error.as_str(), Style::default().fg(Color::Red)));
        }
        if !self.state.is_authenticated {
            header.push(Line::raw("Please log in."));
        } else if self.state.is_loading {
            header.push(Line::raw(LOADING_TEXT));
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(header.len() as u16),
                Constraint::Percentage(40),
                Constraint::Min(0),
            ])
            .split(inner);
        f.render_widget(Paragraph::new(header), chunks[0]);

        let teams: Vec<ListItem> = self
            .state
            .teams
            .iter()
            .flatten()
            .map(|team| ListItem::new(format!("{} ({})", team.name, team.code)))
            .collect();
        f.render_widget(List::new(teams).block(Block::default().title("Teams")), chunks[1]);

        let cohorts: Vec<ListItem> = self
            .state
            .my_cohorts
            .iter()
            .flatten()
            .map(|cohort| ListItem::new(format!("{} - {} students", cohort.name, cohort.total_student_count)))
            .collect();
        f.render_widget(List::new(cohorts).block(Block::default().title("My Cohorts")), chunks[2]);
    }
}

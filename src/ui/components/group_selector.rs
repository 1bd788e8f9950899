//! Multi-select roster with a bulk "add to group" action.
//!
//! Each roster entry carries a checkbox. The aggregate "select all" checkbox
//! and the visibility of the group menu are never stored independently; they
//! are recomputed from the entries after every mutation, so:
//!
//! - `select_all` holds iff the roster is non-empty and every entry is selected
//! - `show_bulk_menu` holds iff `select_all` holds or at least one entry is selected
//!
//! Two variants share the logic. [`SelectorVariant::Inline`] takes its groups
//! from the session and stays busy for a cooldown after every bulk add.
//! [`SelectorVariant::ListView`] fetches its groups and resets immediately.

use crate::backend::{Group, GroupId, SessionInfo, Student};
use crate::constants::{ERROR_ADD_MEMBERS_FAILED, LOADING_TEXT};
use crate::ui::core::notifications::{Notification, NotificationBus, NotificationKind};
use crate::ui::core::{actions::Action, Component};
use crossterm::event::{KeyCode, KeyEvent};
use log::{debug, info, warn};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};
use std::time::Duration;
use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorVariant {
    /// Roster embedded in a page; groups come from the session
    Inline { cooldown: Duration },
    /// Stand-alone list view; groups are fetched on init
    ListView,
}

impl SelectorVariant {
    fn reset_kind(&self) -> NotificationKind {
        match self {
            SelectorVariant::Inline { .. } => NotificationKind::ResetCuratedCohortSelector,
            SelectorVariant::ListView => NotificationKind::ResetStudentGroupsSelector,
        }
    }

    fn subscriber_name(&self) -> &'static str {
        match self {
            SelectorVariant::Inline { .. } => "curated-cohort-selector",
            SelectorVariant::ListView => "student-groups-selector",
        }
    }
}

/// Aggregate checkbox state derived from the roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionState {
    #[default]
    NoneSelected,
    SomeSelected,
    AllSelected,
}

/// Derived view state. Recomputed, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelectorViewState {
    pub select_all: bool,
    pub show_bulk_menu: bool,
    pub is_saving: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RosterEntry {
    pub student: Student,
    pub selected_for_bulk_action: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupChip {
    pub group: Group,
    pub selected: bool,
}

pub struct GroupSelector {
    variant: SelectorVariant,
    entries: Vec<RosterEntry>,
    groups: Vec<GroupChip>,
    selection: SelectionState,
    view: SelectorViewState,
    is_loading: bool,
    error_message: Option<String>,
    notifications: mpsc::UnboundedReceiver<Notification>,
    cursor: usize,
    chip_cursor: Option<usize>,
    list_state: ListState,
    // Cooldown timers still running; only the last one to elapse releases the selector
    pending_cooldowns: usize,
    // Requested but unconfirmed additions, already reflected in the group cache
    pending_adds: Vec<(GroupId, Vec<String>)>,
}

impl GroupSelector {
    pub fn new(variant: SelectorVariant, bus: &NotificationBus) -> Self {
        let notifications = bus.subscribe(
            variant.subscriber_name(),
            &[NotificationKind::GroupCreated, variant.reset_kind()],
        );
        Self {
            variant,
            entries: Vec::new(),
            groups: Vec::new(),
            selection: SelectionState::NoneSelected,
            view: SelectorViewState::default(),
            is_loading: true,
            error_message: None,
            notifications,
            cursor: 0,
            chip_cursor: None,
            list_state: ListState::default(),
            pending_cooldowns: 0,
            pending_adds: Vec::new(),
        }
    }

    /// Take ownership of the page's roster with every checkbox cleared and load groups.
    pub fn initialize(&mut self, students: Vec<Student>, session: &dyn SessionInfo) -> Action {
        self.entries = students
            .into_iter()
            .map(|student| RosterEntry {
                student,
                selected_for_bulk_action: false,
            })
            .collect();
        self.cursor = 0;
        self.chip_cursor = None;
        self.error_message = None;
        self.recompute();

        match self.variant {
            SelectorVariant::Inline { .. } => {
                let groups = session.current_user().map(|me| me.my_groups).unwrap_or_default();
                self.set_groups(groups);
                self.is_loading = false;
                Action::None
            }
            SelectorVariant::ListView => {
                self.is_loading = true;
                Action::LoadMyGroups
            }
        }
    }

    pub fn variant(&self) -> SelectorVariant {
        self.variant
    }

    pub fn entries(&self) -> &[RosterEntry] {
        &self.entries
    }

    pub fn students(&self) -> impl Iterator<Item = &Student> {
        self.entries.iter().map(|e| &e.student)
    }

    pub fn groups(&self) -> &[GroupChip] {
        &self.groups
    }

    pub fn selection_state(&self) -> SelectionState {
        self.selection
    }

    pub fn view_state(&self) -> SelectorViewState {
        self.view
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn selected_count(&self) -> usize {
        self.entries.iter().filter(|e| e.selected_for_bulk_action).count()
    }

    fn set_groups(&mut self, groups: Vec<Group>) {
        self.groups = groups
            .into_iter()
            .map(|group| GroupChip { group, selected: false })
            .collect();
    }

    /// Re-derive the aggregate state from the roster.
    fn recompute(&mut self) {
        // `all` stops at the first unselected entry
        let all_selected = !self.entries.is_empty() && self.entries.iter().all(|e| e.selected_for_bulk_action);
        self.selection = if all_selected {
            SelectionState::AllSelected
        } else if self.entries.iter().any(|e| e.selected_for_bulk_action) {
            SelectionState::SomeSelected
        } else {
            SelectionState::NoneSelected
        };
        self.view.select_all = self.selection == SelectionState::AllSelected;
        self.view.show_bulk_menu = self.view.select_all || self.selection == SelectionState::SomeSelected;
    }

    pub fn toggle_item(&mut self, index: usize) {
        if let Some(entry) = self.entries.get_mut(index) {
            entry.selected_for_bulk_action = !entry.selected_for_bulk_action;
            self.recompute();
        }
    }

    /// Set every checkbox to `value`, or flip the aggregate checkbox when `None`.
    pub fn toggle_all(&mut self, value: Option<bool>) {
        let selected = value.unwrap_or(!self.view.select_all);
        for entry in &mut self.entries {
            entry.selected_for_bulk_action = selected;
        }
        self.recompute();
    }

    fn clear_selection(&mut self) {
        self.toggle_all(Some(false));
    }

    /// Highlight the chip at `index` and add the selection to its group.
    pub fn pick_group(&mut self, index: usize) -> Action {
        let Some(chip) = self.groups.get_mut(index) else {
            return Action::None;
        };
        chip.selected = true;
        let group_id = chip.group.id;
        self.assign_selected_to(group_id)
    }

    /// Add every selected student that is not yet a member of `group_id`.
    ///
    /// Students already in the group are filtered out by `sid`. Requested
    /// students count as members as soon as the request is issued, so
    /// repeating the action with the same selection issues no second call
    /// even before the first one resolves.
    pub fn assign_selected_to(&mut self, group_id: GroupId) -> Action {
        let group = self.groups.iter().find(|chip| chip.group.id == group_id).map(|chip| &chip.group);
        let members: Vec<Student> = self
            .entries
            .iter()
            .filter(|e| e.selected_for_bulk_action)
            .filter(|e| group.map_or(true, |g| !g.contains(&e.student.sid)))
            .map(|e| e.student.clone())
            .collect();

        let cooldown = match self.variant {
            SelectorVariant::Inline { cooldown } => Some(cooldown),
            SelectorVariant::ListView => None,
        };

        let action = if members.is_empty() {
            debug!("GroupSelector: nothing to add to group {}", group_id);
            match cooldown {
                Some(cooldown) => {
                    self.view.is_saving = true;
                    self.pending_cooldowns += 1;
                    Action::StartSelectorCooldown(cooldown)
                }
                None => Action::None,
            }
        } else {
            info!("GroupSelector: adding {} students to group {}", members.len(), group_id);
            self.view.is_saving = true;
            if cooldown.is_some() {
                self.pending_cooldowns += 1;
            }
            if let Some(chip) = self.groups.iter_mut().find(|chip| chip.group.id == group_id) {
                chip.group.add_members(&members);
            }
            self.pending_adds
                .push((group_id, members.iter().map(|m| m.sid.clone()).collect()));
            Action::AddMembers {
                group_id,
                members,
                cooldown,
            }
        };

        // Regardless of the outcome of the call
        for chip in &mut self.groups {
            chip.selected = false;
        }
        self.chip_cursor = None;
        if self.variant == SelectorVariant::ListView {
            self.clear_selection();
        }

        action
    }

    fn take_pending(&mut self, group_id: GroupId) -> Option<Vec<String>> {
        let index = self.pending_adds.iter().position(|(id, _)| *id == group_id)?;
        Some(self.pending_adds.remove(index).1)
    }

    fn on_members_added(&mut self, group_id: GroupId, members: &[Student]) {
        self.take_pending(group_id);
        if let Some(chip) = self.groups.iter_mut().find(|chip| chip.group.id == group_id) {
            chip.group.add_members(members);
        }
        self.clear_selection();
        if self.variant == SelectorVariant::ListView {
            self.view.is_saving = false;
        }
    }

    /// Drop the additions the server rejected from the group cache.
    fn on_members_failed(&mut self, group_id: GroupId) {
        let Some(sids) = self.take_pending(group_id) else {
            return;
        };
        if let Some(chip) = self.groups.iter_mut().find(|chip| chip.group.id == group_id) {
            chip.group.students.retain(|s| !sids.contains(&s.sid));
        }
    }

    fn on_cooldown_elapsed(&mut self) {
        self.pending_cooldowns = self.pending_cooldowns.saturating_sub(1);
        if self.pending_cooldowns > 0 {
            debug!("GroupSelector: {} cooldowns still running", self.pending_cooldowns);
            return;
        }
        self.clear_selection();
        self.view.is_saving = false;
    }

    /// Drop the student with `sid` from the roster.
    pub fn remove_student(&mut self, sid: &str) {
        let before = self.entries.len();
        self.entries.retain(|e| e.student.sid != sid);
        if self.entries.len() == before {
            return;
        }
        debug!("GroupSelector: removed {} from the roster", sid);
        self.cursor = self.cursor.min(self.entries.len().saturating_sub(1));
        self.recompute();
    }

    fn on_group_created(&mut self, group: Group) -> Action {
        let group_id = group.id;
        if !self.groups.iter().any(|chip| chip.group.id == group_id) {
            self.groups.push(GroupChip { group, selected: false });
        }
        self.assign_selected_to(group_id)
    }

    /// Apply one notification and return the follow-up action.
    pub fn handle_notification(&mut self, notification: Notification) -> Action {
        match notification {
            Notification::GroupCreated { group } => self.on_group_created(group),
            Notification::ResetCuratedCohortSelector | Notification::ResetStudentGroupsSelector => {
                self.clear_selection();
                Action::None
            }
            _ => Action::None,
        }
    }

    /// Drain queued notifications.
    pub fn poll_notifications(&mut self) -> Vec<Action> {
        let mut actions = Vec::new();
        while let Ok(notification) = self.notifications.try_recv() {
            let action = self.handle_notification(notification);
            if action != Action::None {
                actions.push(action);
            }
        }
        actions
    }

    fn move_cursor(&mut self, down: bool) {
        if self.entries.is_empty() {
            return;
        }
        self.cursor = if down {
            (self.cursor + 1) % self.entries.len()
        } else {
            (self.cursor + self.entries.len() - 1) % self.entries.len()
        };
    }

    fn next_chip(&mut self) {
        if self.groups.is_empty() || !self.view.show_bulk_menu {
            return;
        }
        self.chip_cursor = Some(match self.chip_cursor {
            Some(i) => (i + 1) % self.groups.len(),
            None => 0,
        });
    }

    fn render_groups(&self, f: &mut Frame, rect: Rect) {
        let mut spans = vec![Span::raw(if self.view.select_all { "[x] All  " } else { "[ ] All  " })];
        if self.view.is_saving {
            spans.push(Span::styled("Saving...", Style::default().fg(Color::Yellow)));
        } else if self.view.show_bulk_menu {
            spans.push(Span::raw("Add to: "));
            for (i, chip) in self.groups.iter().enumerate() {
                let mut style = Style::default().fg(Color::Cyan);
                if self.chip_cursor == Some(i) || chip.selected {
                    style = style.add_modifier(Modifier::REVERSED);
                }
                spans.push(Span::styled(format!(" {} ", chip.group.name), style));
                spans.push(Span::raw(" "));
            }
        }
        let mut lines = vec![Line::from(spans)];
        if let Some(message) = &self.error_message {
            lines.push(Line::styled(message.as_str(), Style::default().fg(Color::Red)));
        }
        f.render_widget(Paragraph::new(lines), rect);
    }
}

impl Component for GroupSelector {
    fn handle_key_events(&mut self, key: KeyEvent) -> Action {
        if self.view.is_saving {
            return Action::None;
        }
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.move_cursor(false);
                Action::None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.move_cursor(true);
                Action::None
            }
            KeyCode::Char(' ') => {
                self.toggle_item(self.cursor);
                Action::None
            }
            KeyCode::Char('a') => {
                self.toggle_all(None);
                Action::None
            }
            KeyCode::Tab => {
                self.next_chip();
                Action::None
            }
            KeyCode::Enter => match self.chip_cursor {
                Some(index) => self.pick_group(index),
                None => Action::None,
            },
            _ => Action::None,
        }
    }

    fn update(&mut self, action: Action) -> Action {
        match action {
            Action::GroupsLoaded(groups) => {
                self.set_groups(groups);
                self.is_loading = false;
                Action::None
            }
            Action::MembersAdded { group_id, members } => {
                self.on_members_added(group_id, &members);
                Action::None
            }
            Action::AddMembersFailed { group_id, message } => {
                warn!("GroupSelector: adding to group {} failed: {}", group_id, message);
                self.error_message = Some(format!("{}: {}", ERROR_ADD_MEMBERS_FAILED, message));
                self.on_members_failed(group_id);
                if self.variant == SelectorVariant::ListView {
                    self.view.is_saving = false;
                }
                Action::None
            }
            Action::SelectorCooldownElapsed => {
                self.on_cooldown_elapsed();
                Action::None
            }
            other => other,
        }
    }

    fn render(&mut self, f: &mut Frame, rect: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!("Students ({} selected)", self.selected_count()));
        let inner = block.inner(rect);
        f.render_widget(block, rect);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(2), Constraint::Min(0)])
            .split(inner);

        if self.is_loading {
            f.render_widget(Paragraph::new(LOADING_TEXT), chunks[0]);
        } else {
            self.render_groups(f, chunks[0]);
        }

        let items: Vec<ListItem> = self
            .entries
            .iter()
            .map(|entry| {
                let checkbox = if entry.selected_for_bulk_action { "[x]" } else { "[ ]" };
                ListItem::new(format!("{} {} ({})", checkbox, entry.student.display_name(), entry.student.sid))
            })
            .collect();
        self.list_state
            .select(if self.entries.is_empty() { None } else { Some(self.cursor) });
        let list = List::new(items).highlight_style(Style::default().add_modifier(Modifier::BOLD).fg(Color::Yellow));
        f.render_stateful_widget(list, chunks[1], &mut self.list_state);
    }
}

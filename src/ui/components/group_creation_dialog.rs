//! Modal dialog for creating a curated group.
//!
//! One text input, validated locally before the create request goes out.
//! A remote failure keeps the dialog open with the name intact; any edit to
//! the name hides the error until the next submit.

use crate::backend::Group;
use crate::constants::{
    DIALOG_TITLE_CREATE_GROUP, ERROR_NAME_REQUIRED, ERROR_NAME_TOO_LONG, ERROR_OPERATION_FAILED_PREFIX,
    GROUP_NAME_MAX_CHARS,
};
use crate::ui::core::{actions::Action, Component};
use crate::ui::layout::LayoutManager;
use crossterm::event::{KeyCode, KeyEvent};
use log::{info, warn};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// Client-side rejection of a group name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{msg}", msg = ERROR_NAME_REQUIRED)]
    Required,
    #[error("{msg}", msg = ERROR_NAME_TOO_LONG)]
    TooLong,
}

/// Error shown inline in the dialog.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GroupFormError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("{prefix} {0}", prefix = ERROR_OPERATION_FAILED_PREFIX)]
    Remote(String),
}

/// Trim `raw` and check it against the group name rules.
pub fn validate_group_name(raw: &str) -> Result<String, ValidationError> {
    let name = raw.trim();
    if name.is_empty() {
        Err(ValidationError::Required)
    } else if name.chars().count() > GROUP_NAME_MAX_CHARS {
        Err(ValidationError::TooLong)
    } else {
        Ok(name.to_string())
    }
}

#[derive(Debug, Default)]
pub struct GroupCreationDialog {
    visible: bool,
    name: String,
    error: Option<GroupFormError>,
    error_hidden: bool,
    is_saving: bool,
}

impl GroupCreationDialog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self) {
        self.visible = true;
        self.name.clear();
        self.error = None;
        self.error_hidden = false;
        self.is_saving = false;
    }

    pub fn cancel(&mut self) {
        self.visible = false;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_saving(&self) -> bool {
        self.is_saving
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The last error, regardless of whether an edit has hidden it.
    pub fn error(&self) -> Option<&GroupFormError> {
        self.error.as_ref()
    }

    pub fn visible_error(&self) -> Option<&GroupFormError> {
        if self.error_hidden {
            None
        } else {
            self.error.as_ref()
        }
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.error_hidden = true;
    }

    pub fn input_char(&mut self, c: char) {
        self.name.push(c);
        self.error_hidden = true;
    }

    pub fn backspace(&mut self) {
        self.name.pop();
        self.error_hidden = true;
    }

    /// Validate the current name and, if it passes, request creation.
    pub fn submit(&mut self) -> Action {
        if self.is_saving {
            return Action::None;
        }
        self.error_hidden = false;

        match validate_group_name(&self.name) {
            Ok(name) => {
                self.name = name.clone();
                self.error = None;
                self.is_saving = true;
                info!("GroupCreationDialog: submitting '{}'", name);
                Action::CreateGroup { name }
            }
            Err(e) => {
                self.name = self.name.trim().to_string();
                self.error = Some(e.into());
                Action::None
            }
        }
    }

    fn on_created(&mut self, group: &Group) {
        info!("GroupCreationDialog: group '{}' created, closing", group.name);
        self.is_saving = false;
        self.visible = false;
    }

    fn on_failed(&mut self, message: String) {
        warn!("GroupCreationDialog: create failed: {}", message);
        self.error = Some(GroupFormError::Remote(message));
        self.error_hidden = false;
        self.is_saving = false;
    }
}

impl Component for GroupCreationDialog {
    fn handle_key_events(&mut self, key: KeyEvent) -> Action {
        if !self.visible {
            return Action::None;
        }
        match key.code {
            KeyCode::Enter => self.submit(),
            KeyCode::Esc => {
                self.cancel();
                Action::None
            }
            KeyCode::Backspace => {
                self.backspace();
                Action::None
            }
            KeyCode::Char(c) => {
                self.input_char(c);
                Action::None
            }
            _ => Action::None,
        }
    }

    fn update(&mut self, action: Action) -> Action {
        match action {
            Action::OpenCreateGroupDialog => {
                self.open();
                Action::None
            }
            Action::GroupCreated(group) => {
                self.on_created(&group);
                Action::None
            }
            Action::GroupCreateFailed(message) => {
                self.on_failed(message);
                Action::None
            }
            other => other,
        }
    }

    fn render(&mut self, f: &mut Frame, rect: Rect) {
        if !self.visible {
            return;
        }
        let area = LayoutManager::centered_rect(60, 30, rect);
        f.render_widget(Clear, area);

        let input = if self.name.is_empty() {
            Line::styled("Group name", Style::default().fg(Color::DarkGray))
        } else {
            Line::raw(self.name.as_str())
        };
        let mut lines = vec![input, Line::raw("")];

        if let Some(error) = self.visible_error() {
            lines.push(Line::styled(error.to_string(), Style::default().fg(Color::Red)));
        }
        let footer = if self.is_saving {
            "Saving..."
        } else {
            "Press Enter to create, Esc to cancel"
        };
        lines.push(Line::styled(footer, Style::default().fg(Color::Yellow)));

        let paragraph = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(DIALOG_TITLE_CREATE_GROUP)
                    .title_alignment(Alignment::Center),
            )
            .alignment(Alignment::Left);
        f.render_widget(paragraph, area);
    }
}

//! Layout calculations for the terminal screen

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Screen areas used by the app component
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MainAreas {
    pub dashboard: Rect,
    pub roster: Rect,
    pub status: Rect,
}

pub struct LayoutManager;

impl LayoutManager {
    /// Dashboard on the left, roster on the right, one status line below
    #[must_use]
    pub fn main_layout(area: Rect) -> MainAreas {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(area);

        // Dashboard: 1/3 of width, at most 40 columns
        let dashboard_width = std::cmp::min(rows[0].width / 3, 40);
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(dashboard_width), Constraint::Min(0)])
            .split(rows[0]);

        MainAreas {
            dashboard: columns[0],
            roster: columns[1],
            status: rows[1],
        }
    }

    /// Calculate a centered rectangle within the given area
    #[must_use]
    pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
        let popup_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Percentage((100 - percent_y) / 2),
                Constraint::Percentage(percent_y),
                Constraint::Percentage((100 - percent_y) / 2),
            ])
            .split(r);

        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage((100 - percent_x) / 2),
                Constraint::Percentage(percent_x),
                Constraint::Percentage((100 - percent_x) / 2),
            ])
            .split(popup_layout[1])[1]
    }
}

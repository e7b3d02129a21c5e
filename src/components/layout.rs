//! Layout calculations for the UI

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Main screen layout areas
pub struct MainLayout {
    pub list: Rect,
    pub detail: Rect,
    pub status: Rect,
    pub help: Rect,
}

/// Calculate centered popup area
pub fn centered_popup(area: Rect, width: u16, height: u16) -> Rect {
    let popup_x = area.x + (area.width.saturating_sub(width)) / 2;
    let popup_y = area.y + (area.height.saturating_sub(height)) / 2;

    Rect::new(
        popup_x,
        popup_y,
        width.min(area.width),
        height.min(area.height),
    )
}

/// Calculate main screen layout: feed list | note detail, then status and help bars
pub fn calculate_main_layout(area: Rect) -> MainLayout {
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(3),
        ])
        .split(area);

    let horizontal_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(main_chunks[0]);

    MainLayout {
        list: horizontal_chunks[0],
        detail: horizontal_chunks[1],
        status: main_chunks[1],
        help: main_chunks[2],
    }
}

/// Bottom-right corner box for toasts, sitting just above `anchor`
pub fn toast_area(area: Rect, anchor: Rect, width: u16) -> Rect {
    let width = width.min(area.width);
    let height = 3.min(anchor.y.saturating_sub(area.y));
    Rect::new(
        area.x + area.width - width,
        anchor.y.saturating_sub(height),
        width,
        height,
    )
}

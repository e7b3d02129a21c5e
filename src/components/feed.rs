//! Feed component - Main application screen
//!
//! Displays the note list, the selected note, a status line with zap
//! progress, and the key help bar. Owns list navigation state.

use crate::action::Action;
use crate::component::Component;
use crate::components::layout::{calculate_main_layout, toast_area};
use crate::model::note::{short_key, truncate_to_width};
use crate::model::toast::{Toast, ToastKind};
use crate::model::Note;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, LineGauge, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

const TOAST_WIDTH: u16 = 40;

// ═══════════════════════════════════════════════════════════════════════════════
// Feed Component
// ═══════════════════════════════════════════════════════════════════════════════

/// Note list with a single selection
#[derive(Default)]
pub struct FeedComponent {
    pub list_state: ListState,
}

impl FeedComponent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_selected_note<'a>(&self, notes: &'a [Note]) -> Option<&'a Note> {
        self.list_state.selected().and_then(|i| notes.get(i))
    }

    pub fn next(&mut self, notes: &[Note]) {
        if notes.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) if i + 1 < notes.len() => i + 1,
            Some(_) => 0,
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn previous(&mut self, notes: &[Note]) {
        if notes.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(0) | None => notes.len() - 1,
            Some(i) => i - 1,
        };
        self.list_state.select(Some(i));
    }

    pub fn select_first(&mut self, notes: &[Note]) {
        if notes.is_empty() {
            self.list_state.select(None);
        } else {
            self.list_state.select(Some(0));
        }
    }

    pub fn select_last(&mut self, notes: &[Note]) {
        if notes.is_empty() {
            self.list_state.select(None);
        } else {
            self.list_state.select(Some(notes.len() - 1));
        }
    }

    /// Keep the selection on the same note after the list changed
    pub fn select_by_id(&mut self, notes: &[Note], id: &str) {
        match notes.iter().position(|n| n.id == id) {
            Some(i) => self.list_state.select(Some(i)),
            None => self.select_first(notes),
        }
    }
}

impl Component for FeedComponent {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Action::ForceQuit)
            }
            KeyCode::Char('j') | KeyCode::Down => Some(Action::NextNote),
            KeyCode::Char('k') | KeyCode::Up => Some(Action::PrevNote),
            KeyCode::Char('g') | KeyCode::Home => Some(Action::FirstNote),
            KeyCode::Char('G') | KeyCode::End => Some(Action::LastNote),
            KeyCode::Char('z') | KeyCode::Enter => Some(Action::OpenZapDialog),
            KeyCode::Char('r') => Some(Action::ReloadFeed),
            KeyCode::Char('?') => Some(Action::OpenHelp),
            KeyCode::Char('q') | KeyCode::Esc => Some(Action::OpenQuitDialog),
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, _frame: &mut Frame, _area: Rect) -> Result<()> {
        // Drawing is done through draw_feed_screen which takes full context
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Rendering Functions
// ═══════════════════════════════════════════════════════════════════════════════

/// Context needed for rendering the feed screen
pub struct FeedRenderContext<'a> {
    pub notes: &'a [Note],
    pub account_name: &'a str,
    pub backend_name: &'a str,
    /// Progress of the latest zap, 0.0 when idle or failed
    pub zap_progress: f32,
    pub zaps_in_flight: usize,
    pub toast: Option<&'a Toast>,
    pub error: Option<&'a str>,
    pub status_message: Option<&'a str>,
}

/// Draw the feed screen
pub fn draw_feed_screen(
    frame: &mut Frame,
    area: Rect,
    feed: &mut FeedComponent,
    ctx: &FeedRenderContext,
) -> Result<()> {
    let layout = calculate_main_layout(area);

    render_note_list(frame, layout.list, feed, ctx.notes);
    render_note_detail(frame, layout.detail, feed.get_selected_note(ctx.notes));
    render_status_bar(frame, layout.status, ctx);
    render_help_bar(frame, layout.help);

    if let Some(toast) = ctx.toast {
        render_toast(frame, toast_area(area, layout.status, TOAST_WIDTH), toast);
    }
    Ok(())
}

fn render_note_list(frame: &mut Frame, area: Rect, feed: &mut FeedComponent, notes: &[Note]) {
    let name_width = area.width.saturating_sub(16) as usize;

    let items: Vec<ListItem> = notes
        .iter()
        .map(|note| {
            let zaps = if note.zap_total_sats > 0 {
                format!(" ⚡{}", note.zap_total_sats)
            } else {
                String::new()
            };
            ListItem::new(vec![
                Line::from(vec![
                    Span::styled(
                        truncate_to_width(&note.display_author(), name_width),
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(zaps, Style::default().fg(Color::Yellow)),
                ]),
                Line::from(Span::styled(
                    note.preview(area.width.saturating_sub(6) as usize),
                    Style::default().fg(Color::White),
                )),
            ])
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Feed ({}) ", notes.len()))
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▶ ");

    frame.render_stateful_widget(list, area, &mut feed.list_state);
}

fn render_note_detail(frame: &mut Frame, area: Rect, note: Option<&Note>) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Note ")
        .border_style(Style::default().fg(Color::DarkGray));

    let Some(note) = note else {
        let paragraph = Paragraph::new(Line::from(Span::styled(
            "No notes in feed",
            Style::default().fg(Color::DarkGray),
        )))
        .block(block);
        frame.render_widget(paragraph, area);
        return;
    };

    let mut lines = vec![
        Line::from(vec![
            Span::styled(
                note.display_author(),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  {}", short_key(&note.author)),
                Style::default().fg(Color::DarkGray),
            ),
        ]),
        Line::from(Span::styled(
            note.formatted_time(),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(Span::styled(
            "─".repeat(area.width.saturating_sub(2) as usize),
            Style::default().fg(Color::DarkGray),
        )),
    ];
    lines.extend(note.content.lines().map(|l| Line::from(l.to_string())));
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("⚡ ", Style::default().fg(Color::Yellow)),
        Span::styled(
            format!("{} sats", note.zap_total_sats),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
    ]));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn render_status_bar(frame: &mut Frame, area: Rect, ctx: &FeedRenderContext) {
    let show_progress = ctx.zaps_in_flight > 0 || ctx.zap_progress > 0.0;
    let (text_area, gauge_area) = if show_progress {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(30)])
            .split(area);
        (chunks[0], Some(chunks[1]))
    } else {
        (area, None)
    };

    let mut spans = vec![
        Span::styled(
            format!(" {} ", ctx.account_name),
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(
            format!(" {} ", ctx.backend_name),
            Style::default()
                .fg(Color::Black)
                .bg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
    ];

    if let Some(error) = ctx.error {
        spans.push(Span::styled(
            format!(" Error: {} ", error),
            Style::default().fg(Color::Red),
        ));
    } else if let Some(status) = ctx.status_message {
        spans.push(Span::styled(
            format!(" {} ", status),
            Style::default().fg(Color::Yellow),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), text_area);

    if let Some(gauge_area) = gauge_area {
        let gauge = LineGauge::default()
            .label(format!("⚡ {}", ctx.zaps_in_flight))
            .filled_style(Style::default().fg(Color::Yellow))
            .unfilled_style(Style::default().fg(Color::DarkGray))
            .ratio(f64::from(ctx.zap_progress.clamp(0.0, 1.0)));
        frame.render_widget(gauge, gauge_area);
    }
}

fn render_toast(frame: &mut Frame, area: Rect, toast: &Toast) {
    if area.height == 0 {
        return;
    }
    let color = match toast.kind {
        ToastKind::Info => Color::Cyan,
        ToastKind::Success => Color::Green,
        ToastKind::Error => Color::Red,
    };
    let text = truncate_to_width(&toast.message, area.width.saturating_sub(4) as usize);

    frame.render_widget(Clear, area);
    let paragraph = Paragraph::new(Line::from(Span::styled(
        text,
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color)),
    );
    frame.render_widget(paragraph, area);
}

fn render_help_bar(frame: &mut Frame, area: Rect) {
    let help_spans = vec![
        Span::styled(
            " q ",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("Quit "),
        Span::styled(
            " j/k ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("Move "),
        Span::styled(
            " z ",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("Zap "),
        Span::styled(
            " r ",
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("Reload "),
        Span::styled(
            " ? ",
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("Help"),
    ];

    let paragraph = Paragraph::new(Line::from(help_spans))
        .block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .alignment(ratatui::layout::Alignment::Left);
    frame.render_widget(paragraph, area);
}

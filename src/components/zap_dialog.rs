//! Custom zap dialog component
//!
//! Three focusable sections:
//! 1. Amount in sats (free text, validated on the fly)
//! 2. Zap type spinner (public, private, anonymous, non-zap)
//! 3. Message (free text; label depends on the zap type)
//!
//! Enter submits when the amount parses, otherwise it does nothing.

use crate::action::Action;
use crate::component::Component;
use crate::components::centered_popup;
use crate::model::note::truncate_to_width;
use crate::model::{Account, Note, NoteRef, ZapOptions, ZapRequest, ZapType};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthChar;

const AMOUNT_LABEL: &str = "Amount in Sats";
const AMOUNT_PLACEHOLDER: &str = "100, 1000, 5000";
const ZAP_TYPE_LABEL: &str = "Zap Type";
const MESSAGE_PLACEHOLDER: &str = "Thank you for all your work!";

const DIALOG_WIDTH: u16 = 64;
const DIALOG_HEIGHT: u16 = 20;

/// Focused section of the zap dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ZapField {
    #[default]
    Amount,
    ZapType,
    Message,
}

impl ZapField {
    fn next(&self) -> ZapField {
        match self {
            ZapField::Amount => ZapField::ZapType,
            ZapField::ZapType => ZapField::Message,
            ZapField::Message => ZapField::Amount,
        }
    }

    fn prev(&self) -> ZapField {
        match self {
            ZapField::Amount => ZapField::Message,
            ZapField::ZapType => ZapField::Amount,
            ZapField::Message => ZapField::ZapType,
        }
    }
}

/// Note the dialog was opened for
#[derive(Debug, Clone)]
struct ZapTarget {
    note: NoteRef,
    author: String,
    preview: String,
}

/// Custom zap dialog
#[derive(Default)]
pub struct ZapCustomDialog {
    /// Amount and message as typed
    pub options: ZapOptions,
    /// Currently selected zap type
    pub zap_type: ZapType,
    /// The account's default, shown as the spinner placeholder
    pub default_zap_type: ZapType,
    pub focus: ZapField,
    target: Option<ZapTarget>,
}

impl ZapCustomDialog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepare a fresh dialog for zapping `note` from `account`
    pub fn open(&mut self, account: &Account, note: &Note) {
        self.options = ZapOptions::new();
        self.zap_type = account.default_zap_type;
        self.default_zap_type = account.default_zap_type;
        self.focus = ZapField::Amount;
        self.target = Some(ZapTarget {
            note: note.note_ref(),
            author: note.display_author(),
            preview: note.preview(40),
        });
    }

    pub fn select_zap_type(&mut self, zap_type: ZapType) {
        self.zap_type = zap_type;
    }

    pub fn message_label(&self) -> &'static str {
        self.zap_type.message_label()
    }

    pub fn can_submit(&self) -> bool {
        self.target.is_some() && self.options.can_submit()
    }

    /// The request to send, read once from the current fields
    pub fn submission(&self) -> Option<ZapRequest> {
        let target = self.target.as_ref()?;
        let amount_millisats = self.options.amount_millisats()?;
        Some(ZapRequest {
            note: target.note.clone(),
            amount_millisats,
            invoice: None,
            message: self.options.message_text().to_string(),
            zap_type: self.zap_type,
        })
    }

    fn handle_text_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('u') && key.modifiers.contains(KeyModifiers::CONTROL) {
            match self.focus {
                ZapField::Amount => self.options.set_amount_text(""),
                ZapField::Message => self.options.set_message_text(""),
                ZapField::ZapType => {}
            }
            return;
        }
        if key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
        {
            return;
        }
        match (self.focus, key.code) {
            (ZapField::Amount, KeyCode::Char(c)) => self.options.push_amount_char(c),
            (ZapField::Amount, KeyCode::Backspace) => self.options.pop_amount_char(),
            (ZapField::Message, KeyCode::Char(c)) => self.options.push_message_char(c),
            (ZapField::Message, KeyCode::Backspace) => self.options.pop_message_char(),
            _ => {}
        }
    }

    fn handle_spinner_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.zap_type = self.zap_type.prev(),
            KeyCode::Down | KeyCode::Char('j') | KeyCode::Char(' ') => {
                self.zap_type = self.zap_type.next()
            }
            KeyCode::Char(c @ '1'..='4') => {
                let index = c as usize - '1' as usize;
                self.select_zap_type(ZapType::all()[index]);
            }
            _ => {}
        }
    }

    fn section_header_style(&self, field: ZapField) -> Style {
        if self.focus == field {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        }
    }

    fn text_field_line(&self, field: ZapField, value: &str, placeholder: &str, width: usize) -> Line<'static> {
        let focused = self.focus == field;
        let prefix = if focused { "▶ " } else { "  " };

        if value.is_empty() {
            let cursor = if focused { "_" } else { "" };
            return Line::from(vec![
                Span::raw(format!(" {}", prefix)),
                Span::styled(cursor.to_string(), Style::default().fg(Color::Yellow)),
                Span::styled(placeholder.to_string(), Style::default().fg(Color::DarkGray)),
            ]);
        }

        let shown = if focused {
            format!("{}_", tail_to_width(value, width.saturating_sub(1)))
        } else {
            truncate_to_width(value, width)
        };
        let style = if focused {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        Line::from(vec![Span::raw(format!(" {}", prefix)), Span::styled(shown, style)])
    }

    pub fn draw_dialog(&self, frame: &mut Frame, area: Rect) {
        let popup_area = centered_popup(area, DIALOG_WIDTH, DIALOG_HEIGHT);
        frame.render_widget(Clear, popup_area);

        let field_width = popup_area.width.saturating_sub(6) as usize;
        let mut content = vec![Line::from("")];

        if let Some(ref target) = self.target {
            content.push(Line::from(vec![
                Span::styled("To: ", Style::default().fg(Color::DarkGray)),
                Span::styled(
                    target.author.clone(),
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
            ]));
            content.push(Line::from(Span::styled(
                format!("    {}", target.preview),
                Style::default().fg(Color::DarkGray),
            )));
        }
        content.push(Line::from(""));

        // Amount
        content.push(Line::from(Span::styled(
            format!("─ {} ─", AMOUNT_LABEL),
            self.section_header_style(ZapField::Amount),
        )));
        content.push(self.text_field_line(
            ZapField::Amount,
            self.options.amount_text(),
            AMOUNT_PLACEHOLDER,
            field_width,
        ));
        content.push(Line::from(""));

        // Zap type spinner
        content.push(Line::from(Span::styled(
            format!("─ {} ─", ZAP_TYPE_LABEL),
            self.section_header_style(ZapField::ZapType),
        )));
        let spinner_prefix = if self.focus == ZapField::ZapType { "▶ " } else { "  " };
        let mut spinner = vec![Span::raw(format!(" {}", spinner_prefix))];
        for (i, zap_type) in ZapType::all().iter().enumerate() {
            let selected = *zap_type == self.zap_type;
            let style = if selected {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            spinner.push(Span::styled(format!("{}", i + 1), Style::default().fg(Color::Magenta)));
            spinner.push(Span::styled(format!(" {} ", zap_type.label()), style));
            spinner.push(Span::raw(" "));
        }
        content.push(Line::from(spinner));
        let mut explainer = self.zap_type.explainer().to_string();
        if self.zap_type == self.default_zap_type {
            explainer.push_str(" (default)");
        }
        content.push(Line::from(Span::styled(
            format!("    {}", truncate_to_width(&explainer, field_width)),
            Style::default().fg(Color::DarkGray),
        )));
        content.push(Line::from(""));

        // Message
        content.push(Line::from(Span::styled(
            format!("─ {} ─", self.message_label()),
            self.section_header_style(ZapField::Message),
        )));
        content.push(self.text_field_line(
            ZapField::Message,
            self.options.message_text(),
            MESSAGE_PLACEHOLDER,
            field_width,
        ));
        content.push(Line::from(""));

        // Zap button
        let button_style = if self.can_submit() {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Black).bg(Color::DarkGray)
        };
        let mut button_line = vec![Span::raw(" "), Span::styled(" ⚡Zap ", button_style)];
        if let Some(sats) = self.options.parsed_amount() {
            button_line.push(Span::styled(
                format!("  {} sats", sats),
                Style::default().fg(Color::Yellow),
            ));
        }
        content.push(Line::from(button_line));
        content.push(Line::from(""));

        content.push(Line::from(vec![
            Span::styled(
                " Tab ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("Switch  "),
            Span::styled(
                " ↑/↓ ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("Zap type  "),
            Span::styled(
                " Enter ",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("Zap  "),
            Span::styled(
                " Esc ",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Span::raw("Cancel"),
        ]));

        let paragraph = Paragraph::new(content).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow))
                .title(" ⚡ Custom Zap ")
                .title_style(
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                ),
        );

        frame.render_widget(paragraph, popup_area);
    }
}

/// Keep the end of `text` so it fits in `max_width` columns
fn tail_to_width(text: &str, max_width: usize) -> String {
    let mut used = 0;
    let mut kept: Vec<char> = Vec::new();
    for c in text.chars().rev() {
        let w = c.width().unwrap_or(0);
        if used + w > max_width {
            break;
        }
        used += w;
        kept.push(c);
    }
    kept.into_iter().rev().collect()
}

impl Component for ZapCustomDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Esc => {
                self.options.cancel();
                Some(Action::CloseModal)
            }
            KeyCode::Enter => self.submission().map(Action::SubmitZap),
            KeyCode::Tab => {
                self.focus = self.focus.next();
                None
            }
            KeyCode::BackTab => {
                self.focus = self.focus.prev();
                None
            }
            _ => {
                match self.focus {
                    ZapField::ZapType => self.handle_spinner_key(key),
                    ZapField::Amount | ZapField::Message => self.handle_text_key(key),
                }
                None
            }
        };
        Ok(action)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        self.draw_dialog(frame, area);
        Ok(())
    }
}

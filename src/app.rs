//! Root application component
//!
//! The App struct implements the Component trait, acting as the root component
//! that delegates event handling and rendering to child components.
//! It owns the feed, the zap runner, and the toast queue; zap events are
//! drained on every tick.

use crate::action::Action;
use crate::component::Component;
use crate::components::{
    draw_feed_screen, FeedComponent, FeedRenderContext, HelpDialog, QuitDialog, ZapCustomDialog,
};
use crate::config::Config;
use crate::model::modal::{Modal, ModalStack};
use crate::model::{Note, ToastKind, ToastQueue, ZapEvent};
use crate::services::{self, JobId, PaymentBackend, ZapRunner};
use anyhow::Result;
use crossterm::event::KeyEvent;
use ratatui::{layout::Rect, Frame};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

/// A dispatched zap waiting for its outcome
#[derive(Debug, Clone)]
struct PendingZap {
    note_id: String,
    amount_sats: u64,
    progress: f32,
}

// ═══════════════════════════════════════════════════════════════════════════════
// App State
// ═══════════════════════════════════════════════════════════════════════════════

/// Main application state
pub struct App {
    pub config: Config,

    /// Notes shown in the feed, newest first
    pub notes: Vec<Note>,

    /// Modal overlay stack
    pub modals: ModalStack,

    /// Background zap runner
    pub zapper: ZapRunner,

    /// Progress of the most recently dispatched zap still in flight, or 0
    pub zap_progress: f32,

    pending_zaps: HashMap<JobId, PendingZap>,

    pub toasts: ToastQueue,

    /// Flag to indicate the app should quit
    pub should_quit: bool,

    /// Error message to display
    pub error: Option<String>,

    /// Status message to display
    pub status_message: Option<String>,

    // ─────────────────────────────────────────────────────────────────────────
    // Child Components
    // ─────────────────────────────────────────────────────────────────────────
    pub feed: FeedComponent,
    pub quit_dialog: QuitDialog,
    pub zap_dialog: ZapCustomDialog,
    pub help_dialog: HelpDialog,
}

// ═══════════════════════════════════════════════════════════════════════════════
// App Implementation
// ═══════════════════════════════════════════════════════════════════════════════

impl App {
    /// Create the app from the config file, writing a default one on first run
    pub fn new() -> App {
        let (config, config_error) = match Config::load() {
            Ok(Some(config)) => (config, None),
            Ok(None) => {
                let config = Config::default();
                if let Err(e) = config.save() {
                    tracing::warn!(error = %format!("{:#}", e), "could not write default config");
                }
                (config, None)
            }
            Err(e) => {
                tracing::warn!(error = %format!("{:#}", e), "falling back to default config");
                (Config::default(), Some(format!("{:#}", e)))
            }
        };

        let backend = services::build_backend(&config.backend);
        let mut app = Self::with_parts(config, Vec::new(), backend);
        app.reload_feed();
        if app.error.is_none() {
            app.error = config_error;
        }
        app
    }

    /// Assemble an app from already loaded parts
    pub fn with_parts(config: Config, notes: Vec<Note>, backend: Arc<dyn PaymentBackend>) -> App {
        let mut feed = FeedComponent::new();
        feed.select_first(&notes);

        App {
            config,
            notes,
            modals: ModalStack::new(),
            zapper: ZapRunner::new(backend),
            zap_progress: 0.0,
            pending_zaps: HashMap::new(),
            toasts: ToastQueue::new(),
            should_quit: false,
            error: None,
            status_message: None,
            // Components
            feed,
            quit_dialog: QuitDialog::default(),
            zap_dialog: ZapCustomDialog::new(),
            help_dialog: HelpDialog::default(),
        }
    }

    /// Get the currently selected note (delegates to feed component)
    pub fn get_selected_note(&self) -> Option<&Note> {
        self.feed.get_selected_note(&self.notes)
    }

    /// Re-read the feed, keeping the selection on the same note when possible
    fn reload_feed(&mut self) {
        let selected_id = self.get_selected_note().map(|n| n.id.clone());

        match self.config.feed_path.as_deref() {
            None => {
                self.notes = services::sample_feed();
                self.status_message = Some("No feed configured, showing sample notes".to_string());
            }
            Some(path) => match services::load_feed(path) {
                Ok(notes) => {
                    tracing::info!(path, count = notes.len(), "feed loaded");
                    self.status_message = Some(format!("Loaded {} notes", notes.len()));
                    self.notes = notes;
                    self.error = None;
                }
                Err(e) => {
                    tracing::warn!(path, error = %format!("{:#}", e), "feed load failed");
                    self.error = Some(format!("{:#}", e));
                }
            },
        }

        match selected_id {
            Some(id) => self.feed.select_by_id(&self.notes, &id),
            None => self.feed.select_first(&self.notes),
        }
    }

    fn open_zap_dialog(&mut self) {
        let Some(note) = self.get_selected_note().cloned() else {
            self.status_message = Some("No note selected".to_string());
            return;
        };
        self.zap_dialog.open(&self.config.account, &note);
        self.modals.push(Modal::ZapCustom);
    }

    /// Drain zap events from the runner and apply them in arrival order
    fn poll_zaps(&mut self) {
        for (job, event) in self.zapper.poll() {
            match event {
                ZapEvent::Progress(fraction) => {
                    if let Some(pending) = self.pending_zaps.get_mut(&job) {
                        pending.progress = fraction;
                    }
                }
                ZapEvent::Failed(message) => {
                    self.pending_zaps.remove(&job);
                    self.toasts.push(message, ToastKind::Error);
                }
                ZapEvent::Completed => {
                    if let Some(pending) = self.pending_zaps.remove(&job) {
                        if let Some(note) = self.notes.iter_mut().find(|n| n.id == pending.note_id) {
                            note.zap_total_sats =
                                note.zap_total_sats.saturating_add(pending.amount_sats);
                        }
                        self.toasts.push(
                            format!("Zapped {} sats", pending.amount_sats),
                            ToastKind::Success,
                        );
                    }
                }
            }
        }

        self.refresh_zap_progress();

        if self.zapper.active_jobs() == 0 && self.status_message_is_zapping() {
            self.status_message = None;
        }
    }

    fn refresh_zap_progress(&mut self) {
        self.zap_progress = self
            .pending_zaps
            .iter()
            .max_by_key(|(job, _)| **job)
            .map_or(0.0, |(_, pending)| pending.progress);
    }

    fn status_message_is_zapping(&self) -> bool {
        self.status_message
            .as_deref()
            .is_some_and(|s| s.starts_with("Zapping"))
    }

    fn handle_modal_key_event(&mut self, modal: &Modal, key: KeyEvent) -> Result<Option<Action>> {
        match modal {
            Modal::QuitConfirm => self.quit_dialog.handle_key_event(key),
            Modal::ZapCustom => self.zap_dialog.handle_key_event(key),
            Modal::Help => self.help_dialog.handle_key_event(key),
        }
    }

    fn draw_modal(&mut self, frame: &mut Frame, area: Rect, modal: &Modal) -> Result<()> {
        match modal {
            Modal::QuitConfirm => self.quit_dialog.draw(frame, area)?,
            Modal::ZapCustom => self.zap_dialog.draw(frame, area)?,
            Modal::Help => self.help_dialog.draw(frame, area)?,
        }
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Component Implementation
// ═══════════════════════════════════════════════════════════════════════════════

impl Component for App {
    fn init(&mut self) -> Result<()> {
        tracing::info!(
            notes = self.notes.len(),
            backend = self.zapper.backend_name(),
            account = %self.config.account.display_name,
            "app started"
        );
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.modals.is_empty() {
            return self.feed.handle_key_event(key);
        }
        match self.modals.top().cloned() {
            Some(modal) => self.handle_modal_key_event(&modal, key),
            None => Ok(None),
        }
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            // ─────────────────────────────────────────────────────────────────
            // App Lifecycle
            // ─────────────────────────────────────────────────────────────────
            Action::Tick => {
                self.poll_zaps();
                if !self.toasts.is_empty() {
                    self.toasts.expire(Instant::now());
                }
            }
            Action::ForceQuit => {
                self.should_quit = true;
            }
            Action::Resize(_, _) => {}

            // ─────────────────────────────────────────────────────────────────
            // Feed Navigation (delegate to FeedComponent)
            // ─────────────────────────────────────────────────────────────────
            Action::NextNote => self.feed.next(&self.notes),
            Action::PrevNote => self.feed.previous(&self.notes),
            Action::FirstNote => self.feed.select_first(&self.notes),
            Action::LastNote => self.feed.select_last(&self.notes),
            Action::ReloadFeed => {
                self.reload_feed();
                if self.error.is_none() {
                    self.toasts
                        .push(format!("{} notes", self.notes.len()), ToastKind::Info);
                }
            }

            // ─────────────────────────────────────────────────────────────────
            // Modals
            // ─────────────────────────────────────────────────────────────────
            Action::OpenQuitDialog => {
                self.quit_dialog.zaps_in_flight = self.zapper.active_jobs();
                self.modals.push(Modal::QuitConfirm);
            }
            Action::OpenHelp => {
                self.help_dialog.scroll_offset = 0;
                self.modals.push(Modal::Help);
            }
            Action::CloseModal => {
                self.modals.pop();
            }
            Action::ConfirmModal => {
                if let Some(Modal::QuitConfirm) = self.modals.top() {
                    if self.zapper.active_jobs() > 0 {
                        tracing::warn!(
                            in_flight = self.zapper.active_jobs(),
                            "quitting with zaps still in flight"
                        );
                    }
                    self.should_quit = true;
                }
            }

            // ─────────────────────────────────────────────────────────────────
            // Zaps
            // ─────────────────────────────────────────────────────────────────
            Action::OpenZapDialog => self.open_zap_dialog(),
            Action::SubmitZap(request) => {
                let pending = PendingZap {
                    note_id: request.note.id.clone(),
                    amount_sats: request.amount_sats(),
                    progress: 0.0,
                };
                self.status_message = Some(format!("Zapping {} sats…", pending.amount_sats));

                let job = self.zapper.dispatch(request);
                self.pending_zaps.insert(job, pending);
                self.refresh_zap_progress();

                if matches!(self.modals.top(), Some(Modal::ZapCustom)) {
                    self.modals.pop();
                }
            }
        }
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let ctx = FeedRenderContext {
            notes: &self.notes,
            account_name: &self.config.account.display_name,
            backend_name: self.zapper.backend_name(),
            zap_progress: self.zap_progress,
            zaps_in_flight: self.zapper.active_jobs(),
            toast: self.toasts.current(),
            error: self.error.as_deref(),
            status_message: self.status_message.as_deref(),
        };
        draw_feed_screen(frame, area, &mut self.feed, &ctx)?;

        // Draw modal overlay if active
        if let Some(modal) = self.modals.top().cloned() {
            self.draw_modal(frame, area, &modal)?;
        }
        Ok(())
    }
}

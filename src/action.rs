//! Action enum - All possible application actions
//!
//! Actions are discrete operations that the application can perform.
//! Components emit Actions in response to events, and the App processes
//! them to update state.

use crate::model::ZapRequest;
use std::fmt;

/// All possible actions in the application
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // ─────────────────────────────────────────────────────────────────────────
    // App Lifecycle
    // ─────────────────────────────────────────────────────────────────────────
    /// Regular tick; drains zap events and expires toasts
    Tick,
    /// Terminal was resized
    Resize(u16, u16),
    /// Quit without confirmation
    ForceQuit,

    // ─────────────────────────────────────────────────────────────────────────
    // Feed Navigation
    // ─────────────────────────────────────────────────────────────────────────
    NextNote,
    PrevNote,
    FirstNote,
    LastNote,
    /// Reload the feed file from disk
    ReloadFeed,

    // ─────────────────────────────────────────────────────────────────────────
    // Modals
    // ─────────────────────────────────────────────────────────────────────────
    OpenQuitDialog,
    OpenHelp,
    /// Close the top modal
    CloseModal,
    /// Confirm the top modal (quit dialog)
    ConfirmModal,

    // ─────────────────────────────────────────────────────────────────────────
    // Zaps
    // ─────────────────────────────────────────────────────────────────────────
    /// Open the custom zap dialog for the selected note
    OpenZapDialog,
    /// Hand the request to the payment backend and close the dialog
    SubmitZap(ZapRequest),
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Tick => write!(f, "Tick"),
            Action::Resize(w, h) => write!(f, "Resize({}, {})", w, h),
            Action::ForceQuit => write!(f, "ForceQuit"),
            Action::NextNote => write!(f, "NextNote"),
            Action::PrevNote => write!(f, "PrevNote"),
            Action::FirstNote => write!(f, "FirstNote"),
            Action::LastNote => write!(f, "LastNote"),
            Action::ReloadFeed => write!(f, "ReloadFeed"),
            Action::OpenQuitDialog => write!(f, "OpenQuitDialog"),
            Action::OpenHelp => write!(f, "OpenHelp"),
            Action::CloseModal => write!(f, "CloseModal"),
            Action::ConfirmModal => write!(f, "ConfirmModal"),
            Action::OpenZapDialog => write!(f, "OpenZapDialog"),
            Action::SubmitZap(request) => write!(
                f,
                "SubmitZap({} msats, {})",
                request.amount_millisats,
                request.zap_type.as_str()
            ),
        }
    }
}

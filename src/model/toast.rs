//! Short-lived notifications shown over the main screen

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// How long a toast stays visible
pub const TOAST_DURATION: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    pub shown_at: Instant,
}

/// FIFO of pending toasts; the oldest live one is displayed
#[derive(Debug, Default)]
pub struct ToastQueue {
    toasts: VecDeque<Toast>,
}

impl ToastQueue {
    pub fn new() -> Self {
        Self {
            toasts: VecDeque::new(),
        }
    }

    pub fn push(&mut self, message: impl Into<String>, kind: ToastKind) {
        self.push_at(message, kind, Instant::now());
    }

    pub fn push_at(&mut self, message: impl Into<String>, kind: ToastKind, now: Instant) {
        self.toasts.push_back(Toast {
            message: message.into(),
            kind,
            shown_at: now,
        });
    }

    pub fn current(&self) -> Option<&Toast> {
        self.toasts.front()
    }

    /// Drop toasts that have been visible for longer than [`TOAST_DURATION`].
    ///
    /// Only the front toast is on screen, so a queued toast's clock starts
    /// when it reaches the front.
    pub fn expire(&mut self, now: Instant) {
        while let Some(front) = self.toasts.front() {
            if now.saturating_duration_since(front.shown_at) < TOAST_DURATION {
                break;
            }
            self.toasts.pop_front();
            if let Some(next) = self.toasts.front_mut() {
                if next.shown_at < now {
                    next.shown_at = now;
                }
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}

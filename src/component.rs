//! Component trait - Interface for UI components
//!
//! Each component owns its local state, turns key events into Actions,
//! and renders itself. Shared state changes go through Actions.

use crate::action::Action;
use anyhow::Result;
use crossterm::event::KeyEvent;
use ratatui::{layout::Rect, Frame};

/// Trait for UI components
///
/// 1. `handle_key_event` - convert a key press into an optional Action,
///    editing purely local state (e.g. a text field) along the way
/// 2. `update` - react to an Action routed to this component
/// 3. `draw` - render into the given area
pub trait Component {
    /// Called once before the first draw
    fn init(&mut self) -> Result<()> {
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let _ = key;
        Ok(None)
    }

    /// Process an Action; may return a follow-up Action
    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        let _ = action;
        Ok(None)
    }

    /// Render the component. No state changes beyond layout bookkeeping.
    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()>;
}

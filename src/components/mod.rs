//! UI Components
//!
//! Each component encapsulates its own state, event handling, and rendering logic.
//! Components communicate through Actions rather than direct state mutation.

pub mod feed;
pub mod help_dialog;
pub mod layout;
pub mod quit_dialog;
pub mod zap_dialog;

pub use feed::{draw_feed_screen, FeedComponent, FeedRenderContext};
pub use help_dialog::HelpDialog;
pub use layout::centered_popup;
pub use quit_dialog::QuitDialog;
pub use zap_dialog::ZapCustomDialog;

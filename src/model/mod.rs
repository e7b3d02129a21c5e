//! Model layer - centralized state types
//!
//! - `ZapOptions` - text fields of the custom zap dialog
//! - `ZapType`, `ZapRequest`, `ZapEvent` - what gets sent and what comes back
//! - `Note` - feed entries that can be zapped
//! - `ModalStack` - modal overlay management
//! - `ToastQueue` - transient notifications

pub mod account;
pub mod modal;
pub mod note;
pub mod toast;
pub mod zap;
pub mod zap_options;

pub use account::Account;
pub use note::{Note, NoteRef};
pub use toast::{ToastKind, ToastQueue};
pub use zap::{ZapEvent, ZapRequest, ZapType};
pub use zap_options::ZapOptions;

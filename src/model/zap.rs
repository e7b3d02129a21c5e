//! Zap types, requests and the events a running zap reports back

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::note::NoteRef;

/// Disclosure mode of a zap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ZapType {
    /// Everybody sees who zapped and the message
    #[default]
    Public,
    /// Only sender and receiver see each other and the message
    Private,
    /// Receiver and the public don't know who sent it
    Anonymous,
    /// Plain Lightning payment with no Nostr trace
    NonZap,
}

impl ZapType {
    pub fn all() -> [ZapType; 4] {
        [
            ZapType::Public,
            ZapType::Private,
            ZapType::Anonymous,
            ZapType::NonZap,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            ZapType::Public => "Public",
            ZapType::Private => "Private",
            ZapType::Anonymous => "Anonymous",
            ZapType::NonZap => "Non-Zap",
        }
    }

    pub fn explainer(&self) -> &'static str {
        match self {
            ZapType::Public => "Everybody can see the transaction and message",
            ZapType::Private => "Sender and receiver can see each other and read the message",
            ZapType::Anonymous => "Receiver and the public do not know who sent the payment",
            ZapType::NonZap => "No trace in Nostr, only in Lightning",
        }
    }

    /// Label of the message field while this type is selected
    pub fn message_label(&self) -> &'static str {
        match self {
            ZapType::Public | ZapType::Anonymous => "Add a public message",
            ZapType::Private => "Add a private message",
            ZapType::NonZap => "Add an invoice message",
        }
    }

    /// Wire name handed to wallet commands
    pub fn as_str(&self) -> &'static str {
        match self {
            ZapType::Public => "public",
            ZapType::Private => "private",
            ZapType::Anonymous => "anonymous",
            ZapType::NonZap => "nonzap",
        }
    }

    pub fn index(&self) -> usize {
        Self::all().iter().position(|t| t == self).unwrap_or(0)
    }

    pub fn next(&self) -> ZapType {
        let all = Self::all();
        all[(self.index() + 1) % all.len()]
    }

    pub fn prev(&self) -> ZapType {
        let all = Self::all();
        all[(self.index() + all.len() - 1) % all.len()]
    }
}

impl fmt::Display for ZapType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Everything the payment collaborator needs to send one zap
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZapRequest {
    pub note: NoteRef,
    pub amount_millisats: u64,
    /// Pre-fetched bolt11 invoice to pay instead of requesting one
    pub invoice: Option<String>,
    pub message: String,
    pub zap_type: ZapType,
}

impl ZapRequest {
    pub fn amount_sats(&self) -> u64 {
        self.amount_millisats / 1000
    }
}

/// Update reported by a zap running in the background
#[derive(Debug, Clone, PartialEq)]
pub enum ZapEvent {
    /// Fraction of the payment pipeline completed, in `[0, 1]`
    Progress(f32),
    /// The zap failed; message is shown to the user as is
    Failed(String),
    Completed,
}

impl ZapEvent {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ZapEvent::Failed(_) | ZapEvent::Completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_label_per_zap_type() {
        assert_eq!(ZapType::Public.message_label(), "Add a public message");
        assert_eq!(ZapType::Anonymous.message_label(), "Add a public message");
        assert_eq!(ZapType::Private.message_label(), "Add a private message");
        assert_eq!(ZapType::NonZap.message_label(), "Add an invoice message");
    }

    #[test]
    fn test_zap_type_cycles_through_all_variants() {
        let mut zap_type = ZapType::Public;
        let mut seen = vec![];
        for _ in 0..4 {
            seen.push(zap_type);
            zap_type = zap_type.next();
        }
        assert_eq!(seen, ZapType::all().to_vec());
        assert_eq!(zap_type, ZapType::Public);
        assert_eq!(ZapType::Public.prev(), ZapType::NonZap);
    }

    #[test]
    fn test_zap_type_serde_names() {
        let json = serde_json::to_string(&ZapType::NonZap).unwrap();
        assert_eq!(json, "\"NONZAP\"");

        let parsed: ZapType = serde_json::from_str("\"ANONYMOUS\"").unwrap();
        assert_eq!(parsed, ZapType::Anonymous);

        assert!(serde_json::from_str::<ZapType>("\"LOUD\"").is_err());
    }

    #[test]
    fn test_terminal_events() {
        assert!(!ZapEvent::Progress(0.5).is_terminal());
        assert!(ZapEvent::Failed("x".to_string()).is_terminal());
        assert!(ZapEvent::Completed.is_terminal());
    }
}

//! Nostr notes shown in the feed

use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Serialize};
use unicode_width::UnicodeWidthChar;

/// A text note that can be zapped
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    /// Event id (hex)
    pub id: String,
    /// Author public key (hex or npub)
    pub author: String,
    #[serde(default)]
    pub author_name: Option<String>,
    pub content: String,
    /// Unix timestamp in seconds
    pub created_at: i64,
    /// Total sats zapped to this note so far
    #[serde(default)]
    pub zap_total_sats: u64,
}

/// Reference to the zapped note as handed to the payment collaborator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteRef {
    pub id: String,
    pub author: String,
}

impl Note {
    pub fn note_ref(&self) -> NoteRef {
        NoteRef {
            id: self.id.clone(),
            author: self.author.clone(),
        }
    }

    /// Author name if known, otherwise a shortened public key
    pub fn display_author(&self) -> String {
        match &self.author_name {
            Some(name) if !name.is_empty() => name.clone(),
            _ => short_key(&self.author),
        }
    }

    pub fn created_at_local(&self) -> Option<DateTime<Local>> {
        Local.timestamp_opt(self.created_at, 0).single()
    }

    pub fn formatted_time(&self) -> String {
        self.created_at_local()
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "unknown time".to_string())
    }

    /// First line of the content, cut to `max_width` terminal columns
    pub fn preview(&self, max_width: usize) -> String {
        let first_line = self.content.lines().next().unwrap_or("");
        truncate_to_width(first_line, max_width)
    }
}

/// Shorten a long key to `abcdefgh…wxyz`
pub fn short_key(key: &str) -> String {
    if key.chars().count() > 16 {
        let head: String = key.chars().take(8).collect();
        let tail: String = key
            .chars()
            .rev()
            .take(4)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        format!("{}…{}", head, tail)
    } else {
        key.to_string()
    }
}

/// Cut `text` so it occupies at most `max_width` columns, adding `…` when cut
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    let total: usize = text.chars().map(|c| c.width().unwrap_or(0)).sum();
    if total <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > max_width - 1 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

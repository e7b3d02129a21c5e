//! Feed loading

use crate::model::Note;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Accepted feed file shapes: a bare array or `{ "notes": [...] }`
#[derive(Deserialize)]
#[serde(untagged)]
enum FeedFile {
    Notes(Vec<Note>),
    Wrapped { notes: Vec<Note> },
}

/// Load notes from a JSON feed file, newest first
pub fn load_feed<P: AsRef<Path>>(path: P) -> Result<Vec<Note>> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read feed {}", path.display()))?;
    parse_feed(&contents).with_context(|| format!("Failed to parse feed {}", path.display()))
}

pub fn parse_feed(contents: &str) -> Result<Vec<Note>> {
    let file: FeedFile = serde_json::from_str(contents)?;
    let mut notes = match file {
        FeedFile::Notes(notes) => notes,
        FeedFile::Wrapped { notes } => notes,
    };
    sort_newest_first(&mut notes);
    Ok(notes)
}

fn sort_newest_first(notes: &mut [Note]) {
    notes.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
}

/// Notes shown when no feed file is configured
pub fn sample_feed() -> Vec<Note> {
    let mut notes = vec![
        Note {
            id: "5c83da77af1dec6d7289834998ad7aafbd9e2191396d75ec3cc27f5a77226f36".to_string(),
            author: "82341f882b6eabcd2ba7f1ef90aad961cf074af15b9ef44a09f9d2a8fbfbe6a2".to_string(),
            author_name: Some("jack".to_string()),
            content: "running nostr in a terminal now".to_string(),
            created_at: 1_700_003_600,
            zap_total_sats: 2_100,
        },
        Note {
            id: "a3b1c0d6f0e9e3b57ee63a8e5a1fbbd1c1c0e6a1a8c87d4b4b0d2d9d0f3e2c11".to_string(),
            author: "3bf0c63fcb93463407af97a5e5ee64fa883d107ef9e558472c4eb9aaaefa459d".to_string(),
            author_name: Some("fiatjaf".to_string()),
            content: "zaps are just lightning payments with a receipt on nostr.\n\
                      private zaps hide the sender from everyone but the recipient."
                .to_string(),
            created_at: 1_700_000_000,
            zap_total_sats: 21_000,
        },
        Note {
            id: "0f1e2d3c4b5a69788796a5b4c3d2e1f00f1e2d3c4b5a69788796a5b4c3d2e1f0".to_string(),
            author: "npub1sg6plzptd64u62a878hep2kev88swjh3tw00gjsfl8f237lmu63q0uf63m".to_string(),
            author_name: None,
            content: "gm ☀️".to_string(),
            created_at: 1_699_990_000,
            zap_total_sats: 0,
        },
    ];
    sort_newest_first(&mut notes);
    notes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_array_sorted_newest_first() {
        let json = r#"[
            { "id": "old", "author": "a", "content": "first", "created_at": 10 },
            { "id": "new", "author": "b", "content": "second", "created_at": 20, "zap_total_sats": 5 }
        ]"#;
        let notes = parse_feed(json).unwrap();
        assert_eq!(notes.len(), 2);
        assert_eq!(notes[0].id, "new");
        assert_eq!(notes[0].zap_total_sats, 5);
        assert_eq!(notes[1].id, "old");
        assert_eq!(notes[1].author_name, None);
    }

    #[test]
    fn test_parse_wrapped_notes() {
        let json = r#"{ "notes": [ { "id": "x", "author": "a", "author_name": "al", "content": "hi", "created_at": 1 } ] }"#;
        let notes = parse_feed(json).unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].display_author(), "al");
    }

    #[test]
    fn test_load_feed_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("feed.json");
        fs::write(
            &path,
            r#"[{ "id": "x", "author": "a", "content": "hi", "created_at": 1 }]"#,
        )
        .unwrap();

        let notes = load_feed(&path).unwrap();
        assert_eq!(notes[0].content, "hi");
    }

    #[test]
    fn test_load_feed_errors_mention_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");
        let err = load_feed(&path).unwrap_err();
        assert!(err.to_string().contains("missing.json"));

        let bad = dir.path().join("bad.json");
        fs::write(&bad, r#"{ "nodes": [] }"#).unwrap();
        let err = load_feed(&bad).unwrap_err();
        assert!(err.to_string().contains("Failed to parse feed"));
    }

    #[test]
    fn test_sample_feed_is_sorted() {
        let notes = sample_feed();
        assert!(!notes.is_empty());
        assert!(notes.windows(2).all(|w| w[0].created_at >= w[1].created_at));
    }
}

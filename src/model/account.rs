//! The logged-in account as seen by the zap dialog

use super::zap::ZapType;
use serde::{Deserialize, Serialize};

/// Account settings relevant to zapping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Name shown in the header
    #[serde(default)]
    pub display_name: String,
    /// Zap type pre-selected when the custom zap dialog opens
    #[serde(default)]
    pub default_zap_type: ZapType,
}

impl Default for Account {
    fn default() -> Self {
        Self {
            display_name: "anon".to_string(),
            default_zap_type: ZapType::Public,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_use_defaults() {
        let account: Account = serde_json::from_str(r#"{"display_name": "jack"}"#).unwrap();
        assert_eq!(account.display_name, "jack");
        assert_eq!(account.default_zap_type, ZapType::Public);
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let json = r#"{"display_name": "jack", "pubkey": "npub1", "default_zap_type": "ANONYMOUS"}"#;
        let account: Account = serde_json::from_str(json).unwrap();
        assert_eq!(account.default_zap_type, ZapType::Anonymous);
        assert_eq!(
            serde_json::to_value(&account).unwrap(),
            serde_json::json!({"display_name": "jack", "default_zap_type": "ANONYMOUS"})
        );
    }
}

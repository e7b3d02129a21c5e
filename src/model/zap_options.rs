//! Input state for the custom zap dialog
//!
//! Holds the raw amount and message text exactly as typed. Validation is
//! derived on demand and never mutates the fields.

/// Amount pre-filled when the dialog opens
pub const DEFAULT_AMOUNT_TEXT: &str = "21";

/// Millisats per sat
pub const MILLISATS_PER_SAT: u64 = 1000;

/// Editable fields of the custom zap dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZapOptions {
    amount_text: String,
    message_text: String,
}

impl Default for ZapOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl ZapOptions {
    pub fn new() -> Self {
        Self {
            amount_text: DEFAULT_AMOUNT_TEXT.to_string(),
            message_text: String::new(),
        }
    }

    pub fn amount_text(&self) -> &str {
        &self.amount_text
    }

    pub fn message_text(&self) -> &str {
        &self.message_text
    }

    pub fn set_amount_text(&mut self, text: impl Into<String>) {
        self.amount_text = text.into();
    }

    pub fn set_message_text(&mut self, text: impl Into<String>) {
        self.message_text = text.into();
    }

    pub fn push_amount_char(&mut self, c: char) {
        self.amount_text.push(c);
    }

    pub fn pop_amount_char(&mut self) {
        self.amount_text.pop();
    }

    pub fn push_message_char(&mut self, c: char) {
        self.message_text.push(c);
    }

    pub fn pop_message_char(&mut self) {
        self.message_text.pop();
    }

    /// Amount in sats, or `None` when the text is not a non-negative integer.
    ///
    /// Amounts that would overflow once converted to millisats are treated
    /// the same as unparseable text.
    pub fn parsed_amount(&self) -> Option<u64> {
        let sats = self.amount_text.trim().parse::<u64>().ok()?;
        sats.checked_mul(MILLISATS_PER_SAT)?;
        Some(sats)
    }

    pub fn amount_millisats(&self) -> Option<u64> {
        self.parsed_amount().map(|sats| sats * MILLISATS_PER_SAT)
    }

    pub fn can_submit(&self) -> bool {
        self.parsed_amount().is_some()
    }

    /// Called when the dialog is dismissed without sending
    pub fn cancel(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_amount(text: &str) -> ZapOptions {
        let mut options = ZapOptions::new();
        options.set_amount_text(text);
        options
    }

    #[test]
    fn test_defaults() {
        let options = ZapOptions::new();
        assert_eq!(options.amount_text(), "21");
        assert_eq!(options.message_text(), "");
        assert_eq!(options.parsed_amount(), Some(21));
    }

    #[test]
    fn test_plain_amount_parses() {
        let options = with_amount("21");
        assert_eq!(options.parsed_amount(), Some(21));
        assert!(options.can_submit());
        assert_eq!(options.amount_millisats(), Some(21_000));
    }

    #[test]
    fn test_surrounding_whitespace_is_ignored() {
        for text in [" 5000", "5000 ", "\t5000\n", "  5000  "] {
            let options = with_amount(text);
            assert_eq!(options.parsed_amount(), Some(5000), "text {:?}", text);
            assert!(options.can_submit());
        }
    }

    #[test]
    fn test_zero_is_a_valid_amount() {
        let options = with_amount("0");
        assert_eq!(options.parsed_amount(), Some(0));
        assert!(options.can_submit());
    }

    #[test]
    fn test_non_numeric_text_cannot_submit() {
        for text in ["", "   ", "abc", "21abc", "1.5", "1,000", "-5", "2 1", "⚡"] {
            let options = with_amount(text);
            assert_eq!(options.parsed_amount(), None, "text {:?}", text);
            assert!(!options.can_submit(), "text {:?}", text);
        }
    }

    #[test]
    fn test_overflowing_amount_is_absent() {
        let options = with_amount("18446744073709551616");
        assert_eq!(options.parsed_amount(), None);

        // Fits in u64 but not once converted to millisats
        let options = with_amount(&u64::MAX.to_string());
        assert_eq!(options.parsed_amount(), None);
        assert!(!options.can_submit());

        let largest = u64::MAX / MILLISATS_PER_SAT;
        let options = with_amount(&largest.to_string());
        assert_eq!(options.parsed_amount(), Some(largest));
    }

    #[test]
    fn test_message_stored_verbatim() {
        let mut options = ZapOptions::new();
        options.set_message_text("  gm ⚡ ");
        assert_eq!(options.message_text(), "  gm ⚡ ");
        assert!(options.can_submit());
    }

    #[test]
    fn test_keystroke_editing() {
        let mut options = ZapOptions::new();
        options.pop_amount_char();
        options.pop_amount_char();
        assert!(!options.can_submit());
        options.pop_amount_char();
        assert_eq!(options.amount_text(), "");

        options.push_amount_char('1');
        options.push_amount_char('0');
        options.push_amount_char('0');
        assert_eq!(options.parsed_amount(), Some(100));

        options.push_message_char('h');
        options.push_message_char('i');
        options.pop_message_char();
        assert_eq!(options.message_text(), "h");
    }

    #[test]
    fn test_cancel_keeps_fields() {
        let mut options = with_amount("42");
        options.set_message_text("hello");
        options.cancel();
        assert_eq!(options.amount_text(), "42");
        assert_eq!(options.message_text(), "hello");
    }
}

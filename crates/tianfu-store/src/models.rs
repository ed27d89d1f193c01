//! Records persisted in the mailbox file.
//!
//! Field names are camelCase on disk so the file and the HTTP API share one
//! shape.

use serde::{Deserialize, Serialize};

/// One saved letter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LetterRecord {
    /// `<epoch millis>_<6 base36 chars>`, assigned by the store.
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verses: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actions: Option<String>,
    /// Epoch milliseconds.
    #[serde(default)]
    pub created_at: i64,
}

/// A letter the client wants to save. Validated by [`crate::Mailbox::append`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewLetter {
    pub topic: Option<String>,
    pub text: Option<String>,
    pub directions: Option<String>,
    pub verses: Option<String>,
    pub actions: Option<String>,
    /// Epoch milliseconds; missing or non-positive means "now".
    pub created_at: Option<i64>,
}

impl NewLetter {
    /// Shorthand for a letter with only the required field set.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    /// Whether the required `text` field is present and non-empty.
    pub fn has_text(&self) -> bool {
        self.text.as_deref().is_some_and(|t| !t.is_empty())
    }

    /// Turn the request into a record, or `None` when `text` is missing or empty.
    pub(crate) fn into_record(self, id: String, now_millis: i64) -> Option<LetterRecord> {
        let text = self.text.filter(|t| !t.is_empty())?;
        let created_at = self.created_at.filter(|t| *t > 0).unwrap_or(now_millis);
        Some(LetterRecord {
            id,
            topic: self.topic,
            text,
            directions: self.directions,
            verses: self.verses,
            actions: self.actions,
            created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_omits_absent_optionals() {
        let record = NewLetter::with_text("hello")
            .into_record("1_abcdef".into(), 42)
            .unwrap();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "id": "1_abcdef", "text": "hello", "createdAt": 42 })
        );
    }

    #[test]
    fn test_empty_text_rejected() {
        assert!(NewLetter::with_text("").into_record("x".into(), 1).is_none());
        assert!(NewLetter::default().into_record("x".into(), 1).is_none());
        assert!(!NewLetter::with_text("").has_text());
    }

    #[test]
    fn test_whitespace_text_accepted() {
        assert!(NewLetter::with_text("  ").has_text());
        let record = NewLetter::with_text("  ").into_record("x".into(), 1).unwrap();
        assert_eq!(record.text, "  ");
    }

    #[test]
    fn test_created_at_defaults_to_now() {
        let mut letter = NewLetter::with_text("t");
        letter.created_at = Some(0);
        assert_eq!(letter.clone().into_record("a".into(), 99).unwrap().created_at, 99);

        letter.created_at = Some(7);
        assert_eq!(letter.into_record("a".into(), 99).unwrap().created_at, 7);
    }

    #[test]
    fn test_new_letter_accepts_camel_case() {
        let letter: NewLetter =
            serde_json::from_str(r#"{"text":"t","topic":"平安 / 安息","createdAt":5}"#).unwrap();
        assert_eq!(letter.created_at, Some(5));
        assert_eq!(letter.topic.as_deref(), Some("平安 / 安息"));
    }
}

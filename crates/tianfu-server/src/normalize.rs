//! Turns raw provider output into a JSON object.
//!
//! Models asked for bare JSON still sometimes wrap it in a Markdown code
//! fence. The fence is stripped, and output that still does not parse as an
//! object is wrapped as `{"letter": <text>}` instead of failing the request.

use serde_json::{Map, Value};
use tianfu_shared::constants::RAW_LETTER_FIELD;

const FENCE: &str = "```";

/// Remove one enclosing code fence (optionally tagged `json`) and
/// surrounding whitespace. Text without a complete fence is only trimmed.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(inner) = trimmed
        .strip_prefix(FENCE)
        .and_then(|rest| rest.strip_suffix(FENCE))
    else {
        return trimmed;
    };

    let inner = match inner.get(..4) {
        Some(tag) if tag.eq_ignore_ascii_case("json") => &inner[4..],
        _ => inner,
    };
    inner.trim()
}

pub fn normalize(raw: &str) -> Value {
    let content = strip_code_fence(raw);
    match serde_json::from_str::<Value>(content) {
        Ok(value @ Value::Object(_)) => value,
        _ => {
            let mut fallback = Map::new();
            fallback.insert(RAW_LETTER_FIELD.to_string(), Value::String(content.to_string()));
            Value::Object(fallback)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fenced_json() {
        assert_eq!(normalize("```json\n{\"a\":1}\n```"), json!({ "a": 1 }));
    }

    #[test]
    fn test_untagged_fence() {
        assert_eq!(normalize("```\n{\"a\":1}\n```"), json!({ "a": 1 }));
    }

    #[test]
    fn test_uppercase_tag_and_outer_whitespace() {
        assert_eq!(normalize("  ```JSON {\"a\":1} ```\n"), json!({ "a": 1 }));
    }

    #[test]
    fn test_bare_json() {
        let raw = r#"{"salutation":"小明","fullLetter":"..."}"#;
        assert_eq!(normalize(raw)["salutation"], "小明");
    }

    #[test]
    fn test_not_json_falls_back() {
        assert_eq!(
            normalize("not json at all"),
            json!({ "letter": "not json at all" })
        );
    }

    #[test]
    fn test_fenced_garbage_keeps_inner_text() {
        assert_eq!(normalize("```json\noops\n```"), json!({ "letter": "oops" }));
    }

    #[test]
    fn test_non_object_json_falls_back() {
        assert_eq!(normalize("[1,2]"), json!({ "letter": "[1,2]" }));
        assert_eq!(normalize("\"text\""), json!({ "letter": "\"text\"" }));
    }

    #[test]
    fn test_unterminated_fence_is_left_alone() {
        assert_eq!(strip_code_fence("```json\n{}"), "```json\n{}");
    }

    #[test]
    fn test_multibyte_content_after_fence() {
        assert_eq!(strip_code_fence("```天父```"), "天父");
    }
}

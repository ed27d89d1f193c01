use serde::{Deserialize, Serialize};

/// A letter in the five-field shape the provider is asked to produce.
///
/// Live results are forwarded as whatever JSON object the provider returned;
/// this struct is the canonical shape and is what demo mode emits.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedLetter {
    /// How the letter addresses the reader.
    pub salutation: String,
    /// The whole letter as one continuous text.
    pub full_letter: String,
    /// The three directions the letter is built around.
    pub three_directions: String,
    /// Two quoted scripture verses with references.
    pub two_verses: String,
    /// Two short calls to action.
    pub two_actions: String,
}

impl GeneratedLetter {
    /// Field names in the order the provider is asked to emit them.
    pub const FIELDS: [&'static str; 5] = [
        "salutation",
        "fullLetter",
        "threeDirections",
        "twoVerses",
        "twoActions",
    ];

    pub fn to_value(&self) -> serde_json::Value {
        // A struct of plain strings always serializes.
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_camel_case_fields() {
        let letter = GeneratedLetter {
            salutation: "孩子".into(),
            full_letter: "全文".into(),
            three_directions: "三方向".into(),
            two_verses: "兩經文".into(),
            two_actions: "兩行動".into(),
        };
        let value = letter.to_value();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), GeneratedLetter::FIELDS.len());
        for field in GeneratedLetter::FIELDS {
            assert!(obj.contains_key(field), "missing {field}");
        }
        assert_eq!(value["fullLetter"], "全文");
    }
}

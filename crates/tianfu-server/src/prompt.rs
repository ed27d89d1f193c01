//! Prompt construction for the chat-completion provider.
//!
//! The instruction is the externally maintained base prompt, then the topic
//! and recipient, then a fixed directive demanding a bare five-field JSON
//! object.

use std::path::Path;

use serde::Serialize;
use tianfu_shared::constants::{
    FALLBACK_BASE_PROMPT, GENERATION_MAX_TOKENS, GENERATION_TEMPERATURE,
};
use tracing::warn;

/// Output-format directive appended to every prompt.
const FORMAT_DIRECTIVE: &str = concat!(
    "務必只輸出純 JSON 格式，前後不要加上 ```json 或 ``` 或任意文字。",
    "務必輸出為 JSON 物件，且只包含以下五個欄位：",
    r#"{"salutation":"對讀者的稱呼","#,
    r#""fullLetter":"一氣呵成的全信文字（含開頭問安、主要內容、三方向、兩經文、兩個行動呼籲與結尾）","#,
    r#""threeDirections":"三個方向","#,
    r#""twoVerses":"經文1: [引用+標註]；經文2: [引用+標註]","#,
    r#""twoActions":"第一行動：簡短實踐（1-2句）；第二行動：簡短實踐（1-2句）"}"#,
    "，不要輸出多餘文字。",
);

/// One chat message in an OpenAI-style request.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ResponseFormat {
    #[serde(rename = "type")]
    pub kind: &'static str,
}

/// Body of a `POST /chat/completions` request.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub response_format: ResponseFormat,
}

/// Read the base prompt, or the built-in fallback when the file is missing,
/// unreadable or blank.
pub async fn load_base_prompt(path: &Path) -> String {
    match tokio::fs::read_to_string(path).await {
        Ok(raw) if !raw.trim().is_empty() => raw.trim().to_string(),
        Ok(_) => FALLBACK_BASE_PROMPT.to_string(),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => FALLBACK_BASE_PROMPT.to_string(),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to read base prompt file");
            FALLBACK_BASE_PROMPT.to_string()
        }
    }
}

pub fn build_prompt(base: &str, topic: &str, nickname: &str) -> String {
    format!("{base}\n\n主題：{topic}\n稱呼：{nickname}\n\n{FORMAT_DIRECTIVE}")
}

pub fn build_request(base: &str, topic: &str, nickname: &str, model: &str) -> ChatRequest {
    ChatRequest {
        model: model.to_string(),
        messages: vec![ChatMessage {
            role: "user",
            content: build_prompt(base, topic, nickname),
        }],
        temperature: GENERATION_TEMPERATURE,
        max_tokens: GENERATION_MAX_TOKENS,
        response_format: ResponseFormat {
            kind: "json_object",
        },
    }
}

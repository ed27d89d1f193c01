//! Letter generation, either through the live provider or the built-in demo.
//!
//! The mode is fixed at startup: a configured API key produces
//! [`Generator::Live`], otherwise [`Generator::Demo`].

use std::path::PathBuf;

use serde_json::Value;
use thiserror::Error;
use tianfu_shared::GeneratedLetter;
use tracing::{debug, info};

use crate::config::ServerConfig;
use crate::normalize::normalize;
use crate::prompt::{build_request, load_base_prompt};
use crate::provider::{OpenAiClient, ProviderError};

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("Provider call failed: {0}")]
    Provider(#[from] ProviderError),
}

/// Result of one generation.
#[derive(Debug, Clone, PartialEq)]
pub struct Generation {
    /// The letter object handed to the client.
    pub data: Value,
    /// True when produced without contacting a provider.
    pub demo: bool,
}

/// Provider-backed generation.
#[derive(Debug)]
pub struct LiveGenerator {
    client: OpenAiClient,
    model: String,
    prompt_path: PathBuf,
}

impl LiveGenerator {
    pub fn new(client: OpenAiClient, model: String, prompt_path: PathBuf) -> Self {
        Self {
            client,
            model,
            prompt_path,
        }
    }

    async fn generate(&self, topic: &str, nickname: &str) -> Result<Generation, GenerateError> {
        let base = load_base_prompt(&self.prompt_path).await;
        let request = build_request(&base, topic, nickname, &self.model);

        let content = self.client.complete(&request).await?;
        debug!(len = content.len(), "Provider returned content");

        Ok(Generation {
            data: normalize(&content),
            demo: false,
        })
    }
}

#[derive(Debug)]
pub enum Generator {
    Live(LiveGenerator),
    Demo,
}

impl Generator {
    /// Pick the mode from the configuration.
    pub fn from_config(config: &ServerConfig) -> Result<Self, ProviderError> {
        let Some(api_key) = config.api_key.clone() else {
            info!("No OPENAI_API_KEY configured, letters will be generated in demo mode");
            return Ok(Self::Demo);
        };

        let client = OpenAiClient::new(
            api_key,
            config.provider_base_url.clone(),
            config.provider_timeout,
        )?;
        info!(model = %config.model, "Live letter generation enabled");

        Ok(Self::Live(LiveGenerator::new(
            client,
            config.model.clone(),
            config.prompt_path.clone(),
        )))
    }

    pub fn is_live(&self) -> bool {
        matches!(self, Self::Live(_))
    }

    pub async fn generate(&self, topic: &str, nickname: &str) -> Result<Generation, GenerateError> {
        match self {
            Self::Live(live) => live.generate(topic, nickname).await,
            Self::Demo => Ok(Generation {
                data: demo_letter(topic, nickname).to_value(),
                demo: true,
            }),
        }
    }
}

/// The fixed letter returned in demo mode.
pub fn demo_letter(topic: &str, nickname: &str) -> GeneratedLetter {
    GeneratedLetter {
        salutation: nickname.to_string(),
        full_letter: format!(
            "{nickname}，願平安充滿你心。在{topic}的路上，我看見你的掙扎與盼望。\
             今天先安慰你現在的心，記得我與你同在；也把眼目抬起看見未來的亮光；\
             更要堅定信心的根基在我的話語上。正如腓立比書4:7與詩篇23:1提醒你：\
             我必看顧你，使你心思意念得安息。先用三分鐘安靜呼吸、向我傾心；\
             然後寫下兩件感恩的事並與家人分享。永遠愛你的天父。"
        ),
        three_directions: "安慰現在、盼望未來、堅定根基".to_string(),
        two_verses: "腓立比書4:7；詩篇23:1".to_string(),
        two_actions: "禱告：安靜三分鐘向神訴說；感恩：寫下兩件並分享".to_string(),
    }
}

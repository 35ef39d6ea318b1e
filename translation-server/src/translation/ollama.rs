use crate::config::TranslatorConfig;
use crate::translation::{failed_translation, Language, TranslationError, Translator};
use log::{debug, error};
use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use std::time::Duration;

static THINK_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<think>.*?</think>").expect("valid regex"));
static NOTES_SECTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\*\*Notes?:\*\*.*").expect("valid regex"));

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

/// Translator backed by an Ollama-compatible `/api/generate` endpoint
#[derive(Clone)]
pub struct OllamaTranslator {
    client: Client,
    generate_url: String,
    model: String,
}

impl OllamaTranslator {
    pub fn new(config: &TranslatorConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(config.timeout())
            .connect_timeout(Duration::from_secs(2))
            .build()?;
        Ok(Self {
            client,
            generate_url: config.generate_url(),
            model: config.model.clone(),
        })
    }

    /// Send a prompt to the completion service and return its cleaned up answer
    pub async fn complete(&self, prompt: &str) -> Result<String, TranslationError> {
        let response = self
            .client
            .post(&self.generate_url)
            .json(&GenerateRequest {
                model: &self.model,
                prompt,
                stream: false,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(TranslationError::Status(response.status()));
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| TranslationError::InvalidResponse(e.to_string()))?;
        Ok(clean_completion(&body.response))
    }
}

#[async_trait::async_trait]
impl Translator for OllamaTranslator {
    async fn translate(&self, text: &str, source: Language, target: Language) -> String {
        let prompt = build_prompt(text, source, target);
        debug!(
            "Translating {} characters from {} to {}",
            text.len(),
            source,
            target
        );
        match self.complete(&prompt).await {
            Ok(translated) => translated,
            Err(e) => {
                error!("Translation failed: {}", e);
                failed_translation(text)
            }
        }
    }
}

pub(crate) fn build_prompt(text: &str, source: Language, target: Language) -> String {
    format!(
        "Translate the following text from {source} to {target}.\n\
         Keep placeholders, brand names, and technical terms unchanged.\n\
         Preserve line breaks and formatting.\n\
         Do not return your thinking process, internal notes, or explanations.\n\
         ONLY the translated text directly.\n\
         \n\
         Text:\n\
         {text}\n\
         \n\
         Translated:\n"
    )
}

/// Strips reasoning blocks and trailing translator notes from a completion
pub(crate) fn clean_completion(raw: &str) -> String {
    let without_thinking = THINK_BLOCK.replace_all(raw.trim(), "");
    NOTES_SECTION
        .replace(&without_thinking, "")
        .trim()
        .to_string()
}

//! Text translation through a completion service

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use utoipa::ToSchema;

pub mod ollama;

pub use ollama::OllamaTranslator;

/// Languages a document can be translated from and into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Language {
    English,
    Japanese,
    Indonesian,
    French,
    Spanish,
    German,
}

impl Language {
    pub const ALL: [Language; 6] = [
        Language::English,
        Language::Japanese,
        Language::Indonesian,
        Language::French,
        Language::Spanish,
        Language::German,
    ];

    /// Display name, also the accepted form value
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Japanese => "Japanese",
            Language::Indonesian => "Indonesian",
            Language::French => "French",
            Language::Spanish => "Spanish",
            Language::German => "German",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unsupported language: {0}")]
pub struct UnknownLanguage(pub String);

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Language::ALL
            .into_iter()
            .find(|language| language.as_str() == s)
            .ok_or_else(|| UnknownLanguage(s.to_string()))
    }
}

/// Errors raised while talking to the completion service
#[derive(Debug, Error)]
pub enum TranslationError {
    #[error("Completion request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Completion service responded with status {0}")]
    Status(http::StatusCode),
    #[error("Invalid completion response: {0}")]
    InvalidResponse(String),
}

/// Translates a single block of text.
///
/// Implementations never fail: when the completion service is unusable the
/// original text is returned with a failure marker.
#[async_trait::async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str, source: Language, target: Language) -> String;
}

/// Marker prefixed to text that could not be translated
pub const FAILED_MARKER: &str = "[Translation Failed]";

pub(crate) fn failed_translation(text: &str) -> String {
    format!("{FAILED_MARKER} {text}")
}

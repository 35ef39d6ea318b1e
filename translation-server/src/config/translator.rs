use confique::Config;
use std::time::Duration;

/// Configuration for the Ollama completion service
#[derive(Debug, Config, Clone)]
pub struct TranslatorConfig {
    /// Ollama base URL (default: http://localhost:11434)
    #[config(env = "OLLAMA_BASE_URL", default = "http://localhost:11434")]
    pub base_url: String,

    /// Model used for translation (default: mistral-nemo:12b)
    #[config(env = "OLLAMA_MODEL_NAME", default = "mistral-nemo:12b")]
    pub model: String,

    /// Timeout for a single completion request in seconds (default: 120)
    #[config(env = "OLLAMA_TIMEOUT", default = 120)]
    pub timeout: u64,
}

impl TranslatorConfig {
    /// Returns the URL of the generate endpoint
    pub fn generate_url(&self) -> String {
        format!("{}/api/generate", self.base_url.trim_end_matches('/'))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

pub(crate) use crate::config::auth::AuthConfig;
pub(crate) use crate::config::cache::CacheConfig;
pub(crate) use crate::config::documents::DocumentsConfig;
pub(crate) use crate::config::translator::TranslatorConfig;
use confique::Config;

pub mod auth;
pub mod cache;
pub mod documents;
pub mod translator;

/// Main configuration structure for the translation server
#[derive(Debug, Config, Clone)]
pub struct AppConfig {
    /// The port the server will listen to (default: 8000)
    #[config(env = "TRANSLATOR_PORT", default = 8000)]
    pub port: u16,

    /// Authorization server and token policy configuration
    #[config(nested)]
    pub auth: AuthConfig,

    /// Introspection cache configuration
    #[config(nested)]
    pub cache: CacheConfig,

    /// Completion service configuration
    #[config(nested)]
    pub translator: TranslatorConfig,

    /// Document handling configuration
    #[config(nested)]
    pub documents: DocumentsConfig,
}

impl AppConfig {
    /// Creates a new Config instance from environment variables
    pub fn new() -> Result<Self, String> {
        Self::builder().env().load().map_err(|e| e.to_string())
    }

    #[cfg(test)]
    pub fn for_test_with_mocks(
        auth_mock: &wiremock::MockServer,
        ollama_mock: &wiremock::MockServer,
    ) -> Self {
        Self {
            port: 0, // Let the OS choose a port
            auth: AuthConfig::for_test(auth_mock.uri()),
            cache: CacheConfig {
                ttl: 30,
                capacity: 1024,
            },
            translator: TranslatorConfig {
                base_url: ollama_mock.uri(),
                model: "test-model".to_string(),
                timeout: 5,
            },
            documents: DocumentsConfig {
                pdf_converter_command: "pdf2docx".to_string(),
                pdf_conversion_timeout: 5,
                max_upload_size_mb: 10,
                max_part_size_mb: 10,
            },
        }
    }
}

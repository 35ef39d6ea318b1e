use crate::auth::introspection::{ClientSetupError, IntrospectionClient};
use crate::auth::AuthorizationGate;
use crate::cache::create_cache;
use crate::config::AppConfig;
use crate::documents::{CommandPdfConverter, PdfConverter, TranslationService};
use crate::store::{DocumentStore, InMemoryDocumentStore};
use crate::translation::{OllamaTranslator, Translator};
use log::{info, warn};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StateError {
    #[error("Failed to create introspection client: {0}")]
    Introspection(#[from] ClientSetupError),
    #[error("Failed to create translator client: {0}")]
    Translator(#[from] reqwest::Error),
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub gate: Arc<AuthorizationGate>,
    pub documents: Arc<dyn DocumentStore>,
    pub translation: Arc<TranslationService>,
}

impl AppState {
    pub fn new(config: &AppConfig) -> Result<Self, StateError> {
        let translator: Arc<dyn Translator> = Arc::new(OllamaTranslator::new(&config.translator)?);
        let converter: Arc<dyn PdfConverter> =
            Arc::new(CommandPdfConverter::from_config(&config.documents));
        Self::with_components(
            config,
            Arc::new(InMemoryDocumentStore::new()),
            translator,
            converter,
        )
    }

    /// Build the state around the given document collaborators
    pub fn with_components(
        config: &AppConfig,
        documents: Arc<dyn DocumentStore>,
        translator: Arc<dyn Translator>,
        converter: Arc<dyn PdfConverter>,
    ) -> Result<Self, StateError> {
        let cache = create_cache(&config.cache);
        let client = IntrospectionClient::from_config(&config.auth, cache)?;
        let gate = AuthorizationGate::new(client, config.auth.required_policy());
        info!(
            "Token policy: audience={:?} scopes={:?}",
            gate.policy().audience(),
            gate.policy().scopes()
        );
        Ok(Self {
            config: Arc::new(config.clone()),
            gate: Arc::new(gate),
            documents,
            translation: Arc::new(TranslationService::new(
                translator,
                converter,
                config.documents.max_part_size_bytes(),
            )),
        })
    }

    /// Check if all components are healthy
    pub async fn health_check(&self) -> bool {
        match self.gate.health_check().await {
            Ok(()) => true,
            Err(e) => {
                warn!("Credential cache is unhealthy: {}", e);
                false
            }
        }
    }
}

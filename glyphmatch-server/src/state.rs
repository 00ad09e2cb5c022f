use crate::config::ServerConfig;
use crate::error::ServerResult;
use glyphmatch::{GlyphMatchResult, Recognizer};
use std::sync::Arc;
use std::time::Instant;

/// Shared application state
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Arc<ServerConfig>,

    /// Recognizer and template library (shared across requests)
    pub recognizer: Arc<Recognizer>,

    /// When the state was created, for uptime reporting
    pub started: Instant,
}

impl ServerState {
    /// Create new server state and load the template directory
    pub fn new(config: ServerConfig) -> ServerResult<Self> {
        let recognizer = Recognizer::open(config.recognizer_config())?;
        let set = recognizer.templates();
        tracing::info!(
            templates = set.num_templates(),
            labels = set.num_labels(),
            dir = %config.template_dir.display(),
            "templates loaded"
        );

        Ok(Self {
            config: Arc::new(config),
            recognizer: Arc::new(recognizer),
            started: Instant::now(),
        })
    }

    /// Run recognizer work on the blocking pool
    pub async fn run_blocking<T, F>(&self, work: F) -> ServerResult<T>
    where
        F: FnOnce(&Recognizer) -> GlyphMatchResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let recognizer = Arc::clone(&self.recognizer);
        let result = tokio::task::spawn_blocking(move || work(&recognizer)).await?;
        Ok(result?)
    }
}

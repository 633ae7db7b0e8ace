use std::sync::Arc;

use crate::errors::AppError;
use crate::llm_client::ChatCompleter;
use crate::rag::index::ResumeIndex;
use crate::rag::LazyIndex;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Built on first use, then shared by every request.
    pub rag: Arc<LazyIndex>,
    /// Chat-completion backend. Default: `LlmClient` against Groq.
    pub llm: Arc<dyn ChatCompleter>,
}

impl AppState {
    /// The résumé index. The first build reads the file and tokenizes every
    /// document, so it runs on the blocking pool rather than a runtime worker.
    pub async fn index(&self) -> Result<&ResumeIndex, AppError> {
        if !self.rag.is_built() {
            let rag = Arc::clone(&self.rag);
            tokio::task::spawn_blocking(move || rag.get().map(|_| ()))
                .await
                .map_err(|e| AppError::Internal(e.into()))??;
        }
        Ok(self.rag.get()?)
    }
}

//! Query pipeline orchestration.
//!
//! Runs the six stages in order for one request: load document metadata,
//! fetch bytes from storage, extract text, chunk, rank against the
//! query, assemble the context, generate the answer. Strictly linear; no
//! stage keeps state between requests, and everything derived here is
//! dropped when the request ends. Extracted text is deliberately not
//! cached — every query recomputes it.
//!
//! The pipeline is constructed once at startup with its collaborators
//! injected, then shared read-only across request handlers.

use sqlx::SqlitePool;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, info};

use crate::assemble::assemble_context;
use crate::chunk::chunk_text;
use crate::config::Config;
use crate::error::QueryError;
use crate::extract::extract_text;
use crate::provider::AnswerProvider;
use crate::rank::rank_segments;
use crate::storage::ObjectStorage;
use crate::store;

pub struct QueryPipeline {
    storage: Arc<dyn ObjectStorage>,
    provider: Arc<dyn AnswerProvider>,
    max_chunk_chars: usize,
    top_k: usize,
    fetch_timeout: Duration,
}

impl QueryPipeline {
    pub fn new(
        config: &Config,
        storage: Arc<dyn ObjectStorage>,
        provider: Arc<dyn AnswerProvider>,
    ) -> Self {
        Self {
            storage,
            provider,
            max_chunk_chars: config.pipeline.max_chunk_chars,
            top_k: config.pipeline.top_k,
            fetch_timeout: Duration::from_secs(config.storage.fetch_timeout_secs),
        }
    }

    /// Answer one question about one stored document.
    ///
    /// Input validation happens before any I/O; an unknown id surfaces as
    /// [`QueryError::NotFound`] without touching storage. The document
    /// fetch carries a hard deadline so a stuck backend surfaces as a
    /// storage error rather than a hang.
    pub async fn answer(
        &self,
        pool: &SqlitePool,
        document_id: &str,
        query: &str,
    ) -> Result<String, QueryError> {
        if document_id.trim().is_empty() {
            return Err(QueryError::Validation(
                "documentId must not be empty".to_string(),
            ));
        }
        if query.trim().is_empty() {
            return Err(QueryError::Validation("query must not be empty".to_string()));
        }

        let doc = store::get_pdf(pool, document_id)
            .await?
            .ok_or_else(|| QueryError::NotFound(document_id.to_string()))?;
        info!(document_id, name = %doc.name, "processing query");

        let bytes = timeout(self.fetch_timeout, self.storage.fetch(&doc.file_path))
            .await
            .map_err(|_| {
                QueryError::Storage(format!(
                    "timed out fetching '{}' after {}s",
                    doc.file_path,
                    self.fetch_timeout.as_secs()
                ))
            })?
            .map_err(|e| QueryError::Storage(e.to_string()))?;
        debug!(bytes = bytes.len(), "fetched document");

        let text = extract_text(&bytes)?;
        let segments = chunk_text(&text, self.max_chunk_chars);
        debug!(chars = text.len(), segments = segments.len(), "extracted and chunked");

        let ranked = rank_segments(segments, query, self.top_k);
        let context = assemble_context(&ranked);
        debug!(
            selected = ranked.len(),
            context_chars = context.len(),
            "assembled context"
        );

        let answer = self.provider.generate(&context, query).await?;
        info!(document_id, "answer generated");
        Ok(answer)
    }
}

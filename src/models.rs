//! Core data models.
//!
//! These types represent the stored documents, the chat history, and the
//! scored segments that flow through the query pipeline.

use serde::Serialize;

/// A registered PDF document. Created by `pdfc add` (or an external
/// uploader); read-only to the query pipeline.
#[derive(Debug, Clone, Serialize)]
pub struct PdfDocument {
    pub id: String,
    pub name: String,
    /// Opaque key within the object storage backend.
    pub file_path: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// One message in a document's chat history. `is_ai = false` for the
/// user's question, `true` for the generated answer.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub id: String,
    pub pdf_id: String,
    pub content: String,
    pub is_ai: bool,
    pub created_at: i64,
}

/// A text segment plus its relevance score against one query.
///
/// The score is the raw count of case-insensitive, non-overlapping
/// occurrences of the full query string within the segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredSegment {
    pub text: String,
    pub score: usize,
}

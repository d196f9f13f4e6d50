//! Key-lookup queries over the relational store.
//!
//! The pipeline only ever looks documents up by id; the boundary lists
//! documents for the sidebar and appends to the chat history. Nothing
//! here is clever on purpose.

use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::models::{ChatMessage, PdfDocument};

pub async fn get_pdf(pool: &SqlitePool, id: &str) -> Result<Option<PdfDocument>, sqlx::Error> {
    let row = sqlx::query(
        "SELECT id, name, file_path, created_at, updated_at FROM pdfs WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|row| PdfDocument {
        id: row.get("id"),
        name: row.get("name"),
        file_path: row.get("file_path"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }))
}

/// Newest-first, matching the upload sidebar ordering.
pub async fn list_pdfs(pool: &SqlitePool) -> Result<Vec<PdfDocument>, sqlx::Error> {
    let rows = sqlx::query(
        "SELECT id, name, file_path, created_at, updated_at FROM pdfs ORDER BY created_at DESC",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .iter()
        .map(|row| PdfDocument {
            id: row.get("id"),
            name: row.get("name"),
            file_path: row.get("file_path"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
        .collect())
}

pub async fn insert_pdf(
    pool: &SqlitePool,
    name: &str,
    file_path: &str,
) -> Result<PdfDocument, sqlx::Error> {
    let doc = PdfDocument {
        id: Uuid::new_v4().to_string(),
        name: name.to_string(),
        file_path: file_path.to_string(),
        created_at: chrono::Utc::now().timestamp(),
        updated_at: chrono::Utc::now().timestamp(),
    };

    sqlx::query(
        "INSERT INTO pdfs (id, name, file_path, created_at, updated_at) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&doc.id)
    .bind(&doc.name)
    .bind(&doc.file_path)
    .bind(doc.created_at)
    .bind(doc.updated_at)
    .execute(pool)
    .await?;

    Ok(doc)
}

pub async fn insert_message(
    pool: &SqlitePool,
    pdf_id: &str,
    content: &str,
    is_ai: bool,
) -> Result<ChatMessage, sqlx::Error> {
    let message = ChatMessage {
        id: Uuid::new_v4().to_string(),
        pdf_id: pdf_id.to_string(),
        content: content.to_string(),
        is_ai,
        created_at: chrono::Utc::now().timestamp(),
    };

    sqlx::query(
        "INSERT INTO chat_messages (id, pdf_id, content, is_ai, created_at) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&message.id)
    .bind(&message.pdf_id)
    .bind(&message.content)
    .bind(message.is_ai)
    .bind(message.created_at)
    .execute(pool)
    .await?;

    Ok(message)
}

/// Oldest-first, the order a chat transcript reads in.
pub async fn list_messages(
    pool: &SqlitePool,
    pdf_id: &str,
) -> Result<Vec<ChatMessage>, sqlx::Error> {
    let rows = sqlx::query(
        "SELECT id, pdf_id, content, is_ai, created_at FROM chat_messages WHERE pdf_id = ? ORDER BY created_at ASC, rowid ASC",
    )
    .bind(pdf_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .iter()
        .map(|row| ChatMessage {
            id: row.get("id"),
            pdf_id: row.get("pdf_id"),
            content: row.get("content"),
            is_ai: row.get("is_ai"),
            created_at: row.get("created_at"),
        })
        .collect())
}

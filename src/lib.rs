//! # pdfchat
//!
//! Ask natural-language questions about stored PDF documents and get
//! AI-generated answers grounded in the document's text.
//!
//! The heart of the crate is a six-stage query pipeline: fetch the
//! document's bytes from object storage, extract its text, chunk the
//! text into sentence-aligned segments, rank the segments against the
//! question, assemble the top segments into a bounded context, and hand
//! context + question to a language-model provider.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────┐   ┌─────────┐   ┌───────┐   ┌──────┐   ┌──────────┐   ┌──────────┐
//! │ Storage │──▶│ Extract │──▶│ Chunk │──▶│ Rank │──▶│ Assemble │──▶│ Provider │
//! │ S3 / fs │   │  (PDF)  │   │       │   │      │   │          │   │ (OpenAI) │
//! └─────────┘   └─────────┘   └───────┘   └──────┘   └──────────┘   └──────────┘
//!                                  ▲                                      │
//!                           ┌──────┴──────┐                        ┌──────▼─────┐
//!                           │   SQLite    │                        │   answer   │
//!                           │ pdfs + chat │◀───────────────────────│  (persist) │
//!                           └─────────────┘                        └────────────┘
//! ```
//!
//! Each request runs the stages sequentially; nothing is shared between
//! concurrent requests and nothing derived from the document outlives
//! the request.
//!
//! ## Quick Start
//!
//! ```bash
//! pdfc init                        # create the database
//! pdfc add ./report.pdf            # store and register a PDF
//! pdfc ask <id> "What is the total revenue?"
//! pdfc serve                       # start the HTTP API
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types |
//! | [`storage`] | Object storage backends (S3, filesystem) |
//! | [`extract`] | PDF text extraction |
//! | [`chunk`] | Sentence-aligned chunking |
//! | [`rank`] | Lexical relevance ranking |
//! | [`assemble`] | Prompt context assembly |
//! | [`provider`] | Language-model provider client |
//! | [`query`] | Pipeline orchestration |
//! | [`server`] | HTTP API server |
//! | [`store`] | Document and chat-history queries |
//! | [`db`] | Database connection and schema |
//! | [`error`] | Typed error taxonomy |

pub mod assemble;
pub mod chunk;
pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod models;
pub mod provider;
pub mod query;
pub mod rank;
pub mod server;
pub mod storage;
pub mod store;

//! # doc-corpus
//!
//! A read-only content store for markdown documentation corpora.
//!
//! doc-corpus enumerates the markdown documents under a directory tree,
//! retrieves them by path, derives their structure (title, topic category,
//! headings, fenced code snippets, front matter), and lints the corpus for
//! structural problems. It exposes this via a CLI and a JSON HTTP API that a
//! documentation site can ingest from. Rendering is left to the consumer.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌─────────────┐   ┌───────────────┐
//! │ ContentStore │──▶│  markdown   │──▶│ Document      │
//! │  Fs / Memory │   │  outline    │   │ + snippets    │
//! └──────────────┘   └─────────────┘   └──────┬────────┘
//!                                             │
//!             ┌──────────────┬────────────────┤
//!             ▼              ▼                ▼
//!        ┌─────────┐   ┌──────────┐     ┌──────────┐
//!        │  lint   │   │  export  │     │   HTTP   │
//!        └─────────┘   └──────────┘     └──────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! corpus --root ./docs list
//! corpus --root ./docs get aws/compute_services/aws_batch.md
//! corpus --root ./docs lint
//! corpus --config ./corpus.toml serve
//! ```
//!
//! ## Library use
//!
//! ```rust
//! use doc_corpus::store::{ContentStore, InMemoryStore};
//!
//! let store = InMemoryStore::from_documents([
//!     ("aws/compute_services/lambda.md", "# AWS Lambda\n\n```bash\naws lambda invoke\n```\n"),
//! ])
//! .unwrap();
//!
//! let doc = store.load_document("aws/compute_services/lambda.md").unwrap();
//! assert_eq!(doc.title.as_deref(), Some("AWS Lambda"));
//! assert_eq!(doc.topic_category.as_deref(), Some("compute_services"));
//! assert_eq!(doc.snippets[0].language.as_deref(), Some("bash"));
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`store`] | Content store trait and backends |
//! | [`models`] | Core data types |
//! | [`markdown`] | Outline extraction and fence scanning |
//! | [`lint`] | Structural checks |
//! | [`server`] | JSON HTTP API |

pub mod config;
pub mod error;
pub mod export;
pub mod get;
pub mod lint;
pub mod lint_cmd;
pub mod list;
pub mod logging;
pub mod markdown;
pub mod models;
pub mod path;
pub mod progress;
pub mod server;
pub mod stats;
pub mod store;

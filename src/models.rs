//! Core data models used throughout doc-corpus.
//!
//! A [`Document`] is the parsed view of one markdown file: its raw body plus
//! the structure derived from it (title, headings, code snippets).

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::markdown;

/// A fenced code block embedded in a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeSnippet {
    /// First word of the fence info string; `None` for untagged fences.
    pub language: Option<String>,
    pub content: String,
    /// 1-based line of the opening fence.
    pub line: usize,
}

/// A heading in reading order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Heading {
    pub level: u8,
    pub text: String,
    pub line: usize,
}

/// Metadata block at the start of a document.
#[derive(Debug, Clone, PartialEq)]
pub enum FrontMatter {
    /// `+++`-delimited TOML, parsed.
    Toml(toml::Table),
    /// `---`-delimited YAML, kept verbatim.
    Yaml(String),
}

impl FrontMatter {
    /// JSON view used by exports and the HTTP API.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            FrontMatter::Toml(table) => {
                serde_json::to_value(table).unwrap_or_else(|_| serde_json::json!({}))
            }
            FrontMatter::Yaml(raw) => serde_json::json!({ "yaml": raw }),
        }
    }
}

/// A parsed markdown document.
#[derive(Debug, Clone)]
pub struct Document {
    pub path: String,
    pub title: Option<String>,
    pub topic_area: Option<String>,
    pub topic_category: Option<String>,
    pub body: String,
    pub headings: Vec<Heading>,
    pub snippets: Vec<CodeSnippet>,
    pub blockquotes: usize,
    pub front_matter: Option<FrontMatter>,
    pub content_hash: String,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Document {
    /// Parse `body` into a document addressed by `path`.
    pub fn parse(path: &str, body: String) -> Self {
        let outline = markdown::parse(&body);
        Document {
            path: path.to_string(),
            title: outline.title,
            topic_area: crate::path::topic_area(path).map(str::to_string),
            topic_category: crate::path::topic_category(path).map(str::to_string),
            content_hash: markdown::content_hash(body.as_bytes()),
            headings: outline.headings,
            snippets: outline.snippets,
            blockquotes: outline.blockquotes,
            front_matter: outline.front_matter,
            updated_at: None,
            body,
        }
    }

    pub fn with_updated_at(mut self, updated_at: Option<DateTime<Utc>>) -> Self {
        self.updated_at = updated_at;
        self
    }

    pub fn line_count(&self) -> usize {
        self.body.lines().count()
    }

    pub fn summary(&self) -> DocumentSummary {
        DocumentSummary {
            path: self.path.clone(),
            title: self.title.clone(),
            topic_area: self.topic_area.clone(),
            topic_category: self.topic_category.clone(),
            snippet_count: self.snippets.len(),
        }
    }
}

/// Listing entry returned by `corpus list` and `GET /documents`.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentSummary {
    pub path: String,
    pub title: Option<String>,
    pub topic_area: Option<String>,
    pub topic_category: Option<String>,
    pub snippet_count: usize,
}

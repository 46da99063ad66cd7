//! Document retrieval by path.
//!
//! Used by both the `corpus get` CLI command and the `GET /documents/{*path}`
//! HTTP endpoint, which share the [`DocumentResponse`] shape.

use anyhow::Result;
use serde::Serialize;

use crate::error::StoreResult;
use crate::models::{CodeSnippet, Document, Heading};
use crate::store::ContentStore;

/// Serialized view of a parsed document.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentResponse {
    pub path: String,
    pub title: Option<String>,
    pub topic_area: Option<String>,
    pub topic_category: Option<String>,
    pub content_hash: String,
    pub updated_at: Option<String>, // ISO8601
    pub line_count: usize,
    pub blockquotes: usize,
    pub front_matter: Option<serde_json::Value>,
    pub headings: Vec<Heading>,
    pub snippets: Vec<CodeSnippet>,
    pub body: String,
}

impl From<Document> for DocumentResponse {
    fn from(doc: Document) -> Self {
        DocumentResponse {
            line_count: doc.line_count(),
            updated_at: doc
                .updated_at
                .map(|dt| dt.format("%Y-%m-%dT%H:%M:%SZ").to_string()),
            front_matter: doc.front_matter.as_ref().map(|fm| fm.to_json()),
            path: doc.path,
            title: doc.title,
            topic_area: doc.topic_area,
            topic_category: doc.topic_category,
            content_hash: doc.content_hash,
            blockquotes: doc.blockquotes,
            headings: doc.headings,
            snippets: doc.snippets,
            body: doc.body,
        }
    }
}

/// Core get function returning structured data (used by CLI and server).
pub fn get_document(store: &dyn ContentStore, path: &str) -> StoreResult<DocumentResponse> {
    store.load_document(path).map(DocumentResponse::from)
}

/// CLI entry point: prints the document, or exits with status 1 when missing.
pub fn run_get(store: &dyn ContentStore, path: &str, json: bool) -> Result<()> {
    let doc = match get_document(store, path) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&doc)?);
        return Ok(());
    }

    println!("--- Document ---");
    println!("path:           {}", doc.path);
    println!(
        "title:          {}",
        doc.title.as_deref().unwrap_or("(untitled)")
    );
    if let Some(ref area) = doc.topic_area {
        println!("topic_area:     {}", area);
    }
    if let Some(ref category) = doc.topic_category {
        println!("topic_category: {}", category);
    }
    if let Some(ref ts) = doc.updated_at {
        println!("updated_at:     {}", ts);
    }
    println!("content_hash:   {}", doc.content_hash);
    println!("lines:          {}", doc.line_count);
    if let Some(ref fm) = doc.front_matter {
        println!("front_matter:   {}", fm);
    }
    println!();

    println!("--- Body ---");
    println!("{}", doc.body);
    println!();

    println!("--- Snippets ({}) ---", doc.snippets.len());
    for (i, snippet) in doc.snippets.iter().enumerate() {
        println!(
            "[snippet {}] line {} ({})",
            i,
            snippet.line,
            snippet.language.as_deref().unwrap_or("untagged")
        );
        print!("{}", snippet.content);
        println!();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;

    #[test]
    fn test_response_shape() {
        let store = InMemoryStore::from_documents([(
            "node_js/authentication_and_authorization/jwt_auth.md",
            "+++\nlevel = \"intermediate\"\n+++\n# JWT Authentication\n\n```js\njwt.sign(payload, secret);\n```\n",
        )])
        .unwrap();

        let doc = get_document(&store, "node_js/authentication_and_authorization/jwt_auth.md")
            .unwrap();
        assert_eq!(doc.title.as_deref(), Some("JWT Authentication"));
        assert_eq!(
            doc.topic_category.as_deref(),
            Some("authentication_and_authorization")
        );
        assert_eq!(doc.front_matter.as_ref().unwrap()["level"], "intermediate");
        assert_eq!(doc.snippets[0].language.as_deref(), Some("js"));
        assert!(doc.updated_at.is_none());

        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["headings"][0]["level"], 1);
        assert_eq!(json["snippets"][0]["line"], 6);
    }

    #[test]
    fn test_missing_document() {
        let store = InMemoryStore::new();
        assert!(get_document(&store, "aws/nope.md").unwrap_err().is_not_found());
    }
}

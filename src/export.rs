//! Export the corpus as JSON for a documentation site.
//!
//! Produces a single JSON file holding every parsed document (raw body plus
//! headings, snippets, and front matter) so a site generator can ingest the
//! corpus without reading the directory tree itself.

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;
use tracing::info;

use crate::get::DocumentResponse;
use crate::store::ContentStore;

#[derive(Serialize)]
pub struct ExportData {
    pub generated_at: String,
    pub root: String,
    pub documents: Vec<DocumentResponse>,
}

/// Build the export payload. Documents are sorted by path.
pub fn build_export(store: &dyn ContentStore, root_label: &str) -> Result<ExportData> {
    let mut documents = Vec::new();
    for path in store.list_documents()? {
        let doc = store
            .load_document(&path)
            .with_context(|| format!("Failed to load document for export: {}", path))?;
        documents.push(DocumentResponse::from(doc));
    }

    Ok(ExportData {
        generated_at: chrono::Utc::now()
            .format("%Y-%m-%dT%H:%M:%SZ")
            .to_string(),
        root: root_label.to_string(),
        documents,
    })
}

/// Export documents as JSON.
///
/// If `output` is `Some`, writes to that file path. Otherwise writes
/// to stdout for piping.
pub fn run_export(store: &dyn ContentStore, root_label: &str, output: Option<&Path>) -> Result<()> {
    let data = build_export(store, root_label)?;
    let json = serde_json::to_string_pretty(&data)?;

    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, &json)
                .with_context(|| format!("Failed to write export: {}", path.display()))?;
            info!(documents = data.documents.len(), output = %path.display(), "export written");
            eprintln!(
                "Exported {} documents to {}",
                data.documents.len(),
                path.display()
            );
        }
        None => {
            println!("{}", json);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;

    #[test]
    fn test_export_payload() {
        let store = InMemoryStore::from_documents([
            ("node_js/node_js_fundamentals/process_argv.md", "# process.argv\n"),
            ("aws/compute_services/dedicated_hosts.md", "# Dedicated Hosts\n"),
        ])
        .unwrap();

        let data = build_export(&store, "docs").unwrap();
        let paths: Vec<&str> = data.documents.iter().map(|d| d.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "aws/compute_services/dedicated_hosts.md",
                "node_js/node_js_fundamentals/process_argv.md",
            ]
        );

        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json["root"], "docs");
        assert_eq!(json["documents"][1]["title"], "process.argv");
    }
}

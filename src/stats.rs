//! Corpus statistics.
//!
//! A quick summary of what the store holds: document and line counts,
//! per-category breakdowns, and which snippet languages appear. Used by
//! `corpus stats` to sanity-check a corpus before publishing it.

use anyhow::Result;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::store::ContentStore;

/// Label for fenced blocks with no language tag.
pub const UNTAGGED: &str = "(none)";

/// Label for documents at the store root.
pub const UNCATEGORIZED: &str = "(root)";

#[derive(Debug, Default, Serialize)]
pub struct CorpusStats {
    pub documents: usize,
    pub lines: usize,
    pub snippets: usize,
    pub untitled: usize,
    pub by_category: BTreeMap<String, CategoryStats>,
    pub snippets_by_language: BTreeMap<String, usize>,
}

#[derive(Debug, Default, Serialize)]
pub struct CategoryStats {
    pub documents: usize,
    pub snippets: usize,
}

/// Walk the store and aggregate.
pub fn collect_stats(store: &dyn ContentStore) -> Result<CorpusStats> {
    let mut stats = CorpusStats::default();

    for path in store.list_documents()? {
        let doc = store.load_document(&path)?;

        stats.documents += 1;
        stats.lines += doc.line_count();
        stats.snippets += doc.snippets.len();
        if doc.title.is_none() {
            stats.untitled += 1;
        }

        let category = doc
            .topic_category
            .clone()
            .unwrap_or_else(|| UNCATEGORIZED.to_string());
        let entry = stats.by_category.entry(category).or_default();
        entry.documents += 1;
        entry.snippets += doc.snippets.len();

        for snippet in &doc.snippets {
            let lang = snippet.language.as_deref().unwrap_or(UNTAGGED);
            *stats.snippets_by_language.entry(lang.to_string()).or_default() += 1;
        }
    }

    Ok(stats)
}

/// Run the stats command and print a summary.
pub fn run_stats(store: &dyn ContentStore, root_label: &str) -> Result<()> {
    let stats = collect_stats(store)?;

    println!("Corpus Stats");
    println!("============");
    println!();
    println!("  Root:        {}", root_label);
    println!("  Documents:   {}", stats.documents);
    println!("  Lines:       {}", stats.lines);
    println!("  Snippets:    {}", stats.snippets);
    println!("  Untitled:    {}", stats.untitled);

    if !stats.by_category.is_empty() {
        println!();
        println!("  By category:");
        println!("  {:<40} {:>6} {:>9}", "CATEGORY", "DOCS", "SNIPPETS");
        println!("  {}", "-".repeat(57));
        for (name, c) in &stats.by_category {
            println!("  {:<40} {:>6} {:>9}", name, c.documents, c.snippets);
        }
    }

    if !stats.snippets_by_language.is_empty() {
        let mut languages: Vec<(&String, &usize)> = stats.snippets_by_language.iter().collect();
        languages.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

        println!();
        println!("  Snippet languages:");
        for (lang, count) in languages {
            println!("  {:<40} {:>6}", lang, count);
        }
    }

    println!();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;

    #[test]
    fn test_collect_stats() {
        let store = InMemoryStore::from_documents([
            (
                "aws/compute_services/aws_batch.md",
                "# AWS Batch\n\n```bash\naws batch submit-job\n```\n\n```json\n{}\n```\n",
            ),
            (
                "aws/compute_services/lambda.md",
                "# Lambda\n\n```bash\naws lambda invoke\n```\n",
            ),
            ("index.md", "no heading\n\n```\nplain\n```\n"),
        ])
        .unwrap();

        let stats = collect_stats(&store).unwrap();
        assert_eq!(stats.documents, 3);
        assert_eq!(stats.snippets, 4);
        assert_eq!(stats.untitled, 1);
        assert_eq!(stats.by_category["compute_services"].documents, 2);
        assert_eq!(stats.by_category["compute_services"].snippets, 3);
        assert_eq!(stats.by_category[UNCATEGORIZED].documents, 1);
        assert_eq!(stats.snippets_by_language["bash"], 2);
        assert_eq!(stats.snippets_by_language["json"], 1);
        assert_eq!(stats.snippets_by_language[UNTAGGED], 1);
    }
}

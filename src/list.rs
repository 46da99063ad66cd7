//! Document listing.
//!
//! Prints the store's documents in path order with their title and topic
//! category, as a fixed-width table or as JSON summaries.

use anyhow::Result;

use crate::store::ContentStore;

/// Print every document path with its title and topic category.
pub fn run_list(store: &dyn ContentStore, topic: Option<&str>, json: bool) -> Result<()> {
    let summaries = store.summaries(topic)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    println!("{:<60} {:<34} TITLE", "PATH", "CATEGORY");
    for s in &summaries {
        println!(
            "{:<60} {:<34} {}",
            s.path,
            s.topic_category.as_deref().unwrap_or("-"),
            s.title.as_deref().unwrap_or("(untitled)")
        );
    }
    println!();
    println!("{} documents", summaries.len());

    Ok(())
}

// Reading post dumps from disk.
//
// Two shapes are accepted: a bare JSON array of posts, or the row format the
// storage layer serves (`{"items": [{"content": post, "enrichment": ...}]}`),
// where enrichment lives beside the post rather than inside it.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

use crate::feed::post::{Enrichment, Post};

#[derive(Deserialize)]
#[serde(untagged)]
enum Dump {
    Posts(Vec<Post>),
    Rows { items: Vec<Row> },
}

#[derive(Deserialize)]
struct Row {
    content: Post,
    #[serde(default)]
    enrichment: Option<Enrichment>,
}

/// Parse a post dump from a JSON string.
pub fn parse_posts(json: &str) -> Result<Vec<Post>> {
    let dump: Dump = serde_json::from_str(json).context("Failed to parse post dump")?;
    let posts = match dump {
        Dump::Posts(posts) => posts,
        Dump::Rows { items } => items
            .into_iter()
            .map(|row| {
                let mut post = row.content;
                // The row's enrichment is newer than anything embedded in the
                // stored content.
                if row.enrichment.is_some() {
                    post.enrichment = row.enrichment;
                }
                post
            })
            .collect(),
    };
    Ok(posts)
}

/// Load posts from a JSON file.
pub fn load_posts(path: &Path) -> Result<Vec<Post>> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let posts =
        parse_posts(&json).with_context(|| format!("Invalid post dump in {}", path.display()))?;
    debug!(count = posts.len(), path = %path.display(), "Loaded posts");
    Ok(posts)
}

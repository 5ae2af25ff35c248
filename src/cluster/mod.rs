// Conversation clustering: partition posts by shared identity keys.
//
// Two strategies produce the same partition (the connected components of
// the "shares a key" relation). Union-find is the default; the greedy
// first-match pass with a corrective merge is kept for comparison and for
// callers that want conversations built incrementally.

use std::collections::BTreeSet;
use std::str::FromStr;

use crate::error::FeedError;
use crate::feed::keys::{extract_keys, Key};
use crate::feed::post::Post;

pub mod conversation;
pub mod greedy;
pub mod union_find;

use conversation::{Conversation, ConversationIds};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ClusterStrategy {
    #[default]
    UnionFind,
    Greedy,
}

impl ClusterStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClusterStrategy::UnionFind => "union-find",
            ClusterStrategy::Greedy => "greedy",
        }
    }
}

impl FromStr for ClusterStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "union-find" | "unionfind" | "union_find" => Ok(ClusterStrategy::UnionFind),
            "greedy" => Ok(ClusterStrategy::Greedy),
            other => Err(format!(
                "unknown cluster strategy {other:?} (expected \"union-find\" or \"greedy\")"
            )),
        }
    }
}

impl std::fmt::Display for ClusterStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Group posts into conversations.
///
/// Conversations come back in order of each one's earliest input post.
/// Ids are drawn from `ids`. Every post (and nested post) is validated
/// first; the first malformed one aborts the run.
pub fn cluster<'a, I>(
    posts: I,
    strategy: ClusterStrategy,
    ids: &mut ConversationIds,
) -> Result<Vec<Conversation<'a>>, FeedError>
where
    I: IntoIterator<Item = &'a Post>,
{
    let keyed = keyed_posts(posts)?;
    let conversations = match strategy {
        ClusterStrategy::UnionFind => union_find::cluster_keyed(keyed, ids),
        ClusterStrategy::Greedy => greedy::cluster_keyed(keyed, ids),
    };
    Ok(conversations)
}

/// Validate each post and pair it with its keys.
fn keyed_posts<'a, I>(posts: I) -> Result<Vec<(&'a Post, BTreeSet<Key>)>, FeedError>
where
    I: IntoIterator<Item = &'a Post>,
{
    posts
        .into_iter()
        .map(|post| {
            post.validate()?;
            Ok((post, extract_keys(post)?))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_parsing() {
        assert_eq!(
            "greedy".parse::<ClusterStrategy>(),
            Ok(ClusterStrategy::Greedy)
        );
        assert_eq!(
            "Union-Find".parse::<ClusterStrategy>(),
            Ok(ClusterStrategy::UnionFind)
        );
        assert!("kmeans".parse::<ClusterStrategy>().is_err());
    }

    #[test]
    fn test_empty_input() {
        let mut ids = ConversationIds::new();
        let none: Vec<Post> = Vec::new();
        for strategy in [ClusterStrategy::UnionFind, ClusterStrategy::Greedy] {
            assert!(cluster(&none, strategy, &mut ids).unwrap().is_empty());
        }
    }
}

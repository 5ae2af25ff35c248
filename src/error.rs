// Data-integrity errors raised while reading posts.
//
// Everything else (file I/O, config, CLI) goes through anyhow. These are the
// failures the engine itself can detect in otherwise well-formed JSON.

use thiserror::Error;

/// A post that the engine refuses to cluster.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeedError {
    /// A required field is missing or empty.
    #[error("malformed post {id:?}: {reason}")]
    MalformedPost { id: String, reason: String },

    /// A quoted/retweeted post repeats the id of one of its ancestors.
    #[error("post {id:?} quotes or retweets itself through its nested posts")]
    CyclicReference { id: String },

    /// Quote/retweet nesting is deeper than any real timeline produces.
    #[error("post {id:?} is nested {depth} levels deep")]
    NestingTooDeep { id: String, depth: usize },
}

impl FeedError {
    pub fn malformed(id: &str, reason: impl Into<String>) -> Self {
        FeedError::MalformedPost {
            id: id.to_string(),
            reason: reason.into(),
        }
    }
}

// Building a reading session's feed.
//
// Runs the whole engine over one window of posts:
// 1. Drop promoted posts and posts outside the date window
// 2. Cluster by shared keys
// 3. Rank by interestingness
// 4. Reorder so related conversations sit together
// 5. Split into shown and hidden
//
// Pure computation; each call uses its own id counter and graph, so
// separate windows can be processed independently.

use serde::Serialize;
use tracing::info;

use crate::cluster::conversation::{Conversation, ConversationIds, ConversationView};
use crate::cluster::{self, ClusterStrategy};
use crate::error::FeedError;
use crate::feed::post::Post;
use crate::feed::window::{self, DateWindow};
use crate::ordering;
use crate::scoring::rank;
use crate::scoring::visibility::VisibilityRules;
use crate::topics::similarity::SimilarityWeights;
use crate::topics::traits::EntityOverlap;

/// Everything that shapes one feed build.
#[derive(Debug, Clone, Default)]
pub struct FeedOptions {
    pub window: DateWindow,
    pub include_promoted: bool,
    pub strategy: ClusterStrategy,
    pub similarity: SimilarityWeights,
    pub visibility: VisibilityRules,
}

/// Ordered conversations, split by visibility.
#[derive(Debug)]
pub struct Feed<'a> {
    pub visible: Vec<Conversation<'a>>,
    pub hidden: Vec<Conversation<'a>>,
}

impl<'a> Feed<'a> {
    pub fn hidden_count(&self) -> usize {
        self.hidden.len()
    }

    /// Snapshot for rendering. Hidden conversations are only materialized
    /// when asked for; the count is always present.
    pub fn view(&self, include_hidden: bool) -> FeedView {
        FeedView {
            conversations: self.visible.iter().map(Conversation::view).collect(),
            hidden_count: self.hidden.len(),
            hidden: if include_hidden {
                self.hidden.iter().map(Conversation::view).collect()
            } else {
                Vec::new()
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FeedView {
    pub conversations: Vec<ConversationView>,
    pub hidden_count: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub hidden: Vec<ConversationView>,
}

/// Run the engine over `posts`.
pub fn build_feed<'a>(posts: &'a [Post], options: &FeedOptions) -> Result<Feed<'a>, FeedError> {
    let selected = window::select(posts, &options.window, options.include_promoted);

    let mut ids = ConversationIds::new();
    let conversations = cluster::cluster(selected.iter().copied(), options.strategy, &mut ids)?;
    let clustered = conversations.len();

    let ranked = rank::rank_conversations(conversations);
    let similarity = EntityOverlap::new(options.similarity.clone());
    let ordered = ordering::order_conversations(ranked, &similarity);
    let (visible, hidden) = options.visibility.partition(ordered);

    info!(
        posts = posts.len(),
        selected = selected.len(),
        conversations = clustered,
        visible = visible.len(),
        hidden = hidden.len(),
        strategy = %options.strategy,
        "Feed built"
    );

    Ok(Feed { visible, hidden })
}

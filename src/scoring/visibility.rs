// Visibility filter: which conversations are shown up front.
//
// A conversation is shown if it is relevant enough, involves someone the
// reader follows, or drew enough engagement. The rest are hidden behind a
// count and revealed on demand, in the order they already had.

use crate::cluster::conversation::Conversation;

/// Thresholds for showing a conversation. Both comparisons are strict.
#[derive(Debug, Clone, PartialEq)]
pub struct VisibilityRules {
    /// Shown when relevance is above this (default 2.0)
    pub min_relevance: f64,
    /// Shown when likes + reposts are above this (default 1000)
    pub min_upvotes: u64,
    /// Shown whenever a followed account takes part (default true)
    pub show_followed: bool,
}

impl Default for VisibilityRules {
    fn default() -> Self {
        Self {
            min_relevance: 2.0,
            min_upvotes: 1000,
            show_followed: true,
        }
    }
}

impl VisibilityRules {
    pub fn is_visible(&self, conversation: &Conversation<'_>) -> bool {
        conversation.relevance() > self.min_relevance
            || (self.show_followed && !conversation.followed_sources().is_empty())
            || conversation.upvotes() > self.min_upvotes
    }

    /// Split into (visible, hidden), preserving order within each.
    pub fn partition<'a>(
        &self,
        conversations: Vec<Conversation<'a>>,
    ) -> (Vec<Conversation<'a>>, Vec<Conversation<'a>>) {
        conversations
            .into_iter()
            .partition(|c| self.is_visible(c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::conversation::ConversationId;
    use crate::feed::post::Post;
    use serde_json::json;

    fn post(relevance: f64, following: bool, favorites: u64) -> Post {
        serde_json::from_value(json!({
            "id": "1",
            "created_at": "2023-05-01T12:00:00Z",
            "user": {"screen_name": "a", "following": following},
            "favorite_count": favorites,
            "enrichment": {"main_entity": null, "entities": [], "relevance": relevance}
        }))
        .unwrap()
    }

    fn visible(p: &Post) -> bool {
        let mut c = Conversation::new(ConversationId(0));
        c.add_item(p, []);
        VisibilityRules::default().is_visible(&c)
    }

    #[test]
    fn test_relevant_is_shown() {
        assert!(visible(&post(3.0, false, 0)));
    }

    #[test]
    fn test_threshold_is_strict() {
        assert!(!visible(&post(2.0, false, 1000)));
    }

    #[test]
    fn test_low_relevance_low_engagement_is_hidden() {
        assert!(!visible(&post(1.0, false, 500)));
    }

    #[test]
    fn test_high_engagement_is_shown() {
        assert!(visible(&post(1.0, false, 1500)));
    }

    #[test]
    fn test_followed_is_shown() {
        assert!(visible(&post(1.0, true, 0)));
        let p = post(1.0, true, 0);
        let mut c = Conversation::new(ConversationId(0));
        c.add_item(&p, []);
        let rules = VisibilityRules {
            show_followed: false,
            ..VisibilityRules::default()
        };
        assert!(!rules.is_visible(&c));
    }
}

// Interestingness ranking: the starting order before graph traversal.
//
//   interestingness = (sources + followed_sources) * relevance
//
// Followed authors are already in `sources`, so adding the followed count
// again weighs each of them double. The sort is stable: conversations that
// tie keep their clustering order.

use crate::cluster::conversation::Conversation;

/// Score used to pre-sort conversations (higher first).
pub fn interestingness(conversation: &Conversation<'_>) -> f64 {
    let reach = conversation.sources().len() + conversation.followed_sources().len();
    reach as f64 * conversation.relevance()
}

/// Sort conversations by descending interestingness, keeping ties in their
/// incoming order.
pub fn rank_conversations<'a>(conversations: Vec<Conversation<'a>>) -> Vec<Conversation<'a>> {
    let mut scored: Vec<(f64, Conversation<'a>)> = conversations
        .into_iter()
        .map(|c| (interestingness(&c), c))
        .collect();
    scored.sort_by(|a, b| b.0.total_cmp(&a.0));
    scored.into_iter().map(|(_, c)| c).collect()
}

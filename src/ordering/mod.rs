// Display ordering: related conversations end up next to each other.
//
// Conversations arrive ranked by interestingness. A similarity graph is
// built over them and walked depth-first from the best-ranked unvisited
// conversation, strongest edges first.

pub mod graph;
pub mod traversal;

use tracing::debug;

use crate::cluster::conversation::Conversation;
use crate::topics::traits::ConversationSimilarity;

use graph::ConversationGraph;

/// Reorder ranked conversations so related ones are adjacent.
pub fn order_conversations<'a>(
    ranked: Vec<Conversation<'a>>,
    similarity: &dyn ConversationSimilarity,
) -> Vec<Conversation<'a>> {
    let graph = ConversationGraph::build(&ranked, similarity);
    let order = traversal::traversal_order(&graph);
    debug!(
        conversations = graph.node_count(),
        edges = graph.edge_count(),
        "Built conversation similarity graph"
    );

    let mut slots: Vec<Option<Conversation<'a>>> = ranked.into_iter().map(Some).collect();
    order
        .into_iter()
        .filter_map(|i| slots.get_mut(i).and_then(Option::take))
        .collect()
}

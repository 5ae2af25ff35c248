// Weighted similarity graph over conversations.
//
// Node `i` is the conversation at position `i` of the ranked list. An edge
// exists only when the pair scores above zero, and there are no self-edges.

use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;

use crate::cluster::conversation::Conversation;
use crate::topics::traits::ConversationSimilarity;

#[derive(Debug, Clone)]
pub struct ConversationGraph {
    graph: UnGraph<usize, f64>,
}

impl ConversationGraph {
    /// Score every unordered pair once and keep the positive ones.
    pub fn build(conversations: &[Conversation<'_>], similarity: &dyn ConversationSimilarity) -> Self {
        let n = conversations.len();
        let mut graph = UnGraph::with_capacity(n, 0);
        let nodes: Vec<NodeIndex> = (0..n).map(|i| graph.add_node(i)).collect();

        for i in 0..n {
            for j in (i + 1)..n {
                let weight = similarity.score(&conversations[i], &conversations[j]);
                if weight > 0.0 {
                    graph.add_edge(nodes[i], nodes[j], weight);
                }
            }
        }

        Self { graph }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Edge weight between positions `a` and `b`, if they are connected.
    pub fn weight(&self, a: usize, b: usize) -> Option<f64> {
        self.graph
            .find_edge(NodeIndex::new(a), NodeIndex::new(b))
            .and_then(|e| self.graph.edge_weight(e).copied())
    }

    /// Neighbors of `node`, strongest edge first; equal weights go to the
    /// better-ranked neighbor.
    pub fn neighbors_by_weight(&self, node: usize) -> Vec<(usize, f64)> {
        let idx = NodeIndex::new(node);
        let mut neighbors: Vec<(usize, f64)> = self
            .graph
            .edges(idx)
            .map(|e| {
                let other = if e.source() == idx { e.target() } else { e.source() };
                (self.graph[other], *e.weight())
            })
            .collect();
        neighbors.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        neighbors
    }
}

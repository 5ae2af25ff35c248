// Unit tests for the similarity graph and display ordering.
//
// Uses a table-driven similarity so the traversal can be checked against
// hand-computed orders, plus a few checks with the real entity-overlap
// scorer.

use std::collections::HashMap;

use feedpaper::cluster::conversation::{Conversation, ConversationId};
use feedpaper::feed::post::Post;
use feedpaper::ordering::graph::ConversationGraph;
use feedpaper::ordering::order_conversations;
use feedpaper::ordering::traversal::traversal_order;
use feedpaper::topics::traits::{ConversationSimilarity, EntityOverlap};
use serde_json::json;

/// Similarity looked up by conversation id pair.
struct Table(HashMap<(u64, u64), f64>);

impl Table {
    fn new(edges: &[(u64, u64, f64)]) -> Self {
        Self(
            edges
                .iter()
                .map(|&(a, b, w)| ((a.min(b), a.max(b)), w))
                .collect(),
        )
    }
}

impl ConversationSimilarity for Table {
    fn score(&self, a: &Conversation<'_>, b: &Conversation<'_>) -> f64 {
        let (x, y) = (a.id().0, b.id().0);
        self.0.get(&(x.min(y), x.max(y))).copied().unwrap_or(0.0)
    }
}

/// Scores every pair, including a conversation with itself.
struct Everything;

impl ConversationSimilarity for Everything {
    fn score(&self, _a: &Conversation<'_>, _b: &Conversation<'_>) -> f64 {
        1.0
    }
}

fn posts(n: usize) -> Vec<Post> {
    (0..n)
        .map(|i| {
            serde_json::from_value(json!({
                "id": format!("{i}"),
                "created_at": "2023-05-01T12:00:00Z",
                "user": {"screen_name": format!("user{i}")}
            }))
            .expect("valid post")
        })
        .collect()
}

fn enriched(id: &str, main: &str) -> Post {
    serde_json::from_value(json!({
        "id": id,
        "created_at": "2023-05-01T12:00:00Z",
        "user": {"screen_name": format!("user{id}")},
        "enrichment": {"main_entity": main, "entities": [], "relevance": 3}
    }))
    .expect("valid post")
}

fn singletons(posts: &[Post]) -> Vec<Conversation<'_>> {
    posts
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let mut c = Conversation::new(ConversationId(i as u64));
            c.add_item(p, [p.id.clone()]);
            c
        })
        .collect()
}

fn order_ids(conversations: &[Conversation<'_>]) -> Vec<u64> {
    conversations.iter().map(|c| c.id().0).collect()
}

// ============================================================
// ConversationGraph
// ============================================================

#[test]
fn graph_has_no_self_edges() {
    let posts = posts(4);
    let conversations = singletons(&posts);
    let graph = ConversationGraph::build(&conversations, &Everything);
    assert_eq!(graph.node_count(), 4);
    // 4 choose 2
    assert_eq!(graph.edge_count(), 6);
    for i in 0..4 {
        assert_eq!(graph.weight(i, i), None);
    }
}

#[test]
fn graph_drops_zero_weight_pairs() {
    let posts = posts(3);
    let conversations = singletons(&posts);
    let graph = ConversationGraph::build(&conversations, &Table::new(&[(0, 2, 4.0), (0, 1, 0.0)]));
    assert_eq!(graph.edge_count(), 1);
    assert_eq!(graph.weight(0, 2), Some(4.0));
    assert_eq!(graph.weight(2, 0), Some(4.0));
    assert_eq!(graph.weight(0, 1), None);
}

#[test]
fn neighbors_sorted_by_weight_then_rank() {
    let posts = posts(4);
    let conversations = singletons(&posts);
    let graph = ConversationGraph::build(
        &conversations,
        &Table::new(&[(0, 3, 5.0), (0, 1, 2.0), (0, 2, 5.0)]),
    );
    assert_eq!(
        graph.neighbors_by_weight(0),
        vec![(2, 5.0), (3, 5.0), (1, 2.0)]
    );
    assert_eq!(graph.neighbors_by_weight(3), vec![(0, 5.0)]);
}

#[test]
fn entity_overlap_links_shared_subjects_only() {
    let posts = vec![
        enriched("1", "gpt-4"),
        enriched("2", "Rust"),
        enriched("3", "GPT4"),
    ];
    let conversations = singletons(&posts);
    let graph = ConversationGraph::build(&conversations, &EntityOverlap::default());
    assert_eq!(graph.edge_count(), 1);
    // (10 + 3 + 3) in each direction
    assert_eq!(graph.weight(0, 2), Some(32.0));
}

// ============================================================
// traversal_order
// ============================================================

#[test]
fn depth_first_follows_strongest_edges() {
    let posts = posts(5);
    let conversations = singletons(&posts);
    let graph = ConversationGraph::build(
        &conversations,
        &Table::new(&[(0, 3, 5.0), (0, 2, 9.0), (2, 4, 1.0)]),
    );
    assert_eq!(traversal_order(&graph), vec![0, 2, 4, 3, 1]);
}

#[test]
fn no_edges_keeps_rank_order() {
    let posts = posts(6);
    let conversations = singletons(&posts);
    let graph = ConversationGraph::build(&conversations, &Table::new(&[]));
    assert_eq!(traversal_order(&graph), vec![0, 1, 2, 3, 4, 5]);
}

#[test]
fn every_node_visited_once() {
    let posts = posts(8);
    let conversations = singletons(&posts);
    let graph = ConversationGraph::build(
        &conversations,
        &Table::new(&[(1, 7, 1.0), (7, 3, 2.0), (3, 1, 3.0), (5, 6, 1.0)]),
    );
    let mut order = traversal_order(&graph);
    assert_eq!(order.len(), 8);
    order.sort_unstable();
    order.dedup();
    assert_eq!(order, (0..8).collect::<Vec<_>>());
}

#[test]
fn long_chain_does_not_recurse() {
    let n = 2_000u64;
    let posts = posts(n as usize);
    let conversations = singletons(&posts);
    let edges: Vec<(u64, u64, f64)> = (0..n - 1).map(|i| (i, i + 1, 1.0)).collect();
    let graph = ConversationGraph::build(&conversations, &Table::new(&edges));
    let order = traversal_order(&graph);
    assert_eq!(order, (0..n as usize).collect::<Vec<_>>());
}

// ============================================================
// order_conversations
// ============================================================

#[test]
fn reorders_owned_conversations() {
    let posts = posts(5);
    let ranked = singletons(&posts);
    let ordered = order_conversations(
        ranked,
        &Table::new(&[(0, 3, 5.0), (0, 2, 9.0), (2, 4, 1.0)]),
    );
    assert_eq!(order_ids(&ordered), vec![0, 2, 4, 3, 1]);
}

#[test]
fn empty_input_orders_to_empty() {
    let ordered = order_conversations(Vec::new(), &EntityOverlap::default());
    assert!(ordered.is_empty());
}

// Depth-first display order over the similarity graph.
//
// Roots are taken in rank order, skipping anything already visited. From
// each node the walk descends into unvisited neighbors by descending edge
// weight before backtracking. An explicit stack keeps deep chains of
// related conversations off the call stack.

use super::graph::ConversationGraph;

struct Frame {
    neighbors: Vec<usize>,
    next: usize,
}

impl Frame {
    fn new(graph: &ConversationGraph, node: usize) -> Self {
        Self {
            neighbors: graph
                .neighbors_by_weight(node)
                .into_iter()
                .map(|(n, _)| n)
                .collect(),
            next: 0,
        }
    }
}

/// Visit order of all nodes, as positions into the ranked list.
///
/// Every node appears exactly once. With no edges this is `0..n`.
pub fn traversal_order(graph: &ConversationGraph) -> Vec<usize> {
    let n = graph.node_count();
    let mut visited = vec![false; n];
    let mut order = Vec::with_capacity(n);

    for root in 0..n {
        if visited[root] {
            continue;
        }
        visited[root] = true;
        order.push(root);

        let mut stack = vec![Frame::new(graph, root)];
        while let Some(frame) = stack.last_mut() {
            let Some(&candidate) = frame.neighbors.get(frame.next) else {
                stack.pop();
                continue;
            };
            frame.next += 1;
            if visited[candidate] {
                continue;
            }
            visited[candidate] = true;
            order.push(candidate);
            stack.push(Frame::new(graph, candidate));
        }
    }

    order
}

//! Shortest-path distances over a weighted neighborhood graph

use super::common::GraphView;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// State for Dijkstra priority queue
#[derive(Copy, Clone, PartialEq)]
struct State {
    cost: f64,
    node_idx: usize,
}

impl Eq for State {}

impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        // Compare costs reversed for min-heap
        other
            .cost
            .partial_cmp(&self.cost)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.node_idx.cmp(&self.node_idx))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Dijkstra's Algorithm from a single source to every node.
///
/// Uses edge weights from GraphView if available, otherwise assumes 1.0.
/// Unreachable nodes keep `f64::INFINITY`; negative weights are skipped.
pub fn dijkstra_distances(view: &GraphView, source_idx: usize) -> Vec<f64> {
    let mut dist = vec![f64::INFINITY; view.node_count];
    if source_idx >= view.node_count {
        return dist;
    }

    let mut heap = BinaryHeap::new();
    dist[source_idx] = 0.0;
    heap.push(State { cost: 0.0, node_idx: source_idx });

    while let Some(State { cost, node_idx }) = heap.pop() {
        if cost > dist[node_idx] {
            continue;
        }

        let edges = view.successors(node_idx);
        let weights = view.weights(node_idx);

        for (i, &next_idx) in edges.iter().enumerate() {
            let weight = weights.map(|w| w[i]).unwrap_or(1.0);
            if weight < 0.0 {
                continue;
            }

            let next_cost = cost + weight;
            if next_cost < dist[next_idx] {
                dist[next_idx] = next_cost;
                heap.push(State { cost: next_cost, node_idx: next_idx });
            }
        }
    }

    dist
}

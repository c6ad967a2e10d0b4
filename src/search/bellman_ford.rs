//! Serial Bellman-Ford.
//!
//! Two forms: a grid path search over the graph's (positive) edges, and a
//! general distance computation over an explicit directed edge list with
//! `i64` weights — the only place in the crate where negative weights are
//! accepted, and then only so cycles can be detected and reported.

use std::time::Instant;

use crate::graph::{Graph, NodeId};
use crate::search::config::{Algorithm, SearchContext};
use crate::search::error::SearchError;
use crate::search::result::{SearchResult, SearchStatistics};
use crate::search::state::{try_relax, SearchState};
use crate::search::finalize;

/// A directed edge for the general distance computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeightedArc {
    pub from: NodeId,
    pub to: NodeId,
    pub weight: i64,
}

/// Shortest path from `start` to `goal` by iterated full-edge relaxation.
///
/// Runs at most `node_count - 1` passes with an early exit when a pass
/// commits nothing, then one extra detection pass. The detection pass cannot
/// fire on grid graphs (weights are positive) but is kept so the variant's
/// contract matches its general form.
pub fn search(
    graph: &Graph,
    start: NodeId,
    goal: NodeId,
    ctx: &SearchContext,
) -> Result<SearchResult, SearchError> {
    let started = Instant::now();
    let node_count = graph.node_count();
    let edges: Vec<(NodeId, NodeId, u64)> = (0..node_count)
        .flat_map(|u| graph.neighbors(u).iter().map(move |e| (u, e.to, e.weight)))
        .collect();

    let mut stats = SearchStatistics::new(Algorithm::BellmanFord);
    let mut state = SearchState::new(node_count, start, ctx.events.clone());

    for _ in 0..node_count.saturating_sub(1) {
        if ctx.cancel.is_cancelled() {
            return Err(SearchError::Cancelled);
        }
        let mut updated = false;
        for &(u, v, w) in &edges {
            if let Some(proposed) = try_relax(state.costs[u], w, v, &state.costs) {
                state.commit(v, u, proposed);
                stats.proposals_committed += 1;
                updated = true;
                if !state.visited[v] {
                    state.settle(v);
                    stats.nodes_explored += 1;
                }
            }
        }
        stats.rounds += 1;
        if !updated {
            break;
        }
    }

    // One extra pass past the nominal budget: any remaining improvement
    // proves a negative cycle.
    for &(u, v, w) in &edges {
        if try_relax(state.costs[u], w, v, &state.costs).is_some() {
            return Err(SearchError::NegativeCycle);
        }
    }

    finalize(state, start, goal, stats, started)
}

/// Distances from `source` over an explicit edge list, negative weights
/// allowed. Fails with `NegativeCycle` if the post-budget detection pass
/// still finds an improvement.
pub fn distances(
    edges: &[WeightedArc],
    node_count: usize,
    source: NodeId,
) -> Result<Vec<i64>, SearchError> {
    if source >= node_count {
        return Err(SearchError::InvalidConfig(format!(
            "source {} out of range for {} nodes",
            source, node_count
        )));
    }
    let mut dist = vec![i64::MAX; node_count];
    dist[source] = 0;

    for _ in 0..node_count.saturating_sub(1) {
        let mut updated = false;
        for arc in edges {
            if dist[arc.from] == i64::MAX {
                continue;
            }
            let proposed = dist[arc.from].saturating_add(arc.weight);
            if proposed < dist[arc.to] {
                dist[arc.to] = proposed;
                updated = true;
            }
        }
        if !updated {
            break;
        }
    }

    for arc in edges {
        if dist[arc.from] != i64::MAX && dist[arc.from].saturating_add(arc.weight) < dist[arc.to] {
            return Err(SearchError::NegativeCycle);
        }
    }

    Ok(dist)
}

//! Serial Dijkstra, the reference the parallel engines are measured against.

use std::time::Instant;

use crate::graph::{Graph, NodeId};
use crate::search::config::{Algorithm, SearchContext};
use crate::search::error::SearchError;
use crate::search::frontier::Frontier;
use crate::search::result::{SearchResult, SearchStatistics};
use crate::search::state::{try_relax, SearchState};
use crate::search::finalize;

/// Compute the shortest path from `start` to `goal`.
///
/// Settles one node per iteration from a min-heap keyed by committed cost;
/// stale heap entries are skipped via the visited table. Stops as soon as the
/// goal is settled.
pub fn search(
    graph: &Graph,
    start: NodeId,
    goal: NodeId,
    ctx: &SearchContext,
) -> Result<SearchResult, SearchError> {
    let started = Instant::now();
    let mut stats = SearchStatistics::new(Algorithm::Dijkstra);
    let mut state = SearchState::new(graph.node_count(), start, ctx.events.clone());
    let mut frontier = Frontier::new();
    frontier.push(start, 0, 0);

    while let Some(entry) = frontier.pop() {
        if ctx.cancel.is_cancelled() {
            return Err(SearchError::Cancelled);
        }
        let current = entry.id;
        if state.visited[current] {
            continue;
        }
        state.settle(current);
        stats.nodes_explored += 1;
        if current == goal {
            break;
        }

        let current_cost = state.costs[current];
        for edge in graph.neighbors(current) {
            if let Some(proposed) = try_relax(current_cost, edge.weight, edge.to, &state.costs) {
                state.commit(edge.to, current, proposed);
                stats.proposals_committed += 1;
                frontier.push(edge.to, proposed, proposed);
            }
        }
    }

    finalize(state, start, goal, stats, started)
}

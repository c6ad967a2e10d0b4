//! Serial A* with an admissible, consistent heuristic.

use std::time::Instant;

use crate::graph::{Graph, NodeId};
use crate::search::config::{Algorithm, Heuristic, SearchContext};
use crate::search::error::SearchError;
use crate::search::frontier::Frontier;
use crate::search::result::{SearchResult, SearchStatistics};
use crate::search::state::{try_relax, SearchState};
use crate::search::finalize;

/// Compute the shortest path from `start` to `goal`, ordering the frontier by
/// `f = g + h`.
///
/// The frontier does not support in-place priority decrease; a better path to
/// a queued node pushes a fresh entry, and entries whose recorded `g` exceeds
/// the authoritative table value are skipped on pop. With a consistent
/// heuristic each node is expanded at most once.
pub fn search(
    graph: &Graph,
    start: NodeId,
    goal: NodeId,
    heuristic: Heuristic,
    ctx: &SearchContext,
) -> Result<SearchResult, SearchError> {
    let started = Instant::now();
    let scale = graph.min_edge_weight();
    let goal_node = *graph.node(goal);
    let mut stats = SearchStatistics::new(Algorithm::AStar);
    let mut state = SearchState::new(graph.node_count(), start, ctx.events.clone());
    let mut frontier = Frontier::new();
    frontier.push(start, heuristic.estimate(graph.node(start), &goal_node, scale), 0);

    while let Some(entry) = frontier.pop() {
        if ctx.cancel.is_cancelled() {
            return Err(SearchError::Cancelled);
        }
        // Stale entry: a better path was committed after this was queued.
        if entry.g_cost > state.costs[entry.id] {
            continue;
        }
        if entry.id == goal {
            break;
        }
        state.record_discovery(entry.id);
        stats.nodes_explored += 1;

        for edge in graph.neighbors(entry.id) {
            if let Some(g) = try_relax(entry.g_cost, edge.weight, edge.to, &state.costs) {
                state.commit(edge.to, entry.id, g);
                stats.proposals_committed += 1;
                let h = heuristic.estimate(graph.node(edge.to), &goal_node, scale);
                frontier.push(edge.to, g.saturating_add(h), g);
            }
        }
    }

    finalize(state, start, goal, stats, started)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Maze;
    use crate::search::dijkstra;

    fn graph_of(text: &str) -> Graph {
        Graph::from_maze(&text.parse::<Maze>().unwrap())
    }

    #[test]
    fn test_open_grid_matches_manhattan_distance() {
        let graph = graph_of("p----\n-----\n-----\n-----\n----G\n");
        let result = search(
            &graph,
            graph.start().unwrap(),
            graph.goal().unwrap(),
            Heuristic::Manhattan,
            &SearchContext::new(),
        )
        .unwrap();
        assert_eq!(result.cost, 160);
        assert_eq!(result.path_len(), 9);
    }

    #[test]
    fn test_matches_dijkstra_on_walled_maze() {
        let text = "p---X---\n-XX-X-X-\n-X--X-X-\n-X-XX-XG\n--------\n";
        let graph = graph_of(text);
        let (start, goal) = (graph.start().unwrap(), graph.goal().unwrap());
        let reference = dijkstra::search(&graph, start, goal, &SearchContext::new()).unwrap();
        for heuristic in [Heuristic::Manhattan, Heuristic::Euclidean] {
            let result = search(&graph, start, goal, heuristic, &SearchContext::new()).unwrap();
            assert_eq!(result.cost, reference.cost, "heuristic {}", heuristic);
        }
    }

    #[test]
    fn test_explores_no_more_than_dijkstra_on_open_grid() {
        let graph = graph_of("p------\n-------\n-------\n------G\n");
        let (start, goal) = (graph.start().unwrap(), graph.goal().unwrap());
        let blind = dijkstra::search(&graph, start, goal, &SearchContext::new()).unwrap();
        let guided = search(&graph, start, goal, Heuristic::Manhattan, &SearchContext::new()).unwrap();
        assert!(guided.statistics.nodes_explored <= blind.statistics.nodes_explored);
    }

    #[test]
    fn test_unreachable_goal() {
        let graph = graph_of("pX-\nXX-\n--G\n");
        let result = search(
            &graph,
            graph.start().unwrap(),
            graph.goal().unwrap(),
            Heuristic::Manhattan,
            &SearchContext::new(),
        );
        assert_eq!(result.unwrap_err(), SearchError::NoPathFound);
    }
}

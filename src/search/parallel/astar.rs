//! Parallel A*: a single-threaded best-first coordinator that farms neighbor
//! expansion out to the worker pool.
//!
//! The priority frontier is owned by the coordinator and never touched by
//! workers. Each iteration pops the minimum-`f` node, dispatches its neighbor
//! edges as chunks, merges the returned proposals, and pushes newly improved
//! nodes.
//!
//! Here `visited` marks frontier membership, not settlement: workers skip
//! neighbors that already entered the frontier, so a node is scored exactly
//! once and a shorter route to it discovered later is dropped rather than
//! committed. On uniform-weight grids with the scaled Manhattan heuristic the
//! first score is already optimal, but under other weightings the returned
//! path can be suboptimal. This is a documented relaxation of strict A*, not
//! a bug to fix silently (see DESIGN.md).

use std::sync::Arc;
use std::time::Instant;

use log::debug;

use crate::graph::{Graph, NodeId};
use crate::search::config::{Algorithm, SearchContext};
use crate::search::error::SearchError;
use crate::search::frontier::Frontier;
use crate::search::parallel::channel::{merge_proposals, WorkItem};
use crate::search::parallel::config::ParallelConfig;
use crate::search::parallel::pool::{chunk_items, WorkerPool};
use crate::search::result::{SearchResult, SearchStatistics};
use crate::search::state::SearchState;
use crate::search::finalize;

/// Compute a path from `start` to `goal` with pool-expanded A*.
pub fn search(
    graph: &Arc<Graph>,
    start: NodeId,
    goal: NodeId,
    config: &ParallelConfig,
    ctx: &SearchContext,
) -> Result<SearchResult, SearchError> {
    config.validate()?;
    let started = Instant::now();
    let heuristic = config.heuristic;
    let scale = graph.min_edge_weight();
    let goal_node = *graph.node(goal);
    let mut stats = SearchStatistics::new(Algorithm::ParallelAStar);
    let mut state = SearchState::new(graph.node_count(), start, ctx.events.clone());

    if start == goal {
        state.settle(start);
        stats.nodes_explored = 1;
        return finalize(state, start, goal, stats, started);
    }

    let pool = WorkerPool::new(Arc::clone(graph), config.worker_count());
    debug!("parallel a-star: {} workers", pool.size());

    let mut frontier = Frontier::new();
    frontier.push(start, heuristic.estimate(graph.node(start), &goal_node, scale), 0);
    state.visited[start] = true;

    while let Some(entry) = frontier.pop() {
        if ctx.cancel.is_cancelled() {
            return Err(SearchError::Cancelled);
        }
        if entry.id == goal {
            break;
        }
        if let Some(ceiling) = config.round_ceiling {
            if stats.rounds >= ceiling {
                return Err(SearchError::BudgetExceeded { limit: ceiling });
            }
        }
        // Stale entry: a better path to this node was committed after it was
        // queued. The frontier cannot decrease priorities in place, so the
        // invalidated work is discarded here instead.
        if entry.g_cost > state.costs[entry.id] {
            continue;
        }

        state.record_discovery(entry.id);
        stats.nodes_explored += 1;

        let edges: Vec<(NodeId, u64)> = graph
            .neighbors(entry.id)
            .iter()
            .map(|e| (e.to, e.weight))
            .collect();
        if edges.is_empty() {
            continue;
        }

        stats.rounds += 1;
        let snapshot = Arc::new(state.snapshot());
        let items: Vec<WorkItem> = chunk_items(&edges, pool.size())
            .into_iter()
            .map(|chunk| WorkItem::Expand {
                current: entry.id,
                current_cost: entry.g_cost,
                chunk,
                goal,
                heuristic,
                snapshot: Arc::clone(&snapshot),
            })
            .collect();
        let replies = pool.dispatch(items)?;
        if replies.iter().any(|r| r.goal_found) {
            debug!("goal entered the frontier at round {}", stats.rounds);
        }

        for proposal in merge_proposals(&replies) {
            if proposal.g_cost < state.costs[proposal.target] {
                state.commit(proposal.target, proposal.source, proposal.g_cost);
                stats.proposals_committed += 1;
                if !state.visited[proposal.target] {
                    state.visited[proposal.target] = true;
                    frontier.push(proposal.target, proposal.f_cost, proposal.g_cost);
                }
            }
        }
    }

    finalize(state, start, goal, stats, started)
}

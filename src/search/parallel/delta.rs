//! Delta-stepping parallel Dijkstra: the bucket scheduler.
//!
//! Frontier nodes are grouped into buckets of width `delta` by tentative
//! cost. Each round drains the lowest non-empty bucket: its nodes are
//! chunked across the worker pool, workers propose relaxations against a
//! read-only snapshot, and the coordinator merges and commits the round's
//! proposals in one step before any bucket advances. A node relaxed by two
//! chunks in the same round is resolved by the take-minimum merge rule, not
//! by locking.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use log::debug;

use crate::graph::{Graph, NodeId};
use crate::search::config::{Algorithm, SearchContext};
use crate::search::error::SearchError;
use crate::search::parallel::channel::{merge_proposals, WorkItem};
use crate::search::parallel::config::ParallelConfig;
use crate::search::parallel::pool::{chunk_items, WorkerPool};
use crate::search::result::{SearchResult, SearchStatistics};
use crate::search::state::SearchState;
use crate::search::finalize;

/// Compute the shortest path from `start` to `goal` with delta-stepping.
///
/// Terminates when the goal settles (early exit), when every bucket is empty
/// (`NoPathFound` if the goal is unreached), or when the bucket-index ceiling
/// is hit with work still queued (`BudgetExceeded`).
pub fn search(
    graph: &Arc<Graph>,
    start: NodeId,
    goal: NodeId,
    config: &ParallelConfig,
    ctx: &SearchContext,
) -> Result<SearchResult, SearchError> {
    config.validate()?;
    let started = Instant::now();
    let mut stats = SearchStatistics::new(Algorithm::DeltaStepping);
    let mut state = SearchState::new(graph.node_count(), start, ctx.events.clone());

    // Degenerate search: nothing to dispatch, no pool to build.
    if start == goal {
        state.settle(start);
        stats.nodes_explored = 1;
        return finalize(state, start, goal, stats, started);
    }

    let delta = config.delta_for(graph.node_count());
    let pool = WorkerPool::new(Arc::clone(graph), config.worker_count());
    debug!(
        "delta-stepping: {} workers, delta {}, ceiling {}",
        pool.size(),
        delta,
        config.bucket_ceiling
    );

    let mut buckets: BTreeMap<u64, Vec<NodeId>> = BTreeMap::new();
    buckets.insert(0, vec![start]);

    loop {
        let Some(&bucket_idx) = buckets.keys().next() else {
            break;
        };
        if ctx.cancel.is_cancelled() {
            return Err(SearchError::Cancelled);
        }

        let Some(queued) = buckets.remove(&bucket_idx) else {
            continue;
        };
        // Drop entries settled since they were queued; stale duplicates from
        // reinsertion die here, before the round sees them.
        let nodes: Vec<NodeId> = queued.into_iter().filter(|&n| !state.visited[n]).collect();
        if nodes.is_empty() {
            continue;
        }
        // Only live work counts against the ceiling; a bucket of stale
        // entries is exhaustion, not budget overrun.
        if bucket_idx > config.bucket_ceiling {
            return Err(SearchError::BudgetExceeded {
                limit: config.bucket_ceiling,
            });
        }

        stats.rounds += 1;
        let snapshot = Arc::new(state.snapshot());
        let items: Vec<WorkItem> = chunk_items(&nodes, pool.size())
            .into_iter()
            .map(|chunk| WorkItem::Bucket {
                nodes: chunk,
                goal,
                snapshot: Arc::clone(&snapshot),
            })
            .collect();
        let replies = pool.dispatch(items)?;

        let mut goal_found = false;
        for reply in &replies {
            stats.nodes_explored += reply.explored;
            goal_found |= reply.goal_found;
        }

        // Merge & commit: one writer, check-then-set against the
        // authoritative table. The committed value may beat what any single
        // worker saw, since two chunks can improve the same target.
        for proposal in merge_proposals(&replies) {
            if proposal.g_cost < state.costs[proposal.target] {
                state.commit(proposal.target, proposal.source, proposal.g_cost);
                stats.proposals_committed += 1;
                let idx = proposal.g_cost / delta;
                let entry = buckets.entry(idx).or_default();
                if !entry.contains(&proposal.target) {
                    entry.push(proposal.target);
                }
            }
        }

        // The round's reconciliation point: every processed node settles.
        for &node in &nodes {
            state.settle(node);
        }

        debug!(
            "bucket {} drained: {} nodes, {} live buckets",
            bucket_idx,
            nodes.len(),
            buckets.len()
        );

        if goal_found || state.visited[goal] {
            break;
        }
    }

    finalize(state, start, goal, stats, started)
}

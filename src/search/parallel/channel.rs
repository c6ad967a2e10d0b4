//! Messages and shared signals between the coordinator and the worker pool.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::graph::NodeId;
use crate::search::config::Heuristic;
use crate::search::state::Snapshot;

/// Work shipped to a worker for one dispatch round.
///
/// Explicitly tagged per kind; each variant carries exactly the fields its
/// relaxation needs plus the read-only snapshot it relaxes against.
#[derive(Debug, Clone)]
pub enum WorkItem {
    /// Relax every outgoing edge of a chunk of bucket nodes (delta-stepping).
    Bucket {
        nodes: Vec<NodeId>,
        goal: NodeId,
        snapshot: Arc<Snapshot>,
    },
    /// Expand a chunk of one node's neighbor edges (parallel A*). The chunk
    /// holds `(neighbor, edge weight)` pairs.
    Expand {
        current: NodeId,
        current_cost: u64,
        chunk: Vec<(NodeId, u64)>,
        goal: NodeId,
        heuristic: Heuristic,
        snapshot: Arc<Snapshot>,
    },
    /// Terminate the worker thread.
    Shutdown,
}

/// A proposed cost improvement, local to the worker chunk that produced it.
///
/// Workers never write shared tables; the coordinator merges proposals per
/// target (minimum by `(g_cost, source)`) and commits only those still
/// strictly better than the authoritative value at commit time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Proposal {
    pub target: NodeId,
    pub source: NodeId,
    pub g_cost: u64,
    /// Frontier priority; equals `g_cost` for delta-stepping.
    pub f_cost: u64,
}

/// One worker's answer for one chunk.
#[derive(Debug, Clone)]
pub struct WorkerReply {
    pub worker_id: usize,
    pub proposals: Vec<Proposal>,
    /// The goal appeared in this chunk; the round still merges normally.
    pub goal_found: bool,
    /// Nodes this worker actually processed (not skipped as visited).
    pub explored: u64,
}

/// Cooperative cancellation flag, honored at round/iteration boundaries.
#[derive(Debug, Default)]
pub struct CancelToken {
    cancelled: AtomicBool,
}

impl CancelToken {
    pub fn new() -> CancelToken {
        CancelToken::default()
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Merge all replies of a round: keep, per target, the minimum proposal by
/// `(g_cost, source)`. The source tie-break makes committed parents
/// deterministic regardless of reply arrival order.
pub fn merge_proposals(replies: &[WorkerReply]) -> Vec<Proposal> {
    use std::collections::HashMap;

    let mut best: HashMap<NodeId, Proposal> = HashMap::new();
    for reply in replies {
        for &p in &reply.proposals {
            match best.get(&p.target) {
                Some(existing) if (existing.g_cost, existing.source) <= (p.g_cost, p.source) => {}
                _ => {
                    best.insert(p.target, p);
                }
            }
        }
    }
    let mut merged: Vec<Proposal> = best.into_values().collect();
    merged.sort_unstable_by_key(|p| p.target);
    merged
}

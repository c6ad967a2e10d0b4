//! Reusable pool of relaxation workers.
//!
//! Workers are long-lived threads fed over channels. `dispatch` is the round
//! barrier both parallel engines rely on: it blocks the calling coordinator
//! until every chunk of the round has been answered, so rounds never overlap.
//! Workers only read the snapshot an item carries and only write their own
//! reply; every shared-table commit happens on the coordinator side.

use std::sync::Arc;
use std::thread::JoinHandle;

use crossbeam_channel::{unbounded, Receiver, Sender};

use crate::graph::{Graph, NodeId};
use crate::search::config::Heuristic;
use crate::search::error::SearchError;
use crate::search::parallel::channel::{Proposal, WorkItem, WorkerReply};
use crate::search::state::{try_relax, Snapshot};

/// A pool of `P` workers with one inbox each and a shared reply channel.
#[derive(Debug)]
pub struct WorkerPool {
    senders: Vec<Sender<WorkItem>>,
    replies: Receiver<WorkerReply>,
    handles: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawn `workers` threads over the given graph.
    pub fn new(graph: Arc<Graph>, workers: usize) -> WorkerPool {
        let workers = workers.max(1);
        let (reply_tx, reply_rx) = unbounded();
        let mut senders = Vec::with_capacity(workers);
        let mut handles = Vec::with_capacity(workers);

        for worker_id in 0..workers {
            let (item_tx, item_rx) = unbounded();
            let graph = Arc::clone(&graph);
            let reply_tx = reply_tx.clone();
            senders.push(item_tx);
            handles.push(std::thread::spawn(move || {
                run_worker(worker_id, graph, item_rx, reply_tx);
            }));
        }

        WorkerPool {
            senders,
            replies: reply_rx,
            handles,
        }
    }

    /// Number of workers in the pool.
    pub fn size(&self) -> usize {
        self.senders.len()
    }

    /// Send one round of work and block until every chunk has been answered.
    ///
    /// Items are distributed round-robin; replies arrive in completion order,
    /// which is fine because the merge rule is order-insensitive.
    pub fn dispatch(&self, items: Vec<WorkItem>) -> Result<Vec<WorkerReply>, SearchError> {
        let count = items.len();
        for (i, item) in items.into_iter().enumerate() {
            self.senders[i % self.senders.len()]
                .send(item)
                .map_err(|_| SearchError::WorkerLost)?;
        }
        let mut replies = Vec::with_capacity(count);
        for _ in 0..count {
            replies.push(self.replies.recv().map_err(|_| SearchError::WorkerLost)?);
        }
        Ok(replies)
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        for tx in &self.senders {
            let _ = tx.send(WorkItem::Shutdown);
        }
        for handle in std::mem::take(&mut self.handles) {
            let _ = handle.join();
        }
    }
}

/// Split work across the pool using the bucket scheduler's chunking rule:
/// chunk size `max(1, len / workers)`, so a round never produces fewer
/// chunks than it has nodes to fill them with.
pub(crate) fn chunk_items<T: Clone>(items: &[T], workers: usize) -> Vec<Vec<T>> {
    if items.is_empty() {
        return Vec::new();
    }
    let size = (items.len() / workers.max(1)).max(1);
    items.chunks(size).map(|c| c.to_vec()).collect()
}

fn run_worker(
    worker_id: usize,
    graph: Arc<Graph>,
    items: Receiver<WorkItem>,
    replies: Sender<WorkerReply>,
) {
    for item in items.iter() {
        let reply = match item {
            WorkItem::Shutdown => break,
            WorkItem::Bucket {
                nodes,
                goal,
                snapshot,
            } => relax_bucket(worker_id, &graph, &nodes, goal, &snapshot),
            WorkItem::Expand {
                current,
                current_cost,
                chunk,
                goal,
                heuristic,
                snapshot,
            } => expand_neighbors(
                worker_id,
                &graph,
                current,
                current_cost,
                &chunk,
                goal,
                heuristic,
                &snapshot,
            ),
        };
        if replies.send(reply).is_err() {
            break;
        }
    }
}

/// Apply the relaxation primitive to every outgoing edge of a chunk of
/// bucket nodes. Stops scanning when it hits the goal but still returns the
/// proposals accumulated so far, so the round's merge sees them.
fn relax_bucket(
    worker_id: usize,
    graph: &Graph,
    nodes: &[NodeId],
    goal: NodeId,
    snapshot: &Snapshot,
) -> WorkerReply {
    let mut proposals = Vec::new();
    let mut explored = 0;
    let mut goal_found = false;

    for &node in nodes {
        if snapshot.visited[node] {
            continue;
        }
        explored += 1;
        if node == goal {
            goal_found = true;
            break;
        }
        let cost = snapshot.costs[node];
        for edge in graph.neighbors(node) {
            if let Some(g) = try_relax(cost, edge.weight, edge.to, &snapshot.costs) {
                proposals.push(Proposal {
                    target: edge.to,
                    source: node,
                    g_cost: g,
                    f_cost: g,
                });
            }
        }
    }

    WorkerReply {
        worker_id,
        proposals,
        goal_found,
        explored,
    }
}

/// Score a chunk of one node's neighbors for the A* coordinator: propose
/// `(neighbor, g, f = g + h)` for every neighbor the snapshot says is
/// improvable and not yet in the frontier.
#[allow(clippy::too_many_arguments)]
fn expand_neighbors(
    worker_id: usize,
    graph: &Graph,
    current: NodeId,
    current_cost: u64,
    chunk: &[(NodeId, u64)],
    goal: NodeId,
    heuristic: Heuristic,
    snapshot: &Snapshot,
) -> WorkerReply {
    let scale = graph.min_edge_weight();
    let goal_node = *graph.node(goal);
    let mut proposals = Vec::new();
    let mut explored = 0;
    let mut goal_found = false;

    for &(neighbor, weight) in chunk {
        if snapshot.visited[neighbor] {
            continue;
        }
        explored += 1;
        if let Some(g) = try_relax(current_cost, weight, neighbor, &snapshot.costs) {
            let h = heuristic.estimate(graph.node(neighbor), &goal_node, scale);
            if neighbor == goal {
                goal_found = true;
            }
            proposals.push(Proposal {
                target: neighbor,
                source: current,
                g_cost: g,
                f_cost: g.saturating_add(h),
            });
        }
    }

    WorkerReply {
        worker_id,
        proposals,
        goal_found,
        explored,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Maze;
    use crate::search::state::SearchState;

    fn open_graph() -> Arc<Graph> {
        let maze: Maze = "p--\n---\n--G\n".parse().unwrap();
        Arc::new(Graph::from_maze(&maze))
    }

    #[test]
    fn test_chunk_items_matches_scheduler_rule() {
        let items: Vec<u32> = (0..10).collect();
        let chunks = chunk_items(&items, 4);
        assert!(chunks.iter().all(|c| c.len() <= 2));
        let flat: Vec<u32> = chunks.into_iter().flatten().collect();
        assert_eq!(flat, items);
        assert!(chunk_items(&Vec::<u32>::new(), 4).is_empty());
        assert_eq!(chunk_items(&items, 100).len(), 10);
    }

    #[test]
    fn test_bucket_dispatch_proposes_start_neighbors() {
        let graph = open_graph();
        let pool = WorkerPool::new(Arc::clone(&graph), 2);
        let state = SearchState::new(graph.node_count(), 0, None);
        let snapshot = Arc::new(state.snapshot());
        let replies = pool
            .dispatch(vec![WorkItem::Bucket {
                nodes: vec![0],
                goal: 8,
                snapshot,
            }])
            .unwrap();
        assert_eq!(replies.len(), 1);
        let mut targets: Vec<NodeId> = replies[0].proposals.iter().map(|p| p.target).collect();
        targets.sort_unstable();
        assert_eq!(targets, vec![1, 3]);
        assert!(replies[0].proposals.iter().all(|p| p.g_cost == 20));
        assert!(!replies[0].goal_found);
    }

    #[test]
    fn test_visited_nodes_are_skipped() {
        let graph = open_graph();
        let pool = WorkerPool::new(Arc::clone(&graph), 1);
        let mut state = SearchState::new(graph.node_count(), 0, None);
        state.settle(0);
        let snapshot = Arc::new(state.snapshot());
        let replies = pool
            .dispatch(vec![WorkItem::Bucket {
                nodes: vec![0],
                goal: 8,
                snapshot,
            }])
            .unwrap();
        assert!(replies[0].proposals.is_empty());
        assert_eq!(replies[0].explored, 0);
    }

    #[test]
    fn test_expand_dispatch_scores_neighbors() {
        let graph = open_graph();
        let pool = WorkerPool::new(Arc::clone(&graph), 2);
        let state = SearchState::new(graph.node_count(), 0, None);
        let snapshot = Arc::new(state.snapshot());
        let chunk: Vec<(NodeId, u64)> =
            graph.neighbors(0).iter().map(|e| (e.to, e.weight)).collect();
        let replies = pool
            .dispatch(vec![WorkItem::Expand {
                current: 0,
                current_cost: 0,
                chunk,
                goal: 8,
                heuristic: Heuristic::Manhattan,
                snapshot,
            }])
            .unwrap();
        let reply = &replies[0];
        assert_eq!(reply.proposals.len(), 2);
        for p in &reply.proposals {
            assert_eq!(p.g_cost, 20);
            // f = g + manhattan distance to the corner at min weight 20.
            assert_eq!(p.f_cost, 20 + 60);
        }
    }

    #[test]
    fn test_dispatch_barrier_returns_every_chunk() {
        let graph = open_graph();
        let pool = WorkerPool::new(Arc::clone(&graph), 3);
        let state = SearchState::new(graph.node_count(), 0, None);
        let snapshot = Arc::new(state.snapshot());
        let items: Vec<WorkItem> = (0..7)
            .map(|i| WorkItem::Bucket {
                nodes: vec![i % graph.node_count()],
                goal: 8,
                snapshot: Arc::clone(&snapshot),
            })
            .collect();
        let replies = pool.dispatch(items).unwrap();
        assert_eq!(replies.len(), 7);
    }

    #[test]
    fn test_stale_snapshot_proposals_are_still_emitted() {
        // Workers propose against their snapshot; the merge step is the one
        // that validates against the authoritative table.
        let graph = open_graph();
        let pool = WorkerPool::new(Arc::clone(&graph), 1);
        let mut state = SearchState::new(graph.node_count(), 0, None);
        let snapshot = Arc::new(state.snapshot());
        // Concurrent improvement lands after the snapshot was taken.
        state.commit(1, 0, 10);
        let replies = pool
            .dispatch(vec![WorkItem::Bucket {
                nodes: vec![0],
                goal: 8,
                snapshot,
            }])
            .unwrap();
        assert!(replies[0].proposals.iter().any(|p| p.target == 1 && p.g_cost == 20));
        assert_eq!(state.costs[1], 10);
    }
}

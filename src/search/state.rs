//! Shared search state: cost/parent/visited tables, snapshots, and the
//! relaxation primitive.
//!
//! One `SearchState` exists per search invocation, owned by the coordinating
//! thread. Workers never see it directly; each dispatch hands them an
//! immutable [`Snapshot`]. All commits go through the owner, which keeps the
//! check-then-set race-free without any per-element locking.

use crossbeam_channel::Sender;

use crate::graph::NodeId;

/// Sentinel for "not yet reached".
pub const INFINITY: u64 = u64::MAX;

/// The relaxation primitive: propose an improved cost for `target` based on
/// the caller-visible `costs` snapshot.
///
/// Pure with respect to the snapshot: it never writes, and it does not decide
/// whether the proposal is safe under concurrent writers. The scheduler's
/// merge step validates every proposal against the authoritative table before
/// committing.
pub fn try_relax(source_cost: u64, weight: u64, target: NodeId, costs: &[u64]) -> Option<u64> {
    if source_cost == INFINITY {
        return None;
    }
    let proposed = source_cost.saturating_add(weight);
    if proposed < costs[target] {
        Some(proposed)
    } else {
        None
    }
}

/// A settled-node notification: `node` was finalized as the `order`-th.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscoveryEvent {
    pub node: NodeId,
    pub order: u64,
}

/// Read-only view of the tables workers relax against during one dispatch.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub costs: Vec<u64>,
    pub visited: Vec<bool>,
}

/// Mutable best-cost/parent/visited tables for one search invocation.
#[derive(Debug)]
pub struct SearchState {
    pub costs: Vec<u64>,
    pub parents: Vec<Option<NodeId>>,
    pub visited: Vec<bool>,
    events: Option<Sender<DiscoveryEvent>>,
    discovered: u64,
}

impl SearchState {
    /// Fresh tables sized to the node count, with only `start` reached.
    pub fn new(node_count: usize, start: NodeId, events: Option<Sender<DiscoveryEvent>>) -> SearchState {
        let mut costs = vec![INFINITY; node_count];
        costs[start] = 0;
        SearchState {
            costs,
            parents: vec![None; node_count],
            visited: vec![false; node_count],
            events,
            discovered: 0,
        }
    }

    /// Clone the tables workers need for one dispatch round.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            costs: self.costs.clone(),
            visited: self.visited.clone(),
        }
    }

    /// Commit an improvement. Callers must have validated `cost` against the
    /// authoritative table; this is the single-writer commit point.
    pub fn commit(&mut self, target: NodeId, source: NodeId, cost: u64) {
        self.costs[target] = cost;
        self.parents[target] = Some(source);
    }

    /// Mark a node settled and emit its discovery event.
    ///
    /// Emission is fire-and-forget: a dropped or saturated consumer never
    /// affects scheduling, only observation.
    pub fn settle(&mut self, node: NodeId) {
        if !self.visited[node] {
            self.visited[node] = true;
            self.record_discovery(node);
        }
    }

    /// Emit a discovery event without touching the visited table. The
    /// parallel A* coordinator uses `visited` for frontier membership and
    /// reports settlement separately, on expansion.
    pub fn record_discovery(&mut self, node: NodeId) {
        self.discovered += 1;
        if let Some(tx) = &self.events {
            let _ = tx.send(DiscoveryEvent {
                node,
                order: self.discovered,
            });
        }
    }

    /// How many nodes have been reported settled so far.
    pub fn discovered(&self) -> u64 {
        self.discovered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;

    #[test]
    fn test_try_relax_proposes_strict_improvement() {
        let costs = vec![0, 100, INFINITY];
        assert_eq!(try_relax(0, 20, 1, &costs), Some(20));
        assert_eq!(try_relax(0, 20, 2, &costs), Some(20));
    }

    #[test]
    fn test_try_relax_rejects_equal_or_worse() {
        let costs = vec![0, 20, 40];
        assert_eq!(try_relax(0, 20, 1, &costs), None);
        assert_eq!(try_relax(0, 60, 2, &costs), None);
    }

    #[test]
    fn test_try_relax_never_proposes_from_unreached_source() {
        let costs = vec![INFINITY, INFINITY];
        assert_eq!(try_relax(INFINITY, 20, 1, &costs), None);
    }

    #[test]
    fn test_new_state_reaches_only_start() {
        let state = SearchState::new(4, 2, None);
        assert_eq!(state.costs, vec![INFINITY, INFINITY, 0, INFINITY]);
        assert!(state.parents.iter().all(|p| p.is_none()));
        assert!(state.visited.iter().all(|v| !v));
    }

    #[test]
    fn test_snapshot_is_detached_from_later_commits() {
        let mut state = SearchState::new(3, 0, None);
        let snap = state.snapshot();
        state.commit(1, 0, 20);
        assert_eq!(snap.costs[1], INFINITY);
        assert_eq!(state.costs[1], 20);
        assert_eq!(state.parents[1], Some(0));
    }

    #[test]
    fn test_settle_emits_each_node_once_in_order() {
        let (tx, rx) = unbounded();
        let mut state = SearchState::new(3, 0, Some(tx));
        state.settle(0);
        state.settle(2);
        state.settle(0);
        drop(state);
        let events: Vec<DiscoveryEvent> = rx.iter().collect();
        assert_eq!(
            events,
            vec![
                DiscoveryEvent { node: 0, order: 1 },
                DiscoveryEvent { node: 2, order: 2 },
            ]
        );
    }

    #[test]
    fn test_settle_survives_dropped_consumer() {
        let (tx, rx) = unbounded();
        drop(rx);
        let mut state = SearchState::new(2, 0, Some(tx));
        state.settle(1);
        assert!(state.visited[1]);
        assert_eq!(state.discovered(), 1);
    }
}

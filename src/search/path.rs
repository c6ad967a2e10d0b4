//! Path reconstruction from parent links.

use crate::graph::NodeId;
use crate::search::error::SearchError;

/// Walk parent links from `goal` back to `start` and return the forward path.
///
/// Callers must only invoke this after establishing that the goal's cost is
/// finite. Fails with `NoPathFound` if the chain breaks before reaching the
/// start, and with `ReconstructionCycle` if it runs longer than the node
/// count — parent links must form a DAG rooted at the start, so a longer walk
/// proves a scheduler bug and is surfaced rather than looped on.
pub fn reconstruct(parents: &[Option<NodeId>], start: NodeId, goal: NodeId) -> Result<Vec<NodeId>, SearchError> {
    let mut path = Vec::new();
    let mut current = goal;
    let mut hops = 0usize;
    loop {
        path.push(current);
        if current == start {
            break;
        }
        hops += 1;
        if hops > parents.len() {
            return Err(SearchError::ReconstructionCycle { node: current });
        }
        match parents[current] {
            Some(parent) => current = parent,
            None => return Err(SearchError::NoPathFound),
        }
    }
    path.reverse();
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reconstructs_forward_path() {
        // 0 -> 1 -> 3 -> 4
        let parents = vec![None, Some(0), None, Some(1), Some(3)];
        assert_eq!(reconstruct(&parents, 0, 4), Ok(vec![0, 1, 3, 4]));
    }

    #[test]
    fn test_start_equals_goal() {
        let parents = vec![None, None];
        assert_eq!(reconstruct(&parents, 1, 1), Ok(vec![1]));
    }

    #[test]
    fn test_broken_chain_is_no_path() {
        let parents = vec![None, None, Some(1)];
        assert_eq!(reconstruct(&parents, 0, 2), Err(SearchError::NoPathFound));
    }

    #[test]
    fn test_cycle_is_detected_not_looped() {
        // 1 and 2 point at each other.
        let parents = vec![None, Some(2), Some(1)];
        match reconstruct(&parents, 0, 2) {
            Err(SearchError::ReconstructionCycle { .. }) => {}
            other => panic!("expected ReconstructionCycle, got {:?}", other),
        }
    }
}

//! Search result types and statistics.

use std::time::Duration;

use crate::graph::NodeId;
use crate::search::config::Algorithm;

/// Result of a completed search: the ordered path plus the final tables the
/// rendering/reporting side consumes.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Node ids from start to goal inclusive.
    pub path: Vec<NodeId>,
    /// Total path cost (the goal's committed cost).
    pub cost: u64,
    /// Final best-cost table, indexed by node id.
    pub costs: Vec<u64>,
    /// Final predecessor table, indexed by node id.
    pub parents: Vec<Option<NodeId>>,
    /// Statistics from the search.
    pub statistics: SearchStatistics,
}

impl SearchResult {
    /// Number of nodes on the path.
    pub fn path_len(&self) -> usize {
        self.path.len()
    }
}

/// Statistics from a search operation.
#[derive(Debug, Clone, Default)]
pub struct SearchStatistics {
    /// Algorithm used for the search.
    pub algorithm: Algorithm,
    /// Total wall time spent searching.
    pub elapsed_time: Duration,
    /// Number of nodes expanded/settled during the search.
    pub nodes_explored: u64,
    /// Number of dispatch rounds (parallel engines) or main-loop iterations.
    pub rounds: u64,
    /// Number of proposals that survived the merge and were committed.
    pub proposals_committed: u64,
}

impl SearchStatistics {
    pub fn new(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            ..Default::default()
        }
    }

    /// Nodes explored per second.
    pub fn throughput(&self) -> f64 {
        let secs = self.elapsed_time.as_secs_f64();
        if secs == 0.0 {
            0.0
        } else {
            self.nodes_explored as f64 / secs
        }
    }

    /// Format statistics as a human-readable string.
    pub fn format_summary(&self) -> String {
        let mut s = String::new();
        s.push_str(&format!("Algorithm: {}\n", self.algorithm));
        s.push_str(&format!("Time: {:.2?}\n", self.elapsed_time));
        s.push_str(&format!("Nodes explored: {}\n", self.nodes_explored));
        if self.rounds > 0 {
            s.push_str(&format!("Rounds: {}\n", self.rounds));
        }
        if self.proposals_committed > 0 {
            s.push_str(&format!("Proposals committed: {}\n", self.proposals_committed));
        }
        s
    }
}

impl std::fmt::Display for SearchResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Path found: {} nodes, cost {}",
            self.path_len(),
            self.cost
        )?;
        write!(f, "{}", self.statistics.format_summary())
    }
}

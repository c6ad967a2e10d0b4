//! Algorithm and heuristic selection, plus the per-search context handle.

use std::sync::Arc;

use crossbeam_channel::Sender;

use crate::graph::Node;
use crate::search::parallel::CancelToken;
use crate::search::state::DiscoveryEvent;

/// Search algorithm selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Algorithm {
    /// Serial best-first search with a heuristic.
    #[default]
    AStar,
    /// Serial Dijkstra.
    Dijkstra,
    /// Serial Bellman-Ford (the only variant accepting negative weights).
    BellmanFord,
    /// Worker-pool A*: single-threaded frontier, parallel expansion.
    ParallelAStar,
    /// Delta-stepping parallel Dijkstra.
    DeltaStepping,
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Algorithm::AStar => write!(f, "a-star"),
            Algorithm::Dijkstra => write!(f, "dijkstra"),
            Algorithm::BellmanFord => write!(f, "bellman-ford"),
            Algorithm::ParallelAStar => write!(f, "parallel-a-star"),
            Algorithm::DeltaStepping => write!(f, "delta-stepping"),
        }
    }
}

impl std::str::FromStr for Algorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "a-star" | "astar" => Ok(Algorithm::AStar),
            "dijkstra" => Ok(Algorithm::Dijkstra),
            "bellman-ford" | "bellmanford" => Ok(Algorithm::BellmanFord),
            "parallel-a-star" | "parallel-astar" => Ok(Algorithm::ParallelAStar),
            "delta-stepping" | "delta" => Ok(Algorithm::DeltaStepping),
            _ => Err(format!(
                "Unknown algorithm: '{}'. Valid options: a-star, dijkstra, bellman-ford, parallel-a-star, delta-stepping",
                s
            )),
        }
    }
}

/// Heuristic selection for the A* variants.
///
/// Both are admissible and consistent on the uniform grid when scaled by the
/// graph's minimum edge weight; the same heuristic is applied to every node
/// of a search so frontier ordering stays coherent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Heuristic {
    #[default]
    Manhattan,
    Euclidean,
}

impl Heuristic {
    /// Estimated remaining cost from `from` to `goal`.
    ///
    /// `scale` is the minimum edge weight of the graph; Euclidean estimates
    /// are floored so they never overestimate.
    pub fn estimate(self, from: &Node, goal: &Node, scale: u64) -> u64 {
        let dr = from.row.abs_diff(goal.row) as u64;
        let dc = from.col.abs_diff(goal.col) as u64;
        match self {
            Heuristic::Manhattan => (dr + dc).saturating_mul(scale),
            Heuristic::Euclidean => {
                let dist = ((dr * dr + dc * dc) as f64).sqrt();
                (dist * scale as f64).floor() as u64
            }
        }
    }
}

impl std::fmt::Display for Heuristic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Heuristic::Manhattan => write!(f, "manhattan"),
            Heuristic::Euclidean => write!(f, "euclidean"),
        }
    }
}

impl std::str::FromStr for Heuristic {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "manhattan" => Ok(Heuristic::Manhattan),
            "euclidean" => Ok(Heuristic::Euclidean),
            _ => Err(format!(
                "Unknown heuristic: '{}'. Valid options: manhattan, euclidean",
                s
            )),
        }
    }
}

/// Per-search handle bundling the cancellation token and the optional
/// discovery-event sink. Constructed once per invocation and passed by
/// reference into the engine; there is no process-wide search state.
#[derive(Debug, Clone, Default)]
pub struct SearchContext {
    pub cancel: Arc<CancelToken>,
    pub events: Option<Sender<DiscoveryEvent>>,
}

impl SearchContext {
    /// Context with a fresh token and no event sink.
    pub fn new() -> SearchContext {
        SearchContext::default()
    }

    /// Attach a discovery-event sink.
    pub fn with_events(mut self, events: Sender<DiscoveryEvent>) -> SearchContext {
        self.events = Some(events);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Terrain;

    fn node(id: usize, row: usize, col: usize) -> Node {
        Node {
            id,
            row,
            col,
            terrain: Terrain::Open,
        }
    }

    #[test]
    fn test_algorithm_from_str() {
        assert_eq!("delta".parse::<Algorithm>(), Ok(Algorithm::DeltaStepping));
        assert_eq!("parallel-astar".parse::<Algorithm>(), Ok(Algorithm::ParallelAStar));
        assert_eq!("A_Star".parse::<Algorithm>(), Ok(Algorithm::AStar));
        assert!("bogus".parse::<Algorithm>().is_err());
    }

    #[test]
    fn test_algorithm_display_round_trips() {
        for algo in [
            Algorithm::AStar,
            Algorithm::Dijkstra,
            Algorithm::BellmanFord,
            Algorithm::ParallelAStar,
            Algorithm::DeltaStepping,
        ] {
            assert_eq!(algo.to_string().parse::<Algorithm>(), Ok(algo));
        }
    }

    #[test]
    fn test_manhattan_estimate() {
        let goal = node(0, 4, 4);
        assert_eq!(Heuristic::Manhattan.estimate(&node(1, 0, 0), &goal, 20), 160);
        assert_eq!(Heuristic::Manhattan.estimate(&goal, &goal, 20), 0);
    }

    #[test]
    fn test_euclidean_never_exceeds_manhattan() {
        let goal = node(0, 7, 2);
        for (row, col) in [(0, 0), (3, 5), (7, 2), (6, 0)] {
            let n = node(1, row, col);
            assert!(
                Heuristic::Euclidean.estimate(&n, &goal, 20)
                    <= Heuristic::Manhattan.estimate(&n, &goal, 20)
            );
        }
    }

    #[test]
    fn test_euclidean_floors_to_stay_admissible() {
        let goal = node(0, 1, 1);
        // sqrt(2) * 20 = 28.28.. -> 28, below the true two-step cost 40.
        assert_eq!(Heuristic::Euclidean.estimate(&node(1, 0, 0), &goal, 20), 28);
    }
}

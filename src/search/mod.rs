//! Shortest-path search engines over the grid graph.
//!
//! This module provides the search variants of the crate:
//! - Dijkstra: serial reference implementation
//! - A*: serial best-first search with an admissible heuristic
//! - Bellman-Ford: serial, the only variant accepting negative weights
//! - Delta-stepping: bucket-scheduled parallel Dijkstra over a worker pool
//! - Parallel A*: single-threaded frontier with pool-expanded neighbors

pub mod astar;
pub mod bellman_ford;
pub mod config;
pub mod dijkstra;
pub mod error;
pub mod frontier;
pub mod parallel;
pub mod path;
pub mod result;
pub mod state;

pub use config::{Algorithm, Heuristic, SearchContext};
pub use error::SearchError;
pub use parallel::{CancelToken, ParallelConfig};
pub use result::{SearchResult, SearchStatistics};
pub use state::{try_relax, DiscoveryEvent, INFINITY};

use std::time::Instant;

use crate::graph::NodeId;
use crate::search::state::SearchState;

/// Shared tail of every engine: stamp the elapsed time, demand a finite goal
/// cost, reconstruct the path, and package the tables into a result.
pub(crate) fn finalize(
    state: SearchState,
    start: NodeId,
    goal: NodeId,
    mut statistics: SearchStatistics,
    started: Instant,
) -> Result<SearchResult, SearchError> {
    statistics.elapsed_time = started.elapsed();
    if state.costs[goal] == INFINITY {
        return Err(SearchError::NoPathFound);
    }
    let path = path::reconstruct(&state.parents, start, goal)?;
    let cost = state.costs[goal];
    log::info!(
        "{} finished: cost {}, {} nodes explored in {:.2?}",
        statistics.algorithm,
        cost,
        statistics.nodes_explored,
        statistics.elapsed_time
    );
    Ok(SearchResult {
        path,
        cost,
        costs: state.costs,
        parents: state.parents,
        statistics,
    })
}

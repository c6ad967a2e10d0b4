//! parapath — parallel shortest-path search over weighted grid mazes.
//!
//! The crate builds a static graph from a maze of terrain tags and runs one
//! of five search engines over it: serial Dijkstra, serial A*, serial
//! Bellman-Ford, delta-stepping parallel Dijkstra, or worker-pool parallel
//! A*. The parallel engines share one protocol: workers propose relaxations
//! against read-only snapshots, and a single coordinating thread merges and
//! commits them at round barriers.

pub mod graph;
pub mod grid;
pub mod search;

pub use graph::{Edge, Graph, Node, NodeId, DEFAULT_EDGE_WEIGHT};
pub use grid::{Maze, ParseMazeError, Terrain};
pub use search::{
    Algorithm, CancelToken, DiscoveryEvent, Heuristic, ParallelConfig, SearchContext, SearchError,
    SearchResult, SearchStatistics, INFINITY,
};

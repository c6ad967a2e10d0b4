//! Parallel search engines: a shared worker pool driven by two coordinators.
//!
//! Both engines follow the same commit protocol: workers relax against a
//! read-only snapshot and return proposals; the coordinator merges each
//! round's proposals (minimum per target), validates them against the
//! authoritative tables, and is the only writer. Rounds are barriers — the
//! coordinator blocks until every dispatched chunk returns before merging.

pub mod astar;
pub mod channel;
pub mod config;
pub mod delta;
pub mod pool;

pub use channel::{merge_proposals, CancelToken, Proposal, WorkItem, WorkerReply};
pub use config::{ParallelConfig, DEFAULT_BUCKET_CEILING};
pub use pool::WorkerPool;

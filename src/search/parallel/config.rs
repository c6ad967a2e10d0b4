//! Configuration for the parallel search engines.

use crate::search::config::Heuristic;
use crate::search::error::SearchError;

/// Default ceiling on bucket indices, guarding against runaway loops on
/// malformed input.
pub const DEFAULT_BUCKET_CEILING: u64 = 1000;

/// Configuration for parallel search execution.
#[derive(Debug, Clone)]
pub struct ParallelConfig {
    /// Number of worker threads; `None` means available hardware parallelism.
    pub num_workers: Option<usize>,
    /// Delta-stepping bucket width; `None` auto-derives from the node count.
    pub delta: Option<u64>,
    /// Heuristic for the parallel A* variant.
    pub heuristic: Heuristic,
    /// Hard ceiling on bucket indices for delta-stepping.
    pub bucket_ceiling: u64,
    /// Optional ceiling on A* frontier iterations.
    pub round_ceiling: Option<u64>,
    /// Leave one hardware unit to the coordinator when auto-sizing the pool.
    pub reserve_coordinator: bool,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            num_workers: None,
            delta: None,
            heuristic: Heuristic::default(),
            bucket_ceiling: DEFAULT_BUCKET_CEILING,
            round_ceiling: None,
            reserve_coordinator: false,
        }
    }
}

impl ParallelConfig {
    /// Set an explicit number of worker threads.
    pub fn with_workers(mut self, num_workers: usize) -> Self {
        self.num_workers = Some(num_workers);
        self
    }

    /// Set an explicit bucket width.
    pub fn with_delta(mut self, delta: u64) -> Self {
        self.delta = Some(delta);
        self
    }

    /// Select the A* heuristic.
    pub fn with_heuristic(mut self, heuristic: Heuristic) -> Self {
        self.heuristic = heuristic;
        self
    }

    /// Set the delta-stepping bucket-index ceiling.
    pub fn with_bucket_ceiling(mut self, ceiling: u64) -> Self {
        self.bucket_ceiling = ceiling;
        self
    }

    /// Set the A* iteration ceiling.
    pub fn with_round_ceiling(mut self, ceiling: u64) -> Self {
        self.round_ceiling = Some(ceiling);
        self
    }

    /// Reserve one hardware unit for the coordinator when auto-sizing.
    pub fn with_reserved_coordinator(mut self, reserve: bool) -> Self {
        self.reserve_coordinator = reserve;
        self
    }

    /// Reject configurations the engines cannot run with.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.num_workers == Some(0) {
            return Err(SearchError::InvalidConfig(
                "worker count must be positive".into(),
            ));
        }
        if self.delta == Some(0) {
            return Err(SearchError::InvalidConfig("delta must be positive".into()));
        }
        if self.bucket_ceiling == 0 {
            return Err(SearchError::InvalidConfig(
                "bucket ceiling must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Resolved worker count.
    pub fn worker_count(&self) -> usize {
        match self.num_workers {
            Some(n) => n,
            None => {
                let available = num_cpus::get();
                if self.reserve_coordinator {
                    available.saturating_sub(1).max(1)
                } else {
                    available.max(1)
                }
            }
        }
    }

    /// Resolved bucket width: explicit, or `max(20, node_count / 100)`.
    pub fn delta_for(&self, node_count: usize) -> u64 {
        self.delta.unwrap_or_else(|| (node_count as u64 / 100).max(20))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ParallelConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.worker_count() >= 1);
        assert_eq!(config.bucket_ceiling, DEFAULT_BUCKET_CEILING);
    }

    #[test]
    fn test_config_builder() {
        let config = ParallelConfig::default()
            .with_workers(4)
            .with_delta(5)
            .with_heuristic(Heuristic::Euclidean)
            .with_bucket_ceiling(50)
            .with_round_ceiling(10_000);
        assert_eq!(config.worker_count(), 4);
        assert_eq!(config.delta_for(10_000), 5);
        assert_eq!(config.heuristic, Heuristic::Euclidean);
        assert_eq!(config.bucket_ceiling, 50);
        assert_eq!(config.round_ceiling, Some(10_000));
    }

    #[test]
    fn test_zero_workers_rejected() {
        let err = ParallelConfig::default().with_workers(0).validate().unwrap_err();
        assert!(matches!(err, SearchError::InvalidConfig(_)));
    }

    #[test]
    fn test_zero_delta_rejected() {
        let err = ParallelConfig::default().with_delta(0).validate().unwrap_err();
        assert!(matches!(err, SearchError::InvalidConfig(_)));
    }

    #[test]
    fn test_delta_auto_derivation() {
        let config = ParallelConfig::default();
        assert_eq!(config.delta_for(25), 20);
        assert_eq!(config.delta_for(2000), 20);
        assert_eq!(config.delta_for(10_000), 100);
    }

    #[test]
    fn test_reserved_coordinator_keeps_at_least_one_worker() {
        let config = ParallelConfig::default().with_reserved_coordinator(true);
        assert!(config.worker_count() >= 1);
    }
}

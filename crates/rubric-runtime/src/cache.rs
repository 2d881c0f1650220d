//! Point table cache.
//!
//! Memoizes each rubric's [`PointsIndex`] by rubric id so point-based
//! resolution pays the table construction cost once per rubric.

use moka::sync::Cache;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use rubric_core::{PointsIndex, Rubric, RubricId};

use crate::config::CacheConfig;

/// Point table cache using moka.
pub struct PointsIndexCache {
    cache: Cache<RubricId, Arc<PointsIndex>>,
    builds: AtomicU64,
}

impl PointsIndexCache {
    /// Create a new cache with the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let mut builder = Cache::builder().max_capacity(config.max_rubrics);
        if let Some(tti) = config.time_to_idle {
            builder = builder.time_to_idle(tti);
        }

        Self {
            cache: builder.build(),
            builds: AtomicU64::new(0),
        }
    }

    /// The rubric's table, building it on first use.
    ///
    /// Concurrent callers asking for the same rubric wait for a single build.
    pub fn get_or_build(&self, rubric: &Rubric) -> Arc<PointsIndex> {
        self.cache.get_with(rubric.id, || {
            self.builds.fetch_add(1, Ordering::SeqCst);
            tracing::debug!(rubric_id = %rubric.id, "Points index cache miss");
            Arc::new(PointsIndex::build(rubric))
        })
    }

    /// Cached table, if present.
    pub fn get(&self, id: RubricId) -> Option<Arc<PointsIndex>> {
        self.cache.get(&id)
    }

    /// Drop one rubric's table.
    pub fn invalidate(&self, id: RubricId) {
        self.cache.invalidate(&id);
    }

    /// Clear the cache.
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }

    /// Number of tables built since creation.
    pub fn builds(&self) -> u64 {
        self.builds.load(Ordering::SeqCst)
    }
}

impl Default for PointsIndexCache {
    fn default() -> Self {
        Self::new(&CacheConfig::default())
    }
}

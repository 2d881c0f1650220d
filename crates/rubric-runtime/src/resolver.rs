//! Runtime facade: stored rubrics, cached point tables, selection resolution.

use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;

use rubric_core::{
    resolve_by_points, NameSelection, OptionId, PointsSelection, Rubric, RubricId, RubricShape,
    SelectionError,
};

use crate::cache::PointsIndexCache;
use crate::config::RuntimeConfig;
use crate::store::RubricStore;
use crate::RuntimeError;

/// Outcome of grading one selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Score {
    pub option_ids: HashSet<OptionId>,
    pub points_earned: u64,
    pub points_possible: u64,
}

/// Resolves selections against stored rubrics.
///
/// Point tables are built at most once per rubric id and shared between
/// callers; name resolution needs no table.
pub struct RubricRuntime {
    store: RubricStore,
    cache: PointsIndexCache,
}

impl RubricRuntime {
    pub fn new(config: RuntimeConfig) -> Self {
        Self {
            store: RubricStore::new(),
            cache: PointsIndexCache::new(&config.cache),
        }
    }

    /// Store a rubric, reusing an existing one with identical content.
    pub fn register(&self, shape: &RubricShape) -> Result<Arc<Rubric>, RuntimeError> {
        Ok(self.store.get_or_create(shape)?)
    }

    /// Validate an untrusted shape document and register it.
    pub fn register_document(&self, document: &serde_json::Value) -> Result<Arc<Rubric>, RuntimeError> {
        let shape = RubricShape::from_value(document)?;
        self.register(&shape)
    }

    /// Look up a stored rubric.
    pub fn rubric(&self, id: RubricId) -> Result<Arc<Rubric>, RuntimeError> {
        self.store.get(id).ok_or(RuntimeError::UnknownRubric(id))
    }

    /// Option ids for a selection made by option name.
    pub fn options_ids(
        &self,
        id: RubricId,
        selection: &NameSelection,
    ) -> Result<HashSet<OptionId>, RuntimeError> {
        let rubric = self.rubric(id)?;
        rubric
            .options_ids(selection)
            .map_err(|e| rejected(&rubric, e))
    }

    /// Option ids for a selection made by point value, via the cached table.
    pub fn options_ids_for_points(
        &self,
        id: RubricId,
        selection: &PointsSelection,
    ) -> Result<HashSet<OptionId>, RuntimeError> {
        let rubric = self.rubric(id)?;
        let index = self.cache.get_or_build(&rubric);
        resolve_by_points(&rubric, &index, selection).map_err(|e| rejected(&rubric, e))
    }

    /// Resolve a point selection and total it.
    pub fn score_for_points(
        &self,
        id: RubricId,
        selection: &PointsSelection,
    ) -> Result<Score, RuntimeError> {
        let option_ids = self.options_ids_for_points(id, selection)?;
        let rubric = self.rubric(id)?;

        Ok(Score {
            points_earned: rubric.points_earned(&option_ids),
            points_possible: rubric.points_possible(),
            option_ids,
        })
    }

    /// The rubric storage backing this runtime.
    pub fn store(&self) -> &RubricStore {
        &self.store
    }

    /// The point table cache backing this runtime.
    pub fn cache(&self) -> &PointsIndexCache {
        &self.cache
    }
}

impl Default for RubricRuntime {
    fn default() -> Self {
        Self::new(RuntimeConfig::default())
    }
}

fn rejected(rubric: &Rubric, error: SelectionError) -> RuntimeError {
    tracing::warn!(rubric_id = %rubric.id, error = %error, "Invalid option selection");
    RuntimeError::InvalidOptionSelection(error)
}

//! In-memory rubric storage.
//!
//! Assigns stable identifiers to rubrics, criteria and options as they are
//! created and keeps every rubric for the life of the store. Rubrics whose
//! full content matches an existing one are reused rather than duplicated.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use rubric_core::{
    content_hash, Criterion, CriterionId, CriterionOption, Fingerprint, OptionId, Rubric, RubricId,
    RubricShape, ShapeError,
};

#[derive(Default)]
struct Tables {
    rubrics: HashMap<RubricId, Arc<Rubric>>,
    by_content: HashMap<Fingerprint, RubricId>,
}

/// Rubric storage with monotonic id sequences starting at 1.
pub struct RubricStore {
    tables: RwLock<Tables>,
    next_rubric: AtomicU64,
    next_criterion: AtomicU64,
    next_option: AtomicU64,
}

impl RubricStore {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
            next_rubric: AtomicU64::new(1),
            next_criterion: AtomicU64::new(1),
            next_option: AtomicU64::new(1),
        }
    }

    /// Store a new rubric built from a shape, assigning fresh ids.
    ///
    /// Shapes with duplicate criterion names, or duplicate option names
    /// within a criterion, are refused.
    pub fn create(&self, shape: &RubricShape) -> Result<Arc<Rubric>, ShapeError> {
        shape.check_names()?;
        let fingerprint = content_hash(shape);
        let rubric = Arc::new(self.build(shape));

        let mut tables = self.tables.write();
        tables.by_content.entry(fingerprint).or_insert(rubric.id);
        tables.rubrics.insert(rubric.id, Arc::clone(&rubric));

        tracing::info!(rubric_id = %rubric.id, criteria = rubric.criteria().len(), "Rubric created");
        Ok(rubric)
    }

    /// Return the stored rubric with identical content, or create one.
    pub fn get_or_create(&self, shape: &RubricShape) -> Result<Arc<Rubric>, ShapeError> {
        shape.check_names()?;
        let fingerprint = content_hash(shape);

        {
            let tables = self.tables.read();
            if let Some(existing) = tables
                .by_content
                .get(&fingerprint)
                .and_then(|id| tables.rubrics.get(id))
            {
                tracing::debug!(rubric_id = %existing.id, "Reusing rubric with identical content");
                return Ok(Arc::clone(existing));
            }
        }

        let mut tables = self.tables.write();
        // Another writer may have stored it between the two locks
        if let Some(existing) = tables
            .by_content
            .get(&fingerprint)
            .and_then(|id| tables.rubrics.get(id))
        {
            return Ok(Arc::clone(existing));
        }

        let rubric = Arc::new(self.build(shape));
        tables.by_content.insert(fingerprint, rubric.id);
        tables.rubrics.insert(rubric.id, Arc::clone(&rubric));

        tracing::info!(rubric_id = %rubric.id, criteria = rubric.criteria().len(), "Rubric created");
        Ok(rubric)
    }

    /// Look up a rubric by id.
    pub fn get(&self, id: RubricId) -> Option<Arc<Rubric>> {
        self.tables.read().rubrics.get(&id).cloned()
    }

    pub fn len(&self) -> usize {
        self.tables.read().rubrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn build(&self, shape: &RubricShape) -> Rubric {
        // Ids follow the shape's sequence order, so creation order breaks
        // order_num ties
        let criteria = shape
            .criteria
            .iter()
            .map(|criterion| {
                let options = criterion
                    .options
                    .iter()
                    .map(|option| {
                        CriterionOption::new(
                            OptionId(self.next_option.fetch_add(1, Ordering::SeqCst)),
                            option.name.clone(),
                            option.order_num,
                            option.points,
                        )
                        .with_explanation(option.explanation.clone())
                    })
                    .collect();

                Criterion::new(
                    CriterionId(self.next_criterion.fetch_add(1, Ordering::SeqCst)),
                    criterion.name.clone(),
                    criterion.order_num,
                    options,
                )
                .with_prompt(criterion.prompt.clone())
            })
            .collect();

        Rubric::new(RubricId(self.next_rubric.fetch_add(1, Ordering::SeqCst)), criteria)
            .with_prompt(shape.prompt.clone())
    }
}

impl Default for RubricStore {
    fn default() -> Self {
        Self::new()
    }
}

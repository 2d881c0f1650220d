//! Point → option lookup table for a rubric.
//!
//! Building the table touches every option of the rubric once. It is cheap
//! to query and immutable after construction, so it can be shared behind an
//! `Arc` by whatever layer caches it.

use std::collections::HashMap;

use crate::types::{OptionId, Rubric, RubricId};

/// Per-criterion map from point value to the first option worth that much.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointsIndex {
    rubric_id: RubricId,
    by_criterion: HashMap<String, HashMap<u32, OptionId>>,
    option_count: usize,
}

impl PointsIndex {
    /// Build the table for a rubric.
    pub fn build(rubric: &Rubric) -> Self {
        let mut by_criterion = HashMap::with_capacity(rubric.criteria().len());
        let mut option_count = 0;

        for criterion in rubric.criteria() {
            let mut by_points = HashMap::with_capacity(criterion.options().len());
            for option in criterion.options() {
                // Options are in defined order, so the first insert wins ties
                by_points.entry(option.points).or_insert(option.id);
                option_count += 1;
            }
            by_criterion.insert(criterion.name.clone(), by_points);
        }

        tracing::debug!(rubric_id = %rubric.id, options = option_count, "Built points index");

        Self {
            rubric_id: rubric.id,
            by_criterion,
            option_count,
        }
    }

    /// Rubric this table was built from.
    pub fn rubric_id(&self) -> RubricId {
        self.rubric_id
    }

    /// Option of `criterion` worth `points`, if any.
    pub fn lookup(&self, criterion: &str, points: u32) -> Option<OptionId> {
        self.by_criterion
            .get(criterion)
            .and_then(|by_points| by_points.get(&points))
            .copied()
    }

    /// Number of options visited while building.
    pub fn option_count(&self) -> usize {
        self.option_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_rubric;
    use crate::types::{Criterion, CriterionId, CriterionOption};

    #[test]
    fn test_lookup() {
        let rubric = sample_rubric();
        let index = PointsIndex::build(&rubric);

        assert_eq!(index.rubric_id(), rubric.id);
        assert_eq!(index.option_count(), 12);
        assert_eq!(
            index.lookup("test criterion 2", 1),
            Some(rubric.criteria()[2].options()[1].id)
        );
        assert_eq!(index.lookup("test criterion 2", 9), None);
        assert_eq!(index.lookup("no such criterion", 0), None);
    }

    #[test]
    fn test_duplicate_points_keep_lowest_order_num() {
        let rubric = Rubric::new(
            RubricId(1),
            vec![Criterion::new(
                CriterionId(1),
                "c",
                0,
                vec![
                    CriterionOption::new(OptionId(30), "late", 9, 2),
                    CriterionOption::new(OptionId(10), "early", 1, 2),
                ],
            )],
        );
        assert_eq!(PointsIndex::build(&rubric).lookup("c", 2), Some(OptionId(10)));
    }
}

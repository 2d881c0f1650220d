//! Rubric data model.
//!
//! A rubric owns an ordered list of criteria; each criterion owns an ordered
//! list of options. Identifiers are assigned by whatever stores the rubric
//! and are treated as opaque here.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_type!(
    /// Stable identifier of a rubric. Also the cache key for per-rubric tables.
    RubricId
);
id_type!(
    /// Stable identifier of a criterion.
    CriterionId
);
id_type!(
    /// Stable identifier of a criterion option.
    OptionId
);

/// A single named, point-valued choice within a criterion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CriterionOption {
    pub id: OptionId,

    /// Unique within the owning criterion
    pub name: String,

    /// Display and processing order
    pub order_num: u32,

    pub points: u32,

    /// Free text shown to graders (non-structural)
    #[serde(default)]
    pub explanation: String,
}

impl CriterionOption {
    pub fn new(id: OptionId, name: impl Into<String>, order_num: u32, points: u32) -> Self {
        Self {
            id,
            name: name.into(),
            order_num,
            points,
            explanation: String::new(),
        }
    }

    /// Attach explanation text.
    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = explanation.into();
        self
    }
}

/// A named scoring dimension with an ordered set of options.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Criterion {
    pub id: CriterionId,

    /// Unique within the owning rubric; the key graders select by
    pub name: String,

    pub order_num: u32,

    /// Free text shown to graders (non-structural)
    #[serde(default)]
    pub prompt: String,

    options: Vec<CriterionOption>,
}

impl Criterion {
    /// Create a criterion. Options are kept sorted by `order_num`; options
    /// sharing an `order_num` keep the order they were given in.
    pub fn new(
        id: CriterionId,
        name: impl Into<String>,
        order_num: u32,
        mut options: Vec<CriterionOption>,
    ) -> Self {
        options.sort_by_key(|option| option.order_num);
        Self {
            id,
            name: name.into(),
            order_num,
            prompt: String::new(),
            options,
        }
    }

    /// Attach prompt text.
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// Options in defined order.
    pub fn options(&self) -> &[CriterionOption] {
        &self.options
    }

    /// Find an option by its name.
    pub fn option_named(&self, name: &str) -> Option<&CriterionOption> {
        self.options.iter().find(|option| option.name == name)
    }

    /// Name → option view.
    pub fn options_by_name(&self) -> HashMap<&str, &CriterionOption> {
        self.options
            .iter()
            .map(|option| (option.name.as_str(), option))
            .collect()
    }

    /// First option (in defined order) worth exactly `points`.
    pub fn option_for_points(&self, points: u32) -> Option<&CriterionOption> {
        self.options.iter().find(|option| option.points == points)
    }

    /// Highest point value of any option, or 0 for a criterion without options.
    pub fn points_possible(&self) -> u32 {
        self.options
            .iter()
            .map(|option| option.points)
            .max()
            .unwrap_or(0)
    }
}

/// An ordered collection of criteria used to grade a submission.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Rubric {
    pub id: RubricId,

    /// Free text shown to graders (non-structural)
    #[serde(default)]
    pub prompt: String,

    criteria: Vec<Criterion>,
}

impl Rubric {
    /// Create a rubric. Criteria are kept sorted by `order_num` with a
    /// stable sort.
    pub fn new(id: RubricId, mut criteria: Vec<Criterion>) -> Self {
        criteria.sort_by_key(|criterion| criterion.order_num);
        Self {
            id,
            prompt: String::new(),
            criteria,
        }
    }

    /// Attach prompt text.
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// Criteria in defined order.
    pub fn criteria(&self) -> &[Criterion] {
        &self.criteria
    }

    /// Find a criterion by its name.
    pub fn criterion_named(&self, name: &str) -> Option<&Criterion> {
        self.criteria.iter().find(|criterion| criterion.name == name)
    }

    /// Find an option anywhere in the rubric, along with its criterion.
    pub fn option(&self, id: OptionId) -> Option<(&Criterion, &CriterionOption)> {
        self.criteria.iter().find_map(|criterion| {
            criterion
                .options
                .iter()
                .find(|option| option.id == id)
                .map(|option| (criterion, option))
        })
    }

    /// Total options across every criterion.
    pub fn option_count(&self) -> usize {
        self.criteria.iter().map(|c| c.options.len()).sum()
    }

    /// Maximum achievable score: the sum of each criterion's best option.
    ///
    /// Totals are `u64` so any number of `u32` point values fits.
    pub fn points_possible(&self) -> u64 {
        self.criteria
            .iter()
            .map(|criterion| u64::from(criterion.points_possible()))
            .sum()
    }

    /// Score of a set of selected options. Ids that are not part of this
    /// rubric contribute nothing.
    pub fn points_earned(&self, option_ids: &HashSet<OptionId>) -> u64 {
        self.criteria
            .iter()
            .flat_map(|criterion| criterion.options.iter())
            .filter(|option| option_ids.contains(&option.id))
            .map(|option| u64::from(option.points))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn criterion() -> Criterion {
        Criterion::new(
            CriterionId(1),
            "clarity",
            0,
            vec![
                CriterionOption::new(OptionId(12), "excellent", 2, 5),
                CriterionOption::new(OptionId(10), "poor", 0, 0),
                CriterionOption::new(OptionId(11), "fair", 1, 3),
            ],
        )
    }

    #[test]
    fn test_options_sorted_by_order_num() {
        let criterion = criterion();
        let names: Vec<_> = criterion
            .options()
            .iter()
            .map(|o| o.name.as_str())
            .collect();
        assert_eq!(names, ["poor", "fair", "excellent"]);
    }

    #[test]
    fn test_equal_order_num_keeps_creation_order() {
        let criterion = Criterion::new(
            CriterionId(1),
            "tied",
            0,
            vec![
                CriterionOption::new(OptionId(1), "first", 0, 1),
                CriterionOption::new(OptionId(2), "second", 0, 1),
            ],
        );
        assert_eq!(criterion.option_for_points(1).unwrap().name, "first");
    }

    #[test]
    fn test_name_and_points_views() {
        let criterion = criterion();
        assert_eq!(criterion.option_named("fair").unwrap().id, OptionId(11));
        assert!(criterion.option_named("missing").is_none());
        assert_eq!(criterion.options_by_name().len(), 3);
        assert_eq!(criterion.option_for_points(5).unwrap().id, OptionId(12));
        assert!(criterion.option_for_points(4).is_none());
    }

    #[test]
    fn test_points_possible_and_earned() {
        let rubric = Rubric::new(
            RubricId(7),
            vec![
                criterion(),
                Criterion::new(
                    CriterionId(2),
                    "grammar",
                    1,
                    vec![
                        CriterionOption::new(OptionId(20), "bad", 0, 0),
                        CriterionOption::new(OptionId(21), "good", 1, 2),
                    ],
                ),
                Criterion::new(CriterionId(3), "feedback only", 2, vec![]),
            ],
        );

        assert_eq!(rubric.points_possible(), 7);
        assert_eq!(rubric.option_count(), 5);

        let selected = HashSet::from([OptionId(11), OptionId(21), OptionId(999)]);
        assert_eq!(rubric.points_earned(&selected), 5);
    }

    #[test]
    fn test_totals_do_not_overflow_u32() {
        let rubric = Rubric::new(
            RubricId(1),
            (0..2)
                .map(|c| {
                    Criterion::new(
                        CriterionId(c + 1),
                        format!("criterion {}", c),
                        c as u32,
                        vec![CriterionOption::new(OptionId(c + 10), "max", 0, u32::MAX)],
                    )
                })
                .collect(),
        );

        assert_eq!(rubric.points_possible(), 2 * u64::from(u32::MAX));
        let selected = HashSet::from([OptionId(10), OptionId(11)]);
        assert_eq!(rubric.points_earned(&selected), 2 * u64::from(u32::MAX));
    }

    #[test]
    fn test_option_lookup_by_id() {
        let rubric = Rubric::new(RubricId(1), vec![criterion()]);
        let (criterion, option) = rubric.option(OptionId(10)).unwrap();
        assert_eq!(criterion.name, "clarity");
        assert_eq!(option.name, "poor");
        assert!(rubric.option(OptionId(42)).is_none());
    }

    #[test]
    fn test_criteria_sorted_by_order_num() {
        let rubric = Rubric::new(
            RubricId(1),
            vec![
                Criterion::new(CriterionId(2), "second", 1, vec![]),
                Criterion::new(CriterionId(1), "first", 0, vec![]),
            ],
        );
        assert_eq!(rubric.criteria()[0].name, "first");
        assert!(rubric.criterion_named("second").is_some());
        assert!(rubric.criterion_named("third").is_none());
    }
}

//! Selection resolution: graders' named choices to canonical option ids.
//!
//! Both entry points share one validation policy. The selection's keys must
//! be exactly the rubric's criterion names, and every criterion must resolve
//! to one of its own options. Anything else is rejected as a whole; no
//! partial result is ever returned.

use serde_json::Value;
use std::collections::{BTreeSet, HashMap, HashSet};
use thiserror::Error;

use crate::index::PointsIndex;
use crate::types::{OptionId, Rubric, RubricId};

/// Criterion name → option name.
pub type NameSelection = HashMap<String, String>;

/// Criterion name → point value.
pub type PointsSelection = HashMap<String, u32>;

/// An invalid option selection.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Selection does not match rubric criteria (missing: {missing:?}, unexpected: {unexpected:?})")]
    CriteriaMismatch {
        /// Rubric criteria absent from the selection, sorted
        missing: Vec<String>,
        /// Selection keys that name no criterion, sorted
        unexpected: Vec<String>,
    },

    #[error("Criterion '{criterion}' has no option named '{option}'")]
    UnknownOption { criterion: String, option: String },

    #[error("Criterion '{criterion}' has no option worth {points} points")]
    NoOptionWithPoints { criterion: String, points: u32 },

    #[error("Selection must map criterion names to choices")]
    NotAMapping,

    #[error("Criterion '{criterion}' has an unusable choice {value}")]
    UnusableValue { criterion: String, value: String },

    #[error("Points index belongs to rubric {index}, not rubric {rubric}")]
    ForeignIndex { rubric: RubricId, index: RubricId },
}

/// Read a by-name selection from an untrusted document. Every value must
/// be a string.
pub fn name_selection_from_value(document: &Value) -> Result<NameSelection, SelectionError> {
    selection_from_value(document, |value| value.as_str().map(str::to_string))
}

/// Read a by-points selection from an untrusted document. Every value must
/// be a whole number that fits a point value; `2.0` counts as `2`.
pub fn points_selection_from_value(document: &Value) -> Result<PointsSelection, SelectionError> {
    selection_from_value(document, whole_points)
}

fn selection_from_value<V>(
    document: &Value,
    convert: impl Fn(&Value) -> Option<V>,
) -> Result<HashMap<String, V>, SelectionError> {
    let entries = document.as_object().ok_or(SelectionError::NotAMapping)?;

    entries
        .iter()
        .map(|(criterion, value)| {
            convert(value)
                .map(|choice| (criterion.clone(), choice))
                .ok_or_else(|| SelectionError::UnusableValue {
                    criterion: criterion.clone(),
                    value: value.to_string(),
                })
        })
        .collect()
}

fn whole_points(value: &Value) -> Option<u32> {
    if let Some(n) = value.as_u64() {
        return u32::try_from(n).ok();
    }
    value
        .as_f64()
        .filter(|f| f.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(f))
        .map(|f| f as u32)
}

/// Resolve a selection made by option name.
pub fn resolve_by_name(
    rubric: &Rubric,
    selection: &NameSelection,
) -> Result<HashSet<OptionId>, SelectionError> {
    check_criteria(rubric, selection)?;

    rubric
        .criteria()
        .iter()
        .map(|criterion| {
            // Presence is guaranteed by check_criteria
            let option_name = &selection[&criterion.name];
            criterion
                .option_named(option_name)
                .map(|option| option.id)
                .ok_or_else(|| SelectionError::UnknownOption {
                    criterion: criterion.name.clone(),
                    option: option_name.clone(),
                })
        })
        .collect()
}

/// Resolve a selection made by point value against a prebuilt table.
///
/// When several options of a criterion share the requested value, the one
/// that comes first in the criterion's order wins. The table must have been
/// built from `rubric`.
pub fn resolve_by_points(
    rubric: &Rubric,
    index: &PointsIndex,
    selection: &PointsSelection,
) -> Result<HashSet<OptionId>, SelectionError> {
    if index.rubric_id() != rubric.id {
        return Err(SelectionError::ForeignIndex {
            rubric: rubric.id,
            index: index.rubric_id(),
        });
    }
    check_criteria(rubric, selection)?;

    rubric
        .criteria()
        .iter()
        .map(|criterion| {
            let points = selection[&criterion.name];
            index
                .lookup(&criterion.name, points)
                .ok_or_else(|| SelectionError::NoOptionWithPoints {
                    criterion: criterion.name.clone(),
                    points,
                })
        })
        .collect()
}

/// The selection's key set must equal the rubric's criterion name set.
fn check_criteria<V>(rubric: &Rubric, selection: &HashMap<String, V>) -> Result<(), SelectionError> {
    let names: HashSet<&str> = rubric.criteria().iter().map(|c| c.name.as_str()).collect();

    let missing: BTreeSet<&str> = names
        .iter()
        .copied()
        .filter(|name| !selection.contains_key(*name))
        .collect();
    let unexpected: BTreeSet<&str> = selection
        .keys()
        .map(String::as_str)
        .filter(|key| !names.contains(key))
        .collect();

    if missing.is_empty() && unexpected.is_empty() {
        return Ok(());
    }

    tracing::debug!(
        rubric_id = %rubric.id,
        missing = missing.len(),
        unexpected = unexpected.len(),
        "Selection criteria mismatch"
    );

    Err(SelectionError::CriteriaMismatch {
        missing: missing.into_iter().map(str::to_string).collect(),
        unexpected: unexpected.into_iter().map(str::to_string).collect(),
    })
}

impl Rubric {
    /// Option ids for a selection made by option name.
    pub fn options_ids(&self, selection: &NameSelection) -> Result<HashSet<OptionId>, SelectionError> {
        resolve_by_name(self, selection)
    }

    /// Option ids for a selection made by point value.
    ///
    /// Builds the point table on every call. Callers resolving repeatedly
    /// against the same rubric should keep a [`PointsIndex`] around (or use a
    /// cache keyed by rubric id) and call [`resolve_by_points`] directly.
    pub fn options_ids_for_points(
        &self,
        selection: &PointsSelection,
    ) -> Result<HashSet<OptionId>, SelectionError> {
        resolve_by_points(self, &PointsIndex::build(self), selection)
    }
}

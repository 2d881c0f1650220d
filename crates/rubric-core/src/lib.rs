//! # rubric-core
//!
//! Deterministic rubric selection resolution and structure fingerprinting.
//!
//! A rubric is an ordered list of criteria, each with an ordered list of
//! point-valued options. Graders pick one option per criterion. This crate:
//!
//! 1. **Resolves selections**: criterion name → option name (or point value)
//!    becomes a set of canonical option ids, or the whole selection is
//!    rejected.
//! 2. **Fingerprints structure**: a SHA-256 digest of names, order values and
//!    points that ignores prompts, explanations and unknown keys.
//!
//! Storage and caching are left to callers; see `rubric-runtime`.
//!
//! ## Example
//!
//! ```rust,ignore
//! use rubric_core::{RubricShape, structure_hash};
//!
//! let shape = RubricShape::from_file("rubric.yaml")?;
//! println!("{}", structure_hash(&shape));
//!
//! let ids = rubric.options_ids_for_points(&points)?;
//! ```

pub mod index;
pub mod selection;
pub mod structure;
pub mod types;

#[cfg(test)]
mod test_support;

// Re-export main types at crate root
pub use index::PointsIndex;
pub use selection::{
    name_selection_from_value, points_selection_from_value, resolve_by_name, resolve_by_points,
    NameSelection, PointsSelection, SelectionError,
};
pub use structure::{
    content_hash, is_valid_shape, structure_hash, structure_hash_from_value,
    validate_shape_schema, CriterionShape, Fingerprint, OptionShape, RubricShape, ShapeError,
};
pub use types::{Criterion, CriterionId, CriterionOption, OptionId, Rubric, RubricId};

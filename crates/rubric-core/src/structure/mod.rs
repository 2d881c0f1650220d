//! Rubric shapes and their fingerprints.
//!
//! A shape is the nested, serializable description of a rubric: ordered
//! criteria, each with ordered options. Shapes may come from a live
//! [`Rubric`](crate::Rubric) or from untrusted documents; unknown keys are
//! accepted at every level and never influence a fingerprint.

mod fingerprint;
mod schema;
mod shape;

pub use fingerprint::{content_hash, structure_hash, structure_hash_from_value, Fingerprint};
pub use schema::{is_valid_shape, validate_shape_schema};
pub use shape::{CriterionShape, OptionShape, RubricShape, ShapeError};

//! Structure and content fingerprints.
//!
//! A fingerprint is a SHA-256 digest over a canonical projection of a shape.
//! The projection picks exactly the fields that matter and feeds them to the
//! hasher in input order, each string length-prefixed and each sequence
//! count-prefixed so no two distinct projections share an encoding.
//!
//! Structure: criterion `name`/`order_num`, option `name`/`order_num`/`points`.
//! Content: the structure fields plus rubric prompt, criterion prompts and
//! option explanations.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

use super::shape::{RubricShape, ShapeError};
use crate::types::Rubric;

const STRUCTURE_TAG: &[u8] = b"rubric-structure/v1";
const CONTENT_TAG: &[u8] = b"rubric-content/v1";

/// Lowercase hex SHA-256 digest of a rubric projection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which projection to encode.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Projection {
    Structure,
    Content,
}

struct CanonicalHasher {
    hasher: Sha256,
}

impl CanonicalHasher {
    fn new(tag: &[u8]) -> Self {
        let mut hasher = Self {
            hasher: Sha256::new(),
        };
        hasher.bytes(tag);
        hasher
    }

    fn bytes(&mut self, bytes: &[u8]) {
        self.count(bytes.len());
        self.hasher.update(bytes);
    }

    fn text(&mut self, text: &str) {
        self.bytes(text.as_bytes());
    }

    fn number(&mut self, value: u32) {
        self.hasher.update(value.to_le_bytes());
    }

    fn count(&mut self, len: usize) {
        self.hasher.update((len as u64).to_le_bytes());
    }

    fn finish(self) -> Fingerprint {
        Fingerprint(hex::encode(self.hasher.finalize()))
    }
}

fn digest(shape: &RubricShape, projection: Projection) -> Fingerprint {
    let content = projection == Projection::Content;
    let mut h = CanonicalHasher::new(if content { CONTENT_TAG } else { STRUCTURE_TAG });

    if content {
        h.text(&shape.prompt);
    }

    h.count(shape.criteria.len());
    for criterion in &shape.criteria {
        h.text(&criterion.name);
        h.number(criterion.order_num);
        if content {
            h.text(&criterion.prompt);
        }

        h.count(criterion.options.len());
        for option in &criterion.options {
            h.text(&option.name);
            h.number(option.order_num);
            h.number(option.points);
            if content {
                h.text(&option.explanation);
            }
        }
    }

    h.finish()
}

/// Digest of a rubric's shape: names, order values and points only.
pub fn structure_hash(shape: &RubricShape) -> Fingerprint {
    digest(shape, Projection::Structure)
}

/// Digest of a rubric's full content, including prompts and explanations.
pub fn content_hash(shape: &RubricShape) -> Fingerprint {
    digest(shape, Projection::Content)
}

/// Structure digest of an untrusted document. Unknown keys are ignored;
/// missing or mistyped structural fields are a [`ShapeError`].
pub fn structure_hash_from_value(value: &serde_json::Value) -> Result<Fingerprint, ShapeError> {
    Ok(structure_hash(&RubricShape::from_value(value)?))
}

impl Rubric {
    /// Structure digest of this rubric.
    pub fn structure_hash(&self) -> Fingerprint {
        structure_hash(&RubricShape::from(self))
    }

    /// Content digest of this rubric.
    pub fn content_hash(&self) -> Fingerprint {
        content_hash(&RubricShape::from(self))
    }
}

//! Rubric shape documents (YAML/JSON).

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

use super::schema::validate_shape_schema;
use crate::types::{Criterion, CriterionOption, Rubric};

/// Errors that can occur when reading shape documents.
#[derive(Error, Debug)]
pub enum ShapeError {
    #[error("Failed to read rubric file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Rubric shape is malformed: {}", .0.join("; "))]
    SchemaViolations(Vec<String>),

    #[error("Duplicate criterion name '{0}'")]
    DuplicateCriterion(String),

    #[error("Criterion '{criterion}' has more than one option named '{option}'")]
    DuplicateOption { criterion: String, option: String },
}

/// Option level of a rubric shape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OptionShape {
    pub name: String,

    #[serde(deserialize_with = "whole_number::deserialize")]
    pub order_num: u32,

    #[serde(deserialize_with = "whole_number::deserialize")]
    pub points: u32,

    #[serde(default)]
    pub explanation: String,
}

/// Criterion level of a rubric shape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CriterionShape {
    pub name: String,

    #[serde(deserialize_with = "whole_number::deserialize")]
    pub order_num: u32,

    #[serde(default)]
    pub prompt: String,

    #[serde(default)]
    pub options: Vec<OptionShape>,
}

/// Nested description of a rubric, independent of storage identifiers.
///
/// Sequence order is kept exactly as given; it is part of the structure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct RubricShape {
    #[serde(default)]
    pub prompt: String,

    #[serde(default)]
    pub criteria: Vec<CriterionShape>,
}

impl RubricShape {
    /// Decode a generic document after checking it against the shape schema.
    pub fn from_value(value: &serde_json::Value) -> Result<Self, ShapeError> {
        validate_shape_schema(value).map_err(ShapeError::SchemaViolations)?;
        let shape = Self::deserialize(value)?;
        shape.check_names()?;
        Ok(shape)
    }

    /// Criterion names must be unique within the rubric, and option names
    /// within their criterion. Selections address both by name.
    pub fn check_names(&self) -> Result<(), ShapeError> {
        let mut criteria = HashSet::with_capacity(self.criteria.len());
        for criterion in &self.criteria {
            if !criteria.insert(criterion.name.as_str()) {
                return Err(ShapeError::DuplicateCriterion(criterion.name.clone()));
            }

            let mut options = HashSet::with_capacity(criterion.options.len());
            for option in &criterion.options {
                if !options.insert(option.name.as_str()) {
                    return Err(ShapeError::DuplicateOption {
                        criterion: criterion.name.clone(),
                        option: option.name.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Parse a shape from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ShapeError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        Self::from_value(&value)
    }

    /// Parse a shape from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ShapeError> {
        let value: serde_json::Value = serde_yaml::from_str(yaml)?;
        Self::from_value(&value)
    }

    /// Read a shape from a file; `.yaml`/`.yml` are YAML, anything else JSON.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ShapeError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        if is_yaml_path(path) {
            Self::from_yaml(&contents)
        } else {
            Self::from_json(&contents)
        }
    }
}

pub(crate) fn is_yaml_path(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yaml") | Some("yml")
    )
}

/// `u32` from any integral number. JSON Schema's `integer` admits `5.0`,
/// so decoding does too.
mod whole_number {
    use serde::de::{self, Deserializer, Unexpected, Visitor};
    use std::fmt;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<u32, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(WholeNumber)
    }

    struct WholeNumber;

    impl<'de> Visitor<'de> for WholeNumber {
        type Value = u32;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a whole number between 0 and 4294967295")
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<u32, E> {
            u32::try_from(v).map_err(|_| E::invalid_value(Unexpected::Unsigned(v), &self))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<u32, E> {
            u32::try_from(v).map_err(|_| E::invalid_value(Unexpected::Signed(v), &self))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<u32, E> {
            if v.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(&v) {
                Ok(v as u32)
            } else {
                Err(E::invalid_value(Unexpected::Float(v), &self))
            }
        }
    }
}

impl From<&CriterionOption> for OptionShape {
    fn from(option: &CriterionOption) -> Self {
        Self {
            name: option.name.clone(),
            order_num: option.order_num,
            points: option.points,
            explanation: option.explanation.clone(),
        }
    }
}

impl From<&Criterion> for CriterionShape {
    fn from(criterion: &Criterion) -> Self {
        Self {
            name: criterion.name.clone(),
            order_num: criterion.order_num,
            prompt: criterion.prompt.clone(),
            options: criterion.options().iter().map(OptionShape::from).collect(),
        }
    }
}

impl From<&Rubric> for RubricShape {
    fn from(rubric: &Rubric) -> Self {
        Self {
            prompt: rubric.prompt.clone(),
            criteria: rubric.criteria().iter().map(CriterionShape::from).collect(),
        }
    }
}

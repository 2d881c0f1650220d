//! Shape schema checks.
//!
//! `schema/rubric.schema.json` is compiled on first use. Every violation is
//! reported with the JSON pointer of the offending value, so a document
//! with several problems can be fixed in one pass.

use jsonschema::{ValidationError, Validator};
use serde_json::Value;
use std::sync::OnceLock;

const SHAPE_SCHEMA: &str = include_str!("../../../../schema/rubric.schema.json");

static VALIDATOR: OnceLock<Result<Validator, String>> = OnceLock::new();

fn validator() -> Result<&'static Validator, &'static str> {
    VALIDATOR
        .get_or_init(|| {
            let schema: Value = serde_json::from_str(SHAPE_SCHEMA)
                .map_err(|e| format!("shape schema is not JSON: {}", e))?;
            jsonschema::options()
                .build(&schema)
                .map_err(|e| format!("shape schema does not compile: {}", e))
        })
        .as_ref()
        .map_err(String::as_str)
}

/// `<pointer>: <message>`, with `/` standing for the document root.
fn describe(error: &ValidationError<'_>) -> String {
    match error.instance_path.to_string() {
        path if path.is_empty() => format!("/: {}", error),
        path => format!("{}: {}", path, error),
    }
}

/// Check a shape document, collecting every violation.
pub fn validate_shape_schema(document: &Value) -> Result<(), Vec<String>> {
    let validator = validator().map_err(|e| vec![e.to_string()])?;
    let violations: Vec<String> = validator.iter_errors(document).map(|e| describe(&e)).collect();

    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

pub fn is_valid_shape(document: &Value) -> bool {
    validator().is_ok_and(|v| v.is_valid(document))
}

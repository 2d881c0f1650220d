//! Fixtures shared by unit tests.

use serde_json::{json, Value};

use crate::types::{Criterion, CriterionId, CriterionOption, OptionId, Rubric, RubricId};

pub const NUM_CRITERIA: usize = 4;
pub const NUM_OPTIONS: usize = 3;

/// Four criteria of three options each; option `n` is worth `n` points.
/// Option ids are `criterion * 10 + option + 100`.
pub fn sample_rubric() -> Rubric {
    let criteria = (0..NUM_CRITERIA)
        .map(|c| {
            let options = (0..NUM_OPTIONS)
                .map(|o| {
                    CriterionOption::new(
                        OptionId((100 + c * 10 + o) as u64),
                        format!("test option {}", o),
                        o as u32,
                        o as u32,
                    )
                })
                .collect();
            Criterion::new(CriterionId(c as u64 + 1), format!("test criterion {}", c), c as u32, options)
        })
        .collect();
    Rubric::new(RubricId(1), criteria)
}

/// A realistic shape document with prompts and explanations.
pub fn sample_shape_json() -> Value {
    json!({
        "prompt": "Create a plan to deliver ora-gen to the masses",
        "criteria": [
            {
                "order_num": 0,
                "name": "vocabulary",
                "prompt": "How varied is the vocabulary?",
                "options": [
                    { "order_num": 0, "points": 0, "name": "Poor", "explanation": "Poor job" },
                    { "order_num": 1, "points": 1, "name": "Good", "explanation": "Good job" },
                    { "order_num": 2, "points": 3, "name": "Excellent", "explanation": "Excellent job" }
                ]
            },
            {
                "order_num": 1,
                "name": "grammar",
                "prompt": "How correct is the grammar?",
                "options": [
                    { "order_num": 0, "points": 0, "name": "Bad", "explanation": "Bad job" },
                    { "order_num": 1, "points": 1, "name": "Good", "explanation": "Good job" },
                    { "order_num": 2, "points": 2, "name": "Excellent", "explanation": "Excellent job" }
                ]
            }
        ]
    })
}

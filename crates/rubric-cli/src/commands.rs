//! Subcommand implementations.

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

use rubric_core::{
    content_hash, name_selection_from_value, points_selection_from_value, structure_hash, OptionId,
    Rubric, RubricShape, ShapeError,
};
use rubric_runtime::{RubricRuntime, RuntimeConfig, RuntimeError};

use crate::{Cli, Command};

/// One chosen option, in criterion order.
#[derive(Debug, Serialize)]
struct SelectedOption {
    criterion: String,
    option: String,
    points: u32,
    option_id: OptionId,
}

#[derive(Debug, Serialize)]
struct ResolutionReport {
    structure_fingerprint: String,
    selected: Vec<SelectedOption>,
    points_earned: u64,
    points_possible: u64,
    resolved_at: DateTime<Utc>,
}

pub fn run(cli: &Cli) -> Result<ExitCode> {
    match &cli.command {
        Command::Fingerprint { file, content } => fingerprint(file, *content),
        Command::Validate { file } => validate(file),
        Command::Resolve {
            rubric,
            selection,
            points,
        } => resolve(cli, rubric, selection, *points),
    }
}

fn fingerprint(file: &Path, content: bool) -> Result<ExitCode> {
    let shape = RubricShape::from_value(&load_document(file)?)
        .with_context(|| format!("invalid rubric {}", file.display()))?;

    let digest = if content {
        content_hash(&shape)
    } else {
        structure_hash(&shape)
    };
    println!("{}", digest);
    Ok(ExitCode::SUCCESS)
}

/// Runs the same checks `fingerprint` and `resolve` apply, so a document
/// reported "ok" is accepted by both.
fn validate(file: &Path) -> Result<ExitCode> {
    let errors = match RubricShape::from_value(&load_document(file)?) {
        Ok(_) => {
            println!("ok");
            return Ok(ExitCode::SUCCESS);
        }
        Err(ShapeError::SchemaViolations(errors)) => errors,
        Err(other) => vec![other.to_string()],
    };

    for error in &errors {
        println!("{}", error);
    }
    tracing::debug!(file = %file.display(), errors = errors.len(), "Shape validation failed");
    Ok(ExitCode::FAILURE)
}

fn resolve(cli: &Cli, rubric_file: &Path, selection_file: &Path, by_points: bool) -> Result<ExitCode> {
    let config = match &cli.config {
        Some(path) => RuntimeConfig::from_file(path)?,
        None => RuntimeConfig::from_env()?,
    };
    let runtime = RubricRuntime::new(config);

    let rubric = runtime
        .register_document(&load_document(rubric_file)?)
        .with_context(|| format!("invalid rubric {}", rubric_file.display()))?;

    // Unusable choices (negative points, numbers for names) are invalid
    // selections, not unreadable files
    let document = load_document(selection_file)?;
    let option_ids = if by_points {
        let selection =
            points_selection_from_value(&document).map_err(RuntimeError::InvalidOptionSelection)?;
        runtime.options_ids_for_points(rubric.id, &selection)?
    } else {
        let selection =
            name_selection_from_value(&document).map_err(RuntimeError::InvalidOptionSelection)?;
        runtime.options_ids(rubric.id, &selection)?
    };

    let report = ResolutionReport {
        structure_fingerprint: rubric.structure_hash().to_string(),
        selected: selected_options(&rubric, &option_ids),
        points_earned: rubric.points_earned(&option_ids),
        points_possible: rubric.points_possible(),
        resolved_at: Utc::now(),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(ExitCode::SUCCESS)
}

fn selected_options(rubric: &Rubric, option_ids: &HashSet<OptionId>) -> Vec<SelectedOption> {
    rubric
        .criteria()
        .iter()
        .flat_map(|criterion| {
            criterion
                .options()
                .iter()
                .filter(|option| option_ids.contains(&option.id))
                .map(move |option| SelectedOption {
                    criterion: criterion.name.clone(),
                    option: option.name.clone(),
                    points: option.points,
                    option_id: option.id,
                })
        })
        .collect()
}

/// Read a YAML (`.yaml`/`.yml`) or JSON document.
fn load_document(path: &Path) -> Result<serde_json::Value> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;

    let parsed = match path.extension().and_then(|ext| ext.to_str()) {
        Some("yaml") | Some("yml") => serde_yaml::from_str(&contents)
            .with_context(|| format!("failed to parse YAML {}", path.display()))?,
        _ => serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse JSON {}", path.display()))?,
    };
    Ok(parsed)
}

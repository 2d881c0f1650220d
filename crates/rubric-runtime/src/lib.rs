//! # rubric-runtime
//!
//! In-memory collaborators for `rubric-core`.
//!
//! The core crate is pure: it never stores rubrics and never caches. This
//! crate supplies both:
//! - `RubricStore` assigns stable ids and deduplicates identical rubrics
//! - `PointsIndexCache` builds each rubric's point table at most once
//! - `RubricRuntime` resolves selections through both
//!
//! ## Example
//!
//! ```rust,ignore
//! use rubric_runtime::{RubricRuntime, RuntimeConfig};
//!
//! let runtime = RubricRuntime::new(RuntimeConfig::from_env()?);
//! let rubric = runtime.register(&shape)?;
//! let ids = runtime.options_ids_for_points(rubric.id, &points)?;
//! ```

pub mod cache;
pub mod config;
pub mod resolver;
pub mod store;

pub use cache::PointsIndexCache;
pub use config::{CacheConfig, RuntimeConfig};
pub use resolver::{RubricRuntime, Score};
pub use store::RubricStore;

use rubric_core::{RubricId, SelectionError, ShapeError};
use thiserror::Error;

/// Errors from the runtime.
#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("Unknown rubric: {0}")]
    UnknownRubric(RubricId),

    #[error("Invalid option selection: {0}")]
    InvalidOptionSelection(#[from] SelectionError),

    #[error("Rubric shape error: {0}")]
    Shape(#[from] ShapeError),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

// Multi-Environment Comparison Report
//
// Stitches several result directories (one per deployment environment) into
// a single Markdown document: an environment overview, QPS and latency
// comparisons across thread counts, and a chapter per environment.
//
// Each environment is collected from its raw results, so the merge works on
// typed runs instead of re-reading rendered Markdown tables.

mod environment;
mod render;

pub use environment::{EnvironmentFacts, EnvironmentReport};
pub use render::{MergedReport, COMPARED_SCENARIOS, COMPARED_THREADS};

use crate::config::CorrelationConfig;
use crate::sample_store::MetricSchema;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MergeError {
    #[error("No environments given")]
    NoEnvironments,

    #[error("Environment result directory not found: {}", .0.display())]
    MissingEnvironment(PathBuf),

    #[error("Failed to collect environment {name}")]
    Collect {
        name: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },
}

/// Collect every environment and build the merged report
///
/// All environments must be present; a missing one aborts the merge rather
/// than producing a comparison with silent gaps.
pub fn merge_environments<P: AsRef<Path>>(
    dirs: &[P],
    schema: &MetricSchema,
    config: &CorrelationConfig,
) -> Result<MergedReport, MergeError> {
    if dirs.is_empty() {
        return Err(MergeError::NoEnvironments);
    }

    let mut environments = Vec::with_capacity(dirs.len());
    for dir in dirs {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(MergeError::MissingEnvironment(dir.to_path_buf()));
        }
        let env = EnvironmentReport::collect(dir, schema.clone(), config).map_err(|err| {
            MergeError::Collect {
                name: dir.display().to_string(),
                source: err.into(),
            }
        })?;
        environments.push(env);
    }

    Ok(MergedReport::new(environments))
}

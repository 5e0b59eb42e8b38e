//! CLI entry-point for the clustering stage.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args as ClapArgs;
use tracing::{info, instrument};

use crate::{config::Settings, network, nlp::DensityTopicModel};

/// Args for the `cluster` command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Reflections CSV with UserName, Condition and text columns.
    pub input: PathBuf,
    /// Destination of the ENA matrix CSV.
    pub output: PathBuf,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let model = DensityTopicModel::new(settings.topic_model);
    info!(params = ?model.params(), "initialising topic model");
    let summary = network::run_topic_stage(&args.input, &args.output, &model)
        .with_context(|| format!("clustering {}", args.input.display()))?;
    info!(
        documents = summary.documents,
        topics = summary.topics,
        outliers = summary.outliers,
        codes = summary.codes,
        descriptions = %summary.descriptions_path.display(),
        assignments = %summary.assignments_path.display(),
        "topic stage finished"
    );
    Ok(())
}

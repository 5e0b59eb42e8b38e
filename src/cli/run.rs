//! CLI entry-point for the full two-stage pipeline.

use anyhow::{Context, Result};
use tracing::{info, instrument};

use crate::{
    config::Settings,
    pipeline::{Orchestrator, ProcessStage},
};

#[instrument(skip(settings))]
pub async fn run(settings: Settings) -> Result<()> {
    let clustering = clustering_stage(&settings)?;
    let analysis = ProcessStage::new(
        "3D ENA visualisation",
        settings.analysis_program.as_str(),
        vec![settings.analysis_script.display().to_string()],
    )
    .with_probe(vec!["--version".to_string()]);

    info!(input = %settings.input_path.display(), "starting TopicENA pipeline");
    let mut orchestrator = Orchestrator::new(settings, clustering, analysis);
    let report = orchestrator.run().await?;

    let stdout = report.analysis_output.stdout.trim();
    if !stdout.is_empty() {
        println!("{stdout}");
    }
    info!(
        outputs = %orchestrator.settings().outputs_dir.display(),
        warnings = report.warnings.len(),
        "pipeline finished"
    );
    Ok(())
}

/// Stage 1 is this binary's `cluster` command unless overridden.
fn clustering_stage(settings: &Settings) -> Result<ProcessStage> {
    let stage = match settings.cluster_command.split_first() {
        Some((program, args)) => {
            ProcessStage::new("topic modelling", program.as_str(), args.to_vec())
        }
        None => {
            let exe = std::env::current_exe().context("locating topicena executable")?;
            ProcessStage::new("topic modelling", exe, vec!["cluster".to_string()])
        }
    };
    Ok(stage)
}

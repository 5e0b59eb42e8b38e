//! Two-stage pipeline orchestration.
//!
//! `Init → ValidatingInput → Stage1Running → Stage2Running → Done`, with
//! `Failed` reachable from every state after `Init`. The matrix file is the
//! only channel between the stages; stage 2 starts only after stage 1 exits.

pub mod stage;

use std::{fmt, path::Path};

use tracing::{error, info, warn};

use crate::{
    config::Settings,
    error::{PipelineError, PipelineResult},
};

pub use stage::{ProcessStage, Stage, StageOutput, TopicStage};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineState {
    Init,
    ValidatingInput,
    Stage1Running,
    Stage2Running,
    Done,
    Failed(String),
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Init => f.write_str("init"),
            Self::ValidatingInput => f.write_str("validating input"),
            Self::Stage1Running => f.write_str("stage 1 running"),
            Self::Stage2Running => f.write_str("stage 2 running"),
            Self::Done => f.write_str("done"),
            Self::Failed(_) => f.write_str("failed"),
        }
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone, Default)]
pub struct PipelineReport {
    /// Pre-flight problems that did not stop the run.
    pub warnings: Vec<String>,
    pub clustering_output: StageOutput,
    pub analysis_output: StageOutput,
}

/// Drives the clustering stage then the analysis stage.
pub struct Orchestrator<C, A> {
    settings: Settings,
    clustering: C,
    analysis: A,
    history: Vec<PipelineState>,
}

impl<C, A> Orchestrator<C, A>
where
    C: Stage,
    A: Stage,
{
    pub fn new(settings: Settings, clustering: C, analysis: A) -> Self {
        Self {
            settings,
            clustering,
            analysis,
            history: vec![PipelineState::Init],
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Current state.
    pub fn state(&self) -> &PipelineState {
        self.history.last().unwrap_or(&PipelineState::Init)
    }

    /// Every state entered so far, starting with `Init`.
    pub fn history(&self) -> &[PipelineState] {
        &self.history
    }

    /// Run both stages, stopping at the first failure.
    pub async fn run(&mut self) -> PipelineResult<PipelineReport> {
        let mut report = PipelineReport::default();
        match self.drive(&mut report).await {
            Ok(()) => {
                self.transition(PipelineState::Done);
                Ok(report)
            }
            Err(err) => {
                error!(state = %self.state(), %err, "pipeline failed");
                self.transition(PipelineState::Failed(err.to_string()));
                Err(err)
            }
        }
    }

    async fn drive(&mut self, report: &mut PipelineReport) -> PipelineResult<()> {
        self.transition(PipelineState::ValidatingInput);
        self.validate(report).await?;

        let input = self.settings.input_path.clone();
        let matrix = self.settings.matrix_path.clone();

        self.transition(PipelineState::Stage1Running);
        info!(stage = self.clustering.name(), "[Step 1/2] running topic model");
        report.clustering_output = self.clustering.run(&[input, matrix.clone()]).await?;
        info!(stage = self.clustering.name(), "completed successfully");

        self.transition(PipelineState::Stage2Running);
        info!(stage = self.analysis.name(), "[Step 2/2] running network analysis");
        report.analysis_output = self.analysis.run(&[matrix]).await?;
        info!(stage = self.analysis.name(), "completed successfully");
        Ok(())
    }

    async fn validate(&self, report: &mut PipelineReport) -> PipelineResult<()> {
        let input = &self.settings.input_path;
        let is_file = tokio::fs::metadata(input)
            .await
            .map(|meta| meta.is_file())
            .unwrap_or(false);
        if !is_file {
            return Err(PipelineError::InputNotFound {
                path: input.clone(),
            });
        }

        let matrix_dir = self.settings.matrix_path.parent().unwrap_or(Path::new(""));
        for dir in [matrix_dir, self.settings.outputs_dir.as_path()] {
            if !dir.as_os_str().is_empty() {
                tokio::fs::create_dir_all(dir).await?;
            }
        }

        if let Err(err) = self.analysis.preflight().await {
            warn!(stage = self.analysis.name(), %err, "pre-flight check failed");
            report.warnings.push(err.to_string());
        }
        Ok(())
    }

    fn transition(&mut self, next: PipelineState) {
        info!(from = %self.state(), to = %next, "pipeline transition");
        self.history.push(next);
    }
}

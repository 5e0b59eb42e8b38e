//! Uniform contract for pipeline stages, in or out of process.

use std::{
    path::{Path, PathBuf},
    process::Stdio,
    sync::Arc,
};

use tokio::process::Command;
use tracing::{debug, instrument};

use crate::{
    error::{PipelineError, PipelineResult},
    network,
    nlp::TopicAssigner,
};

/// Text a stage emitted while succeeding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StageOutput {
    pub stdout: String,
    pub stderr: String,
}

/// A step of the pipeline. Stages communicate only through the file paths
/// they are handed.
#[allow(async_fn_in_trait)]
pub trait Stage {
    /// Name used in logs and failure reports.
    fn name(&self) -> &str;

    /// Cheap availability check run before anything executes. Failures are
    /// reported as warnings only.
    async fn preflight(&self) -> PipelineResult<()> {
        Ok(())
    }

    /// Run to completion. Failures carry the stage's diagnostic verbatim.
    async fn run(&self, args: &[PathBuf]) -> PipelineResult<StageOutput>;
}

/// Stage backed by an external program; paths are appended as positional
/// arguments after the configured ones.
#[derive(Debug, Clone)]
pub struct ProcessStage {
    name: String,
    program: PathBuf,
    args: Vec<String>,
    probe: Option<Vec<String>>,
}

impl ProcessStage {
    pub fn new(name: impl Into<String>, program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            name: name.into(),
            program: program.into(),
            args,
            probe: None,
        }
    }

    /// Probe the program with `args` (e.g. `--version`) during pre-flight.
    pub fn with_probe(mut self, args: Vec<String>) -> Self {
        self.probe = Some(args);
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl Stage for ProcessStage {
    fn name(&self) -> &str {
        &self.name
    }

    async fn preflight(&self) -> PipelineResult<()> {
        let Some(probe) = &self.probe else {
            return Ok(());
        };
        let status = Command::new(&self.program)
            .args(probe)
            .stdin(Stdio::null())
            .output()
            .await
            .map(|output| output.status.success());
        match status {
            Ok(true) => Ok(()),
            _ => Err(PipelineError::MissingOptionalTool {
                tool: self.program.display().to_string(),
            }),
        }
    }

    #[instrument(skip_all, fields(stage = %self.name, program = %self.program.display()))]
    async fn run(&self, args: &[PathBuf]) -> PipelineResult<StageOutput> {
        debug!(args = ?self.args, paths = ?args, "spawning stage process");
        let output = Command::new(&self.program)
            .args(&self.args)
            .args(args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|err| {
                PipelineError::stage(
                    &self.name,
                    format!("could not start {}: {err}", self.program.display()),
                )
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        if !output.status.success() {
            let diagnostic = if stderr.trim().is_empty() {
                format!("{} exited with {}", self.program.display(), output.status)
            } else {
                stderr
            };
            return Err(PipelineError::stage(&self.name, diagnostic));
        }
        debug!(stdout_bytes = stdout.len(), "stage process exited cleanly");
        Ok(StageOutput { stdout, stderr })
    }
}

/// Clustering stage executed inside the current process.
///
/// Expects `[input, output]` like the out-of-process `cluster` command.
#[derive(Debug)]
pub struct TopicStage<A> {
    name: String,
    assigner: Arc<A>,
}

impl<A> TopicStage<A> {
    pub fn new(name: impl Into<String>, assigner: A) -> Self {
        Self {
            name: name.into(),
            assigner: Arc::new(assigner),
        }
    }
}

impl<A> Stage for TopicStage<A>
where
    A: TopicAssigner + Send + Sync + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self, args: &[PathBuf]) -> PipelineResult<StageOutput> {
        let [input, output] = args else {
            return Err(PipelineError::stage(
                &self.name,
                format!("expected input and output paths, got {}", args.len()),
            ));
        };
        let (input, output) = (input.clone(), output.clone());
        let assigner = Arc::clone(&self.assigner);
        let summary = tokio::task::spawn_blocking(move || {
            network::run_topic_stage(&input, &output, assigner.as_ref())
        })
        .await
        .map_err(|err| PipelineError::stage(&self.name, err.to_string()))?
        .map_err(|err| PipelineError::stage(&self.name, err.to_string()))?;

        Ok(StageOutput {
            stdout: format!(
                "{} documents, {} topics, {} codes written to {}",
                summary.documents,
                summary.topics,
                summary.codes,
                summary.matrix_path.display()
            ),
            stderr: String::new(),
        })
    }
}

//! Network-matrix formatting: topic assignments to ENA-ready tables.

pub mod descriptions;
pub mod labels;
pub mod matrix;

use std::{
    fs::File,
    path::{Path, PathBuf},
};

use polars::prelude::{CsvWriter, DataFrame, SerWriter};
use tracing::{info, instrument};

use crate::{
    data::{self, DocumentRecord},
    error::PipelineResult,
    nlp::{TopicAssigner, TopicAssignment},
};

pub use labels::{sanitize_label, LabelMap};
pub use matrix::{annotate, NetworkMatrix, TopicColumn};

/// File-name fragment that sidecar paths substitute.
const MATRIX_MARKER: &str = "topic_matrix";

/// What stage 1 produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicStageSummary {
    pub documents: usize,
    pub topics: usize,
    pub outliers: usize,
    pub codes: usize,
    pub matrix_path: PathBuf,
    pub descriptions_path: PathBuf,
    pub assignments_path: PathBuf,
}

/// Annotate `records` with their topics and pivot them into the ENA matrix.
pub fn format_network(
    records: &mut [DocumentRecord],
    assignment: &TopicAssignment,
) -> PipelineResult<(LabelMap, NetworkMatrix)> {
    let labels = LabelMap::from_catalogue(&assignment.catalogue);
    annotate(records, &assignment.topic_ids, &labels)?;
    let matrix = NetworkMatrix::from_records(records, &labels);
    Ok((labels, matrix))
}

/// Stage 1 end to end: load, assign topics, write matrix and sidecars.
#[instrument(skip_all, fields(input = %input.display(), output = %output.display()))]
pub fn run_topic_stage<A>(
    input: &Path,
    output: &Path,
    assigner: &A,
) -> PipelineResult<TopicStageSummary>
where
    A: TopicAssigner + ?Sized,
{
    let mut records = data::load_documents(input)?;
    let documents: Vec<String> = records.iter().map(|r| r.text.clone()).collect();

    info!(documents = documents.len(), "fitting topic model");
    let assignment = assigner.assign(&documents)?;

    let (labels, matrix) = format_network(&mut records, &assignment)?;
    matrix.write_csv(output)?;

    let descriptions_path = descriptions_path(output);
    descriptions::write_descriptions(&descriptions_path, &assignment.catalogue, &labels)?;
    let assignments_path = assignments_path(output);
    descriptions::write_assignments(&assignments_path, &records)?;

    Ok(TopicStageSummary {
        documents: records.len(),
        topics: assignment.catalogue.len(),
        outliers: assignment.outlier_count(),
        codes: matrix.topics.len(),
        matrix_path: output.to_path_buf(),
        descriptions_path,
        assignments_path,
    })
}

/// Where the topic descriptions for `matrix` live.
pub fn descriptions_path(matrix: &Path) -> PathBuf {
    sibling_path(matrix, "topic_descriptions", "descriptions")
}

/// Where the per-document topic assignments for `matrix` live.
pub fn assignments_path(matrix: &Path) -> PathBuf {
    sibling_path(matrix, "topic_assignments", "assignments")
}

fn sibling_path(matrix: &Path, replacement: &str, suffix: &str) -> PathBuf {
    let file_name = matrix
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    if file_name.contains(MATRIX_MARKER) {
        return matrix.with_file_name(file_name.replace(MATRIX_MARKER, replacement));
    }
    let stem = matrix
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = matrix
        .extension()
        .map(|ext| ext.to_string_lossy().into_owned())
        .unwrap_or_else(|| "csv".to_string());
    matrix.with_file_name(format!("{stem}_{suffix}.{extension}"))
}

pub(crate) fn write_frame(path: &Path, df: &mut DataFrame) -> PipelineResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let mut file = File::create(path)?;
    CsvWriter::new(&mut file).finish(df)?;
    Ok(())
}

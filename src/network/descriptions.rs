//! Sidecar tables: topic descriptions and per-document assignments.

use std::path::Path;

use polars::prelude::{DataFrame, NamedFrom, Series};
use tracing::info;

use crate::{
    data::{
        loader::{CONDITION_COLUMN, TEXT_COLUMN, USER_COLUMN},
        DocumentRecord,
    },
    error::PipelineResult,
    network::{labels::LabelMap, write_frame},
    nlp::TopicCatalogue,
};

/// Write one row per catalogue topic, the outlier topic included.
pub fn write_descriptions(
    path: &Path,
    catalogue: &TopicCatalogue,
    labels: &LabelMap,
) -> PipelineResult<()> {
    let mut ids = Vec::with_capacity(catalogue.len());
    let mut counts = Vec::with_capacity(catalogue.len());
    let mut names = Vec::with_capacity(catalogue.len());
    let mut column_labels = Vec::with_capacity(catalogue.len());
    let mut representations = Vec::with_capacity(catalogue.len());
    let mut representative_docs = Vec::with_capacity(catalogue.len());
    for (id, descriptor) in catalogue.iter() {
        ids.push(id);
        counts.push(descriptor.count as i64);
        names.push(descriptor.name.clone());
        column_labels.push(labels.get(id).unwrap_or_default().to_string());
        representations.push(serde_json::to_string(&descriptor.representation)?);
        representative_docs.push(serde_json::to_string(&descriptor.representative_docs)?);
    }

    let mut df = DataFrame::new(vec![
        Series::new("Topic".into(), ids),
        Series::new("Count".into(), counts),
        Series::new("Name".into(), names),
        Series::new("Label".into(), column_labels),
        Series::new("Representation".into(), representations),
        Series::new("Representative_Docs".into(), representative_docs),
    ])?;
    write_frame(path, &mut df)?;
    info!(path = %path.display(), topics = df.height(), "saved topic definitions");
    Ok(())
}

/// Write the annotated documents: loader columns plus `Topic_ID` and `Topic_Label`.
pub fn write_assignments(path: &Path, records: &[DocumentRecord]) -> PipelineResult<()> {
    let user_names: Vec<String> = records.iter().map(|r| r.user_name.clone()).collect();
    let conditions: Vec<String> = records.iter().map(|r| r.condition.clone()).collect();
    let texts: Vec<String> = records.iter().map(|r| r.text.clone()).collect();
    let topic_ids: Vec<Option<i64>> = records.iter().map(|r| r.topic_id).collect();
    let topic_labels: Vec<Option<String>> =
        records.iter().map(|r| r.topic_label.clone()).collect();

    let mut df = DataFrame::new(vec![
        Series::new(USER_COLUMN.into(), user_names),
        Series::new(CONDITION_COLUMN.into(), conditions),
        Series::new(TEXT_COLUMN.into(), texts),
        Series::new("Topic_ID".into(), topic_ids),
        Series::new("Topic_Label".into(), topic_labels),
    ])?;
    write_frame(path, &mut df)?;
    info!(path = %path.display(), rows = df.height(), "saved topic assignments");
    Ok(())
}

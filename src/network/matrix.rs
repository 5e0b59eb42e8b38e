//! One-hot unit × code matrix for epistemic network analysis.

use std::{collections::BTreeMap, path::Path};

use polars::prelude::{DataFrame, NamedFrom, Series};
use tracing::{info, warn};

use crate::{
    data::{loader::CONDITION_COLUMN, loader::USER_COLUMN, DocumentRecord},
    error::{PipelineError, PipelineResult},
    network::{labels::LabelMap, write_frame},
};

/// One topic code column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicColumn {
    pub topic_id: i64,
    pub label: String,
    /// 1 where the row's document carries this topic, else 0.
    pub values: Vec<i32>,
}

/// Identity columns plus one-hot topic columns, rows in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkMatrix {
    pub user_names: Vec<String>,
    pub conditions: Vec<String>,
    pub topics: Vec<TopicColumn>,
}

/// Record each document's topic id and label in place.
pub fn annotate(
    records: &mut [DocumentRecord],
    topic_ids: &[i64],
    labels: &LabelMap,
) -> PipelineResult<()> {
    if records.len() != topic_ids.len() {
        return Err(PipelineError::Clustering(format!(
            "topic model returned {} ids for {} documents",
            topic_ids.len(),
            records.len()
        )));
    }
    let mut unlabelled = 0usize;
    for (record, id) in records.iter_mut().zip(topic_ids) {
        record.topic_id = Some(*id);
        record.topic_label = labels.get(*id).map(str::to_string);
        if record.topic_label.is_none() {
            unlabelled += 1;
        }
    }
    if unlabelled > 0 {
        warn!(
            unlabelled,
            "topic ids missing from catalogue; rows will carry no code"
        );
    }
    Ok(())
}

impl NetworkMatrix {
    /// Pivot annotated records into one 0/1 column per used label, ordered by
    /// label, then drop the outlier topic's column.
    pub fn from_records(records: &[DocumentRecord], labels: &LabelMap) -> Self {
        let mut used: BTreeMap<&str, i64> = BTreeMap::new();
        for record in records {
            if let (Some(id), Some(label)) = (record.topic_id, record.topic_label.as_deref()) {
                used.entry(label).or_insert(id);
            }
        }

        let topics = used
            .into_iter()
            .map(|(label, topic_id)| TopicColumn {
                topic_id,
                label: label.to_string(),
                values: records
                    .iter()
                    .map(|r| i32::from(r.topic_id == Some(topic_id)))
                    .collect(),
            })
            .collect();

        let mut matrix = Self {
            user_names: records.iter().map(|r| r.user_name.clone()).collect(),
            conditions: records.iter().map(|r| r.condition.clone()).collect(),
            topics,
        };
        if let Some(dropped) = matrix.drop_topic(labels.outlier()) {
            info!(column = %dropped.label, "dropping outlier column from ENA input");
        }
        matrix
    }

    fn drop_topic(&mut self, topic_id: i64) -> Option<TopicColumn> {
        let position = self.topics.iter().position(|c| c.topic_id == topic_id)?;
        Some(self.topics.remove(position))
    }

    pub fn height(&self) -> usize {
        self.user_names.len()
    }

    /// Header in output order.
    pub fn column_names(&self) -> Vec<String> {
        [USER_COLUMN, CONDITION_COLUMN]
            .iter()
            .map(|c| c.to_string())
            .chain(self.topics.iter().map(|c| c.label.clone()))
            .collect()
    }

    /// Number of codes present per row.
    pub fn row_sums(&self) -> Vec<i32> {
        (0..self.height())
            .map(|row| self.topics.iter().map(|c| c.values[row]).sum())
            .collect()
    }

    pub fn to_dataframe(&self) -> PipelineResult<DataFrame> {
        let mut columns = vec![
            Series::new(USER_COLUMN.into(), self.user_names.clone()),
            Series::new(CONDITION_COLUMN.into(), self.conditions.clone()),
        ];
        for topic in &self.topics {
            columns.push(Series::new(topic.label.as_str().into(), topic.values.clone()));
        }
        Ok(DataFrame::new(columns)?)
    }

    /// Write the matrix as CSV, creating parent directories as needed.
    pub fn write_csv(&self, path: &Path) -> PipelineResult<()> {
        let mut df = self.to_dataframe()?;
        write_frame(path, &mut df)?;
        info!(
            path = %path.display(),
            rows = df.height(),
            codes = self.topics.len(),
            "wrote ENA matrix"
        );
        Ok(())
    }
}

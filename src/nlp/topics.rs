//! Density-based topic model.
//!
//! Documents are vectorised, clustered with DBSCAN (unclustered documents
//! become the outlier topic) and every topic is described by its highest
//! scoring class-based TF-IDF terms.

use std::{cmp::Ordering, collections::BTreeMap};

use indexmap::IndexMap;
use linfa::traits::Transformer;
use linfa_clustering::Dbscan;
use ndarray::Axis;
use tracing::{debug, info, instrument};

use crate::{
    config::TopicModelParams,
    error::{PipelineError, PipelineResult},
    nlp::{
        embeddings::document_vectors,
        features::{tokenize, Vocabulary},
        TopicAssigner, TopicAssignment, TopicCatalogue, TopicDescriptor, OUTLIER_TOPIC,
    },
};

/// Words joined into a topic's raw name.
const NAME_WORDS: usize = 4;
/// Member documents kept per topic for the descriptions table.
const REPRESENTATIVE_DOCS: usize = 3;

/// Default clustering backend.
#[derive(Debug, Clone)]
pub struct DensityTopicModel {
    params: TopicModelParams,
}

impl DensityTopicModel {
    pub fn new(params: TopicModelParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &TopicModelParams {
        &self.params
    }
}

impl TopicAssigner for DensityTopicModel {
    #[instrument(skip_all, fields(documents = documents.len(), language = %self.params.language))]
    fn assign(&self, documents: &[String]) -> PipelineResult<TopicAssignment> {
        // DBSCAN rejects neighbourhoods of a single point.
        let min_points = self.params.min_topic_size.max(2);
        if documents.len() < min_points {
            return Err(PipelineError::Clustering(format!(
                "{} documents cannot form a topic of at least {min_points}",
                documents.len()
            )));
        }

        let tokens: Vec<Vec<String>> = documents
            .iter()
            .map(|doc| tokenize(doc, self.params.language))
            .collect();
        let vocabulary = Vocabulary::build(&tokens);
        let vectors = document_vectors(documents, &tokens, &vocabulary)?;
        if vectors.ncols() == 0 {
            return Err(PipelineError::Clustering(
                "documents contain no usable tokens".to_string(),
            ));
        }

        // Zero rows are within unit distance of every normalised row; keep
        // them out of DBSCAN or they chain every cluster together.
        let (dense, empty): (Vec<usize>, Vec<usize>) = (0..vectors.nrows())
            .partition(|row| vectors.row(*row).iter().any(|value| *value != 0.0));
        if !empty.is_empty() {
            debug!(documents = empty.len(), "documents without usable tokens marked as outliers");
        }

        let mut memberships = vec![None; vectors.nrows()];
        if !dense.is_empty() {
            let clustered = Dbscan::params(min_points)
                .tolerance(self.params.tolerance)
                .transform(&vectors.select(Axis(0), &dense))
                .map_err(|err| PipelineError::Clustering(err.to_string()))?;
            for (row, cluster) in dense.iter().zip(clustered.iter()) {
                memberships[*row] = *cluster;
            }
        }

        let topic_ids = renumber_by_size(memberships);
        if topic_ids.iter().all(|id| *id == OUTLIER_TOPIC) {
            return Err(PipelineError::Clustering(format!(
                "no topic formed from {} documents; lower the minimum topic size or raise the tolerance",
                documents.len()
            )));
        }

        let catalogue = describe_topics(
            documents,
            &tokens,
            &vocabulary,
            &topic_ids,
            self.params.top_n_words,
        );
        let assignment = TopicAssignment {
            topic_ids,
            catalogue,
        };
        info!(
            topics = assignment.catalogue.len(),
            outliers = assignment.outlier_count(),
            "assigned topics"
        );
        Ok(assignment)
    }
}

/// Map raw cluster indices to ids ordered by descending size.
///
/// Ties keep first-occurrence order; unclustered documents get [`OUTLIER_TOPIC`].
fn renumber_by_size<I>(memberships: I) -> Vec<i64>
where
    I: IntoIterator<Item = Option<usize>>,
{
    let memberships: Vec<Option<usize>> = memberships.into_iter().collect();
    let mut sizes = IndexMap::<usize, usize>::new();
    for cluster in memberships.iter().flatten() {
        *sizes.entry(*cluster).or_insert(0) += 1;
    }
    let mut order: Vec<(usize, usize)> = sizes.into_iter().collect();
    order.sort_by(|a, b| b.1.cmp(&a.1));
    let remap: IndexMap<usize, i64> = order
        .iter()
        .enumerate()
        .map(|(new_id, (cluster, _))| (*cluster, new_id as i64))
        .collect();
    memberships
        .iter()
        .map(|m| {
            m.and_then(|cluster| remap.get(&cluster).copied())
                .unwrap_or(OUTLIER_TOPIC)
        })
        .collect()
}

/// Build the catalogue with c-TF-IDF: term frequency within a topic,
/// normalised by topic length and weighted by `ln(1 + A / f_t)` where `A`
/// is the mean topic length and `f_t` the term's corpus frequency.
fn describe_topics(
    documents: &[String],
    tokens: &[Vec<String>],
    vocabulary: &Vocabulary,
    topic_ids: &[i64],
    top_n_words: usize,
) -> TopicCatalogue {
    let mut members: BTreeMap<i64, Vec<usize>> = BTreeMap::new();
    for (idx, id) in topic_ids.iter().enumerate() {
        members.entry(*id).or_default().push(idx);
    }

    let counts = vocabulary.counts(tokens);
    let class_tf: BTreeMap<i64, Vec<f64>> = members
        .iter()
        .map(|(id, rows)| {
            let mut tf = vec![0.0; vocabulary.len()];
            for row in rows {
                for (col, value) in counts.row(*row).iter().enumerate() {
                    tf[col] += value;
                }
            }
            (*id, tf)
        })
        .collect();

    let mut term_totals = vec![0.0; vocabulary.len()];
    for tf in class_tf.values() {
        for (col, value) in tf.iter().enumerate() {
            term_totals[col] += value;
        }
    }
    let avg_words = term_totals.iter().sum::<f64>() / class_tf.len().max(1) as f64;

    let mut catalogue = TopicCatalogue::new();
    for (id, tf) in &class_tf {
        let words_in_topic = tf.iter().sum::<f64>();
        let scores: Vec<f64> = tf
            .iter()
            .zip(&term_totals)
            .map(|(freq, total)| {
                if *freq == 0.0 || words_in_topic == 0.0 {
                    0.0
                } else {
                    (freq / words_in_topic) * (1.0 + avg_words / total).ln()
                }
            })
            .collect();

        let mut ranked: Vec<usize> = (0..scores.len()).filter(|col| tf[*col] > 0.0).collect();
        ranked.sort_by(|a, b| {
            scores[*b]
                .total_cmp(&scores[*a])
                .then_with(|| vocabulary.term(*a).cmp(vocabulary.term(*b)))
        });
        let representation: Vec<String> = ranked
            .iter()
            .take(top_n_words.max(NAME_WORDS))
            .map(|col| vocabulary.term(*col).to_string())
            .collect();

        let mut name = id.to_string();
        for word in representation.iter().take(NAME_WORDS) {
            name.push('_');
            name.push_str(word);
        }

        let rows = &members[id];
        let mut by_relevance: Vec<(usize, f64)> = rows
            .iter()
            .map(|row| {
                let doc_counts = counts.row(*row);
                let length = doc_counts.sum().max(1.0);
                let relevance = doc_counts
                    .iter()
                    .zip(&scores)
                    .map(|(count, score)| count * score)
                    .sum::<f64>()
                    / length;
                (*row, relevance)
            })
            .collect();
        by_relevance.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        let representative_docs = by_relevance
            .iter()
            .take(REPRESENTATIVE_DOCS)
            .map(|(row, _)| documents[*row].clone())
            .collect();

        catalogue.insert(
            *id,
            TopicDescriptor {
                name,
                count: rows.len(),
                representation: representation.into_iter().take(top_n_words).collect(),
                representative_docs,
            },
        );
    }
    catalogue
}

//! Topic assignment: the clustering capability boundary and its default backend.

pub mod embeddings;
pub mod features;
pub mod topics;

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::PipelineResult;

pub use topics::DensityTopicModel;

/// Topic id reserved for documents that fit no coherent topic.
pub const OUTLIER_TOPIC: i64 = -1;

/// Human-readable description of one topic.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopicDescriptor {
    /// Raw name, typically `"<id>_<word>_<word>..."`.
    pub name: String,
    /// Number of documents assigned to the topic.
    pub count: usize,
    /// Ranked representative terms.
    pub representation: Vec<String>,
    /// A few member documents, in input order.
    pub representative_docs: Vec<String>,
}

impl TopicDescriptor {
    pub fn new(name: impl Into<String>, count: usize) -> Self {
        Self {
            name: name.into(),
            count,
            representation: Vec::new(),
            representative_docs: Vec::new(),
        }
    }
}

/// Mapping from topic id to descriptor, with the outlier id tracked explicitly.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopicCatalogue {
    outlier: i64,
    entries: BTreeMap<i64, TopicDescriptor>,
}

impl Default for TopicCatalogue {
    fn default() -> Self {
        Self::with_outlier(OUTLIER_TOPIC)
    }
}

impl TopicCatalogue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalogue whose noise topic uses a backend-specific id.
    pub fn with_outlier(outlier: i64) -> Self {
        Self {
            outlier,
            entries: BTreeMap::new(),
        }
    }

    /// Insert or replace the descriptor for `id`.
    pub fn insert(&mut self, id: i64, descriptor: TopicDescriptor) -> Option<TopicDescriptor> {
        self.entries.insert(id, descriptor)
    }

    pub fn get(&self, id: i64) -> Option<&TopicDescriptor> {
        self.entries.get(&id)
    }

    pub fn contains(&self, id: i64) -> bool {
        self.entries.contains_key(&id)
    }

    /// Entries in ascending id order, so the outlier topic comes first.
    pub fn iter(&self) -> impl Iterator<Item = (i64, &TopicDescriptor)> {
        self.entries.iter().map(|(id, d)| (*id, d))
    }

    pub fn outlier(&self) -> i64 {
        self.outlier
    }

    pub fn is_outlier(&self, id: i64) -> bool {
        id == self.outlier
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Output of a topic model run.
#[derive(Debug, Clone, PartialEq)]
pub struct TopicAssignment {
    /// One id per input document, in input order.
    pub topic_ids: Vec<i64>,
    pub catalogue: TopicCatalogue,
}

impl TopicAssignment {
    /// Documents that landed in the outlier topic.
    pub fn outlier_count(&self) -> usize {
        self.topic_ids
            .iter()
            .filter(|id| self.catalogue.is_outlier(**id))
            .count()
    }
}

/// Clustering capability: documents in, topic ids and a catalogue out.
///
/// Implementations must return exactly one id per document and describe
/// every id they emit.
pub trait TopicAssigner {
    fn assign(&self, documents: &[String]) -> PipelineResult<TopicAssignment>;
}

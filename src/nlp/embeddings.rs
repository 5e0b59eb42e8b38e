//! Document vectors fed to the clustering step.
//!
//! TF-IDF by default; MiniLM sentence embeddings via fastembed when the
//! `embeddings` feature is enabled.

use ndarray::Array2;
use tracing::info;

#[cfg(feature = "embeddings")]
use fastembed::TextEmbedding;

use crate::{
    error::PipelineResult,
    nlp::features::{self, Vocabulary},
};

/// Build one unit-length vector per document.
pub fn document_vectors(
    documents: &[String],
    tokens: &[Vec<String>],
    vocabulary: &Vocabulary,
) -> PipelineResult<Array2<f64>> {
    #[cfg(feature = "embeddings")]
    let vectors = {
        let _ = (tokens, vocabulary);
        embed(documents)?
    };

    #[cfg(not(feature = "embeddings"))]
    let vectors = features::tfidf(tokens, vocabulary);

    info!(
        documents = documents.len(),
        dims = vectors.ncols(),
        "built document vectors"
    );
    Ok(vectors)
}

#[cfg(feature = "embeddings")]
fn embed(documents: &[String]) -> PipelineResult<Array2<f64>> {
    use crate::error::PipelineError;

    let mut embedder = TextEmbedding::try_new(Default::default())
        .map_err(|err| PipelineError::Clustering(format!("loading embedding model: {err}")))?;
    let batch: Vec<&str> = documents.iter().map(String::as_str).collect();
    let embeddings = embedder
        .embed(batch, None)
        .map_err(|err| PipelineError::Clustering(format!("embedding documents: {err}")))?;
    let dims = embeddings.first().map_or(0, Vec::len);
    let flat: Vec<f64> = embeddings.iter().flatten().map(|v| *v as f64).collect();
    let mut vectors = Array2::from_shape_vec((documents.len(), dims), flat)
        .map_err(|err| PipelineError::Clustering(err.to_string()))?;
    features::normalise_rows(&mut vectors);
    Ok(vectors)
}

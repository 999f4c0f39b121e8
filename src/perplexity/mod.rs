//! Held-in perplexity of a corpus under posterior estimates.
//!
//! ```text
//! perplexity = exp( -(1/N) Σ_i log Σ_k θ[d_i,k] · φ[w_i,k] )
//! ```
//!
//! Lower is better. One value is produced per retained sample.

use crate::corpus::Corpus;
use crate::error::{LdaError, Result};
use crate::primitives::Matrix;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Perplexity of `corpus` under one (θ, φ) pair.
///
/// `doc_topic` must be `D × K` and `topic_term` `V × K`. A token whose
/// mixture probability underflows to zero is floored at
/// `f64::MIN_POSITIVE`; with positive priors this cannot happen.
///
/// # Errors
///
/// Returns an error if the matrix shapes don't match the corpus.
pub fn perplexity(corpus: &Corpus, doc_topic: &Matrix<f64>, topic_term: &Matrix<f64>) -> Result<f64> {
    let n_topics = doc_topic.n_cols();
    if doc_topic.n_rows() != corpus.n_docs() {
        return Err(LdaError::dimension_mismatch(
            "doc_topic rows",
            corpus.n_docs(),
            doc_topic.n_rows(),
        ));
    }
    if topic_term.shape() != (corpus.vocab_size(), n_topics) {
        return Err(LdaError::DimensionMismatch {
            expected: format!("topic_term {}x{n_topics}", corpus.vocab_size()),
            actual: format!("{}x{}", topic_term.n_rows(), topic_term.n_cols()),
        });
    }

    let log_likelihood: f64 = corpus
        .tokens()
        .iter()
        .zip(corpus.doc_ids())
        .map(|(&w, &d)| {
            let p: f64 = doc_topic
                .row(d)
                .iter()
                .zip(topic_term.row(w))
                .map(|(theta, phi)| theta * phi)
                .sum();
            p.max(f64::MIN_POSITIVE).ln()
        })
        .sum();

    Ok((-log_likelihood / corpus.n_tokens() as f64).exp())
}

/// Perplexity for each `(doc_topic, topic_term)` pair, in input order.
///
/// # Errors
///
/// Returns the first shape error encountered.
pub fn perplexities(corpus: &Corpus, estimates: &[(&Matrix<f64>, &Matrix<f64>)]) -> Result<Vec<f64>> {
    #[cfg(feature = "parallel")]
    let values = estimates
        .par_iter()
        .map(|(theta, phi)| perplexity(corpus, theta, phi))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let values = estimates
        .iter()
        .map(|(theta, phi)| perplexity(corpus, theta, phi))
        .collect();

    values
}

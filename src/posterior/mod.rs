//! Posterior mean estimates from sampled topic assignments.
//!
//! For one assignment with document-topic counts `n_dk` and topic-term
//! counts `n_kw`:
//!
//! ```text
//! θ[d,k] = (n_dk[d,k] + α) / (Σ_k' n_dk[d,k'] + K·α)
//! φ[w,k] = (n_kw[k,w] + β) / (Σ_w' n_kw[k,w'] + V·β)
//! ```
//!
//! The smoothing terms are always applied, so every entry is strictly
//! positive for positive priors. Each assignment is estimated
//! independently; with the `parallel` feature the estimates are computed
//! concurrently, each writing its own output slot.

use crate::config::Priors;
use crate::corpus::Corpus;
use crate::primitives::Matrix;
use crate::sampler::{doc_topic_counts, CollapsedTopicTerms, TopicTerms};
use serde::{Deserialize, Serialize};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Document-topic (`D × K`) and topic-term (`V × K`) estimates for one sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PosteriorEstimate {
    /// Row-stochastic document-topic matrix
    pub doc_topic: Matrix<f64>,
    /// Column-stochastic topic-term matrix
    pub topic_term: Matrix<f64>,
}

/// Document-topic matrix θ (`D × K`) for one assignment.
#[must_use]
pub fn doc_topic(corpus: &Corpus, topics: &[usize], n_topics: usize, alpha: f64) -> Matrix<f64> {
    let counts = doc_topic_counts(corpus, topics, n_topics);
    let k_alpha = n_topics as f64 * alpha;

    let mut theta = Vec::with_capacity(counts.len());
    for (row, &len) in counts.chunks(n_topics).zip(corpus.doc_lengths()) {
        let denom = len as f64 + k_alpha;
        theta.extend(row.iter().map(|&c| (f64::from(c) + alpha) / denom));
    }

    Matrix::from_vec_unchecked(corpus.n_docs(), n_topics, theta)
}

/// Topic-term matrix φ (`V × K`) for one assignment.
#[must_use]
pub fn topic_term(corpus: &Corpus, topics: &[usize], n_topics: usize, beta: f64) -> Matrix<f64> {
    let terms = CollapsedTopicTerms::from_assignment(corpus, topics, n_topics, beta);
    let vocab_size = corpus.vocab_size();

    let mut phi = Vec::with_capacity(vocab_size * n_topics);
    for w in 0..vocab_size {
        phi.extend((0..n_topics).map(|k| terms.weight(k, w)));
    }

    Matrix::from_vec_unchecked(vocab_size, n_topics, phi)
}

/// Both estimates for one assignment.
#[must_use]
pub fn estimate_one(
    corpus: &Corpus,
    topics: &[usize],
    n_topics: usize,
    priors: Priors,
) -> PosteriorEstimate {
    PosteriorEstimate {
        doc_topic: doc_topic(corpus, topics, n_topics, priors.alpha),
        topic_term: topic_term(corpus, topics, n_topics, priors.beta),
    }
}

/// Estimates for a batch of assignments, in input order.
#[must_use]
pub fn estimate(
    corpus: &Corpus,
    samples: &[Vec<usize>],
    n_topics: usize,
    priors: Priors,
) -> Vec<PosteriorEstimate> {
    #[cfg(feature = "parallel")]
    let estimates = samples
        .par_iter()
        .map(|topics| estimate_one(corpus, topics, n_topics, priors))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let estimates = samples
        .iter()
        .map(|topics| estimate_one(corpus, topics, n_topics, priors))
        .collect();

    estimates
}

/// Document-topic matrices only, for a batch of assignments.
#[must_use]
pub fn estimate_doc_topic(
    corpus: &Corpus,
    samples: &[Vec<usize>],
    n_topics: usize,
    alpha: f64,
) -> Vec<Matrix<f64>> {
    #[cfg(feature = "parallel")]
    let matrices = samples
        .par_iter()
        .map(|topics| doc_topic(corpus, topics, n_topics, alpha))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let matrices = samples
        .iter()
        .map(|topics| doc_topic(corpus, topics, n_topics, alpha))
        .collect();

    matrices
}

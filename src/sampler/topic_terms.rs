//! Topic-term factor of the collapsed Gibbs conditional.
//!
//! The per-token conditional is
//!
//! ```text
//! p(z = k | rest) ∝ (n_dk[d,k] + α) · f(k, w)
//! ```
//!
//! where `f` is either the collapsed term likelihood
//! `(n_kw[k,w] + β) / (n_k[k] + V·β)` (training) or a fixed topic-term
//! probability `φ[w,k]` (querying). Both share the sweep in
//! [`GibbsSampler`](super::GibbsSampler); only the policy differs.

use crate::corpus::Corpus;
use crate::primitives::Matrix;

/// Source of the topic-term factor for a Gibbs sweep.
pub trait TopicTerms {
    /// Topic-term factor `f(topic, term)`.
    fn weight(&self, topic: usize, term: usize) -> f64;

    /// Remove one occurrence of `term` from `topic`.
    fn remove(&mut self, topic: usize, term: usize);

    /// Add one occurrence of `term` to `topic`.
    fn add(&mut self, topic: usize, term: usize);
}

/// Topic-term counts that move with the chain.
///
/// Counts are stored term-major (`counts[w * K + k]`) so the `K` weights
/// read for one token are contiguous.
#[derive(Debug, Clone, PartialEq)]
pub struct CollapsedTopicTerms {
    n_topics: usize,
    beta: f64,
    vbeta: f64,
    counts: Vec<u32>,
    totals: Vec<u32>,
}

impl CollapsedTopicTerms {
    /// Tally `n_kw` and `n_k` from an assignment.
    ///
    /// `topics` must already be validated against `corpus` and `n_topics`.
    #[must_use]
    pub fn from_assignment(corpus: &Corpus, topics: &[usize], n_topics: usize, beta: f64) -> Self {
        let vocab_size = corpus.vocab_size();
        let mut counts = vec![0u32; vocab_size * n_topics];
        let mut totals = vec![0u32; n_topics];

        for (&w, &z) in corpus.tokens().iter().zip(topics) {
            counts[w * n_topics + z] += 1;
            totals[z] += 1;
        }

        Self {
            n_topics,
            beta,
            vbeta: vocab_size as f64 * beta,
            counts,
            totals,
        }
    }

    /// Occurrences of `term` currently assigned to `topic` (`n_kw[k,w]`).
    #[must_use]
    pub fn count(&self, topic: usize, term: usize) -> u32 {
        self.counts[term * self.n_topics + topic]
    }

    /// Tokens currently assigned to `topic` (`n_k[k]`).
    #[must_use]
    pub fn total(&self, topic: usize) -> u32 {
        self.totals[topic]
    }

    /// All topic totals.
    #[must_use]
    pub fn totals(&self) -> &[u32] {
        &self.totals
    }

    /// Smoothing pseudo-count.
    #[must_use]
    pub fn beta(&self) -> f64 {
        self.beta
    }
}

impl TopicTerms for CollapsedTopicTerms {
    #[inline]
    fn weight(&self, topic: usize, term: usize) -> f64 {
        (f64::from(self.counts[term * self.n_topics + topic]) + self.beta)
            / (f64::from(self.totals[topic]) + self.vbeta)
    }

    #[inline]
    fn remove(&mut self, topic: usize, term: usize) {
        self.counts[term * self.n_topics + topic] -= 1;
        self.totals[topic] -= 1;
    }

    #[inline]
    fn add(&mut self, topic: usize, term: usize) {
        self.counts[term * self.n_topics + topic] += 1;
        self.totals[topic] += 1;
    }
}

/// Externally estimated topic-term probabilities, held fixed.
#[derive(Debug, Clone, Copy)]
pub struct FixedTopicTerms<'a> {
    phi: &'a Matrix<f64>,
}

impl<'a> FixedTopicTerms<'a> {
    /// Wrap a `V × K` topic-term matrix.
    #[must_use]
    pub fn new(phi: &'a Matrix<f64>) -> Self {
        Self { phi }
    }
}

impl TopicTerms for FixedTopicTerms<'_> {
    #[inline]
    fn weight(&self, topic: usize, term: usize) -> f64 {
        self.phi.get(term, topic)
    }

    #[inline]
    fn remove(&mut self, _topic: usize, _term: usize) {}

    #[inline]
    fn add(&mut self, _topic: usize, _term: usize) {}
}

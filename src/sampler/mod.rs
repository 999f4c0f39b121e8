//! Collapsed Gibbs sampler for LDA.
//!
//! One sweep visits every token once, in corpus order (document by
//! document, position by position). For token `i` in document `d` with
//! term `w` and current topic `z`:
//!
//! 1. remove `i` from `n_dk[d,z]` and from the topic-term counts,
//! 2. weigh every topic `k` by `(n_dk[d,k] + α) · f(k, w)`,
//! 3. draw the new topic with one uniform variate,
//! 4. add `i` back under the new topic.
//!
//! Each token consumes exactly one `gen::<f64>()` from the generator, so a
//! seeded generator reproduces a chain exactly. Counts are consistent with
//! the assignment between tokens and therefore at every sweep boundary.
//!
//! # References
//!
//! - Griffiths, T.L., & Steyvers, M. (2004). Finding scientific topics. PNAS.

mod topic_terms;

pub use topic_terms::{CollapsedTopicTerms, FixedTopicTerms, TopicTerms};

use crate::corpus::Corpus;
use crate::error::{LdaError, Result};
use crate::primitives::Matrix;
use rand::Rng;

/// Draw a uniformly random topic for each of `n_tokens` tokens.
pub fn random_assignment<R: Rng + ?Sized>(n_tokens: usize, n_topics: usize, rng: &mut R) -> Vec<usize> {
    (0..n_tokens).map(|_| rng.gen_range(0..n_topics)).collect()
}

/// Check that `topics` has one entry per token and every entry is `< n_topics`.
///
/// # Errors
///
/// Returns an error describing the first violation.
pub fn validate_assignment(topics: &[usize], n_tokens: usize, n_topics: usize) -> Result<()> {
    if topics.len() != n_tokens {
        return Err(LdaError::InvalidArgument {
            param: "seed".to_string(),
            value: format!("length {}", topics.len()),
            constraint: format!("length {n_tokens} (one topic per token)"),
        });
    }
    if let Some(i) = topics.iter().position(|&z| z >= n_topics) {
        return Err(LdaError::InvalidArgument {
            param: format!("seed[{i}]"),
            value: topics[i].to_string(),
            constraint: format!("topic in 0..{n_topics}"),
        });
    }
    Ok(())
}

/// Tally document-topic counts (`D × K`, row-major) for an assignment.
#[must_use]
pub fn doc_topic_counts(corpus: &Corpus, topics: &[usize], n_topics: usize) -> Vec<u32> {
    let mut counts = vec![0u32; corpus.n_docs() * n_topics];
    for (&d, &z) in corpus.doc_ids().iter().zip(topics) {
        counts[d * n_topics + z] += 1;
    }
    counts
}

/// A single Markov chain over a corpus.
///
/// The sampler owns the live assignment and document-topic counts; the
/// topic-term side is supplied by a [`TopicTerms`] policy.
#[derive(Debug, Clone)]
pub struct GibbsSampler<'c, T: TopicTerms> {
    corpus: &'c Corpus,
    n_topics: usize,
    alpha: f64,
    topics: Vec<usize>,
    doc_topic: Vec<u32>,
    topic_terms: T,
    cumulative: Vec<f64>,
}

impl<'c> GibbsSampler<'c, CollapsedTopicTerms> {
    /// Training chain: topic-term counts are collapsed and move with the chain.
    ///
    /// # Errors
    ///
    /// Returns an error if `topics` is not a valid assignment for `corpus`.
    pub fn collapsed(
        corpus: &'c Corpus,
        n_topics: usize,
        alpha: f64,
        beta: f64,
        topics: Vec<usize>,
    ) -> Result<Self> {
        validate_assignment(&topics, corpus.n_tokens(), n_topics)?;
        let topic_terms = CollapsedTopicTerms::from_assignment(corpus, &topics, n_topics, beta);
        Ok(Self::with_topic_terms(corpus, n_topics, alpha, topics, topic_terms))
    }
}

impl<'c, 'p> GibbsSampler<'c, FixedTopicTerms<'p>> {
    /// Query chain: topic-term probabilities come from `phi` (`V × K`) and
    /// never change.
    ///
    /// # Errors
    ///
    /// Returns an error if `phi` does not match the corpus vocabulary and
    /// `n_topics`, or `topics` is not a valid assignment.
    pub fn fixed(
        corpus: &'c Corpus,
        n_topics: usize,
        alpha: f64,
        phi: &'p Matrix<f64>,
        topics: Vec<usize>,
    ) -> Result<Self> {
        if phi.shape() != (corpus.vocab_size(), n_topics) {
            return Err(LdaError::DimensionMismatch {
                expected: format!("{}x{n_topics}", corpus.vocab_size()),
                actual: format!("{}x{}", phi.n_rows(), phi.n_cols()),
            });
        }
        validate_assignment(&topics, corpus.n_tokens(), n_topics)?;
        Ok(Self::with_topic_terms(
            corpus,
            n_topics,
            alpha,
            topics,
            FixedTopicTerms::new(phi),
        ))
    }
}

impl<'c, T: TopicTerms> GibbsSampler<'c, T> {
    fn with_topic_terms(
        corpus: &'c Corpus,
        n_topics: usize,
        alpha: f64,
        topics: Vec<usize>,
        topic_terms: T,
    ) -> Self {
        let doc_topic = doc_topic_counts(corpus, &topics, n_topics);
        Self {
            corpus,
            n_topics,
            alpha,
            topics,
            doc_topic,
            topic_terms,
            cumulative: vec![0.0; n_topics],
        }
    }

    /// One full pass over the token stream.
    pub fn sweep<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let k = self.n_topics;
        let corpus = self.corpus;
        let tokens = corpus.tokens();
        let doc_ids = corpus.doc_ids();

        for i in 0..tokens.len() {
            let w = tokens[i];
            let d = doc_ids[i];
            let old = self.topics[i];
            let row = &mut self.doc_topic[d * k..(d + 1) * k];

            row[old] -= 1;
            self.topic_terms.remove(old, w);

            let mut total = 0.0;
            for (topic, slot) in self.cumulative.iter_mut().enumerate() {
                total += (f64::from(row[topic]) + self.alpha) * self.topic_terms.weight(topic, w);
                *slot = total;
            }

            let new = draw(&self.cumulative, total * rng.gen::<f64>());

            row[new] += 1;
            self.topic_terms.add(new, w);
            self.topics[i] = new;
        }
    }

    /// Run `iterations` sweeps.
    pub fn run<R: Rng + ?Sized>(&mut self, iterations: usize, rng: &mut R) {
        for _ in 0..iterations {
            self.sweep(rng);
        }
    }

    /// Current topic assignment.
    #[must_use]
    pub fn topics(&self) -> &[usize] {
        &self.topics
    }

    /// Consume the sampler, returning the assignment.
    #[must_use]
    pub fn into_topics(self) -> Vec<usize> {
        self.topics
    }

    /// Document-topic counts (`D × K`, row-major).
    #[must_use]
    pub fn doc_topic_counts(&self) -> &[u32] {
        &self.doc_topic
    }

    /// Topic-term policy in its current state.
    #[must_use]
    pub fn topic_terms(&self) -> &T {
        &self.topic_terms
    }

    /// Number of topics.
    #[must_use]
    pub fn n_topics(&self) -> usize {
        self.n_topics
    }
}

/// Index of the first cumulative weight exceeding `target`.
#[inline]
fn draw(cumulative: &[f64], target: f64) -> usize {
    cumulative
        .partition_point(|&c| c <= target)
        .min(cumulative.len() - 1)
}

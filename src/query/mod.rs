//! Topic inference for new documents against a trained model.
//!
//! The topic-term side is fixed: every query chain draws from
//!
//! ```text
//! p(z = k | rest) ∝ (n_dk[d,k] + α) · φ_s[w,k]
//! ```
//!
//! where `φ_s` is training sample `s` of the [`TopicTermModel`]. One
//! independent chain runs per training sample, so the result has as many
//! document-topic matrices as the model has samples. Chain `s` owns a
//! generator seeded with `random_seed + s`; with the `parallel` feature the
//! chains run concurrently and produce the same result as a sequential run.
//!
//! # Examples
//!
//! ```
//! use aprender_lda::lda::LdaGibbs;
//! use aprender_lda::query::QueryGibbs;
//!
//! let train = vec![
//!     vec!["bank", "loan", "rate", "bank"],
//!     vec!["goal", "team", "match", "goal"],
//! ];
//! let mut lda = LdaGibbs::new(&train, 2).expect("corpus");
//! lda.sample(20, 2, 3, false).expect("sample");
//!
//! let model = lda.topic_term_model().expect("sampled");
//! let new_docs = vec![vec!["loan", "bank", "unseen"]];
//! let mut query = QueryGibbs::new(&new_docs, model).expect("known tokens");
//! query.query(10).expect("query");
//!
//! assert_eq!(query.doc_topics().expect("queried").len(), 3);
//! assert_eq!(query.doc_topic_mean().expect("queried").shape(), (1, 2));
//! ```

mod model;

pub use model::TopicTermModel;

use crate::config::{check_concentration, default_alpha, DEFAULT_RANDOM_SEED};
use crate::corpus::Corpus;
use crate::error::{LdaError, Result};
use crate::perplexity::perplexities;
use crate::posterior::estimate_doc_topic;
use crate::primitives::Matrix;
use crate::sampler::{random_assignment, validate_assignment, GibbsSampler};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Query model: new documents encoded against a fixed topic-term model.
#[derive(Debug, Clone)]
pub struct QueryGibbs {
    model: TopicTermModel,
    corpus: Corpus,
    alpha: f64,
    /// Caller-supplied initial assignment, one row per training sample
    topic_seed: Option<Vec<Vec<usize>>>,
    random_seed: u64,
    sampled_topics: Vec<Vec<usize>>,
    doc_topic: Vec<Matrix<f64>>,
}

impl QueryGibbs {
    /// Encode `docs` against the model vocabulary.
    ///
    /// Tokens the model has never seen are dropped; a document left with
    /// no tokens gets the prior mean `1/K` for every topic. `alpha`
    /// defaults to `50/K`.
    ///
    /// # Errors
    ///
    /// Does not fail at present: unknown tokens are dropped rather than
    /// rejected, even when none remain.
    pub fn new<D, S>(docs: &[D], model: TopicTermModel) -> Result<Self>
    where
        D: AsRef<[S]>,
        S: AsRef<str>,
    {
        let corpus = Corpus::encode(docs, model.vocabulary());
        let alpha = default_alpha(model.n_topics());
        Ok(Self {
            model,
            corpus,
            alpha,
            topic_seed: None,
            random_seed: DEFAULT_RANDOM_SEED,
            sampled_topics: Vec::new(),
            doc_topic: Vec::new(),
        })
    }

    /// Set the base seed of the per-sample generators.
    #[must_use]
    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = seed;
        self
    }

    /// Override the document-topic hyperparameter.
    ///
    /// # Errors
    ///
    /// Returns an error unless `alpha` is finite and positive.
    pub fn set_priors(&mut self, alpha: f64) -> Result<()> {
        self.alpha = check_concentration("alpha", alpha)?;
        Ok(())
    }

    /// Override the random initial assignments, one row of `N` topics per
    /// training sample.
    ///
    /// # Errors
    ///
    /// Returns an error if the row count differs from the number of
    /// training samples or any row is not a valid assignment.
    pub fn set_seed(&mut self, seed: Vec<Vec<usize>>) -> Result<()> {
        if seed.len() != self.model.n_samples() {
            return Err(LdaError::InvalidArgument {
                param: "seed".to_string(),
                value: format!("{} rows", seed.len()),
                constraint: format!("{} rows (one per training sample)", self.model.n_samples()),
            });
        }
        for row in &seed {
            validate_assignment(row, self.corpus.n_tokens(), self.model.n_topics())?;
        }
        self.topic_seed = Some(seed);
        Ok(())
    }

    /// Run `iterations` sweeps of one independent chain per training sample
    /// and estimate the document-topic matrices from the final states.
    ///
    /// Replaces the results of any previous query.
    ///
    /// # Errors
    ///
    /// Returns an error if `iterations` is zero.
    pub fn query(&mut self, iterations: usize) -> Result<()> {
        if iterations == 0 {
            return Err(LdaError::invalid_argument("query_samples", 0, ">= 1"));
        }

        let n_topics = self.model.n_topics();
        let n_samples = self.model.n_samples();
        info!(
            k = n_topics,
            n_tokens = self.corpus.n_tokens(),
            n_docs = self.corpus.n_docs(),
            samples = n_samples,
            iterations,
            "querying documents"
        );

        let corpus = &self.corpus;
        let topic_terms = self.model.topic_terms();
        let topic_seed = self.topic_seed.as_deref();
        let alpha = self.alpha;
        let random_seed = self.random_seed;

        let run_sample = |s: usize| -> Result<Vec<usize>> {
            let mut rng = StdRng::seed_from_u64(random_seed.wrapping_add(s as u64));
            let seed = match topic_seed {
                Some(rows) => rows[s].clone(),
                None => random_assignment(corpus.n_tokens(), n_topics, &mut rng),
            };
            let mut sampler = GibbsSampler::fixed(corpus, n_topics, alpha, &topic_terms[s], seed)?;
            sampler.run(iterations, &mut rng);
            debug!(sample = s, "sample queried");
            Ok(sampler.into_topics())
        };

        #[cfg(feature = "parallel")]
        let sampled: Result<Vec<Vec<usize>>> = (0..n_samples).into_par_iter().map(run_sample).collect();

        #[cfg(not(feature = "parallel"))]
        let sampled: Result<Vec<Vec<usize>>> = (0..n_samples).map(run_sample).collect();

        let sampled = sampled?;
        self.doc_topic = estimate_doc_topic(&self.corpus, &sampled, n_topics, self.alpha);
        self.sampled_topics = sampled;
        Ok(())
    }

    /// Final assignment of every query chain; empty before [`query`](Self::query).
    #[must_use]
    pub fn sampled_topics(&self) -> &[Vec<usize>] {
        &self.sampled_topics
    }

    /// Document-topic matrix (`D × K`) of every query chain.
    ///
    /// # Errors
    ///
    /// Returns an error if [`query`](Self::query) has not run.
    pub fn doc_topics(&self) -> Result<&[Matrix<f64>]> {
        if self.doc_topic.is_empty() {
            return Err(LdaError::NotSampled);
        }
        Ok(&self.doc_topic)
    }

    /// Document-topic matrix averaged over the query chains.
    ///
    /// # Errors
    ///
    /// Returns an error if [`query`](Self::query) has not run.
    pub fn doc_topic_mean(&self) -> Result<Matrix<f64>> {
        Matrix::mean(&self.doc_topic)
    }

    /// Perplexity of the new documents for every training sample, pairing
    /// each queried document-topic matrix with its fixed topic-term matrix.
    ///
    /// # Errors
    ///
    /// Returns an error if [`query`](Self::query) has not run, or no query
    /// token is in the model vocabulary.
    pub fn perplexity(&self) -> Result<Vec<f64>> {
        let doc_topics = self.doc_topics()?;
        if self.corpus.n_tokens() == 0 {
            return Err(LdaError::invalid_argument(
                "documents",
                "0 in-vocabulary tokens",
                "at least one in-vocabulary token for perplexity",
            ));
        }
        let pairs: Vec<_> = doc_topics.iter().zip(self.model.topic_terms()).collect();
        perplexities(&self.corpus, &pairs)
    }

    /// Trained model the queries run against.
    #[must_use]
    pub fn model(&self) -> &TopicTermModel {
        &self.model
    }

    /// New documents encoded against the model vocabulary.
    #[must_use]
    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    #[must_use]
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    #[must_use]
    pub fn random_seed(&self) -> u64 {
        self.random_seed
    }

    /// Number of training samples, and therefore of query chains.
    #[must_use]
    pub fn n_samples(&self) -> usize {
        self.model.n_samples()
    }
}

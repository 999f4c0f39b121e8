//! Latent Dirichlet Allocation estimated by collapsed Gibbs sampling.
//!
//! # Quick Start
//!
//! ```
//! use aprender_lda::lda::LdaGibbs;
//!
//! let docs = vec![
//!     vec!["rate", "bank", "rate", "loan"],
//!     vec!["goal", "match", "goal", "team"],
//!     vec!["bank", "loan", "match"],
//! ];
//!
//! let mut lda = LdaGibbs::new(&docs, 2)
//!     .expect("non-empty corpus")
//!     .with_random_seed(7);
//! lda.sample(50, 5, 4, false).expect("valid schedule");
//!
//! let dt = lda.doc_topic_mean().expect("sampled");
//! assert_eq!(dt.shape(), (3, 2));
//! assert_eq!(lda.perplexity().expect("sampled").len(), 4);
//! ```

use crate::chain::{run_chain, SampleArchive, SampleSelection, Snapshot};
use crate::config::{check_topics, Priors, SamplerConfig, Schedule, DEFAULT_RANDOM_SEED};
use crate::corpus::{Corpus, Vocabulary};
use crate::error::{LdaError, Result};
use crate::perplexity::perplexities;
use crate::posterior::estimate;
use crate::primitives::Matrix;
use crate::query::TopicTermModel;
use crate::sampler::{random_assignment, validate_assignment};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

/// Trained LDA model: corpus, priors, live chain state and retained samples.
///
/// The generator is re-seeded from the random seed at the start of every
/// fresh run, so two fresh runs with the same inputs are identical.
/// Appending continues the generator where the previous run left it.
#[derive(Debug)]
pub struct LdaGibbs {
    /// Number of topics
    n_topics: usize,
    corpus: Corpus,
    vocabulary: Vocabulary,
    priors: Priors,
    /// Caller-supplied initial assignment
    topic_seed: Option<Vec<usize>>,
    random_seed: u64,
    rng: StdRng,
    archive: SampleArchive,
}

impl LdaGibbs {
    /// Build a model from tokenized documents with default priors
    /// (`alpha = 50/K`, `beta = 200/V`).
    ///
    /// # Errors
    ///
    /// Returns an error if `n_topics` is zero or the documents contain no
    /// tokens.
    pub fn new<D, S>(docs: &[D], n_topics: usize) -> Result<Self>
    where
        D: AsRef<[S]>,
        S: AsRef<str>,
    {
        check_topics(n_topics)?;
        let (corpus, vocabulary) = Corpus::from_documents(docs)?;
        let priors = Priors::defaults(n_topics, vocabulary.len());
        Ok(Self {
            n_topics,
            corpus,
            vocabulary,
            priors,
            topic_seed: None,
            random_seed: DEFAULT_RANDOM_SEED,
            rng: StdRng::seed_from_u64(DEFAULT_RANDOM_SEED),
            archive: SampleArchive::new(),
        })
    }

    /// Build a model and run the configured schedule.
    ///
    /// # Errors
    ///
    /// Returns an error if the config is invalid or the documents contain no
    /// tokens.
    pub fn from_config<D, S>(docs: &[D], config: &SamplerConfig) -> Result<Self>
    where
        D: AsRef<[S]>,
        S: AsRef<str>,
    {
        config.validate()?;
        let mut model = Self::new(docs, config.n_topics)?.with_random_seed(config.random_seed);
        let priors = config.priors(model.vocabulary.len());
        model.set_priors(priors.alpha, priors.beta)?;
        model.run(config.schedule, false)?;
        Ok(model)
    }

    /// Set the seed of the random generator.
    #[must_use]
    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = seed;
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Builder form of [`set_priors`](Self::set_priors).
    ///
    /// # Errors
    ///
    /// Returns an error unless both values are finite and positive.
    pub fn with_priors(mut self, alpha: f64, beta: f64) -> Result<Self> {
        self.set_priors(alpha, beta)?;
        Ok(self)
    }

    /// Override the Dirichlet hyperparameters.
    ///
    /// # Errors
    ///
    /// Returns an error unless both values are finite and positive.
    pub fn set_priors(&mut self, alpha: f64, beta: f64) -> Result<()> {
        self.priors = Priors::new(alpha, beta)?;
        Ok(())
    }

    /// Override the random initial assignment used by fresh runs.
    ///
    /// # Errors
    ///
    /// Returns an error unless `seed` has one topic in `0..K` per token.
    pub fn set_seed(&mut self, seed: Vec<usize>) -> Result<()> {
        validate_assignment(&seed, self.corpus.n_tokens(), self.n_topics)?;
        self.topic_seed = Some(seed);
        Ok(())
    }

    /// Install externally obtained assignment samples instead of sampling.
    ///
    /// Replaces the archive; posterior matrices are derived from each row.
    ///
    /// # Errors
    ///
    /// Returns an error if `samples` is empty or any row is not a valid
    /// assignment. The archive is untouched on error.
    pub fn set_sampled_topics(&mut self, samples: Vec<Vec<usize>>) -> Result<()> {
        if samples.is_empty() {
            return Err(LdaError::invalid_argument(
                "sampled_topics",
                "0 samples",
                "at least one sample",
            ));
        }
        for topics in &samples {
            validate_assignment(topics, self.corpus.n_tokens(), self.n_topics)?;
        }
        self.archive = SampleArchive::new();
        self.retain(samples);
        Ok(())
    }

    /// Run the sampler with `burnin + thinning * samples` sweeps, retaining
    /// `samples` states.
    ///
    /// With `append` and an existing archive the chain resumes from the last
    /// retained state and the new samples are added to the archive;
    /// otherwise a fresh chain starts from the seed and replaces it.
    ///
    /// # Errors
    ///
    /// Returns an error if `thinning` or `samples` is zero.
    pub fn sample(&mut self, burnin: usize, thinning: usize, samples: usize, append: bool) -> Result<()> {
        self.run(Schedule::new(burnin, thinning, samples)?, append)
    }

    /// [`sample`](Self::sample) with a prepared schedule.
    ///
    /// # Errors
    ///
    /// Returns an error if the schedule is invalid.
    pub fn run(&mut self, schedule: Schedule, append: bool) -> Result<()> {
        schedule.validate()?;

        let resume = if append {
            self.archive.last().map(|s| s.topics().to_vec())
        } else {
            None
        };
        let appending = resume.is_some();

        info!(
            k = self.n_topics,
            n_tokens = self.corpus.n_tokens(),
            n_docs = self.corpus.n_docs(),
            burnin = schedule.burnin,
            thinning = schedule.thinning,
            samples = schedule.samples,
            append = appending,
            "starting Gibbs chain"
        );

        let seed = match resume {
            Some(topics) => topics,
            None => {
                self.rng = StdRng::seed_from_u64(self.random_seed);
                match &self.topic_seed {
                    Some(seed) => seed.clone(),
                    None => random_assignment(self.corpus.n_tokens(), self.n_topics, &mut self.rng),
                }
            }
        };

        let retained = run_chain(
            &self.corpus,
            self.n_topics,
            self.priors,
            schedule,
            seed,
            &mut self.rng,
        )?;

        if !appending {
            self.archive = SampleArchive::new();
        }
        self.retain(retained);

        info!(samples = self.archive.len(), "Gibbs chain finished");
        Ok(())
    }

    fn retain(&mut self, samples: Vec<Vec<usize>>) {
        let estimates = estimate(&self.corpus, &samples, self.n_topics, self.priors);
        self.archive.extend(
            samples
                .into_iter()
                .zip(estimates)
                .map(|(topics, est)| Snapshot::new(topics, est)),
        );
    }

    /// Keep a subset of the retained samples.
    ///
    /// A count keeps the last `n` samples; a list keeps exactly those
    /// positions in the given order.
    ///
    /// # Errors
    ///
    /// Returns an error if the selection refers to a sample that doesn't
    /// exist; the archive is unchanged in that case.
    ///
    /// # Examples
    ///
    /// ```
    /// use aprender_lda::lda::LdaGibbs;
    ///
    /// let mut lda = LdaGibbs::new(&[vec!["a", "b"], vec!["b", "c"]], 2).expect("corpus");
    /// lda.sample(0, 1, 5, false).expect("sample");
    /// lda.samples_keep(vec![0, 2]).expect("positions exist");
    /// assert_eq!(lda.n_samples(), 2);
    /// lda.samples_keep(1).expect("count fits");
    /// assert_eq!(lda.n_samples(), 1);
    /// ```
    pub fn samples_keep(&mut self, selection: impl Into<SampleSelection>) -> Result<()> {
        let selection = selection.into();
        self.archive.keep(&selection)?;
        debug!(?selection, samples = self.archive.len(), "kept sample subset");
        Ok(())
    }

    /// Number of retained samples.
    #[must_use]
    pub fn n_samples(&self) -> usize {
        self.archive.len()
    }

    /// Retained samples with their posterior matrices.
    #[must_use]
    pub fn archive(&self) -> &SampleArchive {
        &self.archive
    }

    /// Averaged document-topic matrix (`D × K`).
    ///
    /// # Errors
    ///
    /// Returns an error if nothing has been sampled.
    pub fn doc_topic_mean(&self) -> Result<Matrix<f64>> {
        self.archive.doc_topic_mean()
    }

    /// Averaged topic-term matrix (`V × K`).
    ///
    /// # Errors
    ///
    /// Returns an error if nothing has been sampled.
    pub fn topic_term_mean(&self) -> Result<Matrix<f64>> {
        self.archive.topic_term_mean()
    }

    /// Held-in perplexity of every retained sample.
    ///
    /// # Errors
    ///
    /// Returns an error if nothing has been sampled.
    pub fn perplexity(&self) -> Result<Vec<f64>> {
        if self.archive.is_empty() {
            return Err(LdaError::NotSampled);
        }
        let pairs: Vec<_> = self
            .archive
            .iter()
            .map(|s| (s.doc_topic(), s.topic_term()))
            .collect();
        perplexities(&self.corpus, &pairs)
    }

    /// Top `n_words` terms of every topic by averaged probability.
    ///
    /// # Errors
    ///
    /// Returns an error if nothing has been sampled.
    pub fn top_words(&self, n_words: usize) -> Result<Vec<Vec<(String, f64)>>> {
        let topic_term = self.topic_term_mean()?;

        let mut result = Vec::with_capacity(self.n_topics);
        for topic in 0..self.n_topics {
            let mut scores: Vec<(usize, f64)> = topic_term.column(topic).into_iter().enumerate().collect();

            // Sort by probability descending, lower index first on ties
            scores.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
            scores.truncate(n_words);

            result.push(
                scores
                    .into_iter()
                    .filter_map(|(w, p)| self.vocabulary.term(w).map(|t| (t.to_string(), p)))
                    .collect(),
            );
        }

        Ok(result)
    }

    /// Fixed topic-term export for querying new documents: one `V × K`
    /// matrix per retained sample, paired with the vocabulary.
    ///
    /// # Errors
    ///
    /// Returns an error if nothing has been sampled.
    pub fn topic_term_model(&self) -> Result<TopicTermModel> {
        if self.archive.is_empty() {
            return Err(LdaError::NotSampled);
        }
        TopicTermModel::new(
            self.vocabulary.clone(),
            self.archive.iter().map(|s| s.topic_term().clone()).collect(),
        )
    }

    /// Term-to-index table.
    #[must_use]
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Encoded training corpus.
    #[must_use]
    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    /// Current hyperparameters.
    #[must_use]
    pub fn priors(&self) -> Priors {
        self.priors
    }

    /// Number of topics.
    #[must_use]
    pub fn n_topics(&self) -> usize {
        self.n_topics
    }

    /// Seed of the random generator.
    #[must_use]
    pub fn random_seed(&self) -> u64 {
        self.random_seed
    }
}

#[cfg(test)]
mod tests;

#[cfg(test)]
mod tests_lda_contract;

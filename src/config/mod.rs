//! Sampler configuration: Dirichlet priors and the retention schedule.
//!
//! # Example
//!
//! ```
//! use aprender_lda::config::SamplerConfig;
//!
//! let config = SamplerConfig::from_json(r#"{
//!     "n_topics": 4,
//!     "alpha": 0.5,
//!     "schedule": { "burnin": 50, "thinning": 10, "samples": 5 }
//! }"#).expect("valid config");
//! assert_eq!(config.schedule.total_iterations(), 100);
//! assert_eq!(config.random_seed, 42);
//! ```

use crate::error::{LdaError, Result};
use serde::{Deserialize, Serialize};

/// Default random seed, shared by the trained and query models.
pub const DEFAULT_RANDOM_SEED: u64 = 42;

/// Dirichlet concentration parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Priors {
    /// Topic-within-document concentration
    pub alpha: f64,
    /// Term-within-topic concentration
    pub beta: f64,
}

impl Priors {
    /// Create validated priors.
    ///
    /// # Errors
    ///
    /// Returns an error unless both values are finite and strictly positive.
    pub fn new(alpha: f64, beta: f64) -> Result<Self> {
        Ok(Self {
            alpha: check_concentration("alpha", alpha)?,
            beta: check_concentration("beta", beta)?,
        })
    }

    /// Default priors: `alpha = 50 / K`, `beta = 200 / V`.
    #[must_use]
    pub fn defaults(n_topics: usize, vocab_size: usize) -> Self {
        Self {
            alpha: default_alpha(n_topics),
            beta: 200.0 / vocab_size as f64,
        }
    }

    /// Re-check both values.
    ///
    /// # Errors
    ///
    /// Returns an error unless both values are finite and strictly positive.
    pub fn validate(&self) -> Result<()> {
        Self::new(self.alpha, self.beta).map(|_| ())
    }
}

/// Default topic-within-document concentration, `50 / K`.
#[must_use]
pub fn default_alpha(n_topics: usize) -> f64 {
    50.0 / n_topics as f64
}

/// Validate a single Dirichlet concentration parameter.
///
/// # Errors
///
/// Returns an error unless `value` is finite and strictly positive.
pub fn check_concentration(param: &str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(LdaError::invalid_argument(param, value, "finite value > 0"))
    }
}

/// Validate a topic count.
///
/// # Errors
///
/// Returns an error if `n_topics` is zero.
pub fn check_topics(n_topics: usize) -> Result<usize> {
    if n_topics == 0 {
        return Err(LdaError::invalid_argument("n_topics", n_topics, ">= 1"));
    }
    Ok(n_topics)
}

/// Burn-in / thinning / retention schedule for one chain run.
///
/// A run performs `burnin + thinning * samples` sweeps and retains the
/// state after sweep `burnin + thinning * j` for `j = 1..=samples`, so the
/// final sweep is always retained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    /// Sweeps discarded before the first retained sample
    pub burnin: usize,
    /// Sweeps between retained samples
    pub thinning: usize,
    /// Number of samples to retain
    pub samples: usize,
}

impl Schedule {
    /// Create a validated schedule.
    ///
    /// # Errors
    ///
    /// Returns an error if `thinning` or `samples` is zero.
    pub fn new(burnin: usize, thinning: usize, samples: usize) -> Result<Self> {
        let schedule = Self {
            burnin,
            thinning,
            samples,
        };
        schedule.validate()?;
        Ok(schedule)
    }

    /// Check `thinning >= 1`, `samples >= 1` and that the sweep count fits
    /// in `usize`.
    ///
    /// # Errors
    ///
    /// Returns an error naming the offending field.
    pub fn validate(&self) -> Result<()> {
        if self.thinning == 0 {
            return Err(LdaError::invalid_argument("thinning", self.thinning, ">= 1"));
        }
        if self.samples == 0 {
            return Err(LdaError::invalid_argument("samples", self.samples, ">= 1"));
        }
        if self.checked_total().is_none() {
            return Err(LdaError::invalid_argument(
                "schedule",
                format!("burnin={} thinning={} samples={}", self.burnin, self.thinning, self.samples),
                "burnin + thinning * samples <= usize::MAX",
            ));
        }
        Ok(())
    }

    /// Total sweeps performed by the run.
    ///
    /// Saturates at `usize::MAX` for a schedule that failed validation.
    #[must_use]
    pub fn total_iterations(&self) -> usize {
        self.checked_total().unwrap_or(usize::MAX)
    }

    fn checked_total(&self) -> Option<usize> {
        self.thinning.checked_mul(self.samples)?.checked_add(self.burnin)
    }

    /// Whether the state after sweep `iteration` (1-based) is retained.
    #[must_use]
    pub fn is_retained(&self, iteration: usize) -> bool {
        iteration > self.burnin
            && iteration <= self.total_iterations()
            && (iteration - self.burnin) % self.thinning == 0
    }
}

fn default_seed() -> u64 {
    DEFAULT_RANDOM_SEED
}

/// Serializable bundle of everything needed to estimate a model.
///
/// Missing `alpha`/`beta` fall back to [`Priors::defaults`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplerConfig {
    /// Number of topics (`K`)
    pub n_topics: usize,
    /// Topic-within-document concentration override
    #[serde(default)]
    pub alpha: Option<f64>,
    /// Term-within-topic concentration override
    #[serde(default)]
    pub beta: Option<f64>,
    /// Retention schedule
    pub schedule: Schedule,
    /// Seed for the chain's random generator
    #[serde(default = "default_seed")]
    pub random_seed: u64,
}

impl SamplerConfig {
    /// Config with default priors and seed.
    #[must_use]
    pub fn new(n_topics: usize, schedule: Schedule) -> Self {
        Self {
            n_topics,
            alpha: None,
            beta: None,
            schedule,
            random_seed: DEFAULT_RANDOM_SEED,
        }
    }

    /// Parse and validate a JSON config.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or any value is out of range.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| LdaError::Serialization(format!("invalid sampler config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Check topic count, prior overrides and schedule.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self) -> Result<()> {
        check_topics(self.n_topics)?;
        if let Some(alpha) = self.alpha {
            check_concentration("alpha", alpha)?;
        }
        if let Some(beta) = self.beta {
            check_concentration("beta", beta)?;
        }
        self.schedule.validate()
    }

    /// Resolve priors for a vocabulary of `vocab_size` terms.
    #[must_use]
    pub fn priors(&self, vocab_size: usize) -> Priors {
        let defaults = Priors::defaults(self.n_topics, vocab_size);
        Priors {
            alpha: self.alpha.unwrap_or(defaults.alpha),
            beta: self.beta.unwrap_or(defaults.beta),
        }
    }
}

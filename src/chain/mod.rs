//! Chain driver: burn-in, thinning and sample retention.
//!
//! A run of schedule `(burnin, thinning, samples)` performs
//! `burnin + thinning * samples` sweeps and keeps a copy of the assignment
//! after every `thinning`-th sweep past burn-in. The final sweep is always
//! retained, so resuming from the last retained sample continues the chain
//! exactly where it stopped.

mod archive;

pub use archive::{SampleArchive, SampleSelection, Snapshot};

use crate::config::{Priors, Schedule};
use crate::corpus::Corpus;
use crate::error::Result;
use crate::sampler::GibbsSampler;
use rand::Rng;
use tracing::debug;

/// Advance a collapsed chain from `seed` and return the retained assignments.
///
/// # Errors
///
/// Returns an error if the schedule or seed is invalid; nothing is sampled
/// in that case.
pub fn run_chain<R: Rng + ?Sized>(
    corpus: &Corpus,
    n_topics: usize,
    priors: Priors,
    schedule: Schedule,
    seed: Vec<usize>,
    rng: &mut R,
) -> Result<Vec<Vec<usize>>> {
    schedule.validate()?;
    priors.validate()?;
    let mut sampler = GibbsSampler::collapsed(corpus, n_topics, priors.alpha, priors.beta, seed)?;

    let mut retained = Vec::with_capacity(schedule.samples);
    for iteration in 1..=schedule.total_iterations() {
        sampler.sweep(rng);
        if schedule.is_retained(iteration) {
            debug!(iteration, sample = retained.len(), "retained chain state");
            retained.push(sampler.topics().to_vec());
        }
    }

    Ok(retained)
}

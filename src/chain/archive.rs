//! Retained samples and their derived posterior matrices.

use crate::error::{LdaError, Result};
use crate::posterior::PosteriorEstimate;
use crate::primitives::Matrix;
use serde::{Deserialize, Serialize};

/// One retained chain state with its posterior estimates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    topics: Vec<usize>,
    estimate: PosteriorEstimate,
}

impl Snapshot {
    /// Pair an assignment with the estimates derived from it.
    #[must_use]
    pub fn new(topics: Vec<usize>, estimate: PosteriorEstimate) -> Self {
        Self { topics, estimate }
    }

    /// Topic of every token.
    #[must_use]
    pub fn topics(&self) -> &[usize] {
        &self.topics
    }

    /// Document-topic matrix (`D × K`).
    #[must_use]
    pub fn doc_topic(&self) -> &Matrix<f64> {
        &self.estimate.doc_topic
    }

    /// Topic-term matrix (`V × K`).
    #[must_use]
    pub fn topic_term(&self) -> &Matrix<f64> {
        &self.estimate.topic_term
    }
}

/// Which retained samples to keep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SampleSelection {
    /// The last `n` samples, in chain order
    Last(usize),
    /// Exactly these positions, in the given order
    Indices(Vec<usize>),
}

impl From<usize> for SampleSelection {
    fn from(n: usize) -> Self {
        Self::Last(n)
    }
}

impl From<Vec<usize>> for SampleSelection {
    fn from(indices: Vec<usize>) -> Self {
        Self::Indices(indices)
    }
}

impl From<&[usize]> for SampleSelection {
    fn from(indices: &[usize]) -> Self {
        Self::Indices(indices.to_vec())
    }
}

impl<const N: usize> From<[usize; N]> for SampleSelection {
    fn from(indices: [usize; N]) -> Self {
        Self::Indices(indices.to_vec())
    }
}

/// Ordered sequence of retained samples.
///
/// Appending pushes new snapshots; subsetting rebuilds the sequence from
/// the selected positions, so derived matrices always travel with their
/// assignment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SampleArchive {
    snapshots: Vec<Snapshot>,
}

impl SampleArchive {
    /// Empty archive.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of retained samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Returns true if nothing has been retained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Append one snapshot.
    pub fn push(&mut self, snapshot: Snapshot) {
        self.snapshots.push(snapshot);
    }

    /// Sample at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Snapshot> {
        self.snapshots.get(index)
    }

    /// Most recent sample.
    #[must_use]
    pub fn last(&self) -> Option<&Snapshot> {
        self.snapshots.last()
    }

    /// Samples in chain order.
    pub fn iter(&self) -> impl Iterator<Item = &Snapshot> {
        self.snapshots.iter()
    }

    /// Restrict the archive to `selection`.
    ///
    /// # Errors
    ///
    /// Returns an error, leaving the archive unchanged, if the selection is
    /// empty or refers to a sample that doesn't exist.
    pub fn keep(&mut self, selection: &SampleSelection) -> Result<()> {
        let len = self.len();
        let indices: Vec<usize> = match selection {
            SampleSelection::Last(n) => {
                if *n == 0 || *n > len {
                    return Err(LdaError::InvalidArgument {
                        param: "index".to_string(),
                        value: n.to_string(),
                        constraint: format!("count in 1..={len}"),
                    });
                }
                (len - n..len).collect()
            }
            SampleSelection::Indices(indices) => {
                if indices.is_empty() {
                    return Err(LdaError::invalid_argument(
                        "index",
                        "[]",
                        "at least one sample position",
                    ));
                }
                if let Some(&bad) = indices.iter().find(|&&i| i >= len) {
                    return Err(LdaError::index_out_of_bounds("index", bad, len));
                }
                indices.clone()
            }
        };

        self.snapshots = indices.iter().map(|&i| self.snapshots[i].clone()).collect();
        Ok(())
    }

    /// Element-wise mean of the document-topic matrices.
    ///
    /// # Errors
    ///
    /// Returns [`LdaError::NotSampled`] if the archive is empty.
    pub fn doc_topic_mean(&self) -> Result<Matrix<f64>> {
        Matrix::mean(self.snapshots.iter().map(Snapshot::doc_topic))
    }

    /// Element-wise mean of the topic-term matrices.
    ///
    /// # Errors
    ///
    /// Returns [`LdaError::NotSampled`] if the archive is empty.
    pub fn topic_term_mean(&self) -> Result<Matrix<f64>> {
        Matrix::mean(self.snapshots.iter().map(Snapshot::topic_term))
    }
}

impl Extend<Snapshot> for SampleArchive {
    fn extend<I: IntoIterator<Item = Snapshot>>(&mut self, iter: I) {
        self.snapshots.extend(iter);
    }
}

//! Fixed-topic export of a trained model.

use crate::corpus::Vocabulary;
use crate::error::{LdaError, Result};
use crate::primitives::Matrix;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Topic-term matrices of a trained model paired with its vocabulary.
///
/// Holds one `V × K` matrix per retained training sample. Row `w` of every
/// matrix belongs to term `w` of the vocabulary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicTermModel {
    vocabulary: Vocabulary,
    topic_terms: Vec<Matrix<f64>>,
}

impl TopicTermModel {
    /// Pair a vocabulary with per-sample topic-term matrices.
    ///
    /// # Errors
    ///
    /// Returns an error if `topic_terms` is empty, a matrix has a row count
    /// different from the vocabulary length, the matrices disagree on
    /// the number of topics, or an entry is negative or not finite.
    pub fn new(vocabulary: Vocabulary, topic_terms: Vec<Matrix<f64>>) -> Result<Self> {
        validate(&vocabulary, &topic_terms)?;
        Ok(Self {
            vocabulary,
            topic_terms,
        })
    }

    /// Save the model with bincode.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or writing fails.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let bytes = bincode::serialize(self)
            .map_err(|e| LdaError::Serialization(format!("topic-term model serialization failed: {e}")))?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Load a model saved with [`save`](Self::save).
    ///
    /// # Errors
    ///
    /// Returns an error if reading or decoding fails, or the decoded model
    /// is inconsistent.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let model: Self = bincode::deserialize(&bytes)
            .map_err(|e| LdaError::Serialization(format!("topic-term model deserialization failed: {e}")))?;
        validate(&model.vocabulary, &model.topic_terms)?;
        Ok(model)
    }

    /// Vocabulary the matrices are indexed by.
    #[must_use]
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// One `V × K` matrix per training sample.
    #[must_use]
    pub fn topic_terms(&self) -> &[Matrix<f64>] {
        &self.topic_terms
    }

    #[must_use]
    pub fn n_topics(&self) -> usize {
        self.topic_terms.first().map_or(0, Matrix::n_cols)
    }

    #[must_use]
    pub fn n_samples(&self) -> usize {
        self.topic_terms.len()
    }

    #[must_use]
    pub fn vocab_size(&self) -> usize {
        self.vocabulary.len()
    }
}

fn validate(vocabulary: &Vocabulary, topic_terms: &[Matrix<f64>]) -> Result<()> {
    let Some(first) = topic_terms.first() else {
        return Err(LdaError::invalid_argument(
            "topic_terms",
            "0 samples",
            "at least one sample",
        ));
    };

    let n_topics = first.n_cols();
    if n_topics == 0 {
        return Err(LdaError::invalid_argument("topic_terms", "0 topics", "at least one topic"));
    }

    for matrix in topic_terms {
        if matrix.n_rows() != vocabulary.len() {
            return Err(LdaError::VocabularyMismatch {
                expected: matrix.n_rows(),
                actual: vocabulary.len(),
            });
        }
        if matrix.n_cols() != n_topics {
            return Err(LdaError::dimension_mismatch("topic_terms topics", n_topics, matrix.n_cols()));
        }
        if let Some(&bad) = matrix.as_slice().iter().find(|p| !(p.is_finite() && **p >= 0.0)) {
            return Err(LdaError::invalid_argument(
                "topic_terms",
                bad,
                "finite probabilities >= 0",
            ));
        }
    }

    Ok(())
}

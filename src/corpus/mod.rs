//! Corpus representation for topic models.
//!
//! Documents arrive as sequences of string tokens and are flattened into a
//! single token stream with a parallel document-id array:
//!
//! ```text
//! docs:    ["a","b","a"] ["b","c"]
//! tokens:   0   1   0     1   2
//! doc_ids:  0   0   0     1   1
//! ```
//!
//! The stream is built once and never mutated; samplers only read it.

use crate::error::{LdaError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Bidirectional mapping between distinct tokens and indices `0..V`.
///
/// Indices are assigned in order of first occurrence, so the same corpus
/// always yields the same vocabulary.
///
/// # Examples
///
/// ```
/// use aprender_lda::corpus::Vocabulary;
///
/// let vocab = Vocabulary::build(&[vec!["tax", "rate", "tax"], vec!["rate", "bank"]]);
/// assert_eq!(vocab.len(), 3);
/// assert_eq!(vocab.index_of("rate"), Some(1));
/// assert_eq!(vocab.term(2), Some("bank"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Vocabulary {
    terms: Vec<String>,
    index: HashMap<String, usize>,
}

impl Vocabulary {
    /// Build a vocabulary from tokenized documents.
    #[must_use]
    pub fn build<D, S>(docs: &[D]) -> Self
    where
        D: AsRef<[S]>,
        S: AsRef<str>,
    {
        let mut vocab = Self::default();
        for doc in docs {
            for token in doc.as_ref() {
                vocab.insert(token.as_ref());
            }
        }
        vocab
    }

    /// Create a vocabulary whose index `i` maps to `terms[i]`.
    ///
    /// # Errors
    ///
    /// Returns an error if a term appears more than once.
    pub fn from_terms(terms: Vec<String>) -> Result<Self> {
        let mut index = HashMap::with_capacity(terms.len());
        for (i, term) in terms.iter().enumerate() {
            if index.insert(term.clone(), i).is_some() {
                return Err(LdaError::invalid_argument(
                    "vocabulary",
                    format!("duplicate term {term:?}"),
                    "distinct terms",
                ));
            }
        }
        Ok(Self { terms, index })
    }

    fn insert(&mut self, token: &str) -> usize {
        if let Some(&idx) = self.index.get(token) {
            return idx;
        }
        let idx = self.terms.len();
        self.terms.push(token.to_string());
        self.index.insert(token.to_string(), idx);
        idx
    }

    /// Number of distinct terms (`V`).
    #[must_use]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Returns true if the vocabulary holds no terms.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Index of a term, if present.
    #[must_use]
    pub fn index_of(&self, term: &str) -> Option<usize> {
        self.index.get(term).copied()
    }

    /// Term at an index, if present.
    #[must_use]
    pub fn term(&self, idx: usize) -> Option<&str> {
        self.terms.get(idx).map(String::as_str)
    }

    /// Returns true if the term is in the vocabulary.
    #[must_use]
    pub fn contains(&self, term: &str) -> bool {
        self.index.contains_key(term)
    }

    /// All terms, ordered by index.
    #[must_use]
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Iterate `(index, term)` pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.terms.iter().enumerate().map(|(i, t)| (i, t.as_str()))
    }
}

impl TryFrom<Vec<String>> for Vocabulary {
    type Error = LdaError;

    fn try_from(terms: Vec<String>) -> Result<Self> {
        Self::from_terms(terms)
    }
}

impl From<Vocabulary> for Vec<String> {
    fn from(vocab: Vocabulary) -> Self {
        vocab.terms
    }
}

/// Flattened token stream with per-token document ids.
///
/// Invariant: `doc_ids` is non-decreasing and `doc_lengths[d]` equals the
/// number of positions with `doc_ids[i] == d`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Corpus {
    tokens: Vec<usize>,
    doc_ids: Vec<usize>,
    doc_lengths: Vec<usize>,
    vocab_size: usize,
}

impl Corpus {
    /// Build the vocabulary and token stream from training documents.
    ///
    /// # Errors
    ///
    /// Returns an error if the documents contain no tokens at all.
    ///
    /// # Examples
    ///
    /// ```
    /// use aprender_lda::corpus::Corpus;
    ///
    /// let (corpus, vocab) = Corpus::from_documents(&[vec!["a", "b", "a"], vec!["b", "c"]])
    ///     .expect("non-empty corpus");
    /// assert_eq!(corpus.n_tokens(), 5);
    /// assert_eq!(corpus.n_docs(), 2);
    /// assert_eq!(vocab.len(), 3);
    /// ```
    pub fn from_documents<D, S>(docs: &[D]) -> Result<(Self, Vocabulary)>
    where
        D: AsRef<[S]>,
        S: AsRef<str>,
    {
        let vocab = Vocabulary::build(docs);
        if vocab.is_empty() {
            return Err(LdaError::invalid_argument(
                "documents",
                format!("{} documents with 0 tokens", docs.len()),
                "at least one token",
            ));
        }
        let corpus = Self::encode(docs, &vocab);
        Ok((corpus, vocab))
    }

    /// Encode documents against an existing vocabulary.
    ///
    /// Tokens missing from `vocab` are dropped. Documents keep their
    /// positions even if every token is dropped, so document `d` of the
    /// input is always document `d` of the corpus. The stream may end up
    /// empty.
    #[must_use]
    pub fn encode<D, S>(docs: &[D], vocab: &Vocabulary) -> Self
    where
        D: AsRef<[S]>,
        S: AsRef<str>,
    {
        let mut tokens = Vec::new();
        let mut doc_ids = Vec::new();
        let mut doc_lengths = Vec::with_capacity(docs.len());

        for (d, doc) in docs.iter().enumerate() {
            let before = tokens.len();
            for token in doc.as_ref() {
                if let Some(idx) = vocab.index_of(token.as_ref()) {
                    tokens.push(idx);
                    doc_ids.push(d);
                }
            }
            doc_lengths.push(tokens.len() - before);
        }

        Self {
            tokens,
            doc_ids,
            doc_lengths,
            vocab_size: vocab.len(),
        }
    }

    /// Number of token occurrences (`N`).
    #[must_use]
    pub fn n_tokens(&self) -> usize {
        self.tokens.len()
    }

    /// Number of documents (`D`).
    #[must_use]
    pub fn n_docs(&self) -> usize {
        self.doc_lengths.len()
    }

    /// Size of the vocabulary the tokens index into (`V`).
    #[must_use]
    pub fn vocab_size(&self) -> usize {
        self.vocab_size
    }

    /// Vocabulary index of every token occurrence, in document order.
    #[must_use]
    pub fn tokens(&self) -> &[usize] {
        &self.tokens
    }

    /// Document id of every token occurrence.
    #[must_use]
    pub fn doc_ids(&self) -> &[usize] {
        &self.doc_ids
    }

    /// Token count of every document.
    #[must_use]
    pub fn doc_lengths(&self) -> &[usize] {
        &self.doc_lengths
    }
}

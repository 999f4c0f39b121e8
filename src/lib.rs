//! Latent Dirichlet Allocation by collapsed Gibbs sampling.
//!
//! Aprender-LDA estimates topic models from tokenized documents and infers
//! topic mixtures for new documents against a trained model. Chains are
//! seeded and reproducible; independent per-sample work runs on rayon when
//! the `parallel` feature is enabled.
//!
//! # Quick Start
//!
//! ```
//! use aprender_lda::prelude::*;
//!
//! let docs = vec![
//!     vec!["stock", "market", "price", "stock"],
//!     vec!["team", "goal", "match", "goal"],
//!     vec!["market", "trade", "price"],
//! ];
//!
//! let mut lda = LdaGibbs::new(&docs, 2)
//!     .expect("non-empty corpus")
//!     .with_priors(0.5, 0.1)
//!     .expect("positive priors");
//! lda.sample(100, 10, 5, false).expect("valid schedule");
//!
//! let dt = lda.doc_topic_mean().expect("sampled");
//! assert_eq!(dt.shape(), (3, 2));
//!
//! let mut query = QueryGibbs::new(&[vec!["goal", "team"]], lda.topic_term_model().expect("sampled"))
//!     .expect("known tokens");
//! query.query(20).expect("query");
//! assert_eq!(query.doc_topics().expect("queried").len(), 5);
//! ```
//!
//! # Modules
//!
//! - [`corpus`]: Vocabulary and flattened token streams
//! - [`config`]: Priors, sampling schedules and JSON configuration
//! - [`sampler`]: The per-token Gibbs update shared by training and querying
//! - [`chain`]: Burn-in, thinning and the archive of retained samples
//! - [`posterior`]: Document-topic and topic-term estimates
//! - [`perplexity`]: Held-in perplexity per sample
//! - [`lda`]: Trained model
//! - [`query`]: Topic inference for new documents

pub mod chain;
pub mod config;
pub mod corpus;
pub mod error;
pub mod lda;
pub mod perplexity;
pub mod posterior;
pub mod prelude;
pub mod primitives;
pub mod query;
pub mod sampler;

pub use error::{LdaError, Result};
pub use lda::LdaGibbs;
pub use primitives::Matrix;
pub use query::{QueryGibbs, TopicTermModel};

//! Convenience re-exports for common usage.
//!
//! # Usage
//!
//! ```
//! use aprender_lda::prelude::*;
//! ```

pub use crate::chain::SampleSelection;
pub use crate::config::{Priors, SamplerConfig, Schedule};
pub use crate::corpus::{Corpus, Vocabulary};
pub use crate::error::{LdaError, Result};
pub use crate::lda::LdaGibbs;
pub use crate::primitives::Matrix;
pub use crate::query::{QueryGibbs, TopicTermModel};

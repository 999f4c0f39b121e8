//! Core compute primitives.
//!
//! Dense row-major storage for the posterior matrices produced by the
//! sampler (document-topic and topic-term estimates).

mod matrix;

pub use matrix::Matrix;

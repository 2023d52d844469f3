//! Feature preprocessing for the classifier
//!
//! Turns one patient record into the ordered feature vector the model was
//! fitted on.

pub mod pipeline;
pub mod steps;

pub use pipeline::Preprocessor;

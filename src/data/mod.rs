//! Synthetic photometry generation.

pub mod synthetic;

pub use synthetic::*;

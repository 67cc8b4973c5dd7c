//! Bayesian MBB fitting.
//!
//! Responsibilities:
//!
//! - calibrate the normalization against a target luminosity
//! - evaluate the log-posterior over `(N, T[, β])`
//! - run the affine-invariant ensemble sampler (parallel walker evaluation)
//! - summarize chains into point/interval estimates and predictive bands

pub mod calibrate;
pub mod posterior;
pub mod sampler;
pub mod summary;

pub use calibrate::*;
pub use posterior::*;
pub use sampler::*;
pub use summary::*;

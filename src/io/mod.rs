//! Input/output helpers.
//!
//! - legacy scalar state files (`state`)
//! - photometry CSV ingest + validation (`photometry`)
//! - chain and predictive-curve JSON exports (`chain`)

pub mod chain;
pub mod photometry;
pub mod state;

pub use chain::*;
pub use photometry::*;
pub use state::*;

//! Modified-blackbody spectral forms.
//!
//! Models are implemented as small, pure functions so that calibration,
//! integration and sampling code can share them freely across threads.

pub mod greybody;

pub use greybody::*;

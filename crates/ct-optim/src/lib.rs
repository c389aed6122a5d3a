//! ct-optim: derivative-free minimisation.
//!
//! Contains:
//! - nelder_mead (downhill simplex with configurable coefficients)
//! - error (crate error type, generic over the objective's error)

pub mod error;
pub mod nelder_mead;

pub use error::{OptimError, OptimResult};
pub use nelder_mead::{minimize, nelder_mead, simplex_around, Minimum, NelderMeadConfig};

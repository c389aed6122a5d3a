//! ct-poly: polynomial algebra and rational transfer functions.
//!
//! Contains:
//! - polynomial (dense real polynomials, long division, formatting)
//! - roots (factored form: leading factor plus complex roots)
//! - finder (Newton root finder with deflation)
//! - linear (rational transfer functions with cached zeros/poles)
//! - state_space (companion-form conversion used by the simulator)
//! - error (crate error type)

pub mod error;
pub mod finder;
pub mod linear;
pub mod polynomial;
pub mod roots;
pub mod state_space;

pub use error::{PolyError, PolyResult};
pub use linear::{CacheState, Linear, RootsCache};
pub use num_complex::Complex64;
pub use polynomial::Polynomial;
pub use roots::Roots;
pub use state_space::StateSpace;

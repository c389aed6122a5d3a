//! ct-twoport: linear two-port networks over complex scalars.
//!
//! Contains:
//! - twoport (the five parameter sets H, Z, Y, C, A, conversions, port
//!   quantities and series/parallel/cascade composition)
//! - error (crate error type)

pub mod error;
pub mod twoport;

pub use error::{TwoPortError, TwoPortResult};
pub use num_complex::Complex64;
pub use twoport::{cascade_all, TpKind, TwoPort};

//! ct-core: shared foundation for the control toolkit.
//!
//! Contains:
//! - numeric (Real, ε, finiteness checks, `%g` formatting)
//! - ids (compact signal ids for the block simulator)
//! - point (x/y samples and lazy sample streams)
//! - error (shared error types)

pub mod error;
pub mod ids;
pub mod numeric;
pub mod point;

// Re-exports: nice ergonomics for downstream crates
pub use error::{CtError, CtResult};
pub use ids::*;
pub use numeric::*;
pub use point::{points_from_fn, points_from_vec, Point, Points};

//! Error types for polynomial and transfer-function operations.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PolyError {
    #[error("no coefficients given")]
    NoCoefficients,

    #[error("not canonical")]
    NotCanonical,

    #[error("division by zero")]
    DivisionByZero,

    #[error("not a real root")]
    NotARealRoot,

    #[error("no convergence in {poly}, s={z}, f(s)={f}")]
    NoConvergence { poly: String, z: String, f: String },

    #[error("transfer function is not proper")]
    NotProper,

    #[error("{what}")]
    InvalidArg { what: &'static str },

    /// Wraps a failure with the entity it happened on.
    #[error("{what}: {source}")]
    Context {
        what: String,
        #[source]
        source: Box<PolyError>,
    },
}

impl PolyError {
    pub fn context(self, what: impl Into<String>) -> Self {
        Self::Context {
            what: what.into(),
            source: Box::new(self),
        }
    }
}

pub type PolyResult<T> = Result<T, PolyError>;
